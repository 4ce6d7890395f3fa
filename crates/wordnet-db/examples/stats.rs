use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wordnet_db::{LoadMode, RandomQuery, WordNet};
use wordnet_types::Pos;

fn main() -> Result<()> {
    let dict_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p wordnet-db --example stats -- <path-to-wordnet-dict>")?;

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;

    println!("Dictionary: {}", dict_dir.display());
    let mut rng = StdRng::seed_from_u64(0);
    for pos in Pos::ALL {
        let index = wn
            .build_cache(pos)
            .with_context(|| format!("building {pos} index"))?;
        let senses: usize = index.entries().iter().map(|e| e.sense_count()).sum();

        let mut word_count = 0usize;
        let mut pointer_count = 0usize;
        let mut gloss_example_count = 0usize;
        // Sample instead of decoding the whole data file.
        let sample = RandomQuery::default().pos(pos);
        for _ in 0..200 {
            let Some(entry) = wn.random_entry(&sample, &mut rng)? else {
                break;
            };
            for id in entry.synset_ids() {
                let syn = wn.get_synset(id)?;
                word_count += syn.words.len();
                pointer_count += syn.pointers.len();
                gloss_example_count += syn.gloss.examples.len();
            }
        }

        println!("{pos}:");
        println!("  Index entries : {}", index.len());
        println!("  Senses        : {}", senses);
        println!("  Sampled words    : {}", word_count);
        println!("  Sampled pointers : {}", pointer_count);
        println!("  Sampled examples : {}", gloss_example_count);
    }

    // Spot-check a couple of lemmas to confirm lookup.
    for (pos, lemma) in [(Pos::Noun, "dog"), (Pos::Verb, "run")] {
        println!(
            "Lemma '{}' ({:?}) exists? {}",
            lemma,
            pos,
            wn.lemma_exists(pos, lemma)?
        );
    }

    Ok(())
}
