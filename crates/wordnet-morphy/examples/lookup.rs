use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::{ExceptionTable, Morphy};
use wordnet_types::{Pos, normalize_lemma};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args.next().map(PathBuf::from).context(
        "usage: cargo run -p wordnet-morphy --example lookup -- <dict-dir> [--demo | <word>]",
    )?;
    let next = args.next();
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let demo_words: Vec<String> = match next.as_deref() {
        Some("--demo") => vec![
            "ran".into(),
            "better".into(),
            "children".into(),
            "dogs".into(),
            "happiest".into(),
        ],
        Some(word) => vec![normalize_lemma(word)],
        None => bail!(
            "usage: cargo run -p wordnet-morphy --example lookup -- <dict-dir> [--demo | <word>]"
        ),
    };

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;
    let mut exceptions = ExceptionTable::new();
    for pos in Pos::ALL {
        if let Some(bytes) = wn.source().exception_file(pos)? {
            exceptions.extend_from_text(pos, &String::from_utf8_lossy(&bytes));
        }
    }
    let morph = Morphy::new(exceptions);
    let indexes = Pos::ALL
        .into_iter()
        .map(|pos| wn.build_cache(pos))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading index files in {}", dict_dir.display()))?;
    let exists = |pos: Pos, lemma: &str| indexes[pos.index()].contains(lemma);

    println!("Dictionary: {}", dict_dir.display());

    for word in demo_words {
        println!("\nSurface: {}", word);
        for pos in Pos::ALL {
            let candidates = morph.lemmas_for(pos, &word, exists);
            if candidates.is_empty() {
                continue;
            }
            println!("  {:?}:", pos);
            for cand in candidates {
                println!("    {:<10} [{:?}]", cand.lemma, cand.source);
            }
        }
    }

    Ok(())
}
