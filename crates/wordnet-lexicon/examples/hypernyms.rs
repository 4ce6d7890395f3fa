use std::env;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use wordnet_lexicon::{Lexicon, LexiconConfig, SenseGraph};
use wordnet_types::Pos;

/// Print every sense of a word with its ancestor chain.
///
/// Usage: `cargo run -p wordnet-lexicon --example hypernyms -- <word> [pos]`.
/// The dictionary comes from `WORDNET_DIR` / `WORDNET_LOAD_MODE`.
fn main() -> Result<()> {
    init_tracing();

    let mut args = env::args().skip(1);
    let word = args.next().context("usage: hypernyms <word> [noun|verb|adj|adv]")?;
    let pos = args
        .next()
        .map(|raw| raw.parse::<Pos>())
        .transpose()
        .context("invalid part of speech")?;

    let config = LexiconConfig::from_env();
    let lexicon = Lexicon::open(&config)
        .with_context(|| format!("opening {}", config.dict_dir.display()))?;

    let senses = match pos {
        Some(pos) => lexicon.find_senses(&word, pos)?,
        None => lexicon.find_all_senses(&word)?,
    };
    if senses.is_empty() {
        println!("no senses for {word:?}");
        return Ok(());
    }

    for sense in senses {
        println!("{} {sense}", sense.id);
        let depths = lexicon.expanded_hypernyms_depth(&sense)?;
        for (ancestor, depth) in &depths.ancestors {
            let words: Vec<&str> = ancestor.words().collect();
            println!("{:indent$}@ {}", "", words.join(", "), indent = depth * 2);
        }
        if let Some(root) = lexicon.expanded_first_hypernyms(&sense)?.last() {
            println!("  root: {} (max depth {})", root.id, depths.max_depth);
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
