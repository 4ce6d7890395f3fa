use std::env;
use std::path::PathBuf;

use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn loads_open_english_wordnet() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let wn = WordNet::load_with_mode(&dir, LoadMode::Mmap).expect("load open english wordnet");

    assert!(wn.index_count(Pos::Noun).unwrap() > 10_000, "noun index too small");
    assert!(wn.index_count(Pos::Verb).unwrap() > 1_000, "verb index too small");
    assert!(wn.lemma_exists(Pos::Noun, "dog").unwrap());
    assert!(wn.lemma_exists(Pos::Verb, "run").unwrap());

    for id in wn.synsets_for_lemma(Pos::Noun, "dog").unwrap() {
        let synset = wn.get_synset(id).expect("dog synsets decode");
        assert!(synset.words().any(|w| w.eq_ignore_ascii_case("dog")));
    }
}
