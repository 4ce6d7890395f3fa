use wordnet_lexicon::{Lexicon, LexiconConfig, SenseGraph, WORDNET_DIR_VAR};
use wordnet_types::Pos;

#[test]
fn dog_reaches_entity_in_open_english_wordnet() {
    if std::env::var_os(WORDNET_DIR_VAR).is_none() {
        eprintln!("skipping: {WORDNET_DIR_VAR} not set");
        return;
    }
    let lexicon = Lexicon::open(&LexiconConfig::from_env()).expect("open wordnet");

    let senses = lexicon.find_senses("dogs", Pos::Noun).expect("lookup");
    assert!(!senses.is_empty());
    let first = &senses[0];
    assert!(first.words().any(|w| w == "dog"));

    let ancestors = lexicon.expanded_hypernyms(first).expect("expand");
    assert!(ancestors.iter().any(|s| s.words().any(|w| w == "entity")));

    let depths = lexicon.expanded_hypernyms_depth(first).expect("expand with depth");
    assert_eq!(depths.ancestors.len(), ancestors.len());
    assert!(depths.max_depth >= 5);
}
