use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wordnet_db::{DbError, DictSource, LoadMode, MemoryDict, RandomQuery, WordNet};
use wordnet_types::{Pos, SynsetId, SynsetType};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("wn")
}

#[test]
fn parses_index_with_full_fields() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let entry = wn
        .index_entry(Pos::Noun, "dog")
        .expect("index readable")
        .expect("dog index entry present");
    assert_eq!(entry.lemma, "dog");
    assert_eq!(entry.pos, Pos::Noun);
    assert_eq!(entry.ptr_symbols, vec!["@", "~"]);
    assert_eq!(entry.tagsense_cnt, 1);
    assert_eq!(entry.synset_offsets, vec![949, 1105]);
    // Line 1 is the license header.
    assert_eq!(entry.id, 17);
}

#[test]
fn parses_synset_with_pointers_and_gloss() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let synset = wn
        .get_synset(SynsetId {
            pos: Pos::Noun,
            offset: 949,
        })
        .expect("synset present");

    assert_eq!(synset.lex_filenum, 5);
    assert_eq!(synset.synset_type, SynsetType::Noun);
    assert_eq!(synset.words().collect::<Vec<_>>(), vec!["dog", "domestic_dog"]);

    let hypernyms: Vec<u32> = synset.pointers_with("@").map(|p| p.target.offset).collect();
    assert_eq!(hypernyms, vec![814, 654]);
    assert_eq!(synset.pointers[2].symbol, "~");

    assert_eq!(synset.gloss.definition, "a member of the genus Canis");
    assert_eq!(synset.gloss.examples, vec!["the dog barked all night"]);
}

#[test]
fn parses_verb_frames() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let synset = wn
        .get_synset(SynsetId {
            pos: Pos::Verb,
            offset: 468,
        })
        .expect("verb synset");
    assert_eq!(synset.frames.len(), 2);
    assert_eq!(synset.frames[0].frame_number, 1);
    assert_eq!(synset.frames[0].word_number, None);
    assert_eq!(synset.frames[1].word_number, Some(1));
    let antonym = &synset.pointers[1];
    assert_eq!((antonym.src_word, antonym.dst_word), (Some(1), Some(1)));
}

#[test]
fn satellites_decode_from_the_adjective_file() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let synset = wn
        .get_synset(SynsetId {
            pos: Pos::Adj,
            offset: 322,
        })
        .unwrap();
    assert_eq!(synset.synset_type, SynsetType::AdjSatellite);
    assert_eq!(synset.synset_type.pos(), Pos::Adj);
}

#[test]
fn every_indexed_offset_decodes() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    for pos in Pos::ALL {
        let index = wn.build_cache(pos).unwrap();
        assert!(!index.is_empty(), "{pos} index empty");
        for entry in index.entries() {
            assert!(!entry.synset_offsets.is_empty());
            for id in entry.synset_ids() {
                let synset = wn.get_synset(id).unwrap();
                assert!(
                    synset.words().any(|w| w.eq_ignore_ascii_case(&entry.lemma)),
                    "{} missing from {}",
                    entry.lemma,
                    synset.id
                );
            }
        }
    }
}

#[test]
fn load_modes_agree() {
    let mmap = WordNet::load_with_mode(fixture_dir(), LoadMode::Mmap).unwrap();
    let owned = WordNet::load_with_mode(fixture_dir(), LoadMode::Owned).unwrap();
    let seek = WordNet::load_with_mode(fixture_dir(), LoadMode::Seek).unwrap();
    for (pos, offset) in [(Pos::Noun, 65), (Pos::Verb, 827), (Pos::Adv, 203)] {
        let id = SynsetId { pos, offset };
        let expected = mmap.get_synset(id).unwrap();
        assert_eq!(owned.get_synset(id).unwrap(), expected);
        assert_eq!(seek.get_synset(id).unwrap(), expected);
    }
    assert_eq!(
        seek.index_entry(Pos::Verb, "fall").unwrap(),
        mmap.index_entry(Pos::Verb, "fall").unwrap()
    );
    for wn in [&mmap, &owned, &seek] {
        assert!(wn.source().exception_file(Pos::Noun).unwrap().is_some());
    }
}

#[test]
fn pointer_into_wrong_file_is_malformed() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    // 227 is the start of `run` in data.verb but the middle of a noun line.
    let err = wn
        .get_synset(SynsetId {
            pos: Pos::Noun,
            offset: 227,
        })
        .unwrap_err();
    assert!(err.is_malformed(), "{err}");

    let seek = WordNet::load_with_mode(fixture_dir(), LoadMode::Seek).unwrap();
    let err = seek
        .get_synset(SynsetId {
            pos: Pos::Noun,
            offset: 999_999,
        })
        .unwrap_err();
    assert!(err.is_malformed(), "{err}");
}

#[test]
fn missing_words_are_not_errors() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert!(wn.index_entry(Pos::Noun, "zebra").unwrap().is_none());
    assert!(wn.index_entry(Pos::Noun, "Dog").unwrap().is_none());
    assert!(wn.synsets_for_lemma(Pos::Adv, "dog").unwrap().is_empty());
    assert!(!wn.lemma_exists(Pos::Verb, "dog").unwrap());
}

#[test]
fn index_entries_cover_all_categories() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let all = wn.index_entries("fall").unwrap();
    let cats: Vec<Pos> = all.iter().map(|(pos, _)| *pos).collect();
    assert_eq!(cats, Pos::ALL.to_vec());
    assert_eq!(all[0].1.len(), 1);
    assert!(all[1..].iter().all(|(_, entries)| entries.is_empty()));
}

#[test]
fn random_entry_uses_supplied_rng() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let query = RandomQuery::default().pos(Pos::Adv).length(7, 7);
    let mut a = StdRng::seed_from_u64(3);
    let mut b = StdRng::seed_from_u64(3);
    let first = wn.random_entry(&query, &mut a).unwrap().unwrap();
    let second = wn.random_entry(&query, &mut b).unwrap().unwrap();
    assert_eq!(first.lemma, second.lemma);
    assert!(["quickly", "rapidly"].contains(&first.lemma.as_str()));
}

#[test]
fn missing_directory_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = WordNet::load(dir.path()).err().expect("empty dir must fail");
    assert!(matches!(err, DbError::MissingFile(_)), "{err}");
}

#[test]
fn unreadable_index_does_not_poison_other_categories() {
    let dir = tempfile::tempdir().unwrap();
    for entry in fs::read_dir(fixture_dir()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    fs::write(dir.path().join("index.adv"), "well r 2 0 2 0 00000110\n").unwrap();

    let wn = WordNet::load_with_mode(dir.path(), LoadMode::Owned).unwrap();
    assert!(wn.index_entry(Pos::Adv, "well").unwrap_err().is_malformed());
    assert!(wn.index_entry(Pos::Adv, "well").unwrap_err().is_malformed());
    assert!(wn.index_entry(Pos::Noun, "dog").unwrap().is_some());
}

#[test]
fn memory_source_matches_the_documented_layout() {
    let data = format!(
        "{:<41}\n{}\n",
        "  1 header",
        "00000042 03 n 02 dog 0 canine 1 01 @ 00000099 n 0000 | a domesticated carnivorous mammal"
    );
    let wn = WordNet::from_source(
        MemoryDict::new()
            .with_file("index.noun", "dog n 1 1 @ 1 0 00000042\n")
            .with_file("data.noun", data),
    );
    let entry = wn.index_entry(Pos::Noun, "dog").unwrap().unwrap();
    let synset = wn.get_synset(entry.synset_ids().next().unwrap()).unwrap();
    assert_eq!(synset.id.to_string(), "00000042-n");
    assert_eq!(synset.lex_id("canine"), Some(1));
    assert_eq!(synset.gloss.raw, "a domesticated carnivorous mammal");
}
