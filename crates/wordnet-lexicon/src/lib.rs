//! Word lookup, morphological normalization and relation traversal over a
//! WordNet dictionary.
//!
//! [`Lexicon`] ties the record reader from `wordnet-db` to the morphy rules
//! from `wordnet-morphy`: surface forms such as `dogs` or `ran` resolve to
//! their base lemmas, then to decoded synsets, and [`SenseGraph`] walks the
//! relation pointers of those synsets.
//!
//! ```no_run
//! use wordnet_lexicon::{Lexicon, LexiconConfig, SenseGraph};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let lexicon = Lexicon::open(&LexiconConfig::from_env())?;
//! for sense in lexicon.find_senses("dogs", Pos::Noun)? {
//!     let chain: Vec<String> = lexicon
//!         .expanded_hypernyms(&sense)?
//!         .iter()
//!         .map(|s| s.words[0].text.clone())
//!         .collect();
//!     println!("{sense}\n  -> {}", chain.join(" -> "));
//! }
//! # Ok(()) }
//! ```

mod config;
mod graph;

use std::sync::OnceLock;

use rand::Rng;
use tracing::debug;
use wordnet_morphy::{ExceptionTable, Morphy};
use wordnet_types::{IndexEntry, Pos, Synset, SynsetId, normalize_lemma};

pub use config::{LOAD_MODE_VAR, LexiconConfig, WORDNET_DIR_VAR, parse_load_mode};
pub use graph::{HypernymDepths, SenseGraph};
pub use wordnet_db::{DbError, DictDir, DictSource, LoadMode, MemoryDict, RandomQuery, Result, WordNet};
pub use wordnet_morphy::{CandidateSource, LemmaCandidate};

/// A dictionary with lazily built lemma indexes and exception tables.
///
/// Every cache is filled on first use and kept for the lifetime of the
/// value. Synsets are decoded on each request.
pub struct Lexicon {
    wordnet: WordNet,
    morphy: OnceLock<Morphy>,
}

impl Lexicon {
    /// Open the directory named by `config`.
    pub fn open(config: &LexiconConfig) -> Result<Self> {
        debug!(dir = %config.dict_dir.display(), mode = ?config.mode, "opening lexicon");
        Ok(Self::new(WordNet::load_with_mode(&config.dict_dir, config.mode)?))
    }

    /// [`Lexicon::open`] with [`LexiconConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::open(&LexiconConfig::from_env())
    }

    pub fn from_source(source: impl DictSource + 'static) -> Self {
        Self::new(WordNet::from_source(source))
    }

    pub fn new(wordnet: WordNet) -> Self {
        Self {
            wordnet,
            morphy: OnceLock::new(),
        }
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }

    /// Exception tables for every category, read on first use.
    pub fn morphology(&self) -> Result<&Morphy> {
        if let Some(morphy) = self.morphy.get() {
            return Ok(morphy);
        }
        let mut exceptions = ExceptionTable::new();
        for pos in Pos::ALL {
            if let Some(bytes) = self.wordnet.source().exception_file(pos)? {
                exceptions.extend_from_text(pos, &String::from_utf8_lossy(&bytes));
            }
            debug!(%pos, entries = exceptions.len(pos), "exception table loaded");
        }
        Ok(self.morphy.get_or_init(|| Morphy::new(exceptions)))
    }

    /// Exact index entry for `word` under `pos`.
    pub fn lemma(&self, pos: Pos, word: &str) -> Result<Option<&IndexEntry>> {
        self.wordnet.index_entry(pos, word)
    }

    /// Exact lookups in every category, in [`Pos::ALL`] order.
    pub fn lemmas_all(&self, word: &str) -> Result<Vec<(Pos, Vec<&IndexEntry>)>> {
        self.wordnet.index_entries(word)
    }

    pub fn get(&self, pos: Pos, offset: u32) -> Result<Synset> {
        self.wordnet.get_synset(SynsetId { pos, offset })
    }

    /// Base forms of `form` that exist in the dictionary.
    ///
    /// With a category, only that category is consulted. Without one, the
    /// per-category results are merged in [`Pos::ALL`] order without
    /// duplicates.
    pub fn morphy(&self, form: &str, pos: Option<Pos>) -> Result<Vec<String>> {
        let morphy = self.morphology()?;
        match pos {
            Some(pos) => {
                let index = self.wordnet.build_cache(pos)?;
                Ok(morphy.morphy(pos, form, |_, lemma| index.contains(lemma)))
            }
            None => {
                let indexes = [
                    self.wordnet.build_cache(Pos::ALL[0])?,
                    self.wordnet.build_cache(Pos::ALL[1])?,
                    self.wordnet.build_cache(Pos::ALL[2])?,
                    self.wordnet.build_cache(Pos::ALL[3])?,
                ];
                Ok(morphy.morphy_all(form, |pos, lemma| indexes[pos.index()].contains(lemma)))
            }
        }
    }

    /// Like [`Lexicon::morphy`] for one category, keeping provenance.
    pub fn lemma_candidates(&self, form: &str, pos: Pos) -> Result<Vec<LemmaCandidate>> {
        let morphy = self.morphology()?;
        let index = self.wordnet.build_cache(pos)?;
        Ok(morphy.lemmas_for(pos, form, |_, lemma| index.contains(lemma)))
    }

    /// Senses of `word` under `pos`.
    ///
    /// The word is lowercased and spaces become underscores before morphy
    /// runs. Results follow the order of the normalized forms, then the
    /// sense order of each index entry.
    pub fn find_senses(&self, word: &str, pos: Pos) -> Result<Vec<Synset>> {
        let form = normalize_lemma(word);
        let mut senses = Vec::new();
        for lemma in self.morphy(&form, Some(pos))? {
            if let Some(entry) = self.lemma(pos, &lemma)? {
                senses.extend(self.synsets_for(entry)?);
            }
        }
        Ok(senses)
    }

    /// [`Lexicon::find_senses`] for every category, in [`Pos::ALL`] order.
    pub fn find_all_senses(&self, word: &str) -> Result<Vec<Synset>> {
        let mut senses = Vec::new();
        for pos in Pos::ALL {
            senses.extend(self.find_senses(word, pos)?);
        }
        Ok(senses)
    }

    /// Decode every synset listed by `entry`, in sense order.
    pub fn synsets_for(&self, entry: &IndexEntry) -> Result<Vec<Synset>> {
        entry.synset_ids().map(|id| self.wordnet.get_synset(id)).collect()
    }

    pub fn random_lemma<R: Rng + ?Sized>(
        &self,
        query: &RandomQuery,
        rng: &mut R,
    ) -> Result<Option<&IndexEntry>> {
        self.wordnet.random_entry(query, rng)
    }
}

impl SenseGraph for Lexicon {
    fn decode(&self, pos: Pos, offset: u32) -> Result<Synset> {
        self.get(pos, offset)
    }
}
