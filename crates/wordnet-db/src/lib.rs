//! Read WordNet dictionaries lazily, one category and one record at a time.
//!
//! This crate decodes the canonical `index.*`/`data.*` files. Index files
//! are parsed into an in-memory [`LemmaIndex`] the first time a category is
//! queried; synsets are decoded straight from their byte offset on every
//! request and never cached. Storage sits behind [`DictSource`], so the same
//! code runs against a `dict/` directory ([`DictDir`], mmap/owned/seek via
//! [`LoadMode`]) or files held in memory ([`MemoryDict`]).
//!
//! # Features
//! - Strict decoding: counted sections must match the tokens present, and a
//!   data line must carry the offset it was read from. Violations surface as
//!   [`DbError::MalformedRecord`].
//! - Lazy per-category index caches with build-once/read-many semantics.
//! - Exact lookups, all-category lookups and length-bounded random sampling
//!   with a caller-supplied RNG.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet/dict", LoadMode::Mmap)?;
//! let dog = wn.index_entry(Pos::Noun, "dog")?.expect("dog in index");
//! for id in dog.synset_ids() {
//!     let syn = wn.get_synset(id)?;
//!     println!("{}: {}", syn.id, syn.gloss.definition);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example stats -- <dict>`.

mod decode;
mod error;
mod index;
mod source;

use std::path::Path;

use rand::Rng;
use wordnet_types::{IndexEntry, Pos, Synset, SynsetId};

pub use decode::{GLOSS_DELIMITER, RecordContext, parse_data_line, parse_index_line, read_line_at};
pub use error::{DbError, Result};
pub use index::{LemmaIndex, PosIndex, RandomQuery};
pub use source::{
    DictDir, DictSource, LoadMode, MemoryDict, data_file_name, exception_file_name,
    index_file_name,
};

/// A dictionary source together with its lemma index cache.
pub struct WordNet {
    source: Box<dyn DictSource>,
    lemmas: LemmaIndex,
}

impl WordNet {
    /// Open a `dict/` directory containing `data.*` and `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`load_with_mode`]
    /// to pick owned buffers or per-record seeking instead.
    ///
    /// [`load_with_mode`]: WordNet::load_with_mode
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        Ok(Self::from_source(DictDir::open(dict_dir, mode)?))
    }

    /// Wrap any source with a fresh, empty index cache.
    pub fn from_source(source: impl DictSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            lemmas: LemmaIndex::new(),
        }
    }

    pub fn source(&self) -> &dyn DictSource {
        self.source.as_ref()
    }

    /// Parse `index.<pos>` if it has not been parsed yet.
    pub fn build_cache(&self, pos: Pos) -> Result<&PosIndex> {
        self.lemmas.build_cache(self.source(), pos)
    }

    /// Exact lookup of an index entry. A missing word is `Ok(None)`.
    pub fn index_entry(&self, pos: Pos, lemma: &str) -> Result<Option<&IndexEntry>> {
        self.lemmas.find(self.source(), lemma, pos)
    }

    /// Look `lemma` up in every category, one list per category in
    /// [`Pos::ALL`] order.
    pub fn index_entries(&self, lemma: &str) -> Result<Vec<(Pos, Vec<&IndexEntry>)>> {
        self.lemmas.find_all(self.source(), lemma)
    }

    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> Result<bool> {
        Ok(self.build_cache(pos)?.contains(lemma))
    }

    /// Synset handles of a lemma in sense order, or an empty list.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> Result<Vec<SynsetId>> {
        Ok(self
            .index_entry(pos, lemma)?
            .map(|entry| entry.synset_ids().collect())
            .unwrap_or_default())
    }

    /// Decode the synset at `id.offset` in `data.<id.pos>`.
    pub fn get_synset(&self, id: SynsetId) -> Result<Synset> {
        let line = self.source.data_line(id.pos, id.offset)?;
        parse_data_line(&line, id.pos, id.offset)
    }

    pub fn random_entry<R: Rng + ?Sized>(
        &self,
        query: &RandomQuery,
        rng: &mut R,
    ) -> Result<Option<&IndexEntry>> {
        self.lemmas.random(self.source(), query, rng)
    }

    /// Number of index entries in one category (builds its cache).
    pub fn index_count(&self, pos: Pos) -> Result<usize> {
        Ok(self.build_cache(pos)?.len())
    }
}
