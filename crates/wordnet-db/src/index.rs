//! Per-category lemma index built lazily from `index.*` files.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::OnceLock;
use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};
use wordnet_types::{IndexEntry, Pos};

use crate::decode::{RecordContext, is_header_line, parse_index_line, strip_cr};
use crate::error::{DbError, Result};
use crate::source::DictSource;

/// Word-length bounds (in bytes, inclusive) and optional category for
/// random lemma sampling.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RandomQuery {
    pub pos: Option<Pos>,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for RandomQuery {
    fn default() -> Self {
        Self {
            pos: None,
            min_len: 0,
            max_len: usize::MAX,
        }
    }
}

impl RandomQuery {
    pub fn pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    fn accepts(&self, entry: &IndexEntry) -> bool {
        (self.min_len..=self.max_len).contains(&entry.lemma.len())
    }
}

/// Every index entry of one category, in file order.
#[derive(Debug)]
pub struct PosIndex {
    pos: Pos,
    entries: Vec<IndexEntry>,
    by_lemma: HashMap<String, usize>,
}

impl PosIndex {
    /// Parse a whole `index.*` file. Any malformed line fails the build.
    pub fn parse(pos: Pos, bytes: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut by_lemma = HashMap::new();

        for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
            let line = strip_cr(raw_line);
            if is_header_line(line) {
                continue;
            }
            let id = u32::try_from(lineno + 1).unwrap_or(u32::MAX);
            let line_str = std::str::from_utf8(line).map_err(|_| {
                DbError::malformed(RecordContext::IndexLine { pos, line: id }, "not valid UTF-8")
            })?;
            let entry = parse_index_line(line_str, pos, id)?;
            match by_lemma.entry(entry.lemma.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(entry);
                }
                Entry::Occupied(_) => {
                    warn!(%pos, lemma = %entry.lemma, line = id, "duplicate index entry ignored");
                }
            }
        }

        Ok(Self {
            pos,
            entries,
            by_lemma,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, lemma: &str) -> Option<&IndexEntry> {
        self.by_lemma.get(lemma).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.by_lemma.contains_key(lemma)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Uniformly pick one entry whose word length satisfies `query`.
    /// `query.pos` is ignored here.
    pub fn sample<R: Rng + ?Sized>(&self, query: &RandomQuery, rng: &mut R) -> Option<&IndexEntry> {
        let candidates: Vec<&IndexEntry> =
            self.entries.iter().filter(|e| query.accepts(e)).collect();
        candidates.choose(rng).copied()
    }
}

/// Build-once, read-many cache of [`PosIndex`]es, one slot per category.
///
/// A slot is filled on first use and never invalidated. A failed build
/// leaves the slot empty so nothing partial is retained. Once built, a
/// slot is immutable and safe to read from several threads.
#[derive(Debug, Default)]
pub struct LemmaIndex {
    caches: [OnceLock<PosIndex>; 4],
}

impl LemmaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cache for `pos`, parsing `index.<pos>` the first time.
    pub fn build_cache(&self, source: &dyn DictSource, pos: Pos) -> Result<&PosIndex> {
        let slot = &self.caches[pos.index()];
        if let Some(cache) = slot.get() {
            return Ok(cache);
        }

        let start = Instant::now();
        let bytes = source.index_file(pos)?;
        let built = PosIndex::parse(pos, &bytes)?;
        info!(
            "{} index built with {} entries in {} ms",
            pos,
            built.len(),
            start.elapsed().as_millis()
        );
        // A concurrent builder may have won; both parsed the same file.
        Ok(slot.get_or_init(|| built))
    }

    /// The cache for `pos` if it has already been built.
    pub fn cached(&self, pos: Pos) -> Option<&PosIndex> {
        self.caches[pos.index()].get()
    }

    pub fn find(&self, source: &dyn DictSource, word: &str, pos: Pos) -> Result<Option<&IndexEntry>> {
        Ok(self.build_cache(source, pos)?.get(word))
    }

    /// One list per category, in [`Pos::ALL`] order. Each list holds at most
    /// one entry because words are unique within a category.
    pub fn find_all(
        &self,
        source: &dyn DictSource,
        word: &str,
    ) -> Result<Vec<(Pos, Vec<&IndexEntry>)>> {
        Pos::ALL
            .into_iter()
            .map(|pos| -> Result<(Pos, Vec<&IndexEntry>)> {
                let found = self.build_cache(source, pos)?.get(word);
                Ok((pos, found.into_iter().collect()))
            })
            .collect()
    }

    /// Sample a random entry. Without a category, one candidate is drawn per
    /// category and the result is drawn uniformly among those candidates.
    pub fn random<R: Rng + ?Sized>(
        &self,
        source: &dyn DictSource,
        query: &RandomQuery,
        rng: &mut R,
    ) -> Result<Option<&IndexEntry>> {
        if let Some(pos) = query.pos {
            return Ok(self.build_cache(source, pos)?.sample(query, rng));
        }

        let mut picks = Vec::with_capacity(Pos::ALL.len());
        for pos in Pos::ALL {
            if let Some(entry) = self.build_cache(source, pos)?.sample(query, rng) {
                picks.push(entry);
            }
        }
        Ok(picks.choose(rng).copied())
    }
}
