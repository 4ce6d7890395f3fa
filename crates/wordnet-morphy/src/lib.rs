//! WordNet-style morphological processing (morphy).
//!
//! Faithful to the classic morphy algorithm: consult the exception lists,
//! otherwise apply suffix rules round after round, and keep only candidates
//! a caller-provided predicate confirms as dictionary lemmas. The crate is
//! decoupled from any particular loader; it only depends on `Pos` and the
//! callback you supply.
//!
//! # How it works
//! 1. If the form is an exception key, keep `[form] + exceptions` that
//!    exist and stop there, even when nothing survives.
//! 2. Otherwise apply every suffix rule once and keep `[form] + candidates`
//!    that exist. Stop if anything survived.
//! 3. Otherwise re-apply the rules to the previous round's candidates until
//!    some round yields an existing lemma or the candidates run out.
//!
//! Survivors are deduplicated keeping first occurrence, and carry their
//! provenance (`Surface`, `Exception`, `Rule`).
//!
//! # Example
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_morphy::{ExceptionTable, Morphy};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load("/path/to/wordnet/dict")?;
//! let mut exceptions = ExceptionTable::new();
//! for pos in Pos::ALL {
//!     if let Some(bytes) = wn.source().exception_file(pos)? {
//!         exceptions.extend_from_text(pos, &String::from_utf8_lossy(&bytes));
//!     }
//! }
//! let morph = Morphy::new(exceptions);
//! let verbs = wn.build_cache(Pos::Verb)?;
//!
//! for cand in morph.lemmas_for(Pos::Verb, "ran", |_, lemma| verbs.contains(lemma)) {
//!     println!("{:?}: {}", cand.source, cand.lemma);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-morphy --example lookup -- <dict> [--demo|<word>]`.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use wordnet_types::Pos;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    /// The input form itself.
    Surface,
    /// An entry of the category's exception list.
    Exception,
    /// Produced by suffix substitution; `round` counts rule applications
    /// and the rule shown is the last one applied.
    Rule {
        suffix: &'static str,
        replacement: &'static str,
        round: usize,
    },
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate {
    pub pos: Pos,
    pub lemma: String,
    pub source: CandidateSource,
}

/// Irregular form to base forms, one map per category.
#[derive(Clone, Debug, Default)]
pub struct ExceptionTable {
    maps: [HashMap<String, Vec<String>>; 4],
}

impl ExceptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the lines of a `*.exc` file: an inflected form followed by one or
    /// more base forms. Lines without a base form are ignored.
    pub fn extend_from_text(&mut self, pos: Pos, text: &str) {
        let map = &mut self.maps[pos.index()];
        for line in text.lines() {
            let mut parts = line.split_ascii_whitespace();
            let Some(surface) = parts.next() else {
                continue;
            };
            let bases: Vec<String> = parts.map(str::to_string).collect();
            if !bases.is_empty() {
                map.insert(surface.to_string(), bases);
            }
        }
    }

    pub fn insert(&mut self, pos: Pos, surface: impl Into<String>, bases: Vec<String>) {
        self.maps[pos.index()].insert(surface.into(), bases);
    }

    /// Base forms listed for `surface`, if it is an exception key.
    pub fn get(&self, pos: Pos, surface: &str) -> Option<&[String]> {
        self.maps[pos.index()].get(surface).map(Vec::as_slice)
    }

    pub fn len(&self, pos: Pos) -> usize {
        self.maps[pos.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.iter().all(HashMap::is_empty)
    }
}

/// Morphy over a fixed exception table, parameterised by caller-provided
/// existence checks.
#[derive(Clone, Debug, Default)]
pub struct Morphy {
    exceptions: ExceptionTable,
}

impl Morphy {
    pub fn new(exceptions: ExceptionTable) -> Self {
        Self { exceptions }
    }

    pub fn exceptions(&self) -> &ExceptionTable {
        &self.exceptions
    }

    /// Base forms of `form` under `pos`, with provenance.
    ///
    /// The callback `lemma_exists` typically checks the lemma index of the
    /// loaded dictionary so this crate stays ignorant of any concrete layout.
    pub fn lemmas_for<F>(&self, pos: Pos, form: &str, lemma_exists: F) -> Vec<LemmaCandidate>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let surface = LemmaCandidate {
            pos,
            lemma: form.to_string(),
            source: CandidateSource::Surface,
        };

        if let Some(bases) = self.exceptions.get(pos, form) {
            let listed = bases.iter().map(|base| LemmaCandidate {
                pos,
                lemma: base.clone(),
                source: CandidateSource::Exception,
            });
            let found = filter_existing(std::iter::once(surface).chain(listed), &lemma_exists);
            debug!(%pos, form, found = found.len(), "morphy exception hit");
            return found;
        }

        let mut round = 1;
        let mut forms = apply_rules(pos, std::slice::from_ref(&surface), round);
        let found = filter_existing(
            std::iter::once(surface).chain(forms.iter().cloned()),
            &lemma_exists,
        );
        if !found.is_empty() {
            return found;
        }

        // Every rule shortens the form except men -> man, which cannot fire
        // twice in a row, so the candidate set eventually empties.
        while !forms.is_empty() {
            round += 1;
            forms = apply_rules(pos, &forms, round);
            let found = filter_existing(forms.iter().cloned(), &lemma_exists);
            if !found.is_empty() {
                debug!(%pos, form, round, "morphy matched after repeated rules");
                return found;
            }
        }
        Vec::new()
    }

    /// Base forms of `form` under `pos`, in discovery order.
    pub fn morphy<F>(&self, pos: Pos, form: &str, lemma_exists: F) -> Vec<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        self.lemmas_for(pos, form, lemma_exists)
            .into_iter()
            .map(|c| c.lemma)
            .collect()
    }

    /// Union of [`Morphy::morphy`] over every category, duplicates removed.
    pub fn morphy_all<F>(&self, form: &str, lemma_exists: F) -> Vec<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for pos in Pos::ALL {
            for lemma in self.morphy(pos, form, &lemma_exists) {
                if seen.insert(lemma.clone()) {
                    out.push(lemma);
                }
            }
        }
        out
    }
}

fn filter_existing<I, F>(candidates: I, lemma_exists: &F) -> Vec<LemmaCandidate>
where
    I: IntoIterator<Item = LemmaCandidate>,
    F: Fn(Pos, &str) -> bool,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for candidate in candidates {
        if lemma_exists(candidate.pos, &candidate.lemma) && seen.insert(candidate.lemma.clone()) {
            out.push(candidate);
        }
    }
    out
}

/// Apply every rule of `pos` once to each form, keeping first occurrences.
fn apply_rules(pos: Pos, forms: &[LemmaCandidate], round: usize) -> Vec<LemmaCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for form in forms {
        for &(suffix, replacement) in rules_for(pos) {
            if let Some(stem) = form.lemma.strip_suffix(suffix) {
                let lemma = format!("{stem}{replacement}");
                if seen.insert(lemma.clone()) {
                    out.push(LemmaCandidate {
                        pos,
                        lemma,
                        source: CandidateSource::Rule {
                            suffix,
                            replacement,
                            round,
                        },
                    });
                }
            }
        }
    }
    out
}

/// Suffix substitution rules `(strip, append)` in the order they are tried.
pub fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}
