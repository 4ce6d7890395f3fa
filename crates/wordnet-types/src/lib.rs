//! Shared types that mirror WordNet's dictionary format.
//!
//! The goal is to expose the fields found in `data.*`/`index.*` as plain owned
//! values. Records are decoded on demand by `wordnet-db` and are never
//! cached by offset, so every type here is cheap to build and hand out.
//! Numeric fields keep their raw representation (`offset`, `lex_id`,
//! `ss_type`, pointer source/target indices).
//!
//! Use [`Pos`] and [`SynsetId`] to address records, [`Synset`] and
//! [`IndexEntry`] to inspect decoded records, and helpers like [`decode_st`]
//! to interpret pointer source/target pairs.
//!
//! ```rust
//! use wordnet_types::{Pos, SynsetId, decode_st};
//!
//! let pos: Pos = "noun".parse().unwrap();
//! let id = SynsetId { pos, offset: 1740 };
//! assert_eq!(id.to_string(), "00001740-n");
//! assert_eq!(decode_st("0a0b"), Some((Some(10), Some(11))));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Grammatical category of a lemma or synset.
///
/// Declaration order is the enumeration order used by every all-category
/// query: verb, noun, adjective, adverb.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    Verb,
    Noun,
    Adj,
    Adv,
}

/// Raised when a category token is not one of the four WordNet categories.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown grammatical category {0:?}")]
pub struct UnknownPos(pub String);

impl Pos {
    /// Every category in enumeration order.
    pub const ALL: [Pos; 4] = [Pos::Verb, Pos::Noun, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix shared by `index.<suffix>`, `data.<suffix>` and `<suffix>.exc`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Position within [`Pos::ALL`], handy for per-category arrays.
    pub fn index(self) -> usize {
        match self {
            Pos::Verb => 0,
            Pos::Noun => 1,
            Pos::Adj => 2,
            Pos::Adv => 3,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        })
    }
}

impl FromStr for Pos {
    type Err = UnknownPos;

    /// Accepts the single-letter tags as well as the long names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "noun" => Ok(Pos::Noun),
            "v" | "verb" => Ok(Pos::Verb),
            "a" | "s" | "adj" | "adjective" => Ok(Pos::Adj),
            "r" | "adv" | "adverb" => Ok(Pos::Adv),
            other => Err(UnknownPos(other.to_string())),
        }
    }
}

/// `(offset, pos)` pair addressing a synset within the WordNet files.
///
/// This is a handle, not a reference: dereferencing it means decoding the
/// line at `offset` in `data.<pos>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}-{}", self.offset, self.pos.to_char())
    }
}

/// Raw `ss_type` marker from `data.*`, including adjective satellites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            SynsetType::Noun => 'n',
            SynsetType::Verb => 'v',
            SynsetType::Adj => 'a',
            SynsetType::AdjSatellite => 's',
            SynsetType::Adv => 'r',
        }
    }

    /// Category this marker belongs to (satellites are adjectives).
    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }
}

/// Semantic or lexical relation named by a pointer symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Antonym,
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    MemberHolonym,
    SubstanceHolonym,
    PartHolonym,
    MemberMeronym,
    SubstanceMeronym,
    PartMeronym,
    Attribute,
    DerivationallyRelated,
    Entailment,
    Cause,
    AlsoSee,
    VerbGroup,
    SimilarTo,
    Participle,
    Pertainym,
    DomainTopic,
    DomainRegion,
    DomainUsage,
    MemberOfDomainTopic,
    MemberOfDomainRegion,
    MemberOfDomainUsage,
}

impl RelationKind {
    const TABLE: [(RelationKind, &'static str); 26] = [
        (RelationKind::Antonym, "!"),
        (RelationKind::Hypernym, "@"),
        (RelationKind::InstanceHypernym, "@i"),
        (RelationKind::Hyponym, "~"),
        (RelationKind::InstanceHyponym, "~i"),
        (RelationKind::MemberHolonym, "#m"),
        (RelationKind::SubstanceHolonym, "#s"),
        (RelationKind::PartHolonym, "#p"),
        (RelationKind::MemberMeronym, "%m"),
        (RelationKind::SubstanceMeronym, "%s"),
        (RelationKind::PartMeronym, "%p"),
        (RelationKind::Attribute, "="),
        (RelationKind::DerivationallyRelated, "+"),
        (RelationKind::Entailment, "*"),
        (RelationKind::Cause, ">"),
        (RelationKind::AlsoSee, "^"),
        (RelationKind::VerbGroup, "$"),
        (RelationKind::SimilarTo, "&"),
        (RelationKind::Participle, "<"),
        (RelationKind::Pertainym, "\\"),
        (RelationKind::DomainTopic, ";c"),
        (RelationKind::DomainRegion, ";r"),
        (RelationKind::DomainUsage, ";u"),
        (RelationKind::MemberOfDomainTopic, "-c"),
        (RelationKind::MemberOfDomainRegion, "-r"),
        (RelationKind::MemberOfDomainUsage, "-u"),
    ];

    /// Pointer symbol as written in `data.*`.
    pub fn symbol(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, sym)| *sym)
            .unwrap_or_default()
    }

    /// Map a pointer symbol back to its relation, if it is a known one.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, sym)| *sym == symbol)
            .map(|(kind, _)| *kind)
    }
}

/// A member word of a synset and its per-synset `lex_id`.
///
/// Member order is file order; the first word is the most common form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SynsetWord {
    pub text: String,
    pub lex_id: u8,
}

/// Verb frame (`f_cnt`) entry describing example template applicability.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Frame {
    pub frame_number: u16,
    pub word_number: Option<u16>,
}

/// Pointer metadata from `p_cnt` section.
///
/// `src_word`/`dst_word` of `None` mean the pointer relates whole synsets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Pointer {
    pub symbol: String,
    pub target: SynsetId,
    pub src_word: Option<u16>,
    pub dst_word: Option<u16>,
}

impl Pointer {
    pub fn kind(&self) -> Option<RelationKind> {
        RelationKind::from_symbol(&self.symbol)
    }

    /// True when the pointer relates specific member words (lexical pointer).
    pub fn is_lexical(&self) -> bool {
        self.src_word.is_some() || self.dst_word.is_some()
    }
}

/// Parsed gloss with convenience helpers while keeping the raw text intact.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Gloss {
    pub raw: String,
    pub definition: String,
    pub examples: Vec<String>,
}

impl Gloss {
    /// Split a gloss into its definition and quoted example sentences.
    ///
    /// The definition ends at the first `;` outside quotes. Pipes and quotes
    /// elsewhere are kept verbatim in `raw`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let mut examples = Vec::new();
        let mut quote_start: Option<usize> = None;
        let mut def_end = trimmed.len();
        for (idx, ch) in trimmed.char_indices() {
            match ch {
                '"' => match quote_start.take() {
                    Some(start) => {
                        if idx > start + 1 {
                            examples.push(trimmed[start + 1..idx].to_string());
                        }
                    }
                    None => quote_start = Some(idx),
                },
                ';' if quote_start.is_none() && def_end == trimmed.len() => {
                    def_end = idx;
                }
                _ => {}
            }
        }

        Gloss {
            raw: trimmed.to_string(),
            definition: trimmed[..def_end].trim().to_string(),
            examples,
        }
    }
}

/// Complete synset record decoded from one `data.*` line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Synset {
    /// Address this record was decoded from; `id.pos` is the data file used.
    pub id: SynsetId,
    pub lex_filenum: u8,
    pub synset_type: SynsetType,
    pub words: Vec<SynsetWord>,
    pub pointers: Vec<Pointer>,
    pub frames: Vec<Frame>,
    pub gloss: Gloss,
}

impl Synset {
    /// Member words in file order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(|w| w.text.as_str())
    }

    /// `lex_id` recorded for a member word, if it belongs to this synset.
    pub fn lex_id(&self, word: &str) -> Option<u8> {
        self.words.iter().find(|w| w.text == word).map(|w| w.lex_id)
    }

    /// Outgoing pointers carrying `symbol`, in file order.
    pub fn pointers_with<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Pointer> + 'a {
        self.pointers.iter().filter(move |p| p.symbol == symbol)
    }
}

impl fmt::Display for Synset {
    /// `(n) dog, domestic dog (a member of the genus Canis; ...)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) ", self.synset_type.to_char())?;
        for (i, word) in self.words().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&word.replace('_', " "))?;
        }
        write!(f, " ({})", self.gloss.raw)
    }
}

/// Index record from `index.*`: one word within one category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IndexEntry {
    pub lemma: String,
    pub pos: Pos,
    /// 1-based line number within the category's index file.
    pub id: u32,
    pub ptr_symbols: Vec<String>,
    pub tagsense_cnt: u32,
    /// Synset offsets ordered by decreasing sense frequency.
    pub synset_offsets: Vec<u32>,
}

impl IndexEntry {
    /// Synset handles in sense order, all within this entry's category.
    pub fn synset_ids(&self) -> impl Iterator<Item = SynsetId> + '_ {
        let pos = self.pos;
        self.synset_offsets
            .iter()
            .map(move |&offset| SynsetId { pos, offset })
    }

    pub fn sense_count(&self) -> usize {
        self.synset_offsets.len()
    }
}

/// Decode the four-hex source/target field used in pointer blocks.
///
/// High byte is the source word number, low byte is the target word number.
/// Zero indicates "whole synset" per WordNet conventions. Returns `None` when
/// the field is not four hex digits.
pub fn decode_st(hex4: &str) -> Option<(Option<u16>, Option<u16>)> {
    if hex4.len() != 4 {
        return None;
    }

    let val = u16::from_str_radix(hex4, 16).ok()?;
    let src = val >> 8;
    let dst = val & 0x00FF;
    let src = if src == 0 { None } else { Some(src) };
    let dst = if dst == 0 { None } else { Some(dst) };
    Some((src, dst))
}

/// Fold free-form user input into WordNet's lemma spelling.
///
/// Lookups themselves are exact; callers that accept typed input run it
/// through this first (`"Domestic Dog"` becomes `"domestic_dog"`).
pub fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
