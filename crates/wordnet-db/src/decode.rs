//! Positional decoding of `index.*` and `data.*` lines.
//!
//! Both formats are whitespace-delimited with counted sections: a count
//! field followed by that many repeated sub-fields. Counts must agree with
//! the tokens actually present, otherwise decoding fails with
//! [`DbError::MalformedRecord`].

use std::fmt;
use std::iter::Peekable;
use std::str::{FromStr, SplitAsciiWhitespace};

use wordnet_types::{
    Frame, Gloss, IndexEntry, Pointer, Pos, Synset, SynsetId, SynsetType, SynsetWord, UnknownPos,
    decode_st,
};

use crate::error::{DbError, Result};

/// Separator between the info section and the gloss of a data line.
pub const GLOSS_DELIMITER: &str = " | ";

/// Location of a record, reported in decode errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordContext {
    IndexLine { pos: Pos, line: u32 },
    DataOffset { pos: Pos, offset: u32 },
}

impl fmt::Display for RecordContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordContext::IndexLine { pos, line } => {
                write!(f, "index.{}:{}", pos.file_suffix(), line)
            }
            RecordContext::DataOffset { pos, offset } => {
                write!(f, "data.{}@{:08}", pos.file_suffix(), offset)
            }
        }
    }
}

struct Fields<'a> {
    tokens: Peekable<SplitAsciiWhitespace<'a>>,
    context: RecordContext,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, context: RecordContext) -> Self {
        Self {
            tokens: text.split_ascii_whitespace().peekable(),
            context,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> DbError {
        DbError::malformed(self.context, reason)
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        match self.tokens.next() {
            Some(token) => Ok(token),
            None => Err(self.malformed(format!("missing {what}"))),
        }
    }

    fn is_exhausted(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    fn decimal<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("invalid {what} {token:?}")))
    }

    fn hex(&mut self, what: &str) -> Result<u32> {
        let token = self.next(what)?;
        u32::from_str_radix(token, 16)
            .map_err(|_| self.malformed(format!("invalid hex {what} {token:?}")))
    }

    fn hex_u8(&mut self, what: &str) -> Result<u8> {
        let value = self.hex(what)?;
        u8::try_from(value).map_err(|_| self.malformed(format!("{what} {value:#x} out of range")))
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            Some(extra) => Err(self.malformed(format!("unexpected trailing token {extra:?}"))),
            None => Ok(()),
        }
    }
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn category_tag(token: &str) -> Result<Pos> {
    single_char(token)
        .and_then(Pos::from_char)
        .ok_or_else(|| UnknownPos(token.to_string()).into())
}

/// Decode one `index.*` line.
///
/// Layout: `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt
/// tagsense_cnt synset_offset...`. `sense_cnt` repeats `synset_cnt` and is
/// discarded. `id` is the 1-based line number the caller read it from.
pub fn parse_index_line(line: &str, pos: Pos, id: u32) -> Result<IndexEntry> {
    let mut fields = Fields::new(line, RecordContext::IndexLine { pos, line: id });

    let lemma = fields.next("lemma")?;
    category_tag(fields.next("category tag")?)?;
    let synset_cnt: usize = fields.decimal("synset_cnt")?;
    if synset_cnt == 0 {
        return Err(fields.malformed("synset_cnt is zero"));
    }

    let p_cnt: usize = fields.decimal("p_cnt")?;
    let mut ptr_symbols = Vec::with_capacity(p_cnt);
    for _ in 0..p_cnt {
        ptr_symbols.push(fields.next("pointer symbol")?.to_string());
    }

    let _sense_cnt: u32 = fields.decimal("sense_cnt")?;
    let tagsense_cnt: u32 = fields.decimal("tagsense_cnt")?;

    let mut synset_offsets = Vec::with_capacity(synset_cnt);
    while !fields.is_exhausted() {
        synset_offsets.push(fields.decimal::<u32>("synset offset")?);
    }
    if synset_offsets.len() != synset_cnt {
        return Err(fields.malformed(format!(
            "synset_cnt mismatch (expected {}, got {})",
            synset_cnt,
            synset_offsets.len()
        )));
    }

    Ok(IndexEntry {
        lemma: lemma.to_string(),
        pos,
        id,
        ptr_symbols,
        tagsense_cnt,
        synset_offsets,
    })
}

/// Decode one `data.*` line that was read at `offset` in `data.<pos>`.
///
/// The line is split once on `" | "`; everything after the first delimiter
/// is gloss, even if it contains more pipes. The leading offset field must
/// equal `offset`, which catches pointers into the wrong file or into the
/// middle of a line.
pub fn parse_data_line(line: &str, pos: Pos, offset: u32) -> Result<Synset> {
    let context = RecordContext::DataOffset { pos, offset };
    let (info, gloss) = line.split_once(GLOSS_DELIMITER).ok_or_else(|| {
        DbError::malformed(context, format!("missing {GLOSS_DELIMITER:?} gloss delimiter"))
    })?;
    let mut fields = Fields::new(info, context);

    let found: u32 = fields.decimal("synset offset")?;
    if found != offset {
        return Err(fields.malformed(format!("line carries offset {found:08}")));
    }
    let lex_filenum: u8 = fields.decimal("lex_filenum")?;
    let ss_token = fields.next("ss_type")?;
    let synset_type = single_char(ss_token)
        .and_then(SynsetType::from_char)
        .ok_or_else(|| DbError::from(UnknownPos(ss_token.to_string())))?;

    let w_cnt = fields.hex("w_cnt")? as usize;
    let mut words = Vec::with_capacity(w_cnt);
    for _ in 0..w_cnt {
        let text = fields.next("word")?;
        let lex_id = fields.hex_u8("lex_id")?;
        words.push(SynsetWord {
            text: text.to_string(),
            lex_id,
        });
    }

    let p_cnt: usize = fields.decimal("p_cnt")?;
    let mut pointers = Vec::with_capacity(p_cnt);
    for _ in 0..p_cnt {
        let symbol = fields.next("pointer symbol")?;
        let target_offset: u32 = fields.decimal("pointer target offset")?;
        let target_pos = category_tag(fields.next("pointer target category")?)?;
        let st = fields.next("pointer source/target")?;
        let (src_word, dst_word) = decode_st(st)
            .ok_or_else(|| fields.malformed(format!("invalid pointer source/target {st:?}")))?;
        pointers.push(Pointer {
            symbol: symbol.to_string(),
            target: SynsetId {
                pos: target_pos,
                offset: target_offset,
            },
            src_word,
            dst_word,
        });
    }

    let mut frames = Vec::new();
    if pos == Pos::Verb && !fields.is_exhausted() {
        let f_cnt: usize = fields.decimal("f_cnt")?;
        for _ in 0..f_cnt {
            if fields.next("frame marker")? != "+" {
                return Err(fields.malformed("expected '+' before frame entry"));
            }
            let frame_number: u16 = fields.decimal("frame_number")?;
            let word_number = fields.hex("frame word number")?;
            let word_number = u16::try_from(word_number)
                .ok()
                .filter(|w| *w != 0);
            frames.push(Frame {
                frame_number,
                word_number,
            });
        }
    }
    fields.finish()?;

    Ok(Synset {
        id: SynsetId { pos, offset },
        lex_filenum,
        synset_type,
        words,
        pointers,
        frames,
        gloss: Gloss::parse(gloss),
    })
}

/// Seek to `offset` in a data file and return the single line found there.
pub fn read_line_at(bytes: &[u8], pos: Pos, offset: u32) -> Result<&str> {
    let context = RecordContext::DataOffset { pos, offset };
    let start = offset as usize;
    if start >= bytes.len() {
        return Err(DbError::malformed(context, "offset beyond end of file"));
    }
    if start > 0 && bytes[start - 1] != b'\n' {
        return Err(DbError::malformed(context, "offset does not start a line"));
    }
    let rest = &bytes[start..];
    let end = rest.iter().position(|b| *b == b'\n').unwrap_or(rest.len());
    std::str::from_utf8(strip_cr(&rest[..end]))
        .map_err(|_| DbError::malformed(context, "line is not valid UTF-8"))
}

/// License headers and blank lines carry no records.
pub(crate) fn is_header_line(line: &[u8]) -> bool {
    line.is_empty() || matches!(line.first(), Some(b' ' | b'\t'))
}

pub(crate) fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
