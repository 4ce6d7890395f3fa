//! Access to the raw dictionary files.
//!
//! [`DictSource`] is the seam between decoding and storage: the lemma index
//! asks it for whole `index.*` files, sense decoding asks it for one line of
//! `data.*` at a byte offset, and morphy asks it for `*.exc` files.
//! [`DictDir`] reads a WordNet `dict/` directory; [`MemoryDict`] serves files
//! from memory (tests, embedded datasets).

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;
use wordnet_types::Pos;

use crate::decode::{RecordContext, read_line_at, strip_cr};
use crate::error::{DbError, Result};

/// Provider of dictionary file contents.
pub trait DictSource: Send + Sync {
    /// Full contents of `index.<pos>`.
    fn index_file(&self, pos: Pos) -> Result<Cow<'_, [u8]>>;

    /// The single line of `data.<pos>` starting at byte `offset`, without
    /// its line terminator.
    fn data_line(&self, pos: Pos, offset: u32) -> Result<Cow<'_, str>>;

    /// Contents of `<pos>.exc`, or `None` when the dataset ships no
    /// exception list for that category.
    fn exception_file(&self, pos: Pos) -> Result<Option<Cow<'_, [u8]>>>;
}

pub fn index_file_name(pos: Pos) -> String {
    format!("index.{}", pos.file_suffix())
}

pub fn data_file_name(pos: Pos) -> String {
    format!("data.{}", pos.file_suffix())
}

pub fn exception_file_name(pos: Pos) -> String {
    format!("{}.exc", pos.file_suffix())
}

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
    /// Keep nothing resident: read index files on demand and seek into
    /// `data.*` for every decoded synset.
    Seek,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

struct DictFiles {
    data: [Buffer; 4],
    index: [Buffer; 4],
    exceptions: [Option<Buffer>; 4],
}

impl DictFiles {
    fn load(dict_dir: &Path, mode: LoadMode) -> Result<Self> {
        let [v, n, a, r] = Pos::ALL;
        Ok(Self {
            data: [
                load_file(dict_dir.join(data_file_name(v)), mode)?,
                load_file(dict_dir.join(data_file_name(n)), mode)?,
                load_file(dict_dir.join(data_file_name(a)), mode)?,
                load_file(dict_dir.join(data_file_name(r)), mode)?,
            ],
            index: [
                load_file(dict_dir.join(index_file_name(v)), mode)?,
                load_file(dict_dir.join(index_file_name(n)), mode)?,
                load_file(dict_dir.join(index_file_name(a)), mode)?,
                load_file(dict_dir.join(index_file_name(r)), mode)?,
            ],
            exceptions: [
                load_optional_file(dict_dir.join(exception_file_name(v)), mode)?,
                load_optional_file(dict_dir.join(exception_file_name(n)), mode)?,
                load_optional_file(dict_dir.join(exception_file_name(a)), mode)?,
                load_optional_file(dict_dir.join(exception_file_name(r)), mode)?,
            ],
        })
    }
}

enum Backing {
    Resident(DictFiles),
    Seek,
}

/// A WordNet `dict/` directory containing `data.*`, `index.*` and `*.exc`.
pub struct DictDir {
    dir: PathBuf,
    mode: LoadMode,
    backing: Backing,
}

impl DictDir {
    /// Open a dictionary directory. All `data.*`/`index.*` files must exist;
    /// exception lists are optional.
    pub fn open(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            for name in [data_file_name(pos), index_file_name(pos)] {
                let path = dir.join(name);
                if !path.exists() {
                    return Err(DbError::MissingFile(path));
                }
            }
        }

        let backing = match mode {
            LoadMode::Mmap | LoadMode::Owned => Backing::Resident(DictFiles::load(dir, mode)?),
            LoadMode::Seek => Backing::Seek,
        };
        debug!(dir = %dir.display(), ?mode, "opened WordNet directory");

        Ok(Self {
            dir: dir.to_path_buf(),
            mode,
            backing,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

impl DictSource for DictDir {
    fn index_file(&self, pos: Pos) -> Result<Cow<'_, [u8]>> {
        match &self.backing {
            Backing::Resident(files) => Ok(Cow::Borrowed(files.index[pos.index()].as_slice())),
            Backing::Seek => read_whole(&self.dir.join(index_file_name(pos))).map(Cow::Owned),
        }
    }

    fn data_line(&self, pos: Pos, offset: u32) -> Result<Cow<'_, str>> {
        match &self.backing {
            Backing::Resident(files) => {
                read_line_at(files.data[pos.index()].as_slice(), pos, offset).map(Cow::Borrowed)
            }
            Backing::Seek => seek_line(&self.dir.join(data_file_name(pos)), pos, offset)
                .map(Cow::Owned),
        }
    }

    fn exception_file(&self, pos: Pos) -> Result<Option<Cow<'_, [u8]>>> {
        match &self.backing {
            Backing::Resident(files) => Ok(files.exceptions[pos.index()]
                .as_ref()
                .map(|b| Cow::Borrowed(b.as_slice()))),
            Backing::Seek => {
                let path = self.dir.join(exception_file_name(pos));
                if !path.exists() {
                    return Ok(None);
                }
                read_whole(&path).map(|bytes| Some(Cow::Owned(bytes)))
            }
        }
    }
}

/// Dictionary files held in memory, keyed by file name (`index.noun`,
/// `data.verb`, `adj.exc`, ...).
#[derive(Clone, Debug, Default)]
pub struct MemoryDict {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    fn required(&self, name: String) -> Result<&[u8]> {
        match self.files.get(&name) {
            Some(bytes) => Ok(bytes.as_slice()),
            None => Err(DbError::MissingFile(PathBuf::from(name))),
        }
    }
}

impl DictSource for MemoryDict {
    fn index_file(&self, pos: Pos) -> Result<Cow<'_, [u8]>> {
        self.required(index_file_name(pos)).map(Cow::Borrowed)
    }

    fn data_line(&self, pos: Pos, offset: u32) -> Result<Cow<'_, str>> {
        let bytes = self.required(data_file_name(pos))?;
        read_line_at(bytes, pos, offset).map(Cow::Borrowed)
    }

    fn exception_file(&self, pos: Pos) -> Result<Option<Cow<'_, [u8]>>> {
        Ok(self
            .files
            .get(&exception_file_name(pos))
            .map(|bytes| Cow::Borrowed(bytes.as_slice())))
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).map_err(|e| DbError::io(&path, e))?;
            // SAFETY: dictionary files are treated as read-only for the life
            // of the process.
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .map_err(|e| DbError::io(&path, e))
        }
        LoadMode::Owned | LoadMode::Seek => read_whole(&path).map(Buffer::Owned),
    }
}

fn load_optional_file(path: PathBuf, mode: LoadMode) -> Result<Option<Buffer>> {
    if !path.exists() {
        return Ok(None);
    }
    load_file(path, mode).map(Some)
}

fn read_whole(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| DbError::io(path, e))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| DbError::io(path, e))?;
    Ok(buf)
}

fn seek_line(path: &Path, pos: Pos, offset: u32) -> Result<String> {
    let context = RecordContext::DataOffset { pos, offset };
    let mut file = File::open(path).map_err(|e| DbError::io(path, e))?;
    let len = file.metadata().map_err(|e| DbError::io(path, e))?.len();
    if u64::from(offset) >= len {
        return Err(DbError::malformed(context, "offset beyond end of file"));
    }
    if offset > 0 {
        let mut prev = [0u8; 1];
        file.seek(SeekFrom::Start(u64::from(offset) - 1))
            .and_then(|_| file.read_exact(&mut prev))
            .map_err(|e| DbError::io(path, e))?;
        if prev[0] != b'\n' {
            return Err(DbError::malformed(context, "offset does not start a line"));
        }
    } else {
        file.seek(SeekFrom::Start(0))
            .map_err(|e| DbError::io(path, e))?;
    }

    let mut raw = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut raw)
        .map_err(|e| DbError::io(path, e))?;
    let line = raw.strip_suffix(b"\n").unwrap_or(&raw);
    String::from_utf8(strip_cr(line).to_vec())
        .map_err(|_| DbError::malformed(context, "line is not valid UTF-8"))
}
