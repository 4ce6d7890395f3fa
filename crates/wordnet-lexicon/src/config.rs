use std::env;
use std::path::PathBuf;

use tracing::warn;
use wordnet_db::LoadMode;

pub const WORDNET_DIR_VAR: &str = "WORDNET_DIR";
pub const LOAD_MODE_VAR: &str = "WORDNET_LOAD_MODE";
const DEFAULT_WORDNET_PATH: &str = "dict";
const DEFAULT_SYSTEM_WORDNET_PATH: &str = "/usr/share/wordnet/dict";

/// Where the dictionary lives and how its files are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconConfig {
    pub dict_dir: PathBuf,
    pub mode: LoadMode,
}

impl LexiconConfig {
    pub fn new(dict_dir: impl Into<PathBuf>) -> Self {
        Self {
            dict_dir: dict_dir.into(),
            mode: LoadMode::Mmap,
        }
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read `WORDNET_DIR` and `WORDNET_LOAD_MODE`.
    ///
    /// Without `WORDNET_DIR`, `./dict` is used if present, otherwise the
    /// system location. An unrecognised mode is logged and replaced by mmap.
    pub fn from_env() -> Self {
        let dict_dir = env::var(WORDNET_DIR_VAR)
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_wordnet_path);
        let mode = match env::var(LOAD_MODE_VAR) {
            Ok(raw) => parse_load_mode(&raw).unwrap_or_else(|| {
                warn!("ignoring {}={:?}; expected mmap, owned or seek", LOAD_MODE_VAR, raw);
                LoadMode::Mmap
            }),
            Err(_) => LoadMode::Mmap,
        };
        Self { dict_dir, mode }
    }
}

fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_SYSTEM_WORDNET_PATH)
}

/// Case-insensitive `mmap`, `owned` or `seek`.
pub fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        "seek" => Some(LoadMode::Seek),
        _ => None,
    }
}
