//! Line caches backing lazy source lookups.
//!
//! `FileLineCache` reads whole files once and serves individual lines from
//! memory. Entries are validated against a content digest so long-running
//! hosts can call `check_cache` between phases and pick up edited files.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Read interface consumed by the rendering engine.
///
/// `get_line` is best-effort: a missing file or out-of-range line number
/// returns `None`, and the caller degrades by omitting the source/caret
/// lines. Implementations must be safe to call repeatedly for the same
/// `(file, line)` pair.
pub trait SourceLineCache {
    /// Return line `lineno` (1-indexed) of `file`, without a trailing
    /// newline, or `None` if unavailable.
    fn get_line(&self, file: &str, lineno: u32) -> Option<String>;
}

/// In-memory source store for hosts that compile from strings (REPL
/// cells, tests, generated code).
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `file`, replacing any previous entry.
    pub fn insert(&mut self, file: impl Into<String>, source: &str) {
        let lines = source.lines().map(str::to_string).collect();
        self.files.insert(file.into(), lines);
    }

    pub fn remove(&mut self, file: &str) {
        self.files.remove(file);
    }
}

impl SourceLineCache for MemorySource {
    fn get_line(&self, file: &str, lineno: u32) -> Option<String> {
        if lineno == 0 {
            return None;
        }
        self.files
            .get(file)?
            .get(lineno as usize - 1)
            .cloned()
    }
}

struct FileEntry {
    digest: [u8; 32],
    lines: Vec<String>,
}

/// Filesystem-backed line cache.
///
/// Files are read once and kept in memory keyed by path. The cache never
/// re-validates on its own; `check_cache` compares the stored content
/// digest against the file on disk and evicts stale entries.
#[derive(Default)]
pub struct FileLineCache {
    entries: RefCell<HashMap<String, FileEntry>>,
}

impl FileLineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose backing file has changed or disappeared.
    pub fn check_cache(&self) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|file, entry| {
            matches!(hash_file(Path::new(file)), Ok(digest) if digest == entry.digest)
        });
    }

    /// Drop every cached file.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn load(&self, file: &str) -> bool {
        if self.entries.borrow().contains_key(file) {
            return true;
        }
        let Ok(data) = fs::read(file) else {
            return false;
        };
        let digest = hash_bytes(&data);
        let text = String::from_utf8_lossy(&data);
        let lines = text.lines().map(str::to_string).collect();
        self.entries
            .borrow_mut()
            .insert(file.to_string(), FileEntry { digest, lines });
        true
    }
}

impl SourceLineCache for FileLineCache {
    fn get_line(&self, file: &str, lineno: u32) -> Option<String> {
        if lineno == 0 || !self.load(file) {
            return None;
        }
        self.entries
            .borrow()
            .get(file)?
            .lines
            .get(lineno as usize - 1)
            .cloned()
    }
}

fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

fn hash_file(path: &Path) -> std::io::Result<[u8; 32]> {
    let data = fs::read(path)?;
    Ok(hash_bytes(&data))
}
