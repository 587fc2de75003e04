//! Single call-site records.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::exception::{Unprintable, safe_string};
use crate::source::SourceLineCache;

/// Where in the source a frame (or diagnostic) points.
///
/// Columns are byte offsets into the raw line text. Any field other than
/// `file` may be unknown; unknown positions degrade to omitting the
/// caret line rather than failing the render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub file: String,
    pub line: Option<u32>,
    pub end_line: Option<u32>,
    pub col: Option<u32>,
    pub end_col: Option<u32>,
}

impl SourcePosition {
    /// Position with only a file and line, no column information.
    pub fn line_only(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            end_line: Some(line),
            col: None,
            end_col: None,
        }
    }
}

/// Frame data as supplied by the host's stack/traceback accessor.
///
/// `line` overrides the cache lookup when present (hosts replaying
/// pre-extracted traces). Local values that fail to stringify are kept
/// as errors and replaced with a placeholder during capture.
#[derive(Debug)]
pub struct RawFrame {
    pub position: SourcePosition,
    pub name: String,
    pub line: Option<String>,
    pub locals: Option<Vec<(String, Result<String, Unprintable>)>>,
}

impl RawFrame {
    pub fn new(position: SourcePosition, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            line: None,
            locals: None,
        }
    }
}

/// One captured call site, with its source line resolved at most once.
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub position: SourcePosition,
    pub name: String,
    pub locals: Option<BTreeMap<String, String>>,
    #[serde(skip)]
    line: OnceCell<Option<String>>,
}

impl FrameRecord {
    pub fn new(position: SourcePosition, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            locals: None,
            line: OnceCell::new(),
        }
    }

    pub(crate) fn from_raw(raw: RawFrame) -> Self {
        let line = OnceCell::new();
        if let Some(text) = raw.line {
            let _ = line.set(Some(text));
        }
        let locals = raw.locals.map(|locals| {
            locals
                .into_iter()
                .map(|(name, value)| (name, safe_string(value, "local")))
                .collect()
        });
        Self {
            position: raw.position,
            name: raw.name,
            locals,
            line,
        }
    }

    /// The raw source line for this frame, without whitespace
    /// adjustments. Resolved through `cache` on first access and frozen
    /// for the lifetime of the record.
    pub fn original_line(&self, cache: &dyn SourceLineCache) -> Option<&str> {
        self.line
            .get_or_init(|| {
                self.position
                    .line
                    .and_then(|lineno| cache.get_line(&self.position.file, lineno))
            })
            .as_deref()
    }

    /// The stripped source line, or `None` when no source is available
    /// (or the line is blank).
    pub fn line(&self, cache: &dyn SourceLineCache) -> Option<&str> {
        self.original_line(cache)
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}
