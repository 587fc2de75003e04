//! Source line access for traceback rendering.
//!
//! The engine never reads files directly; everything goes through the
//! [`SourceLineCache`] read interface so hosts can substitute their own
//! line storage (in-memory buffers, virtual files, remote sources).

mod line_cache;

pub use line_cache::{FileLineCache, MemorySource, SourceLineCache};
