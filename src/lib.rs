pub mod exception;
pub mod render;
pub mod source;
pub mod suggest;
pub mod trace;

pub use exception::{ExcRef, ExceptionLike, ExceptionNode, LastException, SnapshotOptions, snapshot};
pub use render::{FormatOptions, format_exception, format_exception_only, print_exception, render};
pub use source::{FileLineCache, MemorySource, SourceLineCache};
pub use trace::{FrameRecord, RawFrame, SourcePosition, StackSummary};
