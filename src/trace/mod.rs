//! Captured call-site records and their textual form.
//!
//! A [`StackSummary`] is the owned, render-ready form of a call stack or
//! raised-error trace: an ordered sequence of [`FrameRecord`]s, oldest
//! call first for a live stack and outermost frame first for an error
//! trace. Source lines are looked up lazily through a
//! [`crate::source::SourceLineCache`] and frozen after the first access.

mod frame;
mod summary;

pub use frame::{FrameRecord, RawFrame, SourcePosition};
pub use summary::{RECURSIVE_CUTOFF, StackSummary};

#[cfg(test)]
mod summary_test;
