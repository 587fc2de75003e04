//! Stack capture and block formatting.

use std::collections::VecDeque;

use serde::Serialize;

use crate::render::{byte_offset_to_char_offset, extract_anchors};
use crate::source::SourceLineCache;
use crate::trace::frame::{FrameRecord, RawFrame};

/// Consecutive identical frames beyond this many are collapsed into a
/// repetition marker.
pub const RECURSIVE_CUTOFF: usize = 3;

/// An ordered sequence of captured frames.
#[derive(Debug, Default, Serialize)]
pub struct StackSummary {
    frames: Vec<FrameRecord>,
}

impl StackSummary {
    /// Capture frames from the host's stack accessor.
    ///
    /// A non-negative `limit` keeps the first N frames; a negative limit
    /// keeps the last |N| via a bounded ring buffer. Source lines are
    /// not resolved here unless [`resolve_lines`](Self::resolve_lines)
    /// is called.
    pub fn capture<I>(frames: I, limit: Option<i64>) -> Self
    where
        I: IntoIterator<Item = RawFrame>,
    {
        let iter = frames.into_iter();
        let selected: Vec<RawFrame> = match limit {
            None => iter.collect(),
            Some(n) if n >= 0 => iter.take(n as usize).collect(),
            Some(n) => {
                let cap = n.unsigned_abs() as usize;
                let mut ring: VecDeque<RawFrame> = VecDeque::with_capacity(cap);
                for frame in iter {
                    if ring.len() == cap {
                        ring.pop_front();
                    }
                    ring.push_back(frame);
                }
                ring.into_iter().collect()
            }
        };
        Self {
            frames: selected.into_iter().map(FrameRecord::from_raw).collect(),
        }
    }

    pub fn from_records(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Force every frame's source line to resolve now.
    pub fn resolve_lines(&self, cache: &dyn SourceLineCache) {
        for frame in &self.frames {
            frame.original_line(cache);
        }
    }

    /// Format the stack ready for printing, one block per frame.
    ///
    /// Each block ends in a newline and may contain internal newlines.
    /// Maximal runs of frames sharing (file, line, function) are cut off
    /// after [`RECURSIVE_CUTOFF`] occurrences and closed with a
    /// `[Previous line repeated N more times]` marker, including a run
    /// at the very end of the stack.
    pub fn format(&self, cache: &dyn SourceLineCache) -> Vec<String> {
        let mut result = Vec::new();
        let mut last_key: Option<(&str, Option<u32>, &str)> = None;
        let mut count = 0usize;
        for frame in &self.frames {
            let key = (
                frame.position.file.as_str(),
                frame.position.line,
                frame.name.as_str(),
            );
            // Frames without a line number never compress.
            if last_key != Some(key) || key.1.is_none() {
                if count > RECURSIVE_CUTOFF {
                    result.push(repeat_marker(count - RECURSIVE_CUTOFF));
                }
                last_key = Some(key);
                count = 0;
            }
            count += 1;
            if count > RECURSIVE_CUTOFF {
                continue;
            }
            result.push(self.format_frame(frame, cache));
        }
        if count > RECURSIVE_CUTOFF {
            result.push(repeat_marker(count - RECURSIVE_CUTOFF));
        }
        result
    }

    /// Format the lines for a single frame: location header, stripped
    /// source line, caret line when column information allows one, and
    /// captured locals.
    fn format_frame(&self, frame: &FrameRecord, cache: &dyn SourceLineCache) -> String {
        let mut row = String::new();
        let lineno = frame
            .position
            .line
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        row.push_str(&format!(
            "  File \"{}\", line {}, in {}\n",
            frame.position.file, lineno, frame.name
        ));

        if let Some(stripped) = frame.line(cache) {
            let stripped = stripped.to_string();
            row.push_str(&format!("    {stripped}\n"));

            let original = frame.original_line(cache).unwrap_or("").to_string();
            let leading = original.chars().take_while(|c| c.is_whitespace()).count();
            let stripped_len = stripped.chars().count();

            if let (Some(col), Some(end_col)) = (frame.position.col, frame.position.end_col) {
                let start_char = byte_offset_to_char_offset(&original, col as usize);
                let mut end_char = byte_offset_to_char_offset(&original, end_col as usize);

                let anchors = if frame.position.line == frame.position.end_line {
                    let segment: String = original
                        .chars()
                        .skip(start_char)
                        .take(end_char.saturating_sub(start_char))
                        .collect();
                    extract_anchors(&segment)
                } else {
                    // Multi-line span: underline to the end of this line.
                    end_char = leading + stripped_len;
                    None
                };

                let span = end_char.saturating_sub(start_char);
                // Skip the caret line when it would just re-underline the
                // whole statement.
                let show = span < stripped_len
                    || anchors
                        .as_ref()
                        .is_some_and(|a| a.right_start_offset > a.left_end_offset);
                if show {
                    row.push_str("    ");
                    row.push_str(&" ".repeat(start_char.saturating_sub(leading)));
                    match &anchors {
                        Some(a) => {
                            push_repeated(&mut row, a.secondary_char, a.left_end_offset);
                            push_repeated(
                                &mut row,
                                a.primary_char,
                                a.right_start_offset - a.left_end_offset,
                            );
                            push_repeated(
                                &mut row,
                                a.secondary_char,
                                span.saturating_sub(a.right_start_offset),
                            );
                        }
                        None => push_repeated(&mut row, '^', span),
                    }
                    row.push('\n');
                }
            }
        }

        if let Some(locals) = &frame.locals {
            for (name, value) in locals {
                row.push_str(&format!("    {name} = {value}\n"));
            }
        }

        row
    }
}

fn push_repeated(out: &mut String, ch: char, count: usize) {
    out.extend(std::iter::repeat_n(ch, count));
}

fn repeat_marker(count: usize) -> String {
    format!(
        "  [Previous line repeated {} more time{}]\n",
        count,
        if count > 1 { "s" } else { "" }
    )
}
