//! Traceback text assembly.
//!
//! Turns an [`ExceptionNode`] tree into the printed form: chained
//! tracebacks joined by transition sentences, nested group boxes with
//! margin and numbering, syntax-error layouts, and the final
//! `Type: message` lines with attached notes.

use std::io::{self, Write};

use crate::exception::{ExcRef, ExceptionNode, SnapshotOptions, SyntaxSnapshot, snapshot};
use crate::render::offsets::byte_offset_to_char_offset;
use crate::source::SourceLineCache;

pub const CAUSE_MESSAGE: &str =
    "\nThe above exception was the direct cause of the following exception:\n\n";

pub const CONTEXT_MESSAGE: &str =
    "\nDuring handling of the above exception, another exception occurred:\n\n";

/// Controls for the text renderer.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Follow cause/context links and print the whole chain.
    pub chain: bool,
    /// Group children beyond this many collapse into one summary box.
    pub max_group_width: usize,
    /// Groups nested deeper than this render as an elision marker.
    pub max_group_depth: usize,
    /// Frame capture limit, passed through to the snapshot when the
    /// renderer takes one itself.
    pub limit: Option<i64>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            chain: true,
            max_group_width: 15,
            max_group_depth: 10,
            limit: None,
        }
    }
}

/// Indentation and margin state while descending into groups.
struct PrintContext {
    depth: usize,
    need_close: bool,
}

impl PrintContext {
    fn indent(&self) -> String {
        " ".repeat(2 * self.depth)
    }

    /// Push `text` with the margin prefix applied to every line,
    /// including blank ones.
    fn emit_with(&self, out: &mut Vec<String>, text: &str, margin_char: char) {
        if self.depth == 0 {
            out.push(text.to_string());
            return;
        }
        let mut prefix = self.indent();
        prefix.push(margin_char);
        prefix.push(' ');
        let mut block = String::new();
        for line in text.split_inclusive('\n') {
            block.push_str(&prefix);
            block.push_str(line);
        }
        out.push(block);
    }

    fn emit(&self, out: &mut Vec<String>, text: &str) {
        self.emit_with(out, text, '|');
    }
}

/// Snapshot `exc` and render the full chained traceback, one chunk per
/// logical block. Concatenating the chunks yields the printed text.
pub fn format_exception(
    exc: &ExcRef,
    cache: &dyn SourceLineCache,
    options: &FormatOptions,
) -> Vec<String> {
    let snapshot_options = SnapshotOptions {
        limit: options.limit,
        compact: true,
        ..SnapshotOptions::default()
    };
    let node = snapshot(exc, cache, &snapshot_options);
    format_with_chain(&node, cache, options)
}

/// Render an already-taken snapshot into chunks.
pub fn format_with_chain(
    node: &ExceptionNode,
    cache: &dyn SourceLineCache,
    options: &FormatOptions,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut ctx = PrintContext {
        depth: 0,
        need_close: false,
    };
    format_node(node, cache, options, &mut ctx, &mut out);
    out
}

/// Render an already-taken snapshot into one string.
pub fn render(node: &ExceptionNode, cache: &dyn SourceLineCache, options: &FormatOptions) -> String {
    format_with_chain(node, cache, options).concat()
}

/// Write the rendered traceback of `exc` to `writer`.
pub fn print_exception<W: Write>(
    writer: &mut W,
    exc: &ExcRef,
    cache: &dyn SourceLineCache,
    options: &FormatOptions,
) -> io::Result<()> {
    for chunk in format_exception(exc, cache, options) {
        writer.write_all(chunk.as_bytes())?;
    }
    Ok(())
}

/// Only the final description of `node`: the syntax-error layout or the
/// `Type: message` line, followed by any notes. No stack, no chain.
pub fn format_exception_only(node: &ExceptionNode) -> Vec<String> {
    exception_only_lines(node)
}

/// [`format_exception_only`] joined into one string.
pub fn render_exception_only(node: &ExceptionNode) -> String {
    exception_only_lines(node).concat()
}

fn format_node(
    node: &ExceptionNode,
    cache: &dyn SourceLineCache,
    options: &FormatOptions,
    ctx: &mut PrintContext,
    out: &mut Vec<String>,
) {
    let mut parts: Vec<(Option<&'static str>, &ExceptionNode)> = Vec::new();
    if options.chain {
        let mut current = Some(node);
        while let Some(exc) = current {
            let (message, next) = if let Some(cause) = &exc.cause {
                (Some(CAUSE_MESSAGE), Some(cause.as_ref()))
            } else if let Some(context) = &exc.context
                && !exc.suppress_context
            {
                (Some(CONTEXT_MESSAGE), Some(context.as_ref()))
            } else {
                (None, None)
            };
            parts.push((message, exc));
            current = next;
        }
    } else {
        parts.push((None, node));
    }

    // Innermost error first, each introduced by the sentence describing
    // its link to the error printed above it.
    for (message, exc) in parts.iter().rev() {
        if let Some(message) = message {
            ctx.emit(out, message);
        }
        format_single(exc, cache, options, ctx, out);
    }
}

fn format_single(
    node: &ExceptionNode,
    cache: &dyn SourceLineCache,
    options: &FormatOptions,
    ctx: &mut PrintContext,
    out: &mut Vec<String>,
) {
    let Some(children) = &node.children else {
        if !node.stack.is_empty() {
            ctx.emit(out, "Traceback (most recent call last):\n");
            for block in node.stack.format(cache) {
                ctx.emit(out, &block);
            }
        }
        for line in exception_only_lines(node) {
            ctx.emit(out, &line);
        }
        return;
    };

    if ctx.depth > options.max_group_depth {
        ctx.emit(
            out,
            &format!("... (max_group_depth is {})\n", options.max_group_depth),
        );
        return;
    }

    let is_toplevel = ctx.depth == 0;
    if is_toplevel {
        ctx.depth += 1;
    }

    if !node.stack.is_empty() {
        let margin = if is_toplevel { '+' } else { '|' };
        ctx.emit_with(out, "Exception Group Traceback (most recent call last):\n", margin);
        for block in node.stack.format(cache) {
            ctx.emit(out, &block);
        }
    }
    for line in exception_only_lines(node) {
        ctx.emit(out, &line);
    }

    let total = children.len();
    let boxes = if total <= options.max_group_width {
        total
    } else {
        options.max_group_width + 1
    };
    ctx.need_close = false;
    for i in 0..boxes {
        let last = i == boxes - 1;
        if last {
            // A nested group emits its own closing frame and clears this.
            ctx.need_close = true;
        }
        let truncated = i >= options.max_group_width;
        let title = if truncated {
            "...".to_string()
        } else {
            (i + 1).to_string()
        };
        out.push(format!(
            "{}{}+---------------- {} ----------------\n",
            ctx.indent(),
            if i == 0 { "+-" } else { "  " },
            title
        ));
        ctx.depth += 1;
        if truncated {
            let remaining = total - options.max_group_width;
            ctx.emit(
                out,
                &format!(
                    "and {} more exception{}\n",
                    remaining,
                    if remaining > 1 { "s" } else { "" }
                ),
            );
        } else {
            format_node(&children[i], cache, options, ctx, out);
        }
        if last && ctx.need_close {
            out.push(format!("{}+------------------------------------\n", ctx.indent()));
            ctx.need_close = false;
        }
        ctx.depth -= 1;
    }

    if is_toplevel {
        ctx.depth = 0;
    }
}

fn exception_only_lines(node: &ExceptionNode) -> Vec<String> {
    let mut out = Vec::new();
    match &node.syntax {
        Some(syntax) => syntax_error_lines(&node.type_name, syntax, &mut out),
        None => out.push(final_exc_line(&node.type_name, &node.message)),
    }
    for note in &node.notes {
        for line in note.split('\n') {
            out.push(format!("{line}\n"));
        }
    }
    out
}

fn final_exc_line(type_name: &str, message: &str) -> String {
    if message.is_empty() {
        format!("{type_name}\n")
    } else {
        format!("{type_name}: {message}\n")
    }
}

/// Translate a 1-based byte column into `text` to a 1-based character
/// column. Non-positive columns pass through unchanged.
fn to_char_col(text: &str, col: i64) -> i64 {
    if col <= 0 {
        col
    } else {
        byte_offset_to_char_offset(text, (col - 1) as usize) as i64 + 1
    }
}

/// Location header, offending line with carets, and the final message
/// line for a syntax error.
fn syntax_error_lines(type_name: &str, syntax: &SyntaxSnapshot, out: &mut Vec<String>) {
    let mut filename_suffix = String::new();
    if let Some(lineno) = syntax.lineno {
        let filename = syntax.filename.as_deref().unwrap_or("<string>");
        out.push(format!("  File \"{filename}\", line {lineno}\n"));
    } else if let Some(filename) = &syntax.filename {
        filename_suffix = format!(" ({filename})");
    }

    if let Some(text) = &syntax.text {
        let rtext = text.trim_end_matches('\n');
        let ltext = rtext.trim_start_matches([' ', '\n', '\u{c}']);
        let rlen = rtext.chars().count() as i64;
        let spaces = rlen - ltext.chars().count() as i64;

        out.push(format!("    {ltext}\n"));

        if let Some(offset) = syntax.offset {
            let mut offset = to_char_col(text, offset);
            let mut end_offset = if syntax.lineno == syntax.end_lineno {
                match syntax.end_offset {
                    Some(end) if end != 0 => to_char_col(text, end),
                    _ => offset,
                }
            } else {
                rlen + 1
            };

            let text_len = text.chars().count() as i64;
            if offset > text_len {
                offset = rlen + 1;
            }
            if end_offset > text_len {
                end_offset = rlen + 1;
            }
            if offset >= end_offset || end_offset < 0 {
                end_offset = offset + 1;
            }

            let colno = offset - 1 - spaces;
            let end_colno = end_offset - 1 - spaces;
            if colno >= 0 {
                // Tabs and other whitespace are kept for alignment.
                let caretspace: String = ltext
                    .chars()
                    .take(colno as usize)
                    .map(|c| if c.is_whitespace() { c } else { ' ' })
                    .collect();
                let width = (end_colno - colno).max(1) as usize;
                out.push(format!("    {}{}\n", caretspace, "^".repeat(width)));
            }
        }
    }

    let msg = syntax.msg.as_deref().unwrap_or("<no detail available>");
    out.push(format!("{type_name}: {msg}{filename_suffix}\n"));
}
