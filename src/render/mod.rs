//! Text rendering: caret anchors, column translation, and the
//! traceback formatter itself.

mod anchors;
mod offsets;
mod renderer;

pub use anchors::{Anchors, extract_anchors};
pub use offsets::byte_offset_to_char_offset;
pub use renderer::{
    CAUSE_MESSAGE, CONTEXT_MESSAGE, FormatOptions, format_exception, format_exception_only,
    format_with_chain, print_exception, render, render_exception_only,
};

#[cfg(test)]
mod anchors_test;
