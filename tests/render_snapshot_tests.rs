mod common;

use common::HostError;
use insta::assert_snapshot;
use traceback::{FormatOptions, MemorySource, SourcePosition, format_exception};

#[test]
fn chained_traceback() {
    let mut cache = MemorySource::new();
    cache.insert("app.sg", "read_config()\nparse(text)\n");
    let inner = HostError::new("ValueError", "bad literal")
        .with_frame("app.sg", 2, "parse")
        .build();
    let outer = HostError::new("TypeError", "bad config")
        .with_frame("app.sg", 1, "main")
        .with_context(inner)
        .build();

    let rendered = format_exception(&outer, &cache, &FormatOptions::default()).concat();
    assert_snapshot!("chained_traceback", rendered);
}

#[test]
fn caret_narrowing() {
    let mut cache = MemorySource::new();
    cache.insert("calc.sg", "total = base + rate\n");
    let position = SourcePosition {
        file: "calc.sg".to_string(),
        line: Some(1),
        end_line: Some(1),
        col: Some(8),
        end_col: Some(19),
    };
    let exc = HostError::new("TypeError", "cannot add int and str")
        .with_span_frame(position, "compute")
        .build();

    let rendered = format_exception(&exc, &cache, &FormatOptions::default()).concat();
    assert_snapshot!("caret_narrowing", rendered);
}
