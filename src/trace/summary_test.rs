use crate::source::MemorySource;
use crate::trace::{RawFrame, SourcePosition, StackSummary};

fn source() -> MemorySource {
    let mut cache = MemorySource::new();
    cache.insert("rec.sg", "main()\nspin()\nother()\n");
    cache
}

fn frame_at(line: u32, name: &str) -> RawFrame {
    RawFrame::new(SourcePosition::line_only("rec.sg", line), name)
}

#[test]
fn positive_limit_keeps_the_outermost_frames() {
    let frames = (1..=3).map(|n| frame_at(n, "f"));
    let summary = StackSummary::capture(frames, Some(2));
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.frames()[0].position.line, Some(1));
    assert_eq!(summary.frames()[1].position.line, Some(2));
}

#[test]
fn negative_limit_keeps_the_innermost_frames() {
    let frames = (1..=3).map(|n| frame_at(n, "f"));
    let summary = StackSummary::capture(frames, Some(-2));
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.frames()[0].position.line, Some(2));
    assert_eq!(summary.frames()[1].position.line, Some(3));
}

#[test]
fn repeated_frames_collapse_after_the_cutoff() {
    let frames = (0..10).map(|_| frame_at(2, "spin"));
    let summary = StackSummary::capture(frames, None);
    let blocks = summary.format(&source());
    assert_eq!(blocks.len(), 4);
    for block in &blocks[..3] {
        assert_eq!(block, "  File \"rec.sg\", line 2, in spin\n    spin()\n");
    }
    assert_eq!(blocks[3], "  [Previous line repeated 7 more times]\n");
}

#[test]
fn repeat_marker_is_singular_for_one_extra() {
    let frames = (0..4).map(|_| frame_at(2, "spin"));
    let summary = StackSummary::capture(frames, None);
    let blocks = summary.format(&source());
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[3], "  [Previous line repeated 1 more time]\n");
}

#[test]
fn run_in_the_middle_is_compressed_too() {
    let mut frames: Vec<RawFrame> = (0..5).map(|_| frame_at(2, "spin")).collect();
    frames.push(frame_at(3, "other"));
    let summary = StackSummary::capture(frames, None);
    let blocks = summary.format(&source());
    assert_eq!(blocks.len(), 5);
    assert_eq!(blocks[3], "  [Previous line repeated 2 more times]\n");
    assert_eq!(blocks[4], "  File \"rec.sg\", line 3, in other\n    other()\n");
}

#[test]
fn frames_without_line_numbers_never_compress() {
    let position = SourcePosition {
        file: "rec.sg".to_string(),
        line: None,
        end_line: None,
        col: None,
        end_col: None,
    };
    let frames = (0..5).map(|_| RawFrame::new(position.clone(), "native"));
    let summary = StackSummary::capture(frames, None);
    let blocks = summary.format(&source());
    assert_eq!(blocks.len(), 5);
    for block in &blocks {
        assert_eq!(block, "  File \"rec.sg\", line ?, in native\n");
    }
}

#[test]
fn partial_span_gets_a_caret_line_with_anchors() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "x = a + b\n");
    let raw = RawFrame::new(
        SourcePosition {
            file: "t.sg".to_string(),
            line: Some(1),
            end_line: Some(1),
            col: Some(4),
            end_col: Some(9),
        },
        "main",
    );
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    x = a + b\n        ~~^~~\n"
    );
}

#[test]
fn whole_statement_span_omits_the_caret_line() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "x = a + b\n");
    let raw = RawFrame::new(
        SourcePosition {
            file: "t.sg".to_string(),
            line: Some(1),
            end_line: Some(1),
            col: Some(0),
            end_col: Some(9),
        },
        "main",
    );
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    x = a + b\n"
    );
}

#[test]
fn anchors_force_the_caret_line_on_a_full_span() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "a + b\n");
    let raw = RawFrame::new(
        SourcePosition {
            file: "t.sg".to_string(),
            line: Some(1),
            end_line: Some(1),
            col: Some(0),
            end_col: Some(5),
        },
        "main",
    );
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    a + b\n    ~~^~~\n"
    );
}

#[test]
fn indentation_is_subtracted_from_the_caret_line() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "    y = a * b\n");
    let raw = RawFrame::new(
        SourcePosition {
            file: "t.sg".to_string(),
            line: Some(1),
            end_line: Some(1),
            col: Some(8),
            end_col: Some(13),
        },
        "main",
    );
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    y = a * b\n        ~~^~~\n"
    );
}

#[test]
fn multi_line_span_underlines_to_the_end_of_the_line() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "x = (a +\n     b)\n");
    let raw = RawFrame::new(
        SourcePosition {
            file: "t.sg".to_string(),
            line: Some(1),
            end_line: Some(2),
            col: Some(4),
            end_col: Some(7),
        },
        "main",
    );
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    x = (a +\n        ^^^^\n"
    );
}

#[test]
fn captured_locals_are_listed_after_the_source_line() {
    let mut cache = MemorySource::new();
    cache.insert("t.sg", "boom()\n");
    let raw = RawFrame {
        position: SourcePosition::line_only("t.sg", 1),
        name: "main".to_string(),
        line: None,
        locals: Some(vec![
            ("a".to_string(), Ok("1".to_string())),
            ("b".to_string(), Ok("\"two\"".to_string())),
        ]),
    };
    let summary = StackSummary::capture(vec![raw], None);
    let blocks = summary.format(&cache);
    assert_eq!(
        blocks[0],
        "  File \"t.sg\", line 1, in main\n    boom()\n    a = 1\n    b = \"two\"\n"
    );
}
