use crate::render::extract_anchors;

fn anchor_offsets(segment: &str) -> Option<(usize, usize)> {
    extract_anchors(segment).map(|a| (a.left_end_offset, a.right_start_offset))
}

#[test]
fn binary_operator_is_anchored() {
    assert_eq!(anchor_offsets("a + b"), Some((2, 3)));
}

#[test]
fn tight_spacing_keeps_the_operator_position() {
    assert_eq!(anchor_offsets("a +b"), Some((2, 3)));
    assert_eq!(anchor_offsets("a+b"), Some((1, 2)));
}

#[test]
fn two_char_operator_widens_the_primary_zone() {
    assert_eq!(anchor_offsets("a ** b"), Some((2, 4)));
    assert_eq!(anchor_offsets("a // b"), Some((2, 4)));
}

#[test]
fn lowest_precedence_operator_wins() {
    assert_eq!(anchor_offsets("a + b * c"), Some((2, 3)));
    assert_eq!(anchor_offsets("a * b + c"), Some((6, 7)));
    assert_eq!(anchor_offsets("a | b ^ c & d"), Some((2, 3)));
}

#[test]
fn equal_precedence_splits_at_the_rightmost_operator() {
    assert_eq!(anchor_offsets("a + b + c"), Some((6, 7)));
}

#[test]
fn exponentiation_splits_at_the_leftmost_operator() {
    assert_eq!(anchor_offsets("a ** b ** c"), Some((2, 4)));
}

#[test]
fn wrapping_parentheses_are_peeled() {
    assert_eq!(anchor_offsets("(a + b)"), Some((3, 4)));
    assert_eq!(anchor_offsets("((a + b))"), Some((4, 5)));
}

#[test]
fn operator_inside_call_arguments_is_not_top_level() {
    assert_eq!(anchor_offsets("f(a + b)"), None);
    assert_eq!(anchor_offsets("f(a, b) + c"), Some((8, 9)));
}

#[test]
fn subscript_is_anchored_over_the_brackets() {
    assert_eq!(anchor_offsets("data[idx]"), Some((4, 9)));
    assert_eq!(anchor_offsets("m[i][j]"), Some((4, 7)));
    assert_eq!(anchor_offsets("a[1:2]"), Some((1, 6)));
}

#[test]
fn list_literal_is_not_a_subscript() {
    assert_eq!(anchor_offsets("[1, 2]"), None);
}

#[test]
fn comparisons_and_assignments_decline() {
    assert_eq!(anchor_offsets("a == b"), None);
    assert_eq!(anchor_offsets("a < b"), None);
    assert_eq!(anchor_offsets("x = y"), None);
    assert_eq!(anchor_offsets("x += y"), None);
}

#[test]
fn keyword_operators_decline() {
    assert_eq!(anchor_offsets("x and y"), None);
    assert_eq!(anchor_offsets("a in b"), None);
}

#[test]
fn plain_operands_decline() {
    assert_eq!(anchor_offsets("value"), None);
    assert_eq!(anchor_offsets("a.b"), None);
    assert_eq!(anchor_offsets("a[i].b"), None);
    assert_eq!(anchor_offsets("f(x)"), None);
}

#[test]
fn unary_prefix_does_not_count_as_binary() {
    assert_eq!(anchor_offsets("-a + b"), Some((3, 4)));
    assert_eq!(anchor_offsets("-a"), None);
}

#[test]
fn trailing_comment_is_ignored() {
    assert_eq!(anchor_offsets("a + b  # note"), Some((2, 3)));
}

#[test]
fn malformed_segments_decline() {
    assert_eq!(anchor_offsets(""), None);
    assert_eq!(anchor_offsets("a +"), None);
    assert_eq!(anchor_offsets("'abc"), None);
    assert_eq!(anchor_offsets("(a + b"), None);
    assert_eq!(anchor_offsets("a, b"), None);
}

#[test]
fn string_operands_participate() {
    assert_eq!(anchor_offsets("'a' + 'b'"), Some((4, 5)));
}
