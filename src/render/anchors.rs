//! Caret anchor extraction for single-line error spans.
//!
//! When an error span covers a whole binary operation or subscript
//! expression, the caret line is split into a primary zone over the
//! operator (or the bracketed index) and secondary zones over the
//! operands, so the reader sees which part of the expression failed.

/// Split points for a caret line, as character offsets relative to the
/// start of the spanned segment. The primary zone is
/// `[left_end_offset, right_start_offset)`; everything else in the span
/// gets the secondary character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    pub left_end_offset: usize,
    pub right_start_offset: usize,
    pub primary_char: char,
    pub secondary_char: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Number,
    Str,
    Open(char),
    Close(char),
    Dot,
    Sep,
    Op(String),
}

struct Token {
    kind: TokenKind,
    start: usize,
    len: usize,
}

const OPS3: [&str; 4] = ["**=", "//=", "<<=", ">>="];
const OPS2: [&str; 18] = [
    "**", "//", "<<", ">>", "<=", ">=", "==", "!=", "->", "+=", "-=", "*=", "/=", "%=", "@=",
    "&=", "|=", "^=",
];
const OP_CHARS: &str = "+-*/%@<>=!&|^~";

/// Find anchors for a segment that covers exactly one error span.
///
/// Returns `None` whenever the segment is not a single expression whose
/// top level is a binary operation with an anchorable operator or a
/// subscript; comparisons, boolean operators, assignments, calls, and
/// unparsable text all decline rather than guess.
pub fn extract_anchors(segment: &str) -> Option<Anchors> {
    let tokens = tokenize(segment)?;
    if tokens.is_empty() {
        return None;
    }
    let partner = match_brackets(&tokens)?;

    // Peel parentheses that wrap the whole expression.
    let mut lo = 0;
    let mut hi = tokens.len();
    while hi - lo >= 2
        && tokens[lo].kind == TokenKind::Open('(')
        && partner[lo] == Some(hi - 1)
    {
        lo += 1;
        hi -= 1;
    }
    if lo == hi {
        return None;
    }
    scan(&tokens[lo..hi])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectOperand,
    AfterOperand,
    ExpectAttr,
}

fn scan(tokens: &[Token]) -> Option<Anchors> {
    let mut state = State::ExpectOperand;
    let mut depth = 0usize;
    // (open char position, opened directly after an operand)
    let mut open_stack: Vec<(usize, bool)> = Vec::new();
    // Depth-zero binary operators: (char position, token length, text).
    let mut binops: Vec<(usize, usize, String)> = Vec::new();
    // (open position, was a subscript, close position) of the most
    // recently closed bracket pair.
    let mut last_close: Option<(usize, bool, usize)> = None;

    for token in tokens {
        match &token.kind {
            TokenKind::Ident => match state {
                State::ExpectOperand | State::ExpectAttr => state = State::AfterOperand,
                State::AfterOperand => return None,
            },
            TokenKind::Number | TokenKind::Str => match state {
                State::ExpectOperand => state = State::AfterOperand,
                _ => return None,
            },
            TokenKind::Open(c) => {
                if state == State::ExpectAttr {
                    return None;
                }
                let is_subscript = *c == '[' && state == State::AfterOperand;
                open_stack.push((token.start, is_subscript));
                depth += 1;
                state = State::ExpectOperand;
            }
            TokenKind::Close(_) => {
                if state == State::ExpectAttr {
                    return None;
                }
                let (open_pos, is_subscript) = open_stack.pop()?;
                depth -= 1;
                last_close = Some((open_pos, is_subscript, token.start));
                state = State::AfterOperand;
            }
            TokenKind::Dot => match state {
                State::AfterOperand => state = State::ExpectAttr,
                _ => return None,
            },
            TokenKind::Sep => {
                if depth == 0 || state == State::ExpectAttr {
                    return None;
                }
                state = State::ExpectOperand;
            }
            TokenKind::Op(text) => match state {
                State::ExpectOperand => {
                    if !matches!(text.as_str(), "+" | "-" | "~" | "!") {
                        return None;
                    }
                }
                State::ExpectAttr => return None,
                State::AfterOperand => {
                    if depth == 0 {
                        binops.push((token.start, token.len, text.clone()));
                    }
                    state = State::ExpectOperand;
                }
            },
        }
    }
    if state != State::AfterOperand {
        return None;
    }

    if !binops.is_empty() {
        let mut precedences = Vec::with_capacity(binops.len());
        for (_, _, text) in &binops {
            precedences.push(binop_precedence(text)?);
        }
        let lowest = *precedences.iter().min()?;
        // Left-associative operators split at the rightmost occurrence;
        // exponentiation is right-associative and splits at the leftmost.
        let candidates = binops
            .iter()
            .zip(&precedences)
            .filter(|(_, p)| **p == lowest);
        let (pos, len, _) = if lowest == 8 {
            candidates.map(|(op, _)| op).next()?
        } else {
            candidates.map(|(op, _)| op).last()?
        };
        let right = pos + 1 + usize::from(*len >= 2);
        return Some(Anchors {
            left_end_offset: *pos,
            right_start_offset: right,
            primary_char: '^',
            secondary_char: '~',
        });
    }

    // With no top-level operator, a trailing bracket pair that indexes
    // an operand anchors the whole index expression.
    if let Some(last) = tokens.last()
        && matches!(last.kind, TokenKind::Close(']'))
        && let Some((open_pos, true, close_pos)) = last_close
    {
        return Some(Anchors {
            left_end_offset: open_pos,
            right_start_offset: close_pos + 1,
            primary_char: '^',
            secondary_char: '~',
        });
    }

    None
}

fn binop_precedence(op: &str) -> Option<u8> {
    match op {
        "|" => Some(1),
        "^" => Some(2),
        "&" => Some(3),
        "<<" | ">>" => Some(4),
        "+" | "-" => Some(5),
        "*" | "/" | "//" | "%" | "@" => Some(6),
        "**" => Some(8),
        _ => None,
    }
}

fn tokenize(segment: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = segment.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '#' {
            break;
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                start,
                len: i - start,
            });
        } else if c.is_ascii_digit()
            || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit))
        {
            let start = i;
            i += 1;
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_alphanumeric() || d == '_' || d == '.' {
                    i += 1;
                } else if matches!(d, '+' | '-') && matches!(chars[i - 1], 'e' | 'E') {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                start,
                len: i - start,
            });
        } else if c == '"' || c == '\'' {
            let start = i;
            i += 1;
            let mut closed = false;
            while i < chars.len() {
                if chars[i] == '\\' {
                    i += 2;
                } else if chars[i] == c {
                    i += 1;
                    closed = true;
                    break;
                } else {
                    i += 1;
                }
            }
            if !closed {
                return None;
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                start,
                len: i - start,
            });
        } else if matches!(c, '(' | '[' | '{') {
            tokens.push(Token {
                kind: TokenKind::Open(c),
                start: i,
                len: 1,
            });
            i += 1;
        } else if matches!(c, ')' | ']' | '}') {
            tokens.push(Token {
                kind: TokenKind::Close(c),
                start: i,
                len: 1,
            });
            i += 1;
        } else if c == '.' {
            tokens.push(Token {
                kind: TokenKind::Dot,
                start: i,
                len: 1,
            });
            i += 1;
        } else if matches!(c, ',' | ';' | ':') {
            tokens.push(Token {
                kind: TokenKind::Sep,
                start: i,
                len: 1,
            });
            i += 1;
        } else if OP_CHARS.contains(c) {
            let ahead: String = chars[i..chars.len().min(i + 3)].iter().collect();
            let len = if OPS3.iter().any(|op| ahead.starts_with(op)) {
                3
            } else if OPS2.iter().any(|op| ahead.starts_with(op)) {
                2
            } else {
                1
            };
            let text: String = chars[i..i + len].iter().collect();
            tokens.push(Token {
                kind: TokenKind::Op(text),
                start: i,
                len,
            });
            i += len;
        } else {
            return None;
        }
    }
    Some(tokens)
}

fn match_brackets(tokens: &[Token]) -> Option<Vec<Option<usize>>> {
    let mut partner = vec![None; tokens.len()];
    let mut stack: Vec<(usize, char)> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Open(c) => stack.push((i, c)),
            TokenKind::Close(c) => {
                let (j, open) = stack.pop()?;
                let matched = matches!((open, c), ('(', ')') | ('[', ']') | ('{', '}'));
                if !matched {
                    return None;
                }
                partner[i] = Some(j);
                partner[j] = Some(i);
            }
            _ => {}
        }
    }
    if !stack.is_empty() {
        return None;
    }
    Some(partner)
}
