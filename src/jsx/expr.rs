use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::lexer::{
    char_literal_len, quoted_string_open, skip_comment_body, skip_quoted_body, skip_string_body,
};
use crate::limits::MAX_EXPR_DEPTH;

/// Find the end of an attribute value expression starting at `{`, `(` or `[`.
///
/// Returns the byte offset **after** the matching closer, or `None` if the
/// expression is unterminated, mismatched, or nests deeper than
/// [`MAX_EXPR_DEPTH`].
///
/// Tracks:
/// - `{}`, `()` and `[]` nesting (each closer must match its opener),
///   which covers `[| ... |]` arrays
/// - `"..."` strings with escapes and `{id|...|id}` quoted strings
/// - character literals, so `')'` does not close anything
/// - nested `(* ... *)` comments
pub fn find_expression_end(bytes: &[u8]) -> Option<usize> {
    if !matches!(bytes.first(), Some(b'{' | b'(' | b'[')) {
        return None;
    }
    let mut cur = Cursor::new(bytes);
    let mut closers: SmallVec<[u8; 16]> = SmallVec::new();

    loop {
        cur.skip_while(|b| !matches!(b, b'{' | b'(' | b'[' | b'}' | b')' | b']' | b'"' | b'\''));
        match cur.peek()? {
            b'(' if cur.at_bytes(b"(*") => {
                cur.advance(2);
                if skip_comment_body(&mut cur, 1, false).is_some() {
                    return None;
                }
            }
            b'{' => {
                if let Some(id) = quoted_string_open(&mut cur) {
                    if !skip_quoted_body(&mut cur, &id) {
                        return None;
                    }
                } else {
                    push_closer(&mut closers, b'}')?;
                    cur.bump();
                }
            }
            b'(' => {
                push_closer(&mut closers, b')')?;
                cur.bump();
            }
            b'[' => {
                push_closer(&mut closers, b']')?;
                cur.bump();
            }
            closer @ (b'}' | b')' | b']') => {
                if closers.pop() != Some(closer) {
                    return None;
                }
                cur.bump();
            }
            b'"' => {
                cur.bump();
                if !skip_string_body(&mut cur) {
                    return None;
                }
            }
            _ => {
                let len = char_literal_len(&cur);
                cur.advance(len.max(1));
            }
        }
        if closers.is_empty() {
            return Some(cur.offset());
        }
    }
}

#[inline]
fn push_closer(closers: &mut SmallVec<[u8; 16]>, closer: u8) -> Option<()> {
    if closers.len() >= MAX_EXPR_DEPTH {
        return None;
    }
    closers.push(closer);
    Some(())
}
