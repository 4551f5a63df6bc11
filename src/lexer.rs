//! Lexical context: is a position inside a string or a comment?
//!
//! The tag scanner never trusts a `<` it finds by byte search until the
//! oracle has confirmed the position is code. Hosts that already track
//! lexer state plug in their own [`LexicalOracle`]; [`LexicalMap`] is a
//! standalone implementation for OCaml source text.
//!
//! # OCaml lexical rules handled by `LexicalMap`
//! - `"..."` strings with backslash escapes (may span lines)
//! - `{id|...|id}` quoted strings, `id` being `[a-z_]*`
//! - character literals (`'"'`, `'<'`, `'\n'`, `'\''`, `'\065'`)
//! - `(* ... *)` comments, nested, with strings inside comments lexed so
//!   that `"*)"` does not close the comment
//!
//! Character literals are reported as strings: a `'<'` is never a tag.

use smallvec::SmallVec;

use crate::Range;
use crate::cursor::Cursor;
use crate::limits::MAX_QUOTED_STRING_ID;

/// Answers whether a byte offset lies inside a string literal or a comment.
pub trait LexicalOracle {
    fn in_string_or_comment(&self, text: &str, pos: usize) -> bool;
}

impl<F> LexicalOracle for F
where
    F: Fn(&str, usize) -> bool,
{
    #[inline]
    fn in_string_or_comment(&self, text: &str, pos: usize) -> bool {
        self(text, pos)
    }
}

/// Oracle for text with no strings or comments: every position is code.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLexicalContext;

impl LexicalOracle for NoLexicalContext {
    #[inline]
    fn in_string_or_comment(&self, _text: &str, _pos: usize) -> bool {
        false
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum LexState {
    #[default]
    Code,
    String {
        start: usize,
    },
    QuotedString {
        start: usize,
        id: SmallVec<[u8; 8]>,
    },
    Comment {
        start: usize,
        depth: u32,
        in_string: bool,
    },
}

impl LexState {
    fn open_start(&self) -> Option<usize> {
        match *self {
            LexState::Code => None,
            LexState::String { start }
            | LexState::QuotedString { start, .. }
            | LexState::Comment { start, .. } => Some(start),
        }
    }
}

/// String and comment regions of an OCaml text.
///
/// Built by a single forward pass; queries are a binary search over the
/// recorded regions. The map can be extended as text is appended, which is
/// how [`crate::reindent`] keeps the whole re-indent linear.
///
/// # Example
/// ```
/// use jsx_indent::{LexicalMap, LexicalOracle};
///
/// let text = r#"let s = "<div>" (* <p> *) in <b />"#;
/// let map = LexicalMap::new(text);
/// assert!(map.in_string_or_comment(text, 9));
/// assert!(map.in_string_or_comment(text, 19));
/// assert!(!map.in_string_or_comment(text, 29));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LexicalMap {
    regions: Vec<Range>,
    state: LexState,
    scanned: usize,
}

impl LexicalMap {
    /// Scan all of `text`.
    pub fn new(text: &str) -> Self {
        let mut map = Self::default();
        map.extend(text);
        map
    }

    /// Continue scanning from where the previous call stopped up to the end
    /// of `text`.
    ///
    /// `text[..self.scanned_len()]` must be unchanged since the previous
    /// call, and that boundary must fall at a line start; otherwise the map
    /// is rebuilt from scratch.
    pub fn extend(&mut self, text: &str) {
        let bytes = text.as_bytes();
        if self.scanned > bytes.len() || (self.scanned > 0 && bytes[self.scanned - 1] != b'\n') {
            log::debug!(
                "lexical map: rescanning, boundary {} is not a line start",
                self.scanned
            );
            *self = Self::default();
        }

        let mut cur = Cursor::new_at(bytes, self.scanned);
        while !cur.is_eof() {
            let state = std::mem::take(&mut self.state);
            self.state = match state {
                LexState::Code => scan_code(&mut cur, &mut self.regions),
                LexState::String { start } => {
                    if skip_string_body(&mut cur) {
                        self.regions.push(cur.range_from(start));
                        LexState::Code
                    } else {
                        LexState::String { start }
                    }
                }
                LexState::QuotedString { start, id } => {
                    if skip_quoted_body(&mut cur, &id) {
                        self.regions.push(cur.range_from(start));
                        LexState::Code
                    } else {
                        LexState::QuotedString { start, id }
                    }
                }
                LexState::Comment {
                    start,
                    depth,
                    in_string,
                } => match skip_comment_body(&mut cur, depth, in_string) {
                    None => {
                        self.regions.push(cur.range_from(start));
                        LexState::Code
                    }
                    Some((depth, in_string)) => LexState::Comment {
                        start,
                        depth,
                        in_string,
                    },
                },
            };
        }
        self.scanned = bytes.len();
    }

    /// Number of bytes covered by the map.
    #[inline]
    pub fn scanned_len(&self) -> usize {
        self.scanned
    }

    /// Whether the scanned text ends inside an unterminated string or comment.
    #[inline]
    pub fn ends_open(&self) -> bool {
        self.state != LexState::Code
    }

    /// Recorded regions, the unterminated trailing one included.
    pub fn regions(&self) -> impl Iterator<Item = Range> + '_ {
        let open = self
            .state
            .open_start()
            .map(|start| Range::from_usize(start, self.scanned));
        self.regions.iter().copied().chain(open)
    }

    /// A region's opening delimiter is still code; everything after it up to
    /// and including the closing delimiter is inside.
    fn lookup(&self, pos: usize) -> bool {
        if let Some(start) = self.state.open_start() {
            if pos > start {
                return true;
            }
        }
        let idx = self.regions.partition_point(|r| r.start_usize() < pos);
        idx > 0 && self.regions[idx - 1].end_usize() > pos
    }
}

impl LexicalOracle for LexicalMap {
    #[inline]
    fn in_string_or_comment(&self, _text: &str, pos: usize) -> bool {
        self.lookup(pos)
    }
}

/// Scan code until a string or comment opens (returned as the new state) or
/// the input ends. Character literals are recorded directly.
fn scan_code(cur: &mut Cursor<'_>, regions: &mut Vec<Range>) -> LexState {
    loop {
        cur.skip_while(|b| !matches!(b, b'"' | b'(' | b'{' | b'\''));
        let start = cur.offset();
        match cur.peek() {
            None => return LexState::Code,
            Some(b'"') => {
                cur.bump();
                return LexState::String { start };
            }
            Some(b'(') => {
                if cur.eat_bytes(b"(*") {
                    return LexState::Comment {
                        start,
                        depth: 1,
                        in_string: false,
                    };
                }
                cur.bump();
            }
            Some(b'{') => {
                if let Some(id) = quoted_string_open(cur) {
                    return LexState::QuotedString { start, id };
                }
                cur.bump();
            }
            Some(_) => {
                let len = char_literal_len(cur);
                if len > 0 {
                    cur.advance(len);
                    regions.push(cur.range_from(start));
                } else {
                    cur.bump();
                }
            }
        }
    }
}

/// At `{`: consume `{id|` and return `id` if this opens a quoted string.
pub(crate) fn quoted_string_open(cur: &mut Cursor<'_>) -> Option<SmallVec<[u8; 8]>> {
    let rest = cur.remaining_slice();
    let id_len = rest[1..]
        .iter()
        .take(MAX_QUOTED_STRING_ID + 1)
        .take_while(|&&b| b.is_ascii_lowercase() || b == b'_')
        .count();
    if id_len > MAX_QUOTED_STRING_ID || rest.get(1 + id_len) != Some(&b'|') {
        return None;
    }
    let id = SmallVec::from_slice(&rest[1..1 + id_len]);
    cur.advance(id_len + 2);
    Some(id)
}

/// At `'`: length of the character literal starting here, or 0 if the quote
/// is a type variable or part of an identifier.
pub(crate) fn char_literal_len(cur: &Cursor<'_>) -> usize {
    if cur
        .peek_behind()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'\'')
    {
        return 0;
    }
    let rest = cur.remaining_slice();
    match rest.get(1) {
        Some(b'\\') => rest
            .iter()
            .skip(3)
            .take(4)
            .position(|&b| b == b'\'')
            .map_or(0, |i| i + 4),
        Some(&b) if b != b'\n' && b != b'\'' => {
            let width = utf8_width(b);
            if rest.get(1 + width) == Some(&b'\'') {
                width + 2
            } else {
                0
            }
        }
        _ => 0,
    }
}

#[inline]
fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Inside `"...`: consume through the closing quote. Returns false if the
/// input ends first.
pub(crate) fn skip_string_body(cur: &mut Cursor<'_>) -> bool {
    loop {
        match cur.find2(b'"', b'\\') {
            None => {
                cur.advance(cur.remaining());
                return false;
            }
            Some(i) => {
                cur.advance(i);
                if cur.eat(b'"') {
                    return true;
                }
                cur.advance(2);
            }
        }
    }
}

/// Inside `{id|...`: consume through `|id}`.
pub(crate) fn skip_quoted_body(cur: &mut Cursor<'_>, id: &[u8]) -> bool {
    loop {
        match cur.find(b'|') {
            None => {
                cur.advance(cur.remaining());
                return false;
            }
            Some(i) => {
                cur.advance(i + 1);
                let rest = cur.remaining_slice();
                if rest.starts_with(id) && rest.get(id.len()) == Some(&b'}') {
                    cur.advance(id.len() + 1);
                    return true;
                }
            }
        }
    }
}

/// Inside a comment: consume until the outermost `*)`. Returns `None` when
/// the comment closed, or the state to resume with when the input ran out.
pub(crate) fn skip_comment_body(cur: &mut Cursor<'_>, mut depth: u32, mut in_string: bool) -> Option<(u32, bool)> {
    loop {
        if in_string {
            if !skip_string_body(cur) {
                return Some((depth, true));
            }
            in_string = false;
        }
        match cur.find3(b'"', b'(', b'*') {
            None => {
                cur.advance(cur.remaining());
                return Some((depth, false));
            }
            Some(i) => {
                cur.advance(i);
                if cur.eat(b'"') {
                    in_string = true;
                } else if cur.eat_bytes(b"(*") {
                    depth = depth.saturating_add(1);
                } else if cur.eat_bytes(b"*)") {
                    depth -= 1;
                    if depth == 0 {
                        return None;
                    }
                } else {
                    cur.bump();
                }
            }
        }
    }
}
