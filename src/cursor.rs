//! Forward byte cursor used by the lexers.
//!
//! Bounds are checked on every access; the hot scanning paths jump with
//! `memchr` instead of stepping byte by byte.

use crate::Range;

/// A cursor for forward byte-by-byte scanning.
///
/// # Example
/// ```
/// use jsx_indent::cursor::Cursor;
///
/// let mut cursor = Cursor::new(b"<Foo bar>");
/// assert!(cursor.eat(b'<'));
/// let name = cursor.skip_while(|b| b.is_ascii_alphanumeric());
/// assert_eq!(name, 3);
/// assert_eq!(cursor.peek(), Some(b' '));
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Create a cursor starting at an offset (clamped to the input length).
    #[inline]
    pub fn new_at(input: &'a [u8], offset: usize) -> Self {
        Self {
            input,
            pos: offset.min(input.len()),
        }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// The byte just before the cursor.
    #[inline]
    pub fn peek_behind(&self) -> Option<u8> {
        self.pos.checked_sub(1).and_then(|i| self.input.get(i).copied())
    }

    /// Advance by n bytes, stopping at end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn bump(&mut self) {
        self.advance(1);
    }

    /// Check if current position matches a byte.
    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Check if the upcoming bytes match `bytes`.
    #[inline]
    pub fn at_bytes(&self, bytes: &[u8]) -> bool {
        self.remaining_slice().starts_with(bytes)
    }

    /// Skip while predicate is true, returning the number of bytes skipped.
    #[inline]
    pub fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip spaces and tabs.
    #[inline]
    pub fn skip_blanks(&mut self) -> usize {
        self.skip_while(|b| b == b' ' || b == b'\t')
    }

    /// Skip any ASCII whitespace, newlines included.
    #[inline]
    pub fn skip_whitespace(&mut self) -> usize {
        self.skip_while(|b| b.is_ascii_whitespace())
    }

    /// Consume a specific byte if present.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a specific byte sequence if present.
    #[inline]
    pub fn eat_bytes(&mut self, bytes: &[u8]) -> bool {
        if self.at_bytes(bytes) {
            self.pos += bytes.len();
            true
        } else {
            false
        }
    }

    /// Get a range from a start offset to current position.
    #[inline]
    pub fn range_from(&self, start: usize) -> Range {
        Range::from_usize(start, self.pos)
    }

    #[inline]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Distance to the next occurrence of `needle`.
    #[inline]
    pub fn find(&self, needle: u8) -> Option<usize> {
        memchr::memchr(needle, self.remaining_slice())
    }

    /// Distance to the next occurrence of either needle.
    #[inline]
    pub fn find2(&self, a: u8, b: u8) -> Option<usize> {
        memchr::memchr2(a, b, self.remaining_slice())
    }

    /// Distance to the next occurrence of any of three needles.
    #[inline]
    pub fn find3(&self, a: u8, b: u8, c: u8) -> Option<usize> {
        memchr::memchr3(a, b, c, self.remaining_slice())
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset())
            .field("remaining", &self.remaining())
            .finish()
    }
}
