//! Line geometry over an immutable text snapshot.
//!
//! Offsets are UTF-8 byte offsets. Columns are display columns: characters
//! from the start of the line, with tabs advancing to the next tab stop.

use memchr::{memchr, memrchr};

use crate::limits::DEFAULT_TAB_WIDTH;

/// A read-only view of the text being scanned.
#[derive(Clone, Copy, Debug)]
pub struct Buffer<'a> {
    text: &'a str,
    tab_width: usize,
}

impl<'a> Buffer<'a> {
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    /// Use `tab_width` when converting offsets to columns. Zero is treated as 1.
    #[inline]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether `pos` is the first byte of a line (or the end of a text that
    /// ends with a newline, which starts an empty last line).
    #[inline]
    pub fn is_line_start(&self, pos: usize) -> bool {
        pos == 0 || (pos <= self.len() && self.bytes()[pos - 1] == b'\n')
    }

    /// Start of the line containing `pos`.
    #[inline]
    pub fn line_start(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        memrchr(b'\n', &self.bytes()[..pos]).map_or(0, |i| i + 1)
    }

    /// End of the line containing `pos`, excluding the newline.
    #[inline]
    pub fn line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        memchr(b'\n', &self.bytes()[pos..]).map_or(self.len(), |i| pos + i)
    }

    /// Start of the line before the one starting at `line_start`.
    #[inline]
    pub fn prev_line_start(&self, line_start: usize) -> Option<usize> {
        if line_start == 0 {
            None
        } else {
            Some(self.line_start(line_start - 1))
        }
    }

    /// Like [`Buffer::prev_line_start`], but gives up instead of looking
    /// before `floor`.
    #[inline]
    pub fn prev_line_start_within(&self, line_start: usize, floor: usize) -> Option<usize> {
        let newline = line_start.checked_sub(1)?;
        if newline < floor {
            return None;
        }
        match memrchr(b'\n', &self.bytes()[floor..newline]) {
            Some(i) => Some(floor + i + 1),
            None if floor == 0 => Some(0),
            None => None,
        }
    }

    /// Offset of the first non-blank byte of the line, or `None` for a blank line.
    ///
    /// Reads only the leading blanks, never the rest of the line.
    pub fn first_non_blank(&self, line_start: usize) -> Option<usize> {
        let bytes = self.bytes().get(line_start..)?;
        let i = bytes.iter().position(|&b| !is_blank(b))?;
        (bytes[i] != b'\n').then_some(line_start + i)
    }

    /// Offset of the last non-blank byte of the line, or `None` for a blank line.
    pub fn last_non_blank(&self, line_start: usize) -> Option<usize> {
        let end = self.line_end(line_start);
        self.bytes()[line_start..end]
            .iter()
            .rposition(|&b| !is_blank(b))
            .map(|i| line_start + i)
    }

    #[inline]
    pub fn is_blank_line(&self, line_start: usize) -> bool {
        self.first_non_blank(line_start).is_none()
    }

    /// Display column of `pos` within its line.
    pub fn column(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.column_from(self.line_start(pos), pos)
    }

    /// Like [`Buffer::column`], but gives up instead of looking before
    /// `floor` for the start of the line.
    pub fn column_within(&self, pos: usize, floor: usize) -> Option<usize> {
        let pos = pos.min(self.len());
        let floor = floor.min(pos);
        let start = match memrchr(b'\n', &self.bytes()[floor..pos]) {
            Some(i) => floor + i + 1,
            None if self.is_line_start(floor) => floor,
            None => return None,
        };
        Some(self.column_from(start, pos))
    }

    fn column_from(&self, start: usize, pos: usize) -> usize {
        let Some(prefix) = self.text.get(start..pos) else {
            // Not a char boundary; fall back to a byte count.
            return pos - start;
        };
        let mut col = 0;
        for c in prefix.chars() {
            if c == '\t' {
                col += self.tab_width - col % self.tab_width;
            } else {
                col += 1;
            }
        }
        col
    }

    /// Current indentation of the line starting at `line_start`.
    pub fn indentation(&self, line_start: usize) -> usize {
        let pos = self
            .first_non_blank(line_start)
            .unwrap_or_else(|| self.line_end(line_start));
        self.column(pos)
    }

    /// Line starts in the text, in order.
    pub fn line_starts(&self) -> impl Iterator<Item = usize> + 'a {
        let bytes = self.bytes();
        std::iter::once(0).chain(
            memchr::memchr_iter(b'\n', bytes)
                .map(|i| i + 1)
                .filter(move |&i| i < bytes.len()),
        )
    }
}

/// Spaces, tabs and carriage returns do not count as line content.
#[inline]
pub(crate) fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}
