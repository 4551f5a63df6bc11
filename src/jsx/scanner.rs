//! JSX tag matching and indentation inference.
//!
//! Every query is a pure function of the text and the line asked about:
//! nothing is cached between calls, and every backward search stops at
//! `lookback_window` bytes before its starting point.

use memchr::{memchr_iter, memrchr};
use smallvec::SmallVec;

use super::tag::{TagKind, closing_tag_at, opening_tag_at, parse_tag};
use crate::buffer::Buffer;
use crate::indent::{Indent, IndentProvider};
use crate::lexer::LexicalOracle;
use crate::limits::{
    DEFAULT_INDENT_OFFSET, DEFAULT_LOOKBACK_WINDOW, DEFAULT_TAB_WIDTH, MAX_TAG_LEN,
};

/// Tunables for [`TagScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Columns added for children of an unclosed opening tag.
    pub indent_offset: usize,
    /// Maximum distance, in bytes, of any backward search.
    pub lookback_window: usize,
    /// Tab stop used for column computation.
    pub tab_width: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            indent_offset: DEFAULT_INDENT_OFFSET,
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// JSX shape of a line, judged from its first non-blank characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Line begins with `</name>`; the name is empty for `</>`.
    ClosingTag(&'a str),
    /// Line begins with `/>`.
    SelfClosingEnd,
    Plain,
}

/// Classify the line starting at `line_start`.
///
/// ```
/// use jsx_indent::jsx::{classify_line, LineKind};
///
/// assert_eq!(classify_line("  </Ui.Card>", 0), LineKind::ClosingTag("Ui.Card"));
/// assert_eq!(classify_line("\t/>", 0), LineKind::SelfClosingEnd);
/// assert_eq!(classify_line("let x = 1", 0), LineKind::Plain);
/// ```
pub fn classify_line(text: &str, line_start: usize) -> LineKind<'_> {
    let buf = Buffer::new(text);
    if line_start > buf.len() {
        return LineKind::Plain;
    }
    let Some(first) = buf.first_non_blank(line_start) else {
        return LineKind::Plain;
    };
    let bytes = buf.bytes();
    if let Some((name, _)) = closing_tag_at(bytes, first) {
        // Name bytes are ASCII, so the range is on char boundaries.
        return name
            .slice_str(text)
            .map_or(LineKind::Plain, LineKind::ClosingTag);
    }
    if bytes[first..].starts_with(b"/>") {
        return LineKind::SelfClosingEnd;
    }
    LineKind::Plain
}

/// Computes JSX indentation, deferring whenever the answer is not clear.
///
/// The scanner borrows a [`LexicalOracle`] so that `<` inside strings and
/// comments is never taken for a tag.
///
/// # Example
/// ```
/// use jsx_indent::{Indent, LexicalMap, TagScanner};
///
/// let text = "let view =\n  <div className=\"x\">\n\n  </div>\n";
/// let map = LexicalMap::new(text);
/// let scanner = TagScanner::new(&map);
///
/// // Blank line under an unclosed `<div ...>`: two columns deeper.
/// assert_eq!(scanner.compute_indent(text, 33), Indent::Column(4));
/// // Closing tag lines up with its opener.
/// assert_eq!(scanner.compute_indent(text, 34), Indent::Column(2));
/// // Plain OCaml defers to the host indenter.
/// assert_eq!(scanner.compute_indent(text, 0), Indent::Defer);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TagScanner<'o, O: LexicalOracle + ?Sized> {
    oracle: &'o O,
    options: ScanOptions,
}

impl<'o, O: LexicalOracle + ?Sized> TagScanner<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self::with_options(oracle, ScanOptions::default())
    }

    pub fn with_options(oracle: &'o O, options: ScanOptions) -> Self {
        Self { oracle, options }
    }

    #[inline]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    #[inline]
    pub fn classify_line<'t>(&self, text: &'t str, line_start: usize) -> LineKind<'t> {
        classify_line(text, line_start)
    }

    /// Column of the opener matching a `</name>` that starts at `pos`.
    ///
    /// Walks `<` bytes backward from `pos` with a depth counter starting at 1:
    /// a nested `</name>` increments it, an opening `<name` decrements it,
    /// and the opener that brings it to zero is the match. Self-closing
    /// `<name ... />` tags are balanced on their own and do not count.
    /// Returns `None` once the lookback window is exhausted, or when the
    /// matched opener's line starts before the window.
    pub fn find_matching_open_tag(&self, text: &str, pos: usize, name: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let pos = pos.min(bytes.len());
        let floor = self.window_floor(pos);
        let mut depth: u32 = 1;
        let mut end = pos;

        while let Some(i) = memrchr(b'<', &bytes[floor..end]) {
            let lt = floor + i;
            end = lt;
            let Some(token) = named_token_at(bytes, lt, name) else {
                continue;
            };
            if !self.is_code(text, lt) {
                continue;
            }
            match token {
                NamedToken::Closing => depth += 1,
                NamedToken::Opening => {
                    if is_terminated(bytes, lt, pos, TagKind::SelfClosing) {
                        continue;
                    }
                    depth -= 1;
                    if depth == 0 {
                        return self.column(text, lt);
                    }
                }
            }
        }

        log::trace!(
            "no opener for </{name}> within {} bytes of {pos}",
            self.options.lookback_window
        );
        None
    }

    /// Column of the first opening tag left open on the nearest non-blank
    /// line above `line_start`, if that line ends with a `>`.
    ///
    /// The previous line qualifies when its last non-blank byte is a `>`
    /// that is code and is not part of `/>` or of the OCaml operators `->`
    /// and `|>`, and the line does not itself begin with a closing tag.
    /// Tags on the line are then balanced against each other: `<b>x</b>`
    /// leaves nothing open, while `<div><span>x</span>` leaves `<div`.
    pub fn previous_opening_tag_column(&self, text: &str, line_start: usize) -> Option<usize> {
        let buf = self.buffer(text);
        if !buf.is_line_start(line_start) {
            return None;
        }
        let floor = self.window_floor(line_start);
        let mut prev = buf.prev_line_start_within(line_start, floor)?;
        while buf.is_blank_line(prev) {
            prev = buf.prev_line_start_within(prev, floor)?;
        }

        let bytes = buf.bytes();
        let last = buf.last_non_blank(prev)?;
        if bytes[last] != b'>' || last == prev || matches!(bytes[last - 1], b'/' | b'-' | b'|') {
            return None;
        }
        if !self.is_code(text, last) || matches!(classify_line(text, prev), LineKind::ClosingTag(_)) {
            return None;
        }

        let lt = self.first_open_tag_on_line(text, prev, last + 1)?;
        buf.column_within(lt, prev)
    }

    /// Indentation for the line starting at `line_start`, or [`Indent::Defer`].
    pub fn compute_indent(&self, text: &str, line_start: usize) -> Indent {
        let buf = self.buffer(text);
        if !buf.is_line_start(line_start) || !text.is_char_boundary(line_start) {
            log::trace!("defer: {line_start} is not a line start");
            return Indent::Defer;
        }
        let first = buf.first_non_blank(line_start);
        if first.is_some_and(|p| !self.is_code(text, p)) {
            log::trace!("defer: line {line_start} starts inside a string or comment");
            return Indent::Defer;
        }

        let column = match classify_line(text, line_start) {
            LineKind::ClosingTag(name) => first.and_then(|lt| self.find_matching_open_tag(text, lt, name)),
            LineKind::SelfClosingEnd => self.unterminated_opener_column(text, line_start),
            LineKind::Plain => self
                .previous_opening_tag_column(text, line_start)
                .map(|col| col + self.options.indent_offset),
        };
        match column {
            Some(col) => Indent::Column(col),
            None => {
                log::trace!("defer: no JSX context for line {line_start}");
                Indent::Defer
            }
        }
    }

    /// For a line beginning with `/>`: column of the nearest opening tag
    /// above it that is not already terminated by its own `>` or `/>`.
    fn unterminated_opener_column(&self, text: &str, line_start: usize) -> Option<usize> {
        let bytes = text.as_bytes();
        let floor = self.window_floor(line_start);
        let mut end = line_start;
        while let Some(i) = memrchr(b'<', &bytes[floor..end]) {
            let lt = floor + i;
            end = lt;
            if opening_tag_at(bytes, lt).is_none() || !self.is_code(text, lt) {
                continue;
            }
            if parse_tag(tag_slice(bytes, lt, line_start)).is_some() {
                continue;
            }
            return self.column(text, lt);
        }
        None
    }

    /// Offset of the first opening tag in `line_start..line_end` that no
    /// closing tag later on the same range closes. Self-closing tags are
    /// skipped; a closing tag with nothing open on the line is ignored.
    fn first_open_tag_on_line(&self, text: &str, line_start: usize, line_end: usize) -> Option<usize> {
        let bytes = text.as_bytes();
        let mut open: SmallVec<[usize; 4]> = SmallVec::new();
        for lt in memchr_iter(b'<', &bytes[line_start..line_end]).map(|i| line_start + i) {
            if !self.is_code(text, lt) {
                continue;
            }
            if closing_tag_at(bytes, lt).is_some() {
                open.pop();
            } else if opening_tag_at(bytes, lt).is_some()
                && !is_terminated(bytes, lt, line_end, TagKind::SelfClosing)
            {
                open.push(lt);
            }
        }
        open.first().copied()
    }

    #[inline]
    fn is_code(&self, text: &str, pos: usize) -> bool {
        !self.oracle.in_string_or_comment(text, pos)
    }

    /// Display column of `pos`, provided its line starts inside the window.
    #[inline]
    fn column(&self, text: &str, pos: usize) -> Option<usize> {
        let column = self.buffer(text).column_within(pos, self.window_floor(pos));
        if column.is_none() {
            log::trace!("line of {pos} starts before the lookback window");
        }
        column
    }

    #[inline]
    fn window_floor(&self, pos: usize) -> usize {
        pos.saturating_sub(self.options.lookback_window)
    }

    #[inline]
    fn buffer<'t>(&self, text: &'t str) -> Buffer<'t> {
        Buffer::new(text).with_tab_width(self.options.tab_width)
    }
}

impl<O: LexicalOracle + ?Sized> IndentProvider for TagScanner<'_, O> {
    fn indent(&self, text: &str, line_start: usize) -> Indent {
        self.compute_indent(text, line_start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedToken {
    Opening,
    Closing,
}

/// Is there a `<name` or `</name>` token for exactly `name` at `lt`?
fn named_token_at(bytes: &[u8], lt: usize, name: &str) -> Option<NamedToken> {
    if let Some((found, _)) = closing_tag_at(bytes, lt) {
        return (found.slice(bytes) == name.as_bytes()).then_some(NamedToken::Closing);
    }
    let found = opening_tag_at(bytes, lt)?;
    (found.slice(bytes) == name.as_bytes()).then_some(NamedToken::Opening)
}

/// Does the tag starting at `lt` parse completely, as `kind`, before `limit`?
fn is_terminated(bytes: &[u8], lt: usize, limit: usize, kind: TagKind) -> bool {
    parse_tag(tag_slice(bytes, lt, limit)).is_some_and(|tag| tag.kind == kind)
}

#[inline]
fn tag_slice(bytes: &[u8], lt: usize, limit: usize) -> &[u8] {
    &bytes[lt..limit.min(lt + MAX_TAG_LEN).max(lt)]
}
