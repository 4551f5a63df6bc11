//! Indentation providers and the re-indentation pass.
//!
//! A provider either knows the column for a line or answers
//! [`Indent::Defer`]. An [`IndentChain`] asks its providers in order and
//! falls back to a [`FallbackIndenter`] (the host language's own rules) when
//! every provider defers.

use smallvec::SmallVec;

use crate::buffer::{Buffer, is_blank};
use crate::jsx::{ScanOptions, TagScanner};
use crate::lexer::LexicalMap;

/// Answer of an [`IndentProvider`] for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indent {
    /// Indent the line to this display column.
    Column(usize),
    /// Not this provider's business; ask the next one.
    Defer,
}

impl Indent {
    #[inline]
    pub fn is_defer(self) -> bool {
        matches!(self, Indent::Defer)
    }

    #[inline]
    pub fn column(self) -> Option<usize> {
        match self {
            Indent::Column(col) => Some(col),
            Indent::Defer => None,
        }
    }
}

impl From<Option<usize>> for Indent {
    fn from(col: Option<usize>) -> Self {
        col.map_or(Indent::Defer, Indent::Column)
    }
}

/// Something that may know how to indent a line.
pub trait IndentProvider {
    /// Indentation of the line starting at byte offset `line_start`.
    fn indent(&self, text: &str, line_start: usize) -> Indent;
}

/// The last word on indentation. Always produces a column.
pub trait FallbackIndenter {
    fn indent_line(&self, text: &str, line_start: usize) -> usize;
}

impl<F> FallbackIndenter for F
where
    F: Fn(&str, usize) -> usize,
{
    #[inline]
    fn indent_line(&self, text: &str, line_start: usize) -> usize {
        self(text, line_start)
    }
}

/// Leaves lines at their current indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepIndentation {
    pub tab_width: usize,
}

impl Default for KeepIndentation {
    fn default() -> Self {
        Self {
            tab_width: crate::limits::DEFAULT_TAB_WIDTH,
        }
    }
}

impl FallbackIndenter for KeepIndentation {
    fn indent_line(&self, text: &str, line_start: usize) -> usize {
        Buffer::new(text)
            .with_tab_width(self.tab_width)
            .indentation(line_start)
    }
}

/// Indents every deferred line to the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedIndent(pub usize);

impl FallbackIndenter for FixedIndent {
    #[inline]
    fn indent_line(&self, _text: &str, _line_start: usize) -> usize {
        self.0
    }
}

/// Providers consulted in order, then a fallback.
pub struct IndentChain<'p, F: ?Sized> {
    providers: SmallVec<[&'p dyn IndentProvider; 2]>,
    fallback: &'p F,
}

impl<'p, F: FallbackIndenter + ?Sized> IndentChain<'p, F> {
    pub fn new(fallback: &'p F) -> Self {
        Self {
            providers: SmallVec::new(),
            fallback,
        }
    }

    /// Append a provider. Earlier providers win.
    pub fn with(mut self, provider: &'p dyn IndentProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// First non-deferring provider's column, else the fallback's.
    pub fn indent_line(&self, text: &str, line_start: usize) -> usize {
        self.providers
            .iter()
            .find_map(|p| p.indent(text, line_start).column())
            .unwrap_or_else(|| self.fallback.indent_line(text, line_start))
    }
}

/// Re-indent every line of `text`.
///
/// Lines are processed top to bottom and each one is indented against the
/// already re-indented lines above it, so a closing tag lines up with where
/// its opener ended up rather than where it was. Lines that begin inside a
/// multi-line string or comment are copied unchanged. Blank lines lose their
/// whitespace. Indentation is written as spaces.
///
/// Lexical state is carried forward line by line, so the pass is linear in
/// the text length for a fixed lookback window.
pub fn reindent<F: FallbackIndenter + ?Sized>(
    text: &str,
    options: ScanOptions,
    fallback: &F,
) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut map = LexicalMap::default();

    for line in text.split_inclusive('\n') {
        let line_start = out.len();
        let inside = map.ends_open();
        out.push_str(line);

        if inside {
            log::trace!("keeping line at {line_start}: inside a string or comment");
        } else {
            let body = line.trim_start_matches([' ', '\t']);
            out.truncate(line_start);
            if body.bytes().all(is_blank_or_newline) {
                out.push_str(line_ending(line));
            } else {
                // Measure against the line's current indentation, then replace it.
                out.push_str(line);
                let scanner = TagScanner::with_options(&map, options);
                let col = IndentChain::new(fallback)
                    .with(&scanner)
                    .indent_line(&out, line_start);
                out.truncate(line_start);
                out.extend(std::iter::repeat_n(' ', col));
                out.push_str(body);
            }
        }
        map.extend(&out);
    }
    out
}

#[inline]
fn is_blank_or_newline(b: u8) -> bool {
    is_blank(b) || b == b'\n'
}

#[inline]
fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::NoLexicalContext;

    struct Always(Indent);

    impl IndentProvider for Always {
        fn indent(&self, _text: &str, _line_start: usize) -> Indent {
            self.0
        }
    }

    #[test]
    fn chain_takes_first_answer() {
        let fallback = FixedIndent(9);
        let defer = Always(Indent::Defer);
        let four = Always(Indent::Column(4));
        let six = Always(Indent::Column(6));
        let chain = IndentChain::new(&fallback).with(&defer).with(&four).with(&six);
        assert_eq!(chain.indent_line("x", 0), 4);
    }

    #[test]
    fn chain_falls_back_when_all_defer() {
        let fallback = |_: &str, _: usize| -> usize { 3 };
        let defer = Always(Indent::Defer);
        let chain = IndentChain::new(&fallback).with(&defer);
        assert_eq!(chain.indent_line("x", 0), 3);
    }

    #[test]
    fn scanner_in_chain() {
        let text = "<div>\n</div>";
        let oracle = NoLexicalContext;
        let scanner = TagScanner::new(&oracle);
        let fallback = FixedIndent(7);
        let chain = IndentChain::new(&fallback).with(&scanner);
        assert_eq!(chain.indent_line(text, 6), 0);
        assert_eq!(chain.indent_line(text, 0), 7);
    }

    #[test]
    fn keep_indentation_measures_tabs() {
        let keep = KeepIndentation { tab_width: 4 };
        assert_eq!(keep.indent_line("\t  x", 0), 6);
    }

    #[test]
    fn indent_helpers() {
        assert_eq!(Indent::from(Some(2)), Indent::Column(2));
        assert!(Indent::from(None).is_defer());
        assert_eq!(Indent::Column(5).column(), Some(5));
    }

    #[test]
    fn reindent_nested_markup() {
        let text = "<div>\n<ul>\n<li />\n</ul>\n</div>\n";
        let out = reindent(text, ScanOptions::default(), &KeepIndentation::default());
        assert_eq!(out, "<div>\n  <ul>\n    <li />\n  </ul>\n</div>\n");
    }

    #[test]
    fn reindent_keeps_deferred_lines() {
        let text = "let x =\n      1\n";
        let out = reindent(text, ScanOptions::default(), &KeepIndentation::default());
        assert_eq!(out, text);
    }

    #[test]
    fn reindent_leaves_string_continuations_alone() {
        let text = "<p>\n\"a\n   b\"\n</p>";
        let out = reindent(text, ScanOptions::default(), &KeepIndentation::default());
        assert_eq!(out, "<p>\n  \"a\n   b\"\n</p>");
    }

    #[test]
    fn reindent_empties_blank_lines() {
        let text = "<p>\n    \r\n</p>\n";
        let out = reindent(text, ScanOptions::default(), &KeepIndentation::default());
        assert_eq!(out, "<p>\n\r\n</p>\n");
    }

    #[test]
    fn reindent_is_idempotent() {
        let text = "let v =\n<Card\n title=\"x\"\n/>\n";
        let once = reindent(text, ScanOptions::default(), &FixedIndent(0));
        let twice = reindent(&once, ScanOptions::default(), &FixedIndent(0));
        assert_eq!(once, twice);
    }
}
