//! jsx-indent: JSX tag matching and indentation for OCaml with JSX markup
//!
//! The scanner answers one question per line: which column should this line
//! start at, given the JSX tags around it? When the answer is not clearly a
//! JSX matter it defers, and the host's own indenter takes over.
//!
//! # Design Principles
//! - No tree: every query is a bounded backward scan over the text
//! - No regex: byte-level scanning with `memchr`
//! - Bounded work: backward searches stop after `lookback_window` bytes
//! - Lexically aware: `<` in strings and comments is never a tag
//!
//! # Example
//! ```
//! let text = "<ul>\n<li />\n</ul>\n";
//! assert_eq!(jsx_indent::indent_line(text, 5), jsx_indent::Indent::Column(2));
//! assert_eq!(jsx_indent::reindent_default(text), "<ul>\n  <li />\n</ul>\n");
//! ```

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod indent;
pub mod jsx;
pub mod lexer;
pub mod limits;
pub mod range;
pub mod render;

pub use buffer::Buffer;
pub use config::{Config, ConfigError, ServerConfig, ServerRegistry};
pub use indent::{
    FallbackIndenter, FixedIndent, Indent, IndentChain, IndentProvider, KeepIndentation, reindent,
};
pub use jsx::{LineKind, ScanOptions, TagScanner};
pub use lexer::{LexicalMap, LexicalOracle, NoLexicalContext};
pub use range::Range;
pub use render::{HtmlWriter, to_html};

/// Indentation of one line of OCaml text with default options.
///
/// Builds a [`LexicalMap`] of the whole text; callers indenting many lines
/// should build one map and reuse a [`TagScanner`].
pub fn indent_line(text: &str, line_start: usize) -> Indent {
    let map = LexicalMap::new(text);
    TagScanner::new(&map).compute_indent(text, line_start)
}

/// Re-indent `text` with default options, keeping deferred lines as they are.
pub fn reindent_default(text: &str) -> String {
    reindent(text, ScanOptions::default(), &KeepIndentation::default())
}
