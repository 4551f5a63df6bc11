//! JSX embedded in OCaml: tag lexing, indentation and highlighting.
//!
//! The dialect is OCaml expressions with JSX markup, where attribute values
//! are OCaml (`onClick=(fun _ -> ())`) and tag names may be module paths
//! (`<Ui.Card>`). Nothing here builds a tree: every query is a bounded scan
//! over the text around the position asked about.
//!
//! # Example
//! ```
//! use jsx_indent::jsx::{highlight_spans, Role};
//! use jsx_indent::LexicalMap;
//!
//! let text = "<Card title=\"Hi\">";
//! let map = LexicalMap::new(text);
//! let spans = highlight_spans(text, &map);
//! assert_eq!(spans[1].role, Role::Component);
//! assert_eq!(spans[2].role, Role::Attribute);
//! ```
//!
//! # Limits of the heuristic
//!
//! - Matching is textual. A `<Foo` that is really a comparison written as
//!   `x <Foo` (space before, none after) is taken for a tag.
//! - Backward searches stop after `lookback_window` bytes. An opener further
//!   back than that is not found and the line defers to the fallback
//!   indenter. The default window is a heuristic, not a guarantee, for very
//!   large or deeply nested markup.
//! - TypeScript-style generics and text children are not part of the
//!   dialect and are not recognized.

pub mod expr;
mod highlight;
mod scanner;
mod tag;

pub use highlight::{HighlightSink, Role, Span, highlight, highlight_spans};
pub use scanner::{LineKind, ScanOptions, TagScanner, classify_line};
pub use tag::{
    TagInfo, TagKind, TagRole, closing_tag_at, is_ident_byte, is_name_boundary, opening_tag_at,
    parse_tag, tag_name_end,
};
