//! Scan bounds.
//!
//! Every backward scan and every nested construct the lexers walk is capped
//! by one of these constants, so malformed or adversarial input cannot make
//! an indentation query run in time proportional to the buffer.

/// Default lookback window, in bytes, for backward tag searches.
///
/// A heuristic rather than a correctness bound: an opener further back than
/// this is reported as not found and the line defers to the fallback indenter.
pub const DEFAULT_LOOKBACK_WINDOW: usize = 10_000;

/// Upper bound accepted for a configured lookback window.
pub const MAX_LOOKBACK_WINDOW: usize = 1 << 20;

/// Default indentation added for children of an unclosed opening tag.
pub const DEFAULT_INDENT_OFFSET: usize = 2;

/// Largest configurable child indentation offset.
pub const MAX_INDENT_OFFSET: usize = 16;

/// Default tab stop used when converting byte offsets to display columns.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Maximum `{`/`(` nesting inside an attribute value expression.
pub const MAX_EXPR_DEPTH: usize = 64;

/// Maximum bytes a single tag is parsed forward while the scanner checks
/// whether an opener is already terminated. Keeps a backward scan linear in
/// the window size.
pub const MAX_TAG_LEN: usize = 2048;

/// Maximum attributes parsed on a single tag before giving up.
pub const MAX_TAG_ATTRIBUTES: usize = 256;

/// Maximum length of the identifier in a `{id|...|id}` quoted string.
pub const MAX_QUOTED_STRING_ID: usize = 32;
