//! HTML rendering of highlighted source.

use html_escape::encode_text;

use crate::Range;
use crate::jsx::{Role, Span, highlight_spans};
use crate::lexer::LexicalOracle;

/// HTML output writer with a pre-allocated buffer.
///
/// # Example
/// ```
/// use jsx_indent::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(16);
/// writer.write_str("<pre>");
/// writer.write_escaped_text("a < b");
/// writer.write_str("</pre>");
/// assert_eq!(writer.into_string(), "<pre>a &lt; b</pre>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Markup roughly doubles highlighted source; reserve for that.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self::with_capacity(input_len * 2)
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
        }
    }

    /// Write markup without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        self.out.push_str(&encode_text(text));
    }

    /// Escaped `text[range]`. Ranges off char boundaries write nothing.
    #[inline]
    pub fn write_escaped_range(&mut self, text: &str, range: Range) {
        if let Some(s) = range.slice_str(text) {
            self.write_escaped_text(s);
        }
    }

    /// `<span class="…">text</span>` for one highlighted span.
    pub fn write_span(&mut self, text: &str, range: Range, role: Role) {
        self.out.push_str("<span class=\"");
        self.out.push_str(role.as_str());
        self.out.push_str("\">");
        self.write_escaped_range(text, range);
        self.out.push_str("</span>");
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }
}

/// Write `text` with `spans` wrapped in role classes.
///
/// `spans` must be sorted by start. A span overlapping an earlier one is
/// dropped.
pub fn render_spans(writer: &mut HtmlWriter, text: &str, spans: &[Span]) {
    let mut pos = 0;
    for span in spans {
        let (start, end) = (span.range.start_usize(), span.range.end_usize());
        if start < pos || end > text.len() {
            continue;
        }
        writer.write_escaped_range(text, Range::from_usize(pos, start));
        writer.write_span(text, span.range, span.role);
        pos = end;
    }
    writer.write_escaped_range(text, Range::from_usize(pos, text.len()));
}

/// Highlight `text` and render it as a `<pre class="jsx">` block.
pub fn to_html<O: LexicalOracle + ?Sized>(text: &str, oracle: &O) -> String {
    let spans = highlight_spans(text, oracle);
    let mut writer = HtmlWriter::with_capacity_for(text.len());
    writer.write_str("<pre class=\"jsx\">");
    render_spans(&mut writer, text, &spans);
    writer.write_str("</pre>\n");
    writer.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexicalMap;

    #[test]
    fn renders_roles_and_escapes_gaps() {
        let text = "a < b && <br />";
        let map = LexicalMap::new(text);
        assert_eq!(
            to_html(text, &map),
            "<pre class=\"jsx\">a &lt; b &amp;&amp; \
             <span class=\"jsx-delimiter\">&lt;</span>\
             <span class=\"jsx-element\">br</span> \
             <span class=\"jsx-delimiter\">/&gt;</span></pre>\n"
        );
    }

    #[test]
    fn overlapping_span_is_dropped() {
        let text = "<Ab>";
        let spans = [
            Span {
                range: Range::from_usize(1, 3),
                role: Role::Component,
            },
            Span {
                range: Range::from_usize(2, 3),
                role: Role::Attribute,
            },
        ];
        let mut writer = HtmlWriter::new();
        render_spans(&mut writer, text, &spans);
        assert_eq!(
            writer.as_str(),
            "&lt;<span class=\"jsx-component\">Ab</span>&gt;"
        );
    }

    #[test]
    fn utf8_text_is_kept() {
        let text = "<p>é</p>";
        let map = LexicalMap::new(text);
        assert!(to_html(text, &map).contains(">é<"));
    }
}
