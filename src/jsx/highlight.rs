use memchr::memchr2_iter;
use rustc_hash::FxHashSet;

use super::tag::{TagKind, TagRole, closing_tag_at, opening_tag_at, parse_tag};
use crate::Range;
use crate::lexer::LexicalOracle;

/// Highlight role of a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Component,
    Element,
    Attribute,
    /// `<`, `</`, `>`, `/>`
    Delimiter,
}

impl Role {
    /// CSS class / face name for the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Component => "jsx-component",
            Role::Element => "jsx-element",
            Role::Attribute => "jsx-attribute",
            Role::Delimiter => "jsx-delimiter",
        }
    }
}

impl From<TagRole> for Role {
    fn from(role: TagRole) -> Self {
        match role {
            TagRole::Component => Role::Component,
            TagRole::Element => Role::Element,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub range: Range,
    pub role: Role,
}

/// Receives highlight spans. Purely additive: nothing flows back into the
/// scanner.
pub trait HighlightSink {
    fn span(&mut self, range: Range, role: Role);
}

impl HighlightSink for Vec<Span> {
    #[inline]
    fn span(&mut self, range: Range, role: Role) {
        self.push(Span { range, role });
    }
}

/// Emit highlight spans for every JSX tag in `text`.
///
/// Complete tags get their delimiters, name and attribute names. A tag that
/// does not parse yet (still being typed, or spread over a malformed
/// attribute) still gets its `<name` / `</name` head, and a stray `/>` its
/// delimiter. Positions the oracle places in strings or comments are
/// skipped. Tags nested inside attribute values are highlighted too, so
/// spans are not emitted in offset order.
pub fn highlight<O, S>(text: &str, oracle: &O, sink: &mut S)
where
    O: LexicalOracle + ?Sized,
    S: HighlightSink + ?Sized,
{
    let bytes = text.as_bytes();
    let mut closed: FxHashSet<usize> = FxHashSet::default();

    for pos in memchr2_iter(b'<', b'/', bytes) {
        if bytes[pos] == b'/' {
            if bytes.get(pos + 1) == Some(&b'>')
                && (pos == 0 || bytes[pos - 1] != b'<')
                && !closed.contains(&pos)
                && !oracle.in_string_or_comment(text, pos)
            {
                sink.span(Range::from_usize(pos, pos + 2), Role::Delimiter);
            }
            continue;
        }

        if oracle.in_string_or_comment(text, pos) {
            continue;
        }
        let role_of = |name: Range| {
            name.slice_str(text)
                .map_or(Role::Element, |n| TagRole::of(n).into())
        };

        if let Some(tag) = parse_tag(&bytes[pos..]) {
            // Opening tags need the same comparison guard the scanner uses.
            if tag.kind != TagKind::Closing && opening_tag_at(bytes, pos).is_none() {
                continue;
            }
            let delta = pos as u32;
            sink.span(tag.open_delim.offset_by(delta), Role::Delimiter);
            if !tag.name.is_empty() {
                let name = tag.name.offset_by(delta);
                sink.span(name, role_of(name));
            }
            for attr in &tag.attributes {
                sink.span(attr.offset_by(delta), Role::Attribute);
            }
            let close = tag.close_delim.offset_by(delta);
            if tag.kind == TagKind::SelfClosing {
                closed.insert(close.start_usize());
            }
            sink.span(close, Role::Delimiter);
        } else if let Some((name, _)) = closing_tag_at(bytes, pos) {
            sink.span(Range::from_usize(pos, pos + 2), Role::Delimiter);
            if !name.is_empty() {
                sink.span(name, role_of(name));
            }
        } else if let Some(name) = opening_tag_at(bytes, pos) {
            if name.is_empty() {
                continue;
            }
            sink.span(Range::from_usize(pos, pos + 1), Role::Delimiter);
            sink.span(name, role_of(name));
        }
    }
}

/// Collect [`highlight`] output sorted by start offset.
pub fn highlight_spans<O: LexicalOracle + ?Sized>(text: &str, oracle: &O) -> Vec<Span> {
    let mut spans = Vec::new();
    highlight(text, oracle, &mut spans);
    spans.sort_by_key(|s| s.range.start);
    spans
}
