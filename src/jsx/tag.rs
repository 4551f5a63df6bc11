use smallvec::SmallVec;

use super::expr::find_expression_end;
use crate::Range;
use crate::cursor::Cursor;
use crate::limits::{MAX_TAG_ATTRIBUTES, MAX_TAG_LEN};

/// Display role of a tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagRole {
    /// Final name segment starts with an uppercase letter (`Foo`, `Ui.Button`).
    Component,
    /// Anything else (`div`, `Ui.button`, fragments).
    Element,
}

impl TagRole {
    /// Classify a tag name by the case of its final dotted segment.
    ///
    /// ```
    /// use jsx_indent::jsx::TagRole;
    ///
    /// assert_eq!(TagRole::of("Card"), TagRole::Component);
    /// assert_eq!(TagRole::of("Ui.Card"), TagRole::Component);
    /// assert_eq!(TagRole::of("div"), TagRole::Element);
    /// ```
    pub fn of(name: &str) -> Self {
        let last = name.rsplit('.').next().unwrap_or(name);
        match last.bytes().next() {
            Some(b) if b.is_ascii_uppercase() => TagRole::Component,
            _ => TagRole::Element,
        }
    }
}

/// What kind of tag [`parse_tag`] found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// `<Foo ...>`
    Opening,
    /// `</Foo>`
    Closing,
    /// `<Foo ... />`
    SelfClosing,
}

/// A parsed tag. All ranges are relative to the slice given to [`parse_tag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagInfo {
    pub kind: TagKind,
    /// Tag name; empty for fragments (`<>`, `</>`).
    pub name: Range,
    /// Attribute names, including a leading `~` or `?` label sigil.
    pub attributes: SmallVec<[Range; 4]>,
    /// `<` or `</`.
    pub open_delim: Range,
    /// `>` or `/>`.
    pub close_delim: Range,
    /// Byte offset after the closing delimiter.
    pub end_offset: usize,
}

impl TagInfo {
    #[inline]
    pub fn role(&self, input: &[u8]) -> TagRole {
        std::str::from_utf8(self.name.slice(input)).map_or(TagRole::Element, TagRole::of)
    }
}

/// Identifier bytes: OCaml allows primes in names.
#[inline]
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'\''
}

/// A tag name must be followed by whitespace, `>`, `/`, or end of input.
#[inline]
pub fn is_name_boundary(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(b) => b.is_ascii_whitespace() || b == b'>' || b == b'/',
    }
}

/// End of the tag name starting at `start`, or `None` if the bytes there are
/// not a valid name.
///
/// A name is a dotted path of capitalized module segments followed by a
/// final identifier of either case: `div`, `View`, `Ui.Card.Header`,
/// `Ui.make`. A lowercase segment cannot be followed by `.`; the name then
/// ends before the dot and fails the caller's boundary check.
pub fn tag_name_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    loop {
        let first = *bytes.get(pos)?;
        if !first.is_ascii_alphabetic() {
            return None;
        }
        pos += 1;
        while bytes.get(pos).is_some_and(|&b| is_ident_byte(b)) {
            pos += 1;
        }
        let continues = first.is_ascii_uppercase()
            && bytes.get(pos) == Some(&b'.')
            && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_alphabetic());
        if !continues {
            return Some(pos);
        }
        pos += 1;
    }
}

/// If an opening tag token (`<name` or the fragment `<>`) starts at `lt`,
/// return its name range.
///
/// A `<` directly after an identifier byte is a comparison (`a<b`), not a tag.
/// `<>` after an operand (`a <> b`, `f x <> (y)`) is OCaml's structural
/// inequality, not a fragment, unless nothing but a line end or another tag
/// follows it.
pub fn opening_tag_at(bytes: &[u8], lt: usize) -> Option<Range> {
    if bytes.get(lt) != Some(&b'<') {
        return None;
    }
    if lt > 0 && is_ident_byte(bytes[lt - 1]) {
        return None;
    }
    let start = lt + 1;
    if bytes.get(start) == Some(&b'>') {
        let fragment = !follows_operand(bytes, lt) || opens_children(bytes, start + 1);
        return fragment.then(|| Range::from_usize(start, start));
    }
    let end = tag_name_end(bytes, start)?;
    is_name_boundary(bytes.get(end).copied()).then(|| Range::from_usize(start, end))
}

/// Whether the last non-whitespace byte before `lt` ends an operand.
/// Looks back at most [`MAX_TAG_LEN`] bytes.
fn follows_operand(bytes: &[u8], lt: usize) -> bool {
    let floor = lt.saturating_sub(MAX_TAG_LEN);
    bytes[floor..lt]
        .iter()
        .rev()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| is_ident_byte(b) || matches!(b, b')' | b']' | b'}' | b'"'))
}

/// Whether `pos` is followed, past spaces and tabs, by a line end, another
/// tag, or the end of input.
fn opens_children(bytes: &[u8], pos: usize) -> bool {
    let mut cur = Cursor::new_at(bytes, pos);
    cur.skip_blanks();
    matches!(cur.peek(), None | Some(b'\n' | b'\r' | b'<'))
}

/// If a closing tag `</name>` (blanks allowed before `>`) starts at `lt`,
/// return its name range and the offset after `>`.
pub fn closing_tag_at(bytes: &[u8], lt: usize) -> Option<(Range, usize)> {
    if bytes.get(lt) != Some(&b'<') || bytes.get(lt + 1) != Some(&b'/') {
        return None;
    }
    let start = lt + 2;
    let end = if bytes.get(start) == Some(&b'>') {
        start
    } else {
        tag_name_end(bytes, start)?
    };
    let mut cur = Cursor::new_at(bytes, end);
    cur.skip_blanks();
    cur.eat(b'>')
        .then(|| (Range::from_usize(start, end), cur.offset()))
}

/// Parse a complete tag at the start of `input`.
///
/// `input` must begin with `<`. Returns `None` for anything that is not a
/// finished tag (`< 5`, `a <b` cut off mid-attributes, unterminated values).
///
/// Handles:
/// - opening, closing and self-closing tags, fragments
/// - member paths: `<Ui.Card>`
/// - attributes: bare (`disabled`), labelled (`~key`, `?optional`),
///   `name="string"`, `name={expr}`, `name=(expr)`, bare values (`n=1`)
/// - spread: `{...props}`
/// - attributes spanning several lines
pub fn parse_tag(input: &[u8]) -> Option<TagInfo> {
    if input.first() != Some(&b'<') {
        return None;
    }

    if let Some((name, end)) = closing_tag_at(input, 0) {
        return Some(TagInfo {
            kind: TagKind::Closing,
            name,
            attributes: SmallVec::new(),
            open_delim: Range::from_usize(0, 2),
            close_delim: Range::from_usize(end - 1, end),
            end_offset: end,
        });
    }

    let name = opening_tag_at(input, 0)?;
    let mut cur = Cursor::new_at(input, name.end_usize());
    let mut attributes: SmallVec<[Range; 4]> = SmallVec::new();

    loop {
        cur.skip_whitespace();
        let start = cur.offset();
        match cur.peek()? {
            b'>' => {
                cur.bump();
                return Some(finish(TagKind::Opening, name, attributes, cur.range_from(start)));
            }
            b'/' => {
                if !cur.eat_bytes(b"/>") {
                    return None;
                }
                return Some(finish(
                    TagKind::SelfClosing,
                    name,
                    attributes,
                    cur.range_from(start),
                ));
            }
            b'{' | b'(' => {
                let end = find_expression_end(cur.remaining_slice())?;
                cur.advance(end);
            }
            b => {
                if attributes.len() >= MAX_TAG_ATTRIBUTES {
                    return None;
                }
                let attr = parse_attribute_name(&mut cur, b)?;
                attributes.push(attr);
                parse_attribute_value(&mut cur)?;
            }
        }
    }
}

fn finish(kind: TagKind, name: Range, attributes: SmallVec<[Range; 4]>, close_delim: Range) -> TagInfo {
    TagInfo {
        kind,
        name,
        attributes,
        open_delim: Range::from_usize(0, 1),
        close_delim,
        end_offset: close_delim.end_usize(),
    }
}

fn parse_attribute_name(cur: &mut Cursor<'_>, first: u8) -> Option<Range> {
    let start = cur.offset();
    if first == b'~' || first == b'?' {
        cur.bump();
    }
    if !cur.peek().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_') {
        return None;
    }
    cur.skip_while(|b| is_ident_byte(b) || b == b'-');
    Some(cur.range_from(start))
}

/// Consume `= value` if present.
fn parse_attribute_value(cur: &mut Cursor<'_>) -> Option<()> {
    let mut ahead = *cur;
    ahead.skip_whitespace();
    if !ahead.eat(b'=') {
        return Some(());
    }
    ahead.skip_whitespace();
    match ahead.peek()? {
        b'"' => {
            ahead.bump();
            if !crate::lexer::skip_string_body(&mut ahead) {
                return None;
            }
        }
        b'{' | b'(' | b'[' => {
            let end = find_expression_end(ahead.remaining_slice())?;
            ahead.advance(end);
        }
        _ => {
            // Bare value (numbers, identifiers, constructors)
            let len = ahead.skip_while(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'/');
            if len == 0 {
                return None;
            }
        }
    }
    *cur = ahead;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of<'a>(input: &'a [u8], info: &TagInfo) -> &'a [u8] {
        info.name.slice(input)
    }

    #[test]
    fn role_of_names() {
        assert_eq!(TagRole::of("Foo"), TagRole::Component);
        assert_eq!(TagRole::of("A.B.C"), TagRole::Component);
        assert_eq!(TagRole::of("Mod.view"), TagRole::Element);
        assert_eq!(TagRole::of("div"), TagRole::Element);
        assert_eq!(TagRole::of(""), TagRole::Element);
    }

    #[test]
    fn name_grammar() {
        assert_eq!(tag_name_end(b"div>", 0), Some(3));
        assert_eq!(tag_name_end(b"Ui.Card x", 0), Some(7));
        assert_eq!(tag_name_end(b"Ui.make/", 0), Some(7));
        assert_eq!(tag_name_end(b"x'y ", 0), Some(3));
        // lowercase segment cannot continue
        assert_eq!(tag_name_end(b"ui.Card", 0), Some(2));
        // trailing dot is not part of the name
        assert_eq!(tag_name_end(b"Ui.>", 0), Some(2));
        assert_eq!(tag_name_end(b"1a", 0), None);
    }

    #[test]
    fn opening_tokens() {
        assert_eq!(opening_tag_at(b"<div>", 0), Some(Range::new(1, 4)));
        assert_eq!(opening_tag_at(b"<>", 0), Some(Range::new(1, 1)));
        assert_eq!(opening_tag_at(b"<divider>", 0), Some(Range::new(1, 8)));
        assert_eq!(opening_tag_at(b"< div", 0), None);
        assert_eq!(opening_tag_at(b"<ui.Card>", 0), None);
        assert_eq!(opening_tag_at(b"a<b", 1), None);
        assert_eq!(opening_tag_at(b"</div>", 0), None);
    }

    #[test]
    fn inequality_operator_is_not_a_fragment() {
        assert_eq!(opening_tag_at(b"a <> b", 2), None);
        assert_eq!(opening_tag_at(b"f (x) <> [y]", 6), None);
        assert_eq!(opening_tag_at(b"s\n  <> t", 4), None);
        assert_eq!(opening_tag_at(b"let v = <>", 8), Some(Range::new(9, 9)));
        assert_eq!(opening_tag_at(b"(<>", 1), Some(Range::new(2, 2)));
        assert_eq!(opening_tag_at(b"{x}\n<>\n", 4), Some(Range::new(5, 5)));
        assert_eq!(opening_tag_at(b"x <><b />", 2), Some(Range::new(3, 3)));
    }

    #[test]
    fn closing_tokens() {
        assert_eq!(closing_tag_at(b"</div>", 0), Some((Range::new(2, 5), 6)));
        assert_eq!(closing_tag_at(b"</div  >", 0), Some((Range::new(2, 5), 8)));
        assert_eq!(closing_tag_at(b"</>", 0), Some((Range::new(2, 2), 3)));
        assert_eq!(closing_tag_at(b"</div", 0), None);
        assert_eq!(closing_tag_at(b"</div x>", 0), None);
    }

    #[test]
    fn simple_open_tag() {
        let input = b"<Foo>";
        let info = parse_tag(input).unwrap();
        assert_eq!(name_of(input, &info), b"Foo");
        assert_eq!(info.kind, TagKind::Opening);
        assert_eq!(info.end_offset, 5);
        assert_eq!(info.close_delim, Range::new(4, 5));
        assert_eq!(info.role(input), TagRole::Component);
    }

    #[test]
    fn simple_close_tag() {
        let input = b"</Foo>";
        let info = parse_tag(input).unwrap();
        assert_eq!(name_of(input, &info), b"Foo");
        assert_eq!(info.kind, TagKind::Closing);
        assert_eq!(info.open_delim, Range::new(0, 2));
        assert_eq!(info.end_offset, 6);
    }

    #[test]
    fn self_closing_tag() {
        let input = b"<Foo />";
        let info = parse_tag(input).unwrap();
        assert_eq!(info.kind, TagKind::SelfClosing);
        assert_eq!(info.close_delim, Range::new(5, 7));
        assert_eq!(info.end_offset, 7);
    }

    #[test]
    fn fragments() {
        let open = parse_tag(b"<>").unwrap();
        assert_eq!(open.kind, TagKind::Opening);
        assert!(open.name.is_empty());
        let close = parse_tag(b"</>").unwrap();
        assert_eq!(close.kind, TagKind::Closing);
        assert_eq!(close.end_offset, 3);
    }

    #[test]
    fn attributes_of_every_shape() {
        let input = b"<Button ~key ?disabled kind=\"x\" onClick=(fun _ -> ()) style={s} n=1 {...rest}>";
        let info = parse_tag(input).unwrap();
        let names: Vec<&[u8]> = info.attributes.iter().map(|r| r.slice(input)).collect();
        let expected: Vec<&[u8]> = vec![b"~key", b"?disabled", b"kind", b"onClick", b"style", b"n"];
        assert_eq!(names, expected);
        assert_eq!(info.kind, TagKind::Opening);
        assert_eq!(info.end_offset, input.len());
    }

    #[test]
    fn multiline_attributes() {
        let input = b"<Foo\n  bar=\"baz\"\n  qux=(1)\n/>";
        let info = parse_tag(input).unwrap();
        assert_eq!(info.kind, TagKind::SelfClosing);
        assert_eq!(info.attributes.len(), 2);
        assert_eq!(info.end_offset, input.len());
    }

    #[test]
    fn list_values_with_spaces() {
        let input = b"<Foo items=[ 1; 2 ] arr=[| a |] />";
        let info = parse_tag(input).unwrap();
        assert_eq!(info.kind, TagKind::SelfClosing);
        let names: Vec<&[u8]> = info.attributes.iter().map(|r| r.slice(input)).collect();
        let expected: Vec<&[u8]> = vec![b"items", b"arr"];
        assert_eq!(names, expected);
        assert_eq!(info.end_offset, input.len());
    }

    #[test]
    fn expression_containing_gt() {
        let input = b"<Foo bar=(a > b)>";
        let info = parse_tag(input).unwrap();
        assert_eq!(info.end_offset, input.len());
    }

    #[test]
    fn invalid_tags() {
        assert!(parse_tag(b"< 5").is_none());
        assert!(parse_tag(b"<").is_none());
        assert!(parse_tag(b"<123>").is_none());
        assert!(parse_tag(b"<Foo bar=\"baz").is_none());
        assert!(parse_tag(b"<Foo\n  bar=1").is_none());
        assert!(parse_tag(b"<Foo / >").is_none());
    }
}
