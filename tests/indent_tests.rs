use jsx_indent::{
    FixedIndent, Indent, IndentChain, LexicalMap, NoLexicalContext, ScanOptions, TagScanner,
    reindent, reindent_default,
};

// ── Helper ───────────────────────────────────────────────────────────

/// Byte offset of the start of line `n` (0-based).
fn line(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    text.match_indices('\n')
        .nth(n - 1)
        .map(|(i, _)| i + 1)
        .expect("line exists")
}

fn indent(text: &str, n: usize) -> Indent {
    let map = LexicalMap::new(text);
    TagScanner::new(&map).compute_indent(text, line(text, n))
}

// ── Children of an open tag ──────────────────────────────────────────

#[test]
fn empty_line_after_opening_tag() {
    let text = "    <div className=\"x\">\n";
    assert_eq!(indent(text, 1), Indent::Column(6));
}

#[test]
fn child_after_multiline_attributes() {
    let text = "<Button\n  onClick=(fun _ -> ())>\nlabel";
    // The `>` ends a line with no `<` of its own: nothing to align with.
    assert_eq!(indent(text, 2), Indent::Defer);
}

#[test]
fn child_string_is_indented() {
    let text = "<p>\n\"hello\"\n</p>";
    assert_eq!(indent(text, 1), Indent::Column(2));
}

#[test]
fn configured_indent_offset() {
    let text = "<ul>\n<li />";
    let map = LexicalMap::new(text);
    let options = ScanOptions {
        indent_offset: 4,
        ..ScanOptions::default()
    };
    let scanner = TagScanner::with_options(&map, options);
    assert_eq!(scanner.compute_indent(text, 5), Indent::Column(4));
}

// ── Closing tags ─────────────────────────────────────────────────────

#[test]
fn closing_tag_aligns_with_opener_past_self_closing_child() {
    let text = "  <Foo>\n    <Bar />\n</Foo>";
    assert_eq!(indent(text, 2), Indent::Column(2));
}

#[test]
fn nested_same_name_outer_and_inner() {
    let text = "<a>\n  <a>\n  </a>\n</a>";
    assert_eq!(indent(text, 2), Indent::Column(2));
    assert_eq!(indent(text, 3), Indent::Column(0));
}

#[test]
fn nested_same_name_on_one_line() {
    let text = "<a><a></a></a>";
    let scanner = TagScanner::new(&NoLexicalContext);
    assert_eq!(scanner.find_matching_open_tag(text, 6, "a"), Some(3));
    assert_eq!(scanner.find_matching_open_tag(text, 10, "a"), Some(0));
}

#[test]
fn closing_fragment_matches_fragment_opener() {
    let text = "  <>\n    <div />\n</>";
    assert_eq!(indent(text, 2), Indent::Column(2));
}

#[test]
fn inequality_inside_fragment_is_not_an_opener() {
    let text = "<>\n  {if a <> b then x else y}\n</>";
    assert_eq!(indent(text, 2), Indent::Column(0));
}

#[test]
fn closing_tag_past_list_attribute() {
    let text = "<Foo>\n  <Foo items=[ 1; 2 ] />\n</Foo>";
    assert_eq!(indent(text, 2), Indent::Column(0));
}

#[test]
fn closing_module_path_component() {
    let text = "<Ui.Card>\n  <Ui.Card.Body />\n</Ui.Card>";
    assert_eq!(indent(text, 2), Indent::Column(0));
}

#[test]
fn unmatched_closing_tag_defers() {
    assert_eq!(indent("let x = 1\n</div>", 1), Indent::Defer);
}

// ── Self-closing ends ────────────────────────────────────────────────

#[test]
fn self_closing_end_skips_string_lookalike() {
    let text = "<Foo\n  label=\"</div>\"\n/>";
    assert_eq!(indent(text, 2), Indent::Column(0));
}

#[test]
fn self_closing_end_after_string_lookalike_opener() {
    let text = "  <Foo\n    label=\"<div\"\n  />";
    assert_eq!(indent(text, 2), Indent::Column(2));
}

// ── Lexical context ──────────────────────────────────────────────────

#[test]
fn tags_in_comments_do_not_count() {
    let text = "<div>\n  (* <div> *)\n</div>";
    assert_eq!(indent(text, 2), Indent::Column(0));
}

#[test]
fn comparison_is_not_a_tag() {
    let text = "if a<b then\nc";
    assert_eq!(indent(text, 1), Indent::Defer);
}

#[test]
fn custom_oracle_closure() {
    // Treat everything before offset 6 as a comment.
    let oracle = |_: &str, pos: usize| pos < 6;
    let text = "<div>\n<div>\n</div>";
    let scanner = TagScanner::new(&oracle);
    assert_eq!(scanner.compute_indent(text, line(text, 2)), Indent::Column(0));
    assert_eq!(scanner.compute_indent(text, line(text, 1)), Indent::Defer);
}

// ── Plain OCaml ──────────────────────────────────────────────────────

#[test]
fn non_jsx_line_defers() {
    let text = "let x = 1 in\nx + 1";
    assert_eq!(indent(text, 1), Indent::Defer);
}

#[test]
fn arrow_and_comparison_previous_lines_defer() {
    assert_eq!(indent("match x with\n| _ ->\ny", 2), Indent::Defer);
    assert_eq!(indent("a > b\nc", 1), Indent::Defer);
    assert_eq!(indent("<br />\nc", 1), Indent::Defer);
}

#[test]
fn compute_indent_is_repeatable() {
    let text = "<div>\n\n</div>";
    let map = LexicalMap::new(text);
    let scanner = TagScanner::new(&map);
    let first = scanner.compute_indent(text, 6);
    assert_eq!(first, Indent::Column(2));
    assert_eq!(scanner.compute_indent(text, 6), first);
}

// ── Window ───────────────────────────────────────────────────────────

#[test]
fn opener_beyond_window_is_not_found() {
    let filler = "x\n".repeat(6_000);
    let text = format!("<Foo>\n{filler}</Foo>");
    let close = text.len() - "</Foo>".len();
    let map = LexicalMap::new(&text);
    let scanner = TagScanner::new(&map);
    assert_eq!(scanner.find_matching_open_tag(&text, close, "Foo"), None);

    let wide = ScanOptions {
        lookback_window: 20_000,
        ..ScanOptions::default()
    };
    let scanner = TagScanner::with_options(&map, wide);
    assert_eq!(scanner.find_matching_open_tag(&text, close, "Foo"), Some(0));
}

#[test]
fn opener_on_line_longer_than_window_defers() {
    let text = format!("let view = {} <Foo>\n</Foo>", "f ".repeat(2_000));
    let close = text.len() - "</Foo>".len();
    let map = LexicalMap::new(&text);
    let narrow = ScanOptions {
        lookback_window: 1_000,
        ..ScanOptions::default()
    };
    let scanner = TagScanner::with_options(&map, narrow);
    assert_eq!(scanner.compute_indent(&text, close), Indent::Defer);

    let scanner = TagScanner::new(&map);
    assert_eq!(scanner.compute_indent(&text, close), Indent::Column(4_012));
}

// ── Chain and re-indentation ─────────────────────────────────────────

#[test]
fn chain_prefers_scanner_then_fallback() {
    let text = "let v =\n<div>\n</div>";
    let map = LexicalMap::new(text);
    let scanner = TagScanner::new(&map);
    let fallback = FixedIndent(2);
    let chain = IndentChain::new(&fallback).with(&scanner);
    assert_eq!(chain.indent_line(text, 8), 2);
    assert_eq!(chain.indent_line(text, 14), 0);
}

#[test]
fn reindent_component_tree() {
    let text = "\
let view =
  <Layout>
<main>
<p>
\"Welcome\"
</p>
</main>
    <Footer />
</Layout>
";
    let expected = "\
let view =
  <Layout>
    <main>
      <p>
        \"Welcome\"
      </p>
    </main>
    <Footer />
  </Layout>
";
    assert_eq!(reindent_default(text), expected);
    assert_eq!(reindent_default(expected), expected);
}

#[test]
fn sibling_after_self_closing_defers_to_fallback() {
    let text = "<ul>\n  <li />\n<li />\n</ul>";
    assert_eq!(indent(text, 2), Indent::Defer);

    let map = LexicalMap::new(text);
    let scanner = TagScanner::new(&map);
    let fallback = FixedIndent(2);
    let chain = IndentChain::new(&fallback).with(&scanner);
    assert_eq!(chain.indent_line(text, line(text, 2)), 2);
    assert_eq!(chain.indent_line(text, line(text, 3)), 0);
}

#[test]
fn reindent_with_fixed_fallback_and_tabs() {
    let text = "\t<div>\n<span />\n</div>\n";
    let options = ScanOptions {
        tab_width: 4,
        ..ScanOptions::default()
    };
    let out = reindent(text, options, &FixedIndent(4));
    assert_eq!(out, "    <div>\n      <span />\n    </div>\n");
}

#[test]
fn reindent_keeps_comment_bodies() {
    let text = "<div>\n(* a\n      b *)\n</div>\n";
    let out = reindent_default(text);
    assert_eq!(out, "<div>\n  (* a\n      b *)\n</div>\n");
}
