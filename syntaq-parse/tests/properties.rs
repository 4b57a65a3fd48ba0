//! Property-based tests using proptest.
//!
//! These tests verify that the parser never panics on arbitrary input, that
//! rendering is deterministic, and that escapes and literals behave the same
//! regardless of surrounding text.

use proptest::prelude::*;
use syntaq_parse::{Block, InlineNode, ParseError, ParseOptions};

/// Strings dense in Syntaq markup characters.
fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("**"),
            Just("//"),
            Just("^^"),
            Just("__"),
            Just("\"\""),
            Just("\"\"\""),
            Just("``"),
            Just("```"),
            Just("[["),
            Just("]]"),
            Just("{{"),
            Just("}}"),
            Just("|"),
            Just("~"),
            Just("\\\\"),
            Just("-->"),
            Just("<--"),
            Just("http://"),
            Just("\n"),
            Just("\n\n"),
            Just("= "),
            Just("* "),
            Just("# "),
            Just("----"),
            Just("word"),
            Just(" "),
        ],
        0..60,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// Any random string fed to the parser should never cause a panic.
    #[test]
    fn any_input_no_panic(input in "\\PC{0,500}") {
        let result = syntaq_parse::parse(&input).unwrap();
        let _ = result.doc.to_html();
        let _ = result.doc.validate();
    }

    /// Markup-heavy input is where delimiter matching gets exercised.
    #[test]
    fn markup_soup_no_panic(input in markup()) {
        let result = syntaq_parse::parse(&input).unwrap();
        let _ = result.doc.to_html();
        let _ = result.doc.outline();
    }

    /// The same input always renders to the same bytes.
    #[test]
    fn rendering_is_deterministic(input in markup()) {
        let first = syntaq_parse::parse(&input).unwrap().doc.to_html();
        let second = syntaq_parse::parse(&input).unwrap().doc.to_html();
        prop_assert_eq!(first, second);
    }

    /// Rendered HTML never carries a raw `<` from the source text.
    #[test]
    fn source_angle_brackets_are_escaped(word in "[a-z]{1,10}") {
        let input = format!("<{word}> and ``<{word}>``");
        let html = syntaq_parse::parse(&input).unwrap().doc.to_html();
        let raw_tag = format!("<{word}>");
        prop_assert!(!html.contains(&raw_tag));
    }

    /// `~` followed by a delimiter never opens a span.
    #[test]
    fn escaped_delimiter_is_literal(
        delim in prop::sample::select(vec!["**", "//", "^^", "__"]),
        body in "[a-z ]{1,20}",
    ) {
        let input = format!("x ~{delim}{body}~{delim}");
        let doc = syntaq_parse::parse(&input).unwrap().doc;
        let content = match &doc.blocks[0] {
            Block::Paragraph { content } => content.clone(),
            other => return Err(TestCaseError::fail(format!("Expected Paragraph, got {other:?}"))),
        };
        prop_assert!(content.iter().all(|n| matches!(n, InlineNode::Text(_) | InlineNode::EscapedChar(_))));
        prop_assert_eq!(syntaq_parse::plain_text(&content), format!("x {delim}{body}{delim}"));
    }

    /// Lists deeper than the limit fail with the offending block index.
    #[test]
    fn deep_lists_report_nesting(limit in 1usize..16, extra in 1usize..8, lead in 0usize..3) {
        let options = ParseOptions { max_depth: limit };
        let depth = limit + extra;
        let mut input = "para\n\n".repeat(lead);
        input.push_str(&format!("{} item", "#".repeat(depth)));
        let err = syntaq_parse::parse_with(&input, &options).unwrap_err();
        prop_assert_eq!(err, ParseError::NestingTooDeep {
            block_index: lead * 2,
            depth,
            limit,
        });
    }
}
