//! HTML fragment renderer.
//!
//! Walks the document tree and emits semantic HTML. All text, including
//! literal content, is HTML-escaped; nothing else is altered.

use crate::outline::{HeadingIds, title};
use crate::types::{Arrow, Block, Document, InlineNode, List, ListKind, TableRow, plain_text};

/// Options for HTML rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Give `h2`–`h6` an `id` and a trailing `§` self-link.
    pub heading_anchors: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            heading_anchors: true,
        }
    }
}

/// Configuration for full-page HTML rendering.
#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    /// Page title. Falls back to the document title, then "Untitled".
    pub title: Option<String>,
    /// Language code (default: "en").
    pub lang: Option<String>,
    /// Optional stylesheet URL, linked but never embedded.
    pub stylesheet: Option<String>,
    /// Optional meta description.
    pub description: Option<String>,
    pub options: HtmlOptions,
}

/// Render a `Document` as an HTML fragment with default options.
pub fn to_html(doc: &Document) -> String {
    to_html_with(doc, &HtmlOptions::default())
}

/// Render a `Document` as an HTML fragment.
///
/// No `<html>`, `<head>`, or `<body>` wrapper is added. Blocks are separated
/// by newlines; blank separators produce no output.
pub fn to_html_with(doc: &Document, options: &HtmlOptions) -> String {
    let html = render_blocks(&doc.blocks, options, &mut HeadingIds::default());
    tracing::debug!(blocks = doc.blocks.len(), bytes = html.len(), "rendered html fragment");
    html
}

/// Render a `Document` as a complete, minimal HTML page.
pub fn to_html_page(doc: &Document, config: &PageConfig) -> String {
    let body = to_html_with(doc, &config.options);
    let lang = config.lang.as_deref().unwrap_or("en");

    // Resolve title: explicit config > document heading > fallback
    let page_title = config
        .title
        .clone()
        .or_else(|| title(doc))
        .unwrap_or_else(|| "Untitled".to_string());

    let mut meta_extra = String::new();
    if let Some(desc) = &config.description {
        meta_extra.push_str(&format!(
            "\n    <meta name=\"description\" content=\"{}\">",
            escape_html(desc)
        ));
    }
    if let Some(href) = &config.stylesheet {
        meta_extra.push_str(&format!(
            "\n    <link rel=\"stylesheet\" href=\"{}\">",
            escape_html(href)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="generator" content="syntaq-parse {version}">
    <title>{title}</title>{meta_extra}
</head>
<body>
<article>
{body}
</article>
</body>
</html>
"#,
        lang = escape_html(lang),
        version = env!("CARGO_PKG_VERSION"),
        title = escape_html(&page_title),
        meta_extra = meta_extra,
        body = body,
    )
}

/// Escape the five HTML-reserved characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        push_escaped(ch, &mut out);
    }
    out
}

fn push_escaped(ch: char, out: &mut String) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        other => out.push(other),
    }
}

fn render_blocks(blocks: &[Block], options: &HtmlOptions, ids: &mut HeadingIds) -> String {
    blocks
        .iter()
        .filter(|block| !matches!(block, Block::BlankSeparator))
        .map(|block| render_block(block, options, ids))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block, options: &HtmlOptions, ids: &mut HeadingIds) -> String {
    match block {
        Block::Heading { level, content } => {
            let inner = render_inline(content);
            let id = if options.heading_anchors {
                ids.assign(*level, &plain_text(content))
            } else {
                None
            };
            match id {
                Some(id) => {
                    format!("<h{level} id=\"{id}\">{inner}<a href=\"#{id}\">&sect;</a></h{level}>")
                }
                None => format!("<h{level}>{inner}</h{level}>"),
            }
        }

        Block::Paragraph { content } => format!("<p>{}</p>", render_inline(content)),

        Block::Literal { lang, content } => {
            let class = match lang {
                Some(l) => format!(" class=\"language-{}\"", escape_html(l)),
                None => String::new(),
            };
            format!("<pre><code{class}>{}</code></pre>", escape_html(content))
        }

        Block::Table { rows } => {
            let mut html = String::from("<table>");
            for row in rows {
                render_row(row, &mut html);
            }
            html.push_str("</table>");
            html
        }

        Block::Diagram { lines } => {
            let mut html = String::from("<pre class=\"diagram\">");
            for line in lines {
                html.push_str(&escape_html(line));
                html.push('\n');
            }
            html.push_str("</pre>");
            html
        }

        Block::List(list) => {
            let mut html = String::new();
            render_list(list, &mut html);
            html
        }

        Block::Quotation { cite, blocks } => {
            let mut html = String::from("<blockquote>");
            html.push_str(&render_blocks(blocks, options, ids));
            if let Some(cite) = cite {
                html.push_str(&format!("<cite>{}</cite>", escape_html(cite)));
            }
            html.push_str("</blockquote>");
            html
        }

        Block::HorizontalRule => "<hr>".to_string(),

        Block::BlankSeparator => String::new(),
    }
}

fn render_row(row: &TableRow, html: &mut String) {
    html.push_str("<tr>");
    for cell in &row.cells {
        let tag = if cell.header { "th" } else { "td" };
        html.push_str(&format!("<{tag}"));
        if cell.code {
            html.push_str(" class=\"code\"");
        }
        if let Some(align) = cell.align {
            html.push_str(&format!(" style=\"text-align:{}\"", align.as_str()));
        }
        html.push('>');
        html.push_str(&render_inline(&cell.content));
        html.push_str(&format!("</{tag}>"));
    }
    html.push_str("</tr>");
}

fn render_list(list: &List, html: &mut String) {
    let tag = match list.kind {
        ListKind::Unordered => "ul",
        ListKind::Ordered => "ol",
    };
    html.push_str(&format!("<{tag}>"));
    for item in &list.items {
        html.push_str("<li>");
        html.push_str(&render_inline(&item.content));
        for child in &item.children {
            render_list(child, html);
        }
        html.push_str("</li>");
    }
    html.push_str(&format!("</{tag}>"));
}

/// Render a sequence of inline nodes.
pub fn render_inline(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    push_inline(nodes, &mut out);
    out
}

fn push_inline(nodes: &[InlineNode], out: &mut String) {
    for node in nodes {
        match node {
            InlineNode::Text(text) => out.push_str(&escape_html(text)),
            InlineNode::Bold(children) => wrap("strong", children, out),
            InlineNode::Italic(children) => wrap("em", children, out),
            InlineNode::Superscript(children) => wrap("sup", children, out),
            InlineNode::Subscript(children) => wrap("sub", children, out),
            InlineNode::Quote(children) => wrap("q", children, out),
            InlineNode::InlineLiteral(raw) => {
                out.push_str("<code>");
                out.push_str(&escape_html(raw));
                out.push_str("</code>");
            }
            InlineNode::Link { target, label } => {
                out.push_str(&format!("<a href=\"{}\">", escape_html(target)));
                push_inline(label, out);
                out.push_str("</a>");
            }
            InlineNode::Image { src, alt } => match alt {
                Some(alt) => out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    escape_html(src),
                    escape_html(alt)
                )),
                None => out.push_str(&format!("<img src=\"{}\">", escape_html(src))),
            },
            InlineNode::Arrow(Arrow::Left) => out.push_str("&larr;"),
            InlineNode::Arrow(Arrow::Right) => out.push_str("&rarr;"),
            InlineNode::LineBreak => out.push_str("<br>"),
            InlineNode::EscapedChar(ch) => push_escaped(*ch, out),
        }
    }
}

fn wrap(tag: &str, children: &[InlineNode], out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    push_inline(children, out);
    out.push_str(&format!("</{tag}>"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn html(input: &str) -> String {
        crate::parse(input).unwrap().doc.to_html()
    }

    #[test]
    fn bold_scenario() {
        assert_eq!(html("hello, **world**"), "<p>hello, <strong>world</strong></p>");
    }

    #[test]
    fn superscript_scenario() {
        assert_eq!(html("E = mc^^2^^"), "<p>E = mc<sup>2</sup></p>");
    }

    #[test]
    fn heading_scenario() {
        assert_eq!(html("= Main Heading"), "<h1>Main Heading</h1>");
    }

    #[test]
    fn auto_link_scenario() {
        assert_eq!(
            html("http://wikicreole.org/"),
            "<p><a href=\"http://wikicreole.org/\">http://wikicreole.org/</a></p>"
        );
        assert_eq!(html("~http://wikicreole.org/"), "<p>http://wikicreole.org/</p>");
    }

    #[test]
    fn escaped_bold_renders_asterisks() {
        assert_eq!(html("~**not bold"), "<p>**not bold</p>");
        assert_eq!(html("a ~** b ~** c"), "<p>a ** b ** c</p>");
    }

    #[test]
    fn nesting_order_is_preserved() {
        assert_eq!(
            html("//**world**//"),
            "<p><em><strong>world</strong></em></p>"
        );
        assert_eq!(
            html("**//world//**"),
            "<p><strong><em>world</em></strong></p>"
        );
    }

    #[test]
    fn unclosed_bold_stops_at_paragraph_end() {
        assert_eq!(
            html("I'm **foo\n\nbar"),
            "<p>I&apos;m <strong>foo</strong></p>\n<p>bar</p>"
        );
    }

    #[test]
    fn literal_block_is_not_interpreted() {
        assert_eq!(
            html("```\n**not bold** & <tag>\n```"),
            "<pre><code>**not bold** &amp; &lt;tag&gt;\n</code></pre>"
        );
    }

    #[test]
    fn literal_block_language_class() {
        assert_eq!(
            html("```python\nprint(1)\n```"),
            "<pre><code class=\"language-python\">print(1)\n</code></pre>"
        );
    }

    #[test]
    fn entities_are_escaped() {
        assert_eq!(
            html("foo & ' \" < > bar"),
            "<p>foo &amp; &apos; &quot; &lt; &gt; bar</p>"
        );
    }

    #[test]
    fn inline_literal_keeps_markup_characters() {
        assert_eq!(
            html("Here is some code: ``print \"hello\" ** 3``"),
            "<p>Here is some code: <code>print &quot;hello&quot; ** 3</code></p>"
        );
    }

    #[test]
    fn heading_anchor_on_deeper_levels() {
        assert_eq!(
            html("== Foo Bar =="),
            "<h2 id=\"foo-bar\">Foo Bar<a href=\"#foo-bar\">&sect;</a></h2>"
        );
        let doc = crate::parse("== Foo").unwrap().doc;
        let plain = to_html_with(&doc, &HtmlOptions { heading_anchors: false });
        assert_eq!(plain, "<h2>Foo</h2>");
    }

    #[test]
    fn repeated_headings_get_unique_anchors() {
        assert_eq!(
            html("== Setup\n== Setup\n\"\"\"\n== Setup\n\"\"\""),
            "<h2 id=\"setup\">Setup<a href=\"#setup\">&sect;</a></h2>\n\
             <h2 id=\"setup-1\">Setup<a href=\"#setup-1\">&sect;</a></h2>\n\
             <blockquote><h2 id=\"setup-2\">Setup<a href=\"#setup-2\">&sect;</a></h2></blockquote>"
        );
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(html("foo\n----\nbar"), "<p>foo</p>\n<hr>\n<p>bar</p>");
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            html("* foo\n** bar\n* baz"),
            "<ul><li>foo<ul><li>bar</li></ul></li><li>baz</li></ul>"
        );
        assert_eq!(
            html("# one\n# two"),
            "<ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn lists_split_by_blank_line() {
        assert_eq!(
            html("* foo\n* bar\n\n* baz"),
            "<ul><li>foo</li><li>bar</li></ul>\n<ul><li>baz</li></ul>"
        );
    }

    #[test]
    fn table_rendering() {
        assert_eq!(
            html("|=foo|= bar |\n|[[foo|bar]]|``a|b``|"),
            "<table><tr><th>foo</th><th style=\"text-align:center\">bar</th></tr>\
             <tr><td><a href=\"foo\">bar</a></td><td class=\"code\"><code>a|b</code></td></tr></table>"
        );
    }

    #[test]
    fn code_cell_class_precedes_alignment() {
        assert_eq!(
            html("| ``x`` |plain|"),
            "<table><tr><td class=\"code\" style=\"text-align:center\"><code>x</code></td><td>plain</td></tr></table>"
        );
    }

    #[test]
    fn diagram_rendering() {
        assert_eq!(
            html("||+--+\n||----"),
            "<pre class=\"diagram\">||+--+\n||----\n</pre>"
        );
    }

    #[test]
    fn quotation_rendering() {
        assert_eq!(
            html("\"\"\" Creole 1.0\nTo be //or// not\n\"\"\""),
            "<blockquote><p>To be <em>or</em> not</p><cite>Creole 1.0</cite></blockquote>"
        );
    }

    #[test]
    fn images_breaks_arrows_and_quotes() {
        assert_eq!(
            html("{{a.png|A & B}} {{b.png}}\\\\x --> y <-- \"\"q\"\""),
            "<p><img src=\"a.png\" alt=\"A &amp; B\"> <img src=\"b.png\"><br>x &rarr; y &larr; <q>q</q></p>"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = crate::parse("= T\n* a\n** b\n|x|y|\n**bold //it").unwrap().doc;
        assert_eq!(to_html(&doc), to_html(&doc));
    }

    #[test]
    fn page_uses_document_title() {
        let doc = crate::parse("== Sub\n= The <Title>").unwrap().doc;
        let page = to_html_page(
            &doc,
            &PageConfig {
                stylesheet: Some("/style.css".into()),
                ..Default::default()
            },
        );
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<html lang=\"en\">"));
        assert!(page.contains("<title>The &lt;Title&gt;</title>"));
        assert!(page.contains("<link rel=\"stylesheet\" href=\"/style.css\">"));
        assert!(page.contains("<h1>The &lt;Title&gt;</h1>"));
    }

    #[test]
    fn page_title_override_and_fallback() {
        let doc = crate::parse("no headings").unwrap().doc;
        let page = to_html_page(&doc, &PageConfig::default());
        assert!(page.contains("<title>Untitled</title>"));
        let page = to_html_page(
            &doc,
            &PageConfig {
                title: Some("Given".into()),
                lang: Some("fr".into()),
                ..Default::default()
            },
        );
        assert!(page.contains("<title>Given</title>"));
        assert!(page.contains("<html lang=\"fr\">"));
    }
}
