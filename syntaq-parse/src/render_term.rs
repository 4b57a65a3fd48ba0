//! ANSI terminal renderer.
//!
//! Produces colored terminal output using the `colored` crate. Each block type
//! gets a distinctive visual treatment suitable for CLI display.

use colored::Colorize;

use crate::types::{Arrow, Block, Document, InlineNode, List, ListKind, TableRow, plain_text};

/// Render a `Document` as ANSI-colored terminal text.
pub fn to_terminal(doc: &Document) -> String {
    render_blocks(&doc.blocks)
}

fn render_blocks(blocks: &[Block]) -> String {
    let parts: Vec<String> = blocks
        .iter()
        .filter(|block| !matches!(block, Block::BlankSeparator))
        .map(render_block)
        .collect();
    parts.join("\n\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => {
            let marker = format!("{}", "=".repeat(*level as usize).dimmed());
            let text = render_inline(content);
            let text = if *level == 1 {
                format!("{}", text.bold().underline())
            } else {
                format!("{}", text.bold())
            };
            format!("{marker} {text}")
        }

        Block::Paragraph { content } => render_inline(content),

        Block::Literal { lang, content } => {
            let lang_label = match lang {
                Some(l) => format!(" {}", l.dimmed()),
                None => String::new(),
            };
            let border = format!("{}", "\u{2500}\u{2500}\u{2500}".dimmed()); // ───
            let mut lines = vec![format!("{border}{lang_label}")];
            for line in content.lines() {
                lines.push(format!("  {line}"));
            }
            lines.push(border.clone());
            lines.join("\n")
        }

        Block::Table { rows } => render_table(rows),

        Block::Diagram { lines } => lines
            .iter()
            .map(|line| format!("{}", line.dimmed()))
            .collect::<Vec<_>>()
            .join("\n"),

        Block::List(list) => {
            let mut lines = Vec::new();
            render_list(list, 0, &mut lines);
            lines.join("\n")
        }

        Block::Quotation { cite, blocks } => {
            let border = format!("{}", "\u{2502}".blue()); // │
            let inner = render_blocks(blocks);
            let mut lines: Vec<String> = inner
                .lines()
                .map(|line| format!("{border} {line}"))
                .collect();
            if let Some(cite) = cite {
                lines.push(format!("{border} {}", format!("-- {cite}").dimmed()));
            }
            lines.join("\n")
        }

        Block::HorizontalRule => format!("{}", "\u{2500}".repeat(40).dimmed()),

        Block::BlankSeparator => String::new(),
    }
}

fn render_table(rows: &[TableRow]) -> String {
    // Column widths from the unstyled cell text
    let plain: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.cells.iter().map(|c| plain_text(&c.content)).collect())
        .collect();
    let columns = plain.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }
    let mut widths = vec![0usize; columns];
    for row in &plain {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let separator: String = widths
        .iter()
        .map(|&w| "\u{2500}".repeat(w + 2)) // ─
        .collect::<Vec<_>>()
        .join("\u{253C}"); // ┼

    let mut lines = Vec::new();
    for (row, texts) in rows.iter().zip(&plain) {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let text = texts.get(i).map(String::as_str).unwrap_or("");
                let padded = format!(" {:width$} ", text, width = w);
                match row.cells.get(i) {
                    Some(cell) if cell.header => format!("{}", padded.bold()),
                    _ => padded,
                }
            })
            .collect();
        lines.push(format!("\u{2502}{}\u{2502}", cells.join("\u{2502}")));

        // Rule under a header row
        if row.cells.iter().all(|c| c.header) && !row.cells.is_empty() {
            lines.push(format!("\u{2502}{separator}\u{2502}"));
        }
    }
    lines.join("\n")
}

fn render_list(list: &List, indent: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    for (i, item) in list.items.iter().enumerate() {
        let bullet = match list.kind {
            ListKind::Unordered => format!("{}", "\u{2022}".cyan()), // •
            ListKind::Ordered => format!("{}", format!("{}.", i + 1).cyan()),
        };
        lines.push(format!("{pad}{bullet} {}", render_inline(&item.content)));
        for child in &item.children {
            render_list(child, indent + 1, lines);
        }
    }
}

fn render_inline(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            InlineNode::Text(text) => out.push_str(text),
            InlineNode::Bold(children) => out.push_str(&format!("{}", render_inline(children).bold())),
            InlineNode::Italic(children) => {
                out.push_str(&format!("{}", render_inline(children).italic()))
            }
            InlineNode::Superscript(children) => {
                out.push('^');
                out.push_str(&render_inline(children));
            }
            InlineNode::Subscript(children) => {
                out.push('_');
                out.push_str(&render_inline(children));
            }
            InlineNode::Quote(children) => {
                out.push('\u{201C}');
                out.push_str(&render_inline(children));
                out.push('\u{201D}');
            }
            InlineNode::InlineLiteral(raw) => out.push_str(&format!("{}", raw.yellow())),
            InlineNode::Link { target, label } => {
                let label_text = render_inline(label);
                out.push_str(&format!("{}", label_text.blue().underline()));
                if plain_text(label) != *target {
                    out.push_str(&format!(" {}", format!("({target})").dimmed()));
                }
            }
            InlineNode::Image { src, alt } => {
                let text = match alt {
                    Some(alt) => format!("[image: {alt}]"),
                    None => format!("[image: {src}]"),
                };
                out.push_str(&format!("{}", text.dimmed()));
            }
            InlineNode::Arrow(Arrow::Right) => out.push('\u{2192}'), // →
            InlineNode::Arrow(Arrow::Left) => out.push('\u{2190}'),  // ←
            InlineNode::LineBreak => out.push('\n'),
            InlineNode::EscapedChar(ch) => out.push(*ch),
        }
    }
    out
}
