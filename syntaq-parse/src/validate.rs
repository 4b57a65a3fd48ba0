//! Lint checks for parsed Syntaq documents.
//!
//! Checks link and image targets, heading structure and table shape.
//! Returns a list of `Diagnostic` items (non-fatal).

use std::collections::HashSet;

use crate::error::Diagnostic;
use crate::outline::heading_id;
use crate::types::{Block, Document, InlineNode, List, plain_text};

/// Validate a parsed `Document` and return any diagnostics.
///
/// Diagnostics carry no line numbers: the tree does not keep source
/// positions. It never modifies the document.
pub fn validate(doc: &Document) -> Vec<Diagnostic> {
    let mut validator = Validator::default();
    validator.blocks(&doc.blocks);
    validator.heading_levels(doc);
    validator.diagnostics
}

#[derive(Default)]
struct Validator {
    diagnostics: Vec<Diagnostic>,
    seen_ids: HashSet<String>,
}

impl Validator {
    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let text = plain_text(content);
                if text.trim().is_empty() {
                    self.diagnostics.push(Diagnostic::warning(
                        "V002",
                        format!("Level {level} heading has no text"),
                        None,
                    ));
                } else if *level > 1 {
                    let id = heading_id(&text);
                    if !id.is_empty() && !self.seen_ids.insert(id.clone()) {
                        self.diagnostics.push(Diagnostic::warning(
                            "V003",
                            format!("Duplicate heading anchor '#{id}'"),
                            None,
                        ));
                    }
                }
                self.inline(content);
            }
            Block::Paragraph { content } => self.inline(content),
            Block::Table { rows } => {
                let mut widths: Vec<usize> = rows.iter().map(|r| r.cells.len()).collect();
                widths.sort_unstable();
                widths.dedup();
                if widths.len() > 1 {
                    self.diagnostics.push(Diagnostic::info(
                        "V005",
                        format!(
                            "Table rows have different cell counts ({})",
                            widths
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                        None,
                    ));
                }
                for row in rows {
                    for cell in &row.cells {
                        self.inline(&cell.content);
                    }
                }
            }
            Block::List(list) => self.list(list),
            Block::Quotation { blocks, .. } => self.blocks(blocks),
            Block::Literal { .. }
            | Block::Diagram { .. }
            | Block::HorizontalRule
            | Block::BlankSeparator => {}
        }
    }

    fn list(&mut self, list: &List) {
        for item in &list.items {
            self.inline(&item.content);
            for child in &item.children {
                self.list(child);
            }
        }
    }

    fn inline(&mut self, nodes: &[InlineNode]) {
        for node in nodes {
            match node {
                InlineNode::Link { target, label } => {
                    if target.trim().is_empty() {
                        self.diagnostics.push(Diagnostic::warning(
                            "V001",
                            format!("Link '{}' has an empty target", plain_text(label)),
                            None,
                        ));
                    }
                    self.inline(label);
                }
                InlineNode::Image { src, alt } => {
                    if src.trim().is_empty() {
                        self.diagnostics.push(Diagnostic::warning(
                            "V007",
                            "Image has an empty source",
                            None,
                        ));
                    }
                    if alt.is_none() {
                        self.diagnostics.push(Diagnostic::info(
                            "V006",
                            format!("Image '{src}' has no alt text"),
                            None,
                        ));
                    }
                }
                InlineNode::Bold(children)
                | InlineNode::Italic(children)
                | InlineNode::Superscript(children)
                | InlineNode::Subscript(children)
                | InlineNode::Quote(children) => self.inline(children),
                InlineNode::Text(_)
                | InlineNode::InlineLiteral(_)
                | InlineNode::Arrow(_)
                | InlineNode::LineBreak
                | InlineNode::EscapedChar(_) => {}
            }
        }
    }

    /// Top-level headings should descend one level at a time.
    fn heading_levels(&mut self, doc: &Document) {
        let mut previous: Option<u8> = None;
        for block in &doc.blocks {
            if let Block::Heading { level, .. } = block {
                if let Some(prev) = previous {
                    if *level > prev + 1 {
                        self.diagnostics.push(Diagnostic::info(
                            "V004",
                            format!("Heading jumps from level {prev} to level {level}"),
                            None,
                        ));
                    }
                }
                previous = Some(*level);
            }
        }
    }
}
