//! Heading outline and anchor ids.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Block, Document, InlineNode, plain_text};

/// One heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
    /// Anchor id, as emitted on `h2` and deeper headings.
    pub id: String,
}

/// Anchor id for a heading: ASCII alphanumerics kept, everything else folded
/// into single `-` separators, lowercased.
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            id.push(ch.to_ascii_lowercase());
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    while id.ends_with('-') {
        id.pop();
    }
    id
}

/// Hands out unique anchor ids for `h2` and deeper headings. A repeated
/// slug gets a `-1`, `-2`, ... suffix in document order.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Anchor id for a heading, or `None` when it carries no anchor.
    pub(crate) fn assign(&mut self, level: u8, text: &str) -> Option<String> {
        let base = heading_id(text);
        if level < 2 || base.is_empty() {
            return None;
        }
        let count = self.counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        Some(id)
    }
}

/// Every top-level heading in document order. Ids match the anchors the
/// HTML renderer emits, including numbering shared with quoted headings.
pub fn outline(doc: &Document) -> Vec<OutlineEntry> {
    let mut ids = HeadingIds::default();
    let mut entries = Vec::new();
    for block in &doc.blocks {
        match block {
            Block::Heading { level, content } => {
                let text = plain_text(content);
                let id = ids
                    .assign(*level, &text)
                    .unwrap_or_else(|| heading_id(&text));
                entries.push(OutlineEntry {
                    level: *level,
                    text,
                    id,
                });
            }
            Block::Quotation { blocks, .. } => skip_quoted(blocks, &mut ids),
            _ => {}
        }
    }
    entries
}

fn skip_quoted(blocks: &[Block], ids: &mut HeadingIds) {
    for block in blocks {
        match block {
            Block::Heading { level, content } => {
                ids.assign(*level, &plain_text(content));
            }
            Block::Quotation { blocks, .. } => skip_quoted(blocks, ids),
            _ => {}
        }
    }
}

/// Plain text of the first heading with the smallest level.
pub fn title(doc: &Document) -> Option<String> {
    let mut best: Option<(u8, &[InlineNode])> = None;
    for block in &doc.blocks {
        if let Block::Heading { level, content } = block {
            if best.is_none_or(|(best_level, _)| *level < best_level) {
                best = Some((*level, content.as_slice()));
            }
        }
    }
    best.map(|(_, content)| plain_text(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(input: &str) -> Document {
        crate::parse(input).unwrap().doc
    }

    #[test]
    fn heading_id_slugs() {
        assert_eq!(heading_id("Main Heading"), "main-heading");
        assert_eq!(heading_id("  E = mc^2!  "), "e-mc-2");
        assert_eq!(heading_id("Tables & Lists -- part 2"), "tables-lists-part-2");
        assert_eq!(heading_id("***"), "");
    }

    #[test]
    fn outline_lists_headings_in_order() {
        let entries = outline(&doc("= Top\ntext\n== **Bold** part\n=== Deep"));
        assert_eq!(
            entries,
            vec![
                OutlineEntry {
                    level: 1,
                    text: "Top".into(),
                    id: "top".into(),
                },
                OutlineEntry {
                    level: 2,
                    text: "Bold part".into(),
                    id: "bold-part".into(),
                },
                OutlineEntry {
                    level: 3,
                    text: "Deep".into(),
                    id: "deep".into(),
                },
            ]
        );
    }

    #[test]
    fn repeated_headings_get_numbered_ids() {
        let ids: Vec<String> = outline(&doc("== Notes\n== Notes\n\"\"\"\n== Notes\n\"\"\"\n== Notes"))
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["notes", "notes-1", "notes-3"]);
    }

    #[test]
    fn title_prefers_shallowest_heading() {
        assert_eq!(title(&doc("== Second\n= First\n= Later")), Some("First".into()));
        assert_eq!(title(&doc("=== Only")), Some("Only".into()));
        assert_eq!(title(&doc("no headings")), None);
    }
}
