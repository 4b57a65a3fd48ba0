use serde::{Deserialize, Serialize};

/// A parsed Syntaq document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Ordered sequence of blocks in the document body.
    pub blocks: Vec<Block>,
}

/// A block-level unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// `= Title` through `====== Title`.
    Heading { level: u8, content: Vec<InlineNode> },

    /// Consecutive plain lines. Single newlines survive as `\n` in text runs.
    Paragraph { content: Vec<InlineNode> },

    /// A triple-backtick fenced region, stored verbatim.
    Literal {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        content: String,
    },

    /// Consecutive `|` rows.
    Table { rows: Vec<TableRow> },

    /// A fixed-width `||` diagram that failed table-cell validation.
    Diagram { lines: Vec<String> },

    /// A (possibly nested) ordered or unordered list.
    List(List),

    /// A `"""` fenced quotation. Its body is scanned as blocks.
    Quotation {
        #[serde(skip_serializing_if = "Option::is_none")]
        cite: Option<String>,
        blocks: Vec<Block>,
    },

    /// `----` or longer.
    HorizontalRule,

    /// One or more blank lines between two blocks.
    BlankSeparator,
}

/// List flavour, picked per nesting level by the signature character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// `*`
    Unordered,
    /// `#`
    Ordered,
}

impl ListKind {
    pub fn from_marker(marker: char) -> Self {
        if marker == '#' {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Serialized as `list_kind` so it cannot clash with the block tag.
    #[serde(rename = "list_kind")]
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Vec<InlineNode>,
    /// Sub-lists opened while this item was the innermost one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text started with `=`.
    pub header: bool,
    /// Body cell whose text is wrapped in backticks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    pub content: Vec<InlineNode>,
}

/// Cell alignment, inferred from whitespace padding inside the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Direction of a `-->` / `<--` arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Left,
    Right,
}

/// A span-level node inside a block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineNode {
    Text(String),
    Bold(Vec<InlineNode>),
    Italic(Vec<InlineNode>),
    Superscript(Vec<InlineNode>),
    Subscript(Vec<InlineNode>),
    /// `""quoted""`
    Quote(Vec<InlineNode>),
    /// Double-backtick span, never rescanned.
    InlineLiteral(String),
    Link {
        target: String,
        label: Vec<InlineNode>,
    },
    Image {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Arrow(Arrow),
    LineBreak,
    /// A character whose markup meaning was removed with `~`.
    EscapedChar(char),
}

/// Concatenate the visible text of a sequence of inline nodes.
///
/// Markup is dropped, link labels and image alt text are kept.
pub fn plain_text(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    push_plain_text(nodes, &mut out);
    out
}

fn push_plain_text(nodes: &[InlineNode], out: &mut String) {
    for node in nodes {
        match node {
            InlineNode::Text(text) | InlineNode::InlineLiteral(text) => out.push_str(text),
            InlineNode::Bold(children)
            | InlineNode::Italic(children)
            | InlineNode::Superscript(children)
            | InlineNode::Subscript(children)
            | InlineNode::Quote(children) => push_plain_text(children, out),
            InlineNode::Link { label, .. } => push_plain_text(label, out),
            InlineNode::Image { alt, .. } => {
                if let Some(alt) = alt {
                    out.push_str(alt);
                }
            }
            InlineNode::Arrow(Arrow::Left) => out.push('\u{2190}'),
            InlineNode::Arrow(Arrow::Right) => out.push('\u{2192}'),
            InlineNode::LineBreak => out.push(' '),
            InlineNode::EscapedChar(ch) => out.push(*ch),
        }
    }
}
