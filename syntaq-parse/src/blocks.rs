//! Block resolution.
//!
//! Converts the raw line groups collected by the scanner into typed
//! [`Block`]s: inline content is parsed, table rows are split into cells,
//! list items are assembled into a tree and nesting depth is checked.

use crate::error::{Diagnostic, ParseError};
use crate::inline::parse_inline_counted;
use crate::lexer::{Marker, Token, tokenize};
use crate::parse::{ParseOptions, scan_document};
use crate::types::{Align, Block, InlineNode, List, ListItem, ListKind, TableCell, TableRow};

/// A block as grouped by the line scanner, before inline parsing.
pub(crate) enum RawBlock<'a> {
    Heading {
        level: u8,
        text: &'a str,
        line: usize,
    },
    Paragraph {
        lines: Vec<&'a str>,
        line: usize,
    },
    Literal {
        lang: Option<String>,
        content: String,
    },
    Quotation {
        cite: Option<String>,
        body: String,
        line: usize,
    },
    Table {
        rows: Vec<&'a str>,
        line: usize,
    },
    List {
        items: Vec<RawItem<'a>>,
    },
    Rule,
    Blank,
}

/// One list line: its `*`/`#` signature plus the item text.
pub(crate) struct RawItem<'a> {
    signature: &'a str,
    text: &'a str,
    line: usize,
}

impl<'a> RawItem<'a> {
    pub(crate) fn new(stripped: &'a str, line: usize) -> Self {
        let sig_len = stripped
            .find(|c: char| c != '*' && c != '#')
            .unwrap_or(stripped.len());
        Self {
            signature: &stripped[..sig_len],
            text: stripped[sig_len..].trim(),
            line,
        }
    }

    /// Items belong to the same list when their signatures agree on their
    /// common prefix.
    pub(crate) fn compatible(&self, other: &RawItem<'_>) -> bool {
        let common = self.signature.len().min(other.signature.len());
        self.signature.as_bytes()[..common] == other.signature.as_bytes()[..common]
    }

    fn depth(&self) -> usize {
        self.signature.len()
    }

    /// List kind at 0-based nesting `level`.
    fn kind_at(&self, level: usize) -> ListKind {
        ListKind::from_marker(char::from(self.signature.as_bytes()[level]))
    }
}

/// Resolve one raw block. `index` is its position in the enclosing block
/// sequence, `depth` the quotation nesting it sits in.
pub(crate) fn resolve_block(
    raw: RawBlock<'_>,
    index: usize,
    depth: usize,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Block, ParseError> {
    let block = match raw {
        RawBlock::Heading { level, text, line } => Block::Heading {
            level,
            content: inline(text, line, diagnostics),
        },
        RawBlock::Paragraph { lines, line } => Block::Paragraph {
            content: inline(&lines.join("\n"), line, diagnostics),
        },
        RawBlock::Literal { lang, content } => Block::Literal { lang, content },
        RawBlock::Quotation { cite, body, line } => {
            check_depth(index, depth + 1, options)?;
            let blocks = scan_document(&body, depth + 1, line, options, diagnostics).map_err(
                |ParseError::NestingTooDeep { depth, limit, .. }| ParseError::NestingTooDeep {
                    block_index: index,
                    depth,
                    limit,
                },
            )?;
            Block::Quotation { cite, blocks }
        }
        RawBlock::Table { rows, line } => resolve_table(&rows, line, diagnostics),
        RawBlock::List { items } => {
            let deepest = items.iter().map(RawItem::depth).max().unwrap_or(0);
            check_depth(index, depth + deepest, options)?;
            Block::List(build_list(&items, diagnostics))
        }
        RawBlock::Rule => Block::HorizontalRule,
        RawBlock::Blank => Block::BlankSeparator,
    };
    Ok(block)
}

fn check_depth(index: usize, depth: usize, options: &ParseOptions) -> Result<(), ParseError> {
    if depth > options.max_depth {
        return Err(ParseError::NestingTooDeep {
            block_index: index,
            depth,
            limit: options.max_depth,
        });
    }
    Ok(())
}

/// Parse inline text, reporting spans that had to be closed at block end.
fn inline(text: &str, line: usize, diagnostics: &mut Vec<Diagnostic>) -> Vec<InlineNode> {
    let result = parse_inline_counted(text);
    if result.auto_closed > 0 {
        diagnostics.push(Diagnostic::warning(
            "W004",
            format!(
                "{} unclosed inline span(s) closed at end of block",
                result.auto_closed
            ),
            Some(line),
        ));
    }
    result.nodes
}

// -- Tables ------------------------------------------------------

fn resolve_table(rows: &[&str], line: usize, diagnostics: &mut Vec<Diagnostic>) -> Block {
    let split: Vec<Vec<&str>> = rows.iter().map(|row| split_cells(row)).collect();

    if rows.iter().all(|row| row.starts_with("||")) && !split.iter().flatten().any(|c| is_content_cell(c)) {
        return Block::Diagram {
            lines: rows.iter().map(|row| row.to_string()).collect(),
        };
    }

    let rows = split
        .iter()
        .zip(line..)
        .map(|(cells, row_line)| TableRow {
            cells: cells
                .iter()
                .map(|cell| resolve_cell(cell, row_line, diagnostics))
                .collect(),
        })
        .collect();
    Block::Table { rows }
}

/// Split a `|` row into raw cell texts.
///
/// Pipes inside inline literals, links and images do not split, nor does an
/// escaped pipe. A trailing pipe closes the row without adding a cell.
pub(crate) fn split_cells(row: &str) -> Vec<&str> {
    let row = row.trim_end();
    let mut boundaries = Vec::new();
    let mut closer: Option<Marker> = None;

    for spanned in tokenize(row) {
        let Token::Marker(marker) = spanned.token else {
            continue;
        };
        match closer {
            Some(end) if marker == end => closer = None,
            Some(_) => {}
            None => match marker {
                Marker::Pipe => boundaries.push(spanned.start),
                Marker::Literal => closer = Some(Marker::Literal),
                Marker::LinkOpen => closer = Some(Marker::LinkClose),
                Marker::ImageOpen => closer = Some(Marker::ImageClose),
                _ => {}
            },
        }
    }

    let mut cells: Vec<&str> = boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = boundaries.get(i + 1).copied().unwrap_or(row.len());
            &row[start + 1..end]
        })
        .collect();
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Anything other than whitespace and box-drawing separators.
fn is_content_cell(cell: &str) -> bool {
    cell.chars()
        .any(|c| !c.is_whitespace() && !matches!(c, '-' | '+' | '=' | ':' | '|'))
}

fn resolve_cell(raw: &str, line: usize, diagnostics: &mut Vec<Diagnostic>) -> TableCell {
    let trimmed = raw.trim_start();
    let (header, content) = match trimmed.strip_prefix('=') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let align = if content.trim().is_empty() {
        None
    } else {
        let left = content.starts_with(char::is_whitespace);
        let right = content.ends_with(char::is_whitespace);
        match (left, right) {
            (true, true) => Some(Align::Center),
            (false, true) => Some(Align::Left),
            (true, false) => Some(Align::Right),
            (false, false) => None,
        }
    };

    let body = content.trim();
    TableCell {
        header,
        code: !header && body.starts_with('`') && body.ends_with('`'),
        align,
        content: inline(body, line, diagnostics),
    }
}

// -- Lists -------------------------------------------------------

/// Assemble list items into a tree. Each signature character opens one level;
/// a level jump with no parent item gets an empty placeholder item.
fn build_list(items: &[RawItem<'_>], diagnostics: &mut Vec<Diagnostic>) -> List {
    // stack[i] is the open list at nesting level i + 1.
    let mut stack: Vec<List> = Vec::new();

    for item in items {
        let depth = item.depth().max(1);

        while stack.len() > depth {
            close_level(&mut stack);
        }
        if stack.len() == depth && depth > 1 && stack[depth - 1].kind != item.kind_at(depth - 1) {
            close_level(&mut stack);
        }
        while stack.len() < depth {
            let kind = item.kind_at(stack.len());
            stack.push(List {
                kind,
                items: Vec::new(),
            });
        }

        let content = inline(item.text, item.line, diagnostics);
        if let Some(list) = stack.last_mut() {
            list.items.push(ListItem {
                content,
                children: Vec::new(),
            });
        }
    }

    while stack.len() > 1 {
        close_level(&mut stack);
    }
    stack.pop().unwrap_or(List {
        kind: ListKind::Unordered,
        items: Vec::new(),
    })
}

/// Pop the innermost list and attach it to the last item one level up.
fn close_level(stack: &mut Vec<List>) {
    let Some(child) = stack.pop() else {
        return;
    };
    let Some(parent) = stack.last_mut() else {
        stack.push(child);
        return;
    };
    if parent.items.is_empty() {
        parent.items.push(ListItem {
            content: Vec::new(),
            children: Vec::new(),
        });
    }
    if let Some(last) = parent.items.last_mut() {
        last.children.push(child);
    }
}
