use crate::blocks::{RawBlock, RawItem, resolve_block};
use crate::error::{Diagnostic, ParseError};
use crate::types::{Block, Document};

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest list or quotation nesting accepted before parsing fails with
    /// [`ParseError::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of parsing a Syntaq document.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed document.
    pub doc: Document,
    /// Non-fatal diagnostics collected during parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a Syntaq string with default options.
///
/// Malformed markup never fails: it degrades to literal text. The only error
/// is a list or quotation nested deeper than [`DEFAULT_MAX_DEPTH`].
pub fn parse(input: &str) -> Result<ParseResult, ParseError> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a Syntaq string.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    // Normalise CRLF → LF.
    let normalised = input.replace("\r\n", "\n");
    let mut diagnostics = Vec::new();

    let blocks = scan_document(&normalised, 0, 0, options, &mut diagnostics)?;

    tracing::debug!(
        blocks = blocks.len(),
        diagnostics = diagnostics.len(),
        "parsed syntaq document"
    );

    Ok(ParseResult {
        doc: Document { blocks },
        diagnostics,
    })
}

/// Scan `text` into blocks. `depth` is the quotation nesting the text sits
/// in, `line_offset` the number of source lines before it.
pub(crate) fn scan_document(
    text: &str,
    depth: usize,
    line_offset: usize,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Block>, ParseError> {
    // ---------------------------------------------------------------
    // Pass 1: line classification into raw block groups.
    // ---------------------------------------------------------------
    let raw_blocks = Scanner::new(line_offset, diagnostics).scan(text);

    // ---------------------------------------------------------------
    // Pass 2: typed blocks with inline content.
    // ---------------------------------------------------------------
    raw_blocks
        .into_iter()
        .enumerate()
        .map(|(index, raw)| resolve_block(raw, index, depth, options, diagnostics))
        .collect()
}

// ------------------------------------------------------------------
// Line scanning
// ------------------------------------------------------------------

/// A fenced region that swallows lines verbatim until its closing fence.
enum Fence {
    Literal {
        lang: Option<String>,
        content: String,
        line: usize,
    },
    Quotation {
        cite: Option<String>,
        body: Vec<String>,
        line: usize,
    },
}

/// A multi-line block still accepting lines.
enum Pending<'a> {
    Paragraph { lines: Vec<&'a str>, line: usize },
    List { items: Vec<RawItem<'a>> },
    Table { rows: Vec<&'a str>, line: usize },
}

struct Scanner<'a, 'd> {
    line_offset: usize,
    blocks: Vec<RawBlock<'a>>,
    pending: Option<Pending<'a>>,
    fence: Option<Fence>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

const LITERAL_FENCE: &str = "```";
const QUOTE_FENCE: &str = "\"\"\"";

impl<'a, 'd> Scanner<'a, 'd> {
    fn new(line_offset: usize, diagnostics: &'d mut Vec<Diagnostic>) -> Self {
        Self {
            line_offset,
            blocks: Vec::new(),
            pending: None,
            fence: None,
            diagnostics,
        }
    }

    fn scan(mut self, text: &'a str) -> Vec<RawBlock<'a>> {
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = self.line_offset + idx + 1;
            if self.fence.is_some() {
                self.fenced_line(raw_line);
            } else {
                self.line(raw_line, line_no);
            }
        }

        if let Some(fence) = self.fence.take() {
            let (code, what, line) = match &fence {
                Fence::Literal { line, .. } => ("W001", "literal block", *line),
                Fence::Quotation { line, .. } => ("W002", "quotation", *line),
            };
            self.diagnostics.push(Diagnostic::warning(
                code,
                format!("Unclosed {what} opened at line {line} runs to end of input"),
                Some(line),
            ));
            self.close_fence(fence);
        }
        self.flush();

        if matches!(self.blocks.last(), Some(RawBlock::Blank)) {
            self.blocks.pop();
        }
        self.blocks
    }

    fn fenced_line(&mut self, raw_line: &str) {
        let closes = match &self.fence {
            Some(Fence::Literal { .. }) => raw_line.starts_with(LITERAL_FENCE),
            Some(Fence::Quotation { .. }) => raw_line.starts_with(QUOTE_FENCE),
            None => false,
        };
        if closes {
            if let Some(fence) = self.fence.take() {
                self.close_fence(fence);
            }
            return;
        }
        match &mut self.fence {
            Some(Fence::Literal { content, .. }) => {
                content.push_str(raw_line);
                content.push('\n');
            }
            Some(Fence::Quotation { body, .. }) => body.push(raw_line.to_string()),
            None => {}
        }
    }

    fn close_fence(&mut self, fence: Fence) {
        let block = match fence {
            Fence::Literal { lang, content, .. } => RawBlock::Literal { lang, content },
            Fence::Quotation { cite, body, line } => RawBlock::Quotation {
                cite,
                body: body.join("\n"),
                line,
            },
        };
        self.blocks.push(block);
    }

    fn line(&mut self, raw_line: &'a str, line_no: usize) {
        let line = raw_line.trim_end();
        let stripped = line.trim_start();

        if line.starts_with('=') {
            let level = line.chars().take_while(|&c| c == '=').count();
            if level <= 6 {
                self.flush();
                let text = line[level..].trim().trim_end_matches('=').trim_end();
                self.blocks.push(RawBlock::Heading {
                    level: level as u8,
                    text,
                    line: line_no,
                });
                return;
            }
            self.diagnostics.push(Diagnostic::warning(
                "W003",
                format!("Heading marker has {level} '=' characters (maximum is 6); kept as text"),
                Some(line_no),
            ));
            self.paragraph_line(line, line_no);
            return;
        }

        if is_rule(line) {
            self.flush();
            self.blocks.push(RawBlock::Rule);
            return;
        }

        let in_list = matches!(self.pending, Some(Pending::List { .. }));
        if is_list_item(stripped, in_list) {
            let item = RawItem::new(stripped, line_no);
            if let Some(Pending::List { items, .. }) = &mut self.pending {
                if items.first().is_some_and(|first| first.compatible(&item)) {
                    items.push(item);
                    return;
                }
            }
            self.flush();
            self.pending = Some(Pending::List { items: vec![item] });
            return;
        }

        if let Some(rest) = line.strip_prefix(LITERAL_FENCE) {
            self.flush();
            let lang = rest
                .trim_start_matches('`')
                .split_whitespace()
                .next()
                .map(str::to_string);
            self.fence = Some(Fence::Literal {
                lang,
                content: String::new(),
                line: line_no,
            });
            return;
        }

        if let Some(rest) = line.strip_prefix(QUOTE_FENCE) {
            self.flush();
            let cite = rest.trim_start_matches('"').trim();
            self.fence = Some(Fence::Quotation {
                cite: (!cite.is_empty()).then(|| cite.to_string()),
                body: Vec::new(),
                line: line_no,
            });
            return;
        }

        if line.starts_with('|') {
            if let Some(Pending::Table { rows, .. }) = &mut self.pending {
                rows.push(line);
                return;
            }
            self.flush();
            self.pending = Some(Pending::Table {
                rows: vec![line],
                line: line_no,
            });
            return;
        }

        if line.is_empty() {
            self.flush();
            if !self.blocks.is_empty() && !matches!(self.blocks.last(), Some(RawBlock::Blank)) {
                self.blocks.push(RawBlock::Blank);
            }
            return;
        }

        self.paragraph_line(line, line_no);
    }

    fn paragraph_line(&mut self, line: &'a str, line_no: usize) {
        if let Some(Pending::Paragraph { lines, .. }) = &mut self.pending {
            lines.push(line);
            return;
        }
        self.flush();
        self.pending = Some(Pending::Paragraph {
            lines: vec![line],
            line: line_no,
        });
    }

    fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let block = match pending {
            Pending::Paragraph { lines, line } => RawBlock::Paragraph { lines, line },
            Pending::List { items } => RawBlock::List { items },
            Pending::Table { rows, line } => RawBlock::Table { rows, line },
        };
        self.blocks.push(block);
    }
}

/// Four or more `-` and nothing else.
fn is_rule(line: &str) -> bool {
    line.len() >= 4 && line.bytes().all(|b| b == b'-')
}

/// A line starting with `*` or `#`. A leading `**` is bold text unless a
/// list is already open.
fn is_list_item(stripped: &str, in_list: bool) -> bool {
    if !in_list && stripped.starts_with("**") {
        return false;
    }
    stripped.starts_with(['*', '#'])
}
