//! Inline parser.
//!
//! Turns a block's text into a tree of [`InlineNode`]s. Toggle delimiters
//! (`**`, `//`, `^^`, `__`, `""`) each own one slot: the first occurrence
//! opens the span, the next one closes it. Closing a span closes every span
//! opened inside it, and anything still open at the end of the text is closed
//! there.

use crate::lexer::{Marker, Spanned, Token, tokenize};
use crate::types::{Arrow, InlineNode};

/// Kinds of span that can be open at once. One slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Bold,
    Italic,
    Superscript,
    Subscript,
    Quote,
    Link,
}

const SLOT_COUNT: usize = 6;

impl SpanKind {
    fn slot(self) -> usize {
        self as usize
    }

    fn toggle(marker: Marker) -> Option<Self> {
        match marker {
            Marker::Bold => Some(SpanKind::Bold),
            Marker::Italic => Some(SpanKind::Italic),
            Marker::Superscript => Some(SpanKind::Superscript),
            Marker::Subscript => Some(SpanKind::Subscript),
            Marker::Quote => Some(SpanKind::Quote),
            _ => None,
        }
    }
}

struct Frame {
    kind: SpanKind,
    /// Link target; empty for every other kind.
    target: String,
    children: Vec<InlineNode>,
}

impl Frame {
    fn into_node(self) -> InlineNode {
        match self.kind {
            SpanKind::Bold => InlineNode::Bold(self.children),
            SpanKind::Italic => InlineNode::Italic(self.children),
            SpanKind::Superscript => InlineNode::Superscript(self.children),
            SpanKind::Subscript => InlineNode::Subscript(self.children),
            SpanKind::Quote => InlineNode::Quote(self.children),
            SpanKind::Link => {
                let label = if self.children.is_empty() {
                    vec![InlineNode::Text(self.target.clone())]
                } else {
                    self.children
                };
                InlineNode::Link {
                    target: self.target,
                    label,
                }
            }
        }
    }
}

/// Result of parsing one block's inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResult {
    pub nodes: Vec<InlineNode>,
    /// Spans and literals that were still open at the end of the text.
    pub auto_closed: usize,
}

/// Parse `text` into inline nodes.
pub fn parse_inline(text: &str) -> Vec<InlineNode> {
    parse_inline_counted(text).nodes
}

/// Parse `text`, also reporting how many spans had to be closed implicitly.
pub fn parse_inline_counted(text: &str) -> InlineResult {
    let mut parser = InlineParser::new(text);
    parser.run();
    parser.finish()
}

struct InlineParser<'a> {
    source: &'a str,
    tokens: Vec<Spanned<'a>>,
    pos: usize,
    root: Vec<InlineNode>,
    stack: Vec<Frame>,
    open: [bool; SLOT_COUNT],
    auto_closed: usize,
}

impl<'a> InlineParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            root: Vec::new(),
            stack: Vec::with_capacity(SLOT_COUNT),
            open: [false; SLOT_COUNT],
            auto_closed: 0,
        }
    }

    fn next(&mut self) -> Option<Spanned<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn run(&mut self) {
        while let Some(spanned) = self.next() {
            match spanned.token {
                Token::Text(text) => self.push_text(text),
                Token::Escaped(seq) => self.push_escaped(seq),
                Token::Marker(marker) => self.marker(marker, spanned),
            }
        }
    }

    fn finish(mut self) -> InlineResult {
        while let Some(frame) = self.stack.pop() {
            self.open[frame.kind.slot()] = false;
            self.auto_closed += 1;
            let node = frame.into_node();
            self.push(node);
        }
        InlineResult {
            nodes: self.root,
            auto_closed: self.auto_closed,
        }
    }

    fn marker(&mut self, marker: Marker, spanned: Spanned<'a>) {
        if let Some(kind) = SpanKind::toggle(marker) {
            if self.open[kind.slot()] {
                self.close_through(kind);
            } else {
                self.open_span(kind, String::new());
            }
            return;
        }

        match marker {
            Marker::Literal => self.literal(spanned.end),
            Marker::LinkOpen => self.link(),
            Marker::LinkClose => {
                if self.open[SpanKind::Link.slot()] {
                    self.close_through(SpanKind::Link);
                } else {
                    self.push_text(marker.as_str());
                }
            }
            Marker::ImageOpen => self.image(),
            Marker::Scheme(scheme) => self.auto_link(scheme),
            Marker::LineBreak => self.push(InlineNode::LineBreak),
            Marker::LeftArrow => self.push(InlineNode::Arrow(Arrow::Left)),
            Marker::RightArrow => self.push(InlineNode::Arrow(Arrow::Right)),
            _ => self.push_text(marker.as_str()),
        }
    }

    fn open_span(&mut self, kind: SpanKind, target: String) {
        self.open[kind.slot()] = true;
        self.stack.push(Frame {
            kind,
            target,
            children: Vec::new(),
        });
    }

    /// Close `kind` and every span opened after it.
    fn close_through(&mut self, kind: SpanKind) {
        while let Some(frame) = self.stack.pop() {
            let done = frame.kind == kind;
            self.open[frame.kind.slot()] = false;
            let node = frame.into_node();
            self.push(node);
            if done {
                break;
            }
        }
    }

    /// Double-backtick span. Only `~``` is an escape inside it.
    fn literal(&mut self, content_start: usize) {
        let close = self.tokens[self.pos..]
            .iter()
            .position(|t| t.token == Token::Marker(Marker::Literal));
        let content_end = match close {
            Some(offset) => {
                let token = self.tokens[self.pos + offset];
                self.pos += offset + 1;
                token.start
            }
            None => {
                self.pos = self.tokens.len();
                self.auto_closed += 1;
                self.source.len()
            }
        };
        let raw = &self.source[content_start..content_end];
        self.push(InlineNode::InlineLiteral(raw.replace("~``", "``")));
    }

    fn link(&mut self) {
        if self.open[SpanKind::Link.slot()] {
            // Links do not nest.
            self.push_text(Marker::LinkOpen.as_str());
            return;
        }
        let (target, stop) = self.collect_until(&[Marker::Pipe, Marker::LinkClose]);
        match stop {
            Some(Marker::Pipe) => self.open_span(SpanKind::Link, target),
            other => {
                if other.is_none() {
                    self.auto_closed += 1;
                }
                self.push(InlineNode::Link {
                    label: vec![InlineNode::Text(target.clone())],
                    target,
                });
            }
        }
    }

    fn image(&mut self) {
        let (src, stop) = self.collect_until(&[Marker::Pipe, Marker::ImageClose]);
        let alt = match stop {
            Some(Marker::Pipe) => {
                let (alt, stop) = self.collect_until(&[Marker::ImageClose]);
                if stop.is_none() {
                    self.auto_closed += 1;
                }
                Some(alt)
            }
            Some(_) => None,
            None => {
                self.auto_closed += 1;
                None
            }
        };
        let alt = alt.filter(|a| !a.is_empty());
        self.push(InlineNode::Image { src, alt });
    }

    /// Consume tokens up to and including the first of `stops`, returning the
    /// un-escaped text before it and the stop that was hit.
    fn collect_until(&mut self, stops: &[Marker]) -> (String, Option<Marker>) {
        let mut out = String::new();
        while let Some(spanned) = self.next() {
            match spanned.token {
                Token::Text(text) | Token::Escaped(text) => out.push_str(text),
                Token::Marker(marker) if stops.contains(&marker) => return (out, Some(marker)),
                Token::Marker(marker) => out.push_str(marker.as_str()),
            }
        }
        (out, None)
    }

    /// A bare scheme marker. The URL body is the start of the following text
    /// run, up to whitespace or a character that cannot end a URL.
    fn auto_link(&mut self, scheme: &'static str) {
        if self.open[SpanKind::Link.slot()] {
            // Already inside a link label.
            self.push_text(scheme);
            return;
        }
        let body_text = match self.tokens.get(self.pos).map(|t| t.token) {
            Some(Token::Text(text)) => text,
            _ => "",
        };
        let body_len = url_body_len(body_text);
        if body_len == 0 {
            self.push_text(scheme);
            return;
        }
        self.pos += 1;
        let url = format!("{scheme}{}", &body_text[..body_len]);
        self.push(InlineNode::Link {
            label: vec![InlineNode::Text(url.clone())],
            target: url,
        });
        self.push_text(&body_text[body_len..]);
    }

    fn push_escaped(&mut self, seq: &str) {
        let mut chars = seq.chars();
        if let Some(first) = chars.next() {
            self.push(InlineNode::EscapedChar(first));
        }
        self.push_text(chars.as_str());
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = self.children();
        if let Some(InlineNode::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(InlineNode::Text(text.to_string()));
        }
    }

    fn push(&mut self, node: InlineNode) {
        match node {
            InlineNode::Text(text) => self.push_text(&text),
            node => self.children().push(node),
        }
    }

    fn children(&mut self) -> &mut Vec<InlineNode> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }
}

/// Length in bytes of the URL body at the start of `text`.
fn url_body_len(text: &str) -> usize {
    let end = text
        .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
        .unwrap_or(text.len());
    let mut body = &text[..end];
    loop {
        let trimmed = body.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);
        match trimmed.strip_suffix(')') {
            Some(rest) if trimmed.matches(')').count() > trimmed.matches('(').count() => {
                body = rest;
            }
            _ => return trimmed.len(),
        }
    }
}
