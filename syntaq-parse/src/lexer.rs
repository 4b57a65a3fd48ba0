//! Inline tokeniser.
//!
//! Splits a block's text into plain runs, escaped sequences and markers.
//! Escapes are resolved here, before the inline parser matches delimiters:
//! a `~` followed by a marker escapes the whole marker, a `~` followed by
//! any other character escapes just that character, and a trailing `~` is
//! plain text.

/// Escape character.
pub const ESCAPE: char = '~';

/// Every inline marker Syntaq recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Bare URL scheme prefix, e.g. `https://`.
    Scheme(&'static str),
    /// `"""`, which is only meaningful as a block fence.
    TripleQuote,
    LeftArrow,
    RightArrow,
    LineBreak,
    ImageOpen,
    ImageClose,
    Literal,
    Quote,
    Bold,
    Italic,
    Superscript,
    Subscript,
    LinkOpen,
    LinkClose,
    Pipe,
}

/// Markers in match priority order. Longer sequences that share a first
/// character with a shorter one must come first.
const MARKERS: &[Marker] = &[
    Marker::Scheme("http://"),
    Marker::Scheme("https://"),
    Marker::Scheme("ftp://"),
    Marker::Scheme("mailto:"),
    Marker::TripleQuote,
    Marker::LeftArrow,
    Marker::RightArrow,
    Marker::LineBreak,
    Marker::ImageOpen,
    Marker::ImageClose,
    Marker::Literal,
    Marker::Quote,
    Marker::Bold,
    Marker::Italic,
    Marker::Superscript,
    Marker::Subscript,
    Marker::LinkOpen,
    Marker::LinkClose,
    Marker::Pipe,
];

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Scheme(scheme) => scheme,
            Marker::TripleQuote => "\"\"\"",
            Marker::LeftArrow => "<--",
            Marker::RightArrow => "-->",
            Marker::LineBreak => "\\\\",
            Marker::ImageOpen => "{{",
            Marker::ImageClose => "}}",
            Marker::Literal => "``",
            Marker::Quote => "\"\"",
            Marker::Bold => "**",
            Marker::Italic => "//",
            Marker::Superscript => "^^",
            Marker::Subscript => "__",
            Marker::LinkOpen => "[[",
            Marker::LinkClose => "]]",
            Marker::Pipe => "|",
        }
    }
}

/// Return the marker starting at byte offset `pos`, if any.
pub fn marker_at(source: &str, pos: usize) -> Option<Marker> {
    let rest = source.get(pos..)?;
    MARKERS.iter().copied().find(|m| rest.starts_with(m.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of text containing no markers.
    Text(&'a str),
    /// The sequence following a `~`, with the tilde removed.
    Escaped(&'a str),
    Marker(Marker),
}

/// A token plus the byte range it covers in the source, escapes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub start: usize,
    pub end: usize,
}

/// Tokenise `source`.
///
/// The returned tokens cover the input exactly: concatenating
/// `&source[t.start..t.end]` for every token reproduces `source`.
pub fn tokenize(source: &str) -> Vec<Spanned<'_>> {
    let mut tokens = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];

        if rest.starts_with(ESCAPE) {
            let after = pos + ESCAPE.len_utf8();
            let escaped_len = match marker_at(source, after) {
                Some(marker) => Some(marker.as_str().len()),
                None => source[after..].chars().next().map(char::len_utf8),
            };
            // A lone trailing tilde stays part of the plain run.
            let Some(escaped_len) = escaped_len else {
                break;
            };
            flush_text(source, plain_start, pos, &mut tokens);
            let end = after + escaped_len;
            tokens.push(Spanned {
                token: Token::Escaped(&source[after..end]),
                start: pos,
                end,
            });
            pos = end;
            plain_start = pos;
            continue;
        }

        if let Some(marker) = marker_at(source, pos) {
            flush_text(source, plain_start, pos, &mut tokens);
            let end = pos + marker.as_str().len();
            tokens.push(Spanned {
                token: Token::Marker(marker),
                start: pos,
                end,
            });
            pos = end;
            plain_start = pos;
            continue;
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    flush_text(source, plain_start, source.len(), &mut tokens);
    tokens
}

fn flush_text<'a>(source: &'a str, start: usize, end: usize, tokens: &mut Vec<Spanned<'a>>) {
    if end > start {
        tokens.push(Spanned {
            token: Token::Text(&source[start..end]),
            start,
            end,
        });
    }
}
