//! `syntaq-parse`: parser and renderer for the Syntaq markup language.
//!
//! Syntaq is a lightweight wiki-style markup: `=` headings, `**bold**`,
//! `//italic//`, `[[links]]`, `{{images}}`, `|` tables, fenced literal and
//! quotation blocks, and `~` escapes. This crate turns source text into a
//! structured `Document` tree and renders it as HTML or terminal text.
//!
//! # Quick start
//!
//! ```
//! let result = syntaq_parse::parse("= Hello\n\nhello, **world**").unwrap();
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(
//!     result.doc.to_html(),
//!     "<h1>Hello</h1>\n<p>hello, <strong>world</strong></p>"
//! );
//! ```

mod blocks;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod outline;
pub mod parse;
pub mod render_html;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod types;
pub mod validate;

pub use error::*;
pub use outline::OutlineEntry;
pub use parse::{DEFAULT_MAX_DEPTH, ParseOptions, ParseResult, parse, parse_with};
pub use types::*;

pub use render_html::{HtmlOptions, PageConfig};

impl Document {
    /// Render this document as an HTML fragment.
    pub fn to_html(&self) -> String {
        render_html::to_html(self)
    }

    /// Render this document as an HTML fragment with explicit options.
    pub fn to_html_with(&self, options: &HtmlOptions) -> String {
        render_html::to_html_with(self, options)
    }

    /// Render this document as a complete HTML page.
    pub fn to_html_page(&self, config: &PageConfig) -> String {
        render_html::to_html_page(self, config)
    }

    /// Render this document as ANSI-colored terminal text.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self) -> String {
        render_term::to_terminal(self)
    }

    /// Serialize the document tree as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Validate this document and return any diagnostics.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(self)
    }

    /// Every heading in document order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        outline::outline(self)
    }

    /// Plain text of the most prominent heading.
    pub fn title(&self) -> Option<String> {
        outline::title(self)
    }
}
