//! WASM bindings for `syntaq-parse`.
//!
//! Exposes the Syntaq parser to JavaScript via wasm-bindgen.
//! Call `parse()` with a string to get a JSON AST, or use
//! `render_html()` / `render_html_page()` for rendered output.

use wasm_bindgen::prelude::*;

/// Parse a Syntaq string and return the document as a JSON AST.
///
/// Returns a JSON object with `{ doc, diagnostics }`, or `{ error }` when
/// the input nests deeper than the parser allows.
#[wasm_bindgen]
pub fn parse(input: &str) -> String {
    match syntaq_parse::parse(input) {
        Ok(result) => serde_json::json!({
            "doc": result.doc,
            "diagnostics": result.diagnostics,
        }),
        Err(err) => serde_json::json!({ "error": err.to_string() }),
    }
    .to_string()
}

/// Parse a Syntaq string and return an HTML fragment.
///
/// Input that cannot be parsed renders as an escaped `<pre>` of the source.
#[wasm_bindgen]
pub fn render_html(input: &str) -> String {
    match syntaq_parse::parse(input) {
        Ok(result) => result.doc.to_html(),
        Err(_) => fallback(input),
    }
}

/// Parse a Syntaq string and return a complete HTML page.
///
/// The page title defaults to the document's most prominent heading.
#[wasm_bindgen]
pub fn render_html_page(input: &str, title: Option<String>) -> String {
    let config = syntaq_parse::PageConfig {
        title,
        ..Default::default()
    };
    match syntaq_parse::parse(input) {
        Ok(result) => result.doc.to_html_page(&config),
        Err(_) => fallback(input),
    }
}

/// Validate a Syntaq string and return diagnostics as JSON.
///
/// Returns a JSON array of `{ severity, message, line, code }` objects.
/// An empty array means the document is clean.
#[wasm_bindgen]
pub fn validate(input: &str) -> String {
    let all = match syntaq_parse::parse(input) {
        Ok(result) => {
            let mut all = result.diagnostics;
            all.extend(result.doc.validate());
            all
        }
        Err(err) => vec![syntaq_parse::Diagnostic::from(&err)],
    };
    serde_json::to_string(&all).unwrap_or_else(|_| "[]".to_string())
}

fn fallback(input: &str) -> String {
    format!("<pre>{}</pre>", syntaq_parse::render_html::escape_html(input))
}
