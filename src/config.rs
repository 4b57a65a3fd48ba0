use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "syntaq.json";

/// Top-level syntaq.json schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaqConfig {
    #[serde(default)]
    pub parse: ParseSection,

    #[serde(default)]
    pub html: HtmlSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// Parser settings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSection {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    syntaq_parse::DEFAULT_MAX_DEPTH
}

/// HTML output settings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlSection {
    #[serde(default = "default_true")]
    pub heading_anchors: bool,

    #[serde(default)]
    pub lang: Option<String>,

    #[serde(default)]
    pub stylesheet: Option<String>,
}

impl Default for HtmlSection {
    fn default() -> Self {
        Self {
            heading_anchors: true,
            lang: None,
            stylesheet: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `syntaq build` settings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSection {
    /// Source file extension picked up when building a directory.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_extension() -> String {
    "syntaq".to_string()
}
fn default_out_dir() -> String {
    "build".to_string()
}

impl SyntaqConfig {
    pub fn parse_options(&self) -> syntaq_parse::ParseOptions {
        syntaq_parse::ParseOptions {
            max_depth: self.parse.max_depth,
        }
    }

    pub fn html_options(&self) -> syntaq_parse::HtmlOptions {
        syntaq_parse::HtmlOptions {
            heading_anchors: self.html.heading_anchors,
        }
    }

    /// Page settings; `title` overrides the document's own title.
    pub fn page_config(&self, title: Option<&str>) -> syntaq_parse::PageConfig {
        syntaq_parse::PageConfig {
            title: title.map(str::to_string),
            lang: self.html.lang.clone(),
            stylesheet: self.html.stylesheet.clone(),
            description: None,
            options: self.html_options(),
        }
    }
}

/// Load config from an explicit file, or from `syntaq.json` in `root`.
///
/// An explicit path must exist; a missing `syntaq.json` yields defaults.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<SyntaqConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(CONFIG_FILE);
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(SyntaqConfig::default());
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: SyntaqConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}
