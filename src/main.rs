use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use syntaq_parse::{Diagnostic, Severity};

mod build;
mod config;

#[derive(Parser)]
#[command(name = "syntaq", version, about = "Render and check Syntaq markup")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (otherwise RUST_LOG is honoured)
    #[arg(long, global = true)]
    verbose: bool,

    /// Path to a syntaq.json config (default: ./syntaq.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    /// HTML fragment
    Html,
    /// Standalone HTML page
    Page,
    Terminal,
    /// Parsed document tree
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Syntaq file to stdout
    Render {
        /// Path to the .syntaq file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: RenderFormat,
    },

    /// Parse and lint Syntaq file(s)
    Check {
        /// Path to the .syntaq file(s)
        #[arg(required = true)]
        files: Vec<String>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Build a file or directory of Syntaq sources into HTML pages
    Build {
        /// Source file or directory
        path: String,

        /// Output directory (default: build.outDir from config)
        #[arg(long)]
        out: Option<String>,

        /// Page title (default: the document's top heading)
        #[arg(long)]
        title: Option<String>,

        /// Rebuild on every change
        #[arg(long)]
        watch: bool,
    },

    /// Print the heading outline of a Syntaq file
    Outline {
        /// Path to the .syntaq file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(Path::new("."), cli.config.as_deref())?;

    match cli.command {
        Commands::Render { file, format } => {
            handle_render(&file, format, &config)?;
        }
        Commands::Check { files, strict } => {
            if !handle_check(&files, strict, cli.quiet, &config)? {
                std::process::exit(1);
            }
        }
        Commands::Build {
            path,
            out,
            title,
            watch,
        } => {
            let out_dir = PathBuf::from(out.unwrap_or_else(|| config.build.out_dir.clone()));
            let opts = build::BuildOpts {
                out_dir: &out_dir,
                title: title.as_deref(),
                quiet: cli.quiet,
                config: &config,
            };
            let source = Path::new(&path);
            let report = build::handle_build(source, &opts)?;
            if !cli.quiet {
                report.print_summary(&out_dir);
            }
            if watch {
                build::watch_and_rebuild(source, &opts)?;
            } else if report.failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Outline { file } => {
            handle_outline(&file, &config)?;
        }
    }

    Ok(())
}

fn read_and_parse(file: &str, config: &config::SyntaqConfig) -> Result<syntaq_parse::ParseResult> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read '{file}'"))?;
    let result = syntaq_parse::parse_with(&content, &config.parse_options())
        .with_context(|| format!("Failed to parse '{file}'"))?;
    Ok(result)
}

fn handle_render(file: &str, format: RenderFormat, config: &config::SyntaqConfig) -> Result<()> {
    let result = read_and_parse(file, config)?;

    // Print parse diagnostics to stderr
    print_diagnostics(file, &result.diagnostics);

    let output = match format {
        RenderFormat::Html => result.doc.to_html_with(&config.html_options()),
        RenderFormat::Page => result.doc.to_html_page(&config.page_config(None)),
        RenderFormat::Terminal => result.doc.to_terminal(),
        RenderFormat::Json => result.doc.to_json()?,
    };

    println!("{output}");
    Ok(())
}

/// Returns `false` when any file has errors.
fn handle_check(
    files: &[String],
    strict: bool,
    quiet: bool,
    config: &config::SyntaqConfig,
) -> Result<bool> {
    let mut has_errors = false;

    for file in files {
        let content =
            std::fs::read_to_string(file).with_context(|| format!("Failed to read '{file}'"))?;

        // Nesting errors are reported like any other diagnostic
        let all_diagnostics = match syntaq_parse::parse_with(&content, &config.parse_options()) {
            Ok(result) => {
                let mut all = result.diagnostics;
                all.extend(result.doc.validate());
                all
            }
            Err(err) => vec![Diagnostic::from(&err)],
        };

        if all_diagnostics.is_empty() {
            if !quiet {
                println!("{}: {}", file, "OK".green());
            }
            continue;
        }

        for diag in &all_diagnostics {
            match diag.severity {
                Severity::Error => has_errors = true,
                Severity::Warning if strict => has_errors = true,
                _ => {}
            }
            println!("{}", format_diagnostic(file, diag));
        }
    }

    Ok(!has_errors)
}

fn handle_outline(file: &str, config: &config::SyntaqConfig) -> Result<()> {
    let result = read_and_parse(file, config)?;
    for entry in result.doc.outline() {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        if entry.id.is_empty() {
            println!("{indent}{}", entry.text);
        } else {
            println!("{indent}{} {}", entry.text, format!("#{}", entry.id).dimmed());
        }
    }
    Ok(())
}

/// `file:line: severity: [code] message`
pub(crate) fn format_diagnostic(file: &str, diag: &Diagnostic) -> String {
    let severity_str = match diag.severity {
        Severity::Error => format!("{}", "error".red().bold()),
        Severity::Warning => format!("{}", "warning".yellow().bold()),
        Severity::Info => format!("{}", "info".cyan().bold()),
    };

    let line_info = match diag.line {
        Some(line) => format!("{file}:{line}"),
        None => file.to_string(),
    };

    let code_str = match &diag.code {
        Some(c) => format!("[{c}] "),
        None => String::new(),
    };

    format!("{line_info}: {severity_str}: {code_str}{}", diag.message)
}

/// Print diagnostics to stderr.
pub(crate) fn print_diagnostics(file: &str, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}", format_diagnostic(file, diag));
    }
}
