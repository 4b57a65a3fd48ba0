//! `syntaq build`: compile Syntaq sources into standalone HTML pages.
//!
//! Supports two modes:
//! - **Single file**: `notes.syntaq` becomes `<out>/notes.html`.
//! - **Directory**: every source under the directory is rendered to the
//!   mirrored relative path under `<out>`, in parallel.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::config::SyntaqConfig;

/// Settings shared by every page in one build.
pub struct BuildOpts<'a> {
    pub out_dir: &'a Path,
    pub title: Option<&'a str>,
    pub quiet: bool,
    pub config: &'a SyntaqConfig,
}

/// Pages written by one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<PathBuf>,
    pub failed: usize,
}

impl BuildReport {
    pub fn print_summary(&self, out_dir: &Path) {
        if self.failed > 0 {
            println!(
                "{} {} page(s) → {} ({} failed)",
                "Built".yellow().bold(),
                self.built.len(),
                out_dir.display(),
                self.failed
            );
        } else {
            println!(
                "{} {} page(s) → {}",
                "Built".green().bold(),
                self.built.len(),
                out_dir.display()
            );
        }
    }
}

pub fn handle_build(source: &Path, opts: &BuildOpts<'_>) -> Result<BuildReport> {
    let jobs = collect_sources(source, opts)?;
    tracing::debug!(sources = jobs.len(), source = %source.display(), "starting build");

    let results: Vec<Result<PathBuf>> = jobs
        .par_iter()
        .map(|(src, dest)| build_page(src, dest, opts))
        .collect();

    let mut report = BuildReport::default();
    for result in results {
        match result {
            Ok(path) => {
                if !opts.quiet {
                    println!("  {} {}", "page".dimmed(), path.display());
                }
                report.built.push(path);
            }
            Err(e) => {
                eprintln!("{} {:#}", "Build error:".red().bold(), e);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

/// Pair each source file with its output path.
fn collect_sources(source: &Path, opts: &BuildOpts<'_>) -> Result<Vec<(PathBuf, PathBuf)>> {
    if source.is_file() {
        let stem = source
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine file name of '{}'", source.display()))?;
        let dest = opts.out_dir.join(format!("{}.html", stem.to_string_lossy()));
        return Ok(vec![(source.to_path_buf(), dest)]);
    }

    if !source.is_dir() {
        anyhow::bail!("'{}' is neither a file nor a directory", source.display());
    }

    let extension = opts.config.build.extension.as_str();
    let out_dir = opts.out_dir.canonicalize().ok();
    let mut jobs = Vec::new();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", source.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        // Skip anything already inside the output directory
        if let Some(out) = &out_dir {
            if path.canonicalize().is_ok_and(|p| p.starts_with(out)) {
                continue;
            }
        }
        let relative = path.strip_prefix(source).unwrap_or(path);
        jobs.push((path.to_path_buf(), opts.out_dir.join(relative).with_extension("html")));
    }

    Ok(jobs)
}

fn build_page(src: &Path, dest: &Path, opts: &BuildOpts<'_>) -> Result<PathBuf> {
    let content = std::fs::read_to_string(src)
        .with_context(|| format!("Failed to read '{}'", src.display()))?;

    let result = syntaq_parse::parse_with(&content, &opts.config.parse_options())
        .with_context(|| format!("Failed to parse '{}'", src.display()))?;

    if !opts.quiet {
        crate::print_diagnostics(&src.display().to_string(), &result.diagnostics);
    }

    let html = result.doc.to_html_page(&opts.config.page_config(opts.title));

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(dest, &html).with_context(|| format!("Failed to write '{}'", dest.display()))?;

    Ok(dest.to_path_buf())
}

/// Watch the source for changes and rebuild on each save.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Ctrl+C exits cleanly.
pub fn watch_and_rebuild(source: &Path, opts: &BuildOpts<'_>) -> Result<()> {
    let source_path = std::fs::canonicalize(source)
        .with_context(|| format!("Cannot resolve path '{}'", source.display()))?;
    let out_path = opts.out_dir.canonicalize().ok();
    let extension = opts.config.build.extension.clone();

    let (watch_dir, mode) = if source_path.is_dir() {
        (source_path.clone(), RecursiveMode::Recursive)
    } else {
        let parent = source_path.parent().ok_or_else(|| {
            anyhow::anyhow!("Cannot determine parent directory of '{}'", source.display())
        })?;
        (parent.to_path_buf(), RecursiveMode::NonRecursive)
    };

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        source.display()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&watch_dir, mode)?;

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let relevant_kind = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                let affects_sources = event.paths.iter().any(|p| {
                    let in_out_dir = out_path.as_ref().is_some_and(|out| p.starts_with(out));
                    let is_source = if source_path.is_dir() {
                        p.extension().and_then(|e| e.to_str()) == Some(extension.as_str())
                    } else {
                        p.canonicalize().ok().as_ref() == Some(&source_path)
                    };
                    is_source && !in_out_dir
                });

                if relevant_kind && affects_sources && last_rebuild.elapsed() > debounce {
                    // Small delay to let the editor finish writing
                    std::thread::sleep(Duration::from_millis(50));

                    match handle_build(source, opts) {
                        Ok(report) => {
                            if !opts.quiet {
                                report.print_summary(opts.out_dir);
                            }
                            last_rebuild = Instant::now();
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Keep looping
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts<'a>(out_dir: &'a Path, config: &'a SyntaqConfig) -> BuildOpts<'a> {
        BuildOpts {
            out_dir,
            title: None,
            quiet: true,
            config,
        }
    }

    #[test]
    fn single_file_builds_stem_html() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes.syntaq");
        std::fs::write(&src, "= Notes\nbody").unwrap();
        let out = dir.path().join("out");
        let config = SyntaqConfig::default();

        let report = handle_build(&src, &opts(&out, &config)).unwrap();
        assert_eq!(report.built, vec![out.join("notes.html")]);
        assert_eq!(report.failed, 0);
        let html = std::fs::read_to_string(out.join("notes.html")).unwrap();
        assert!(html.contains("<title>Notes</title>"));
    }

    #[test]
    fn directory_build_mirrors_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("docs");
        std::fs::create_dir_all(src.join("guide")).unwrap();
        std::fs::write(src.join("index.syntaq"), "= Home").unwrap();
        std::fs::write(src.join("guide/setup.syntaq"), "= Setup").unwrap();
        std::fs::write(src.join("readme.txt"), "ignored").unwrap();
        let out = dir.path().join("site");
        let config = SyntaqConfig::default();

        let report = handle_build(&src, &opts(&out, &config)).unwrap();
        assert_eq!(report.built.len(), 2);
        assert!(out.join("index.html").exists());
        assert!(out.join("guide/setup.html").exists());
        assert!(!out.join("readme.html").exists());
    }

    #[test]
    fn too_deep_source_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("docs");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("ok.syntaq"), "fine").unwrap();
        std::fs::write(src.join("deep.syntaq"), "### x").unwrap();
        let out = dir.path().join("out");
        let mut config = SyntaqConfig::default();
        config.parse.max_depth = 2;

        let report = handle_build(&src, &opts(&out, &config)).unwrap();
        assert_eq!(report.built, vec![out.join("ok.html")]);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyntaqConfig::default();
        let out = dir.path().join("out");
        assert!(handle_build(&dir.path().join("missing"), &opts(&out, &config)).is_err());
    }
}
