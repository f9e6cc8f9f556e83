//! Fix documents on disk or from a string

use super::CliError;
use crate::fix::{FixConfig, FixReport, Fixer};
use crate::parser::{ParseError, parse_file};
use crate::printer::format_file;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options for a fix run
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    /// Files to fix and directories to search for `*.cue` files
    pub paths: Vec<PathBuf>,
    pub config: FixConfig,
    /// Report what would change without writing anything
    pub dry_run: bool,
}

/// Result of fixing one document
#[derive(Debug, Clone)]
pub struct FixedSource {
    /// Text to write back; the input itself when nothing changed
    pub output: String,
    pub report: FixReport,
    pub changed: bool,
}

/// Parse, fix and print one document.
///
/// A document counts as changed only when a clause was rewritten and the
/// printed text differs from the input, so untouched files are never
/// reformatted.
pub fn fix_source(source: &str, config: &FixConfig) -> Result<FixedSource, ParseError> {
    let mut file = parse_file(source)?;
    let report = Fixer::new(config.clone()).fix_file(&mut file);

    for finding in report.other_roots() {
        match finding.pos {
            Some(pos) => debug!("{pos}: {} is not rooted at {}", finding.path, config.binding),
            None => debug!("{} is not rooted at {}", finding.path, config.binding),
        }
    }

    if report.is_unchanged() {
        return Ok(FixedSource {
            output: source.to_string(),
            report,
            changed: false,
        });
    }

    let output = format_file(&file);
    let changed = output != source;
    Ok(FixedSource {
        output,
        report,
        changed,
    })
}

/// Fix one file in place. Returns whether it changed.
pub fn fix_path(path: &Path, config: &FixConfig, dry_run: bool) -> Result<bool, CliError> {
    let source = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let fixed = fix_source(&source, config).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if fixed.changed && !dry_run {
        fs::write(path, &fixed.output).map_err(|e| CliError::io(path, e))?;
    }
    if fixed.changed {
        info!(
            path = %path.display(),
            rewritten = fixed.report.rewritten(),
            dry_run,
            "fixed"
        );
    }
    Ok(fixed.changed)
}

/// A document that could not be processed
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: CliError,
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct FixSummary {
    /// Files that were (or, in a dry run, would be) rewritten
    pub changed: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl FixSummary {
    pub fn exit_code(&self) -> i32 {
        if self.failures.is_empty() { 0 } else { 1 }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let changed: Vec<String> = self
            .changed
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let failed: Vec<serde_json::Value> = self
            .failures
            .iter()
            .map(|f| {
                json!({
                    "path": f.path.display().to_string(),
                    "error": f.error.to_string(),
                })
            })
            .collect();
        json!({ "changed": changed, "failed": failed })
    }
}

/// Fix every file named by the options.
///
/// One document failing never stops the others; failures are collected in
/// the summary.
pub fn run(options: &FixOptions) -> FixSummary {
    let mut summary = FixSummary::default();

    for root in &options.paths {
        for candidate in collect_files(root) {
            let outcome = candidate
                .and_then(|path| fix_path(&path, &options.config, options.dry_run).map(|c| (path, c)));
            match outcome {
                Ok((path, true)) => summary.changed.push(path),
                Ok((_, false)) => {}
                Err(error) => {
                    warn!("{error}");
                    let path = failure_path(&error, root);
                    summary.failures.push(Failure { path, error });
                }
            }
        }
    }
    summary
}

/// A file argument as is, or every `*.cue` file below a directory argument.
fn collect_files(root: &Path) -> Vec<Result<PathBuf, CliError>> {
    if !root.is_dir() {
        return vec![Ok(root.to_path_buf())];
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let is_cue = entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "cue");
                is_cue.then(|| Ok(entry.into_path()))
            }
            Err(e) => Some(Err(CliError::Walk(e))),
        })
        .collect()
}

fn failure_path(error: &CliError, root: &Path) -> PathBuf {
    match error {
        CliError::Io { path, .. } | CliError::Parse { path, .. } => path.clone(),
        CliError::Walk(e) => e.path().unwrap_or(root).to_path_buf(),
        CliError::NoInput | CliError::Logging(_) => root.to_path_buf(),
    }
}
