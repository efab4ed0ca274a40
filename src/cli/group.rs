//! Group command implementation

use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use crate::config::SpritegroupConfig;
use crate::job::{JobError, PageRecorder, PageSpec};
use crate::policy::{GroupingSummary, PackerPolicy, PolicyError};
use crate::resolver::{BuildTarget, ManifestError, ManifestResolver};

use super::{collect_import_manifests, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Output format of the group command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("--format must be 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Result of grouping one batch of importer manifests.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub policy_version: u32,
    pub target: BuildTarget,
    pub summary: GroupingSummary,
    pub pages: Vec<PageSpec>,
}

type BatchError = PolicyError<ManifestError, JobError>;

/// Run the policy over one batch and record the pages it declares.
pub fn group_batch(
    policy: &PackerPolicy,
    target: &BuildTarget,
    manifests: &[PathBuf],
) -> Result<BatchReport, BatchError> {
    let mut recorder = PageRecorder::new();
    let resolver = ManifestResolver::new();
    let summary = policy.group_atlases(target, &mut recorder, &resolver, manifests)?;
    Ok(BatchReport {
        policy_version: policy.version(),
        target: target.clone(),
        summary,
        pages: recorder.into_pages(),
    })
}

/// Render a report as human-readable text.
pub fn format_report_text(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Target: {} (policy v{})", report.target, report.policy_version);
    for page in &report.pages {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}  [{} sprite(s)]", page.name, page.sprites.len());
        let _ = writeln!(out, "  {}", page.settings);
        for assignment in &page.sprites {
            let _ = writeln!(out, "  - {} ({})", assignment.sprite, assignment.mode);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.summary);
    out
}

fn render(reports: &[BatchReport], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => match reports {
            [single] => serde_json::to_string_pretty(single),
            _ => serde_json::to_string_pretty(reports),
        },
        OutputFormat::Text => {
            Ok(reports.iter().map(format_report_text).collect::<Vec<_>>().join("\n"))
        }
    }
}

/// Execute the group command
pub fn run_group(
    inputs: &[PathBuf],
    config: &SpritegroupConfig,
    format: OutputFormat,
    output: Option<&Path>,
    separate: bool,
) -> ExitCode {
    let batches: Vec<Vec<PathBuf>> = if separate {
        inputs.iter().map(|input| collect_import_manifests(std::slice::from_ref(input))).collect()
    } else {
        vec![collect_import_manifests(inputs)]
    };

    if batches.iter().all(|batch| batch.is_empty()) {
        eprintln!("Error: No import manifests (*.import.json) found");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let policy = PackerPolicy::from_config(config);
    let target = BuildTarget::new(config.build.target.clone());

    let results: Vec<Result<BatchReport, BatchError>> = if separate {
        batches.par_iter().map(|batch| group_batch(&policy, &target, batch)).collect()
    } else {
        batches.iter().map(|batch| group_batch(&policy, &target, batch)).collect()
    };

    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    let rendered = match render(&reports, format) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Failed to serialize report: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, rendered) {
                eprintln!("Error: Failed to write {}: {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }

    ExitCode::from(EXIT_SUCCESS)
}
