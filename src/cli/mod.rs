//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod group;
mod tag;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::{glob, Pattern};

use crate::config::{load_config, CliOverrides, SpritegroupConfig};
use crate::resolver::MANIFEST_SUFFIX;

pub use group::{BatchReport, OutputFormat};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path is an importer manifest (`*.import.json`).
pub fn is_import_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(MANIFEST_SUFFIX))
        .unwrap_or(false)
}

/// Find all importer manifests in a directory (recursively), in path order.
pub fn find_import_manifests(dir: &Path) -> Vec<PathBuf> {
    let pattern =
        format!("{}/**/*{}", Pattern::escape(&dir.to_string_lossy()), MANIFEST_SUFFIX);
    match glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            log::warn!("bad search pattern {}: {}", pattern, e);
            Vec::new()
        }
    }
}

/// Expand inputs into manifest files: directories are searched, manifest files
/// kept as given. Other files are skipped with a warning.
pub fn collect_import_manifests(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(find_import_manifests(input));
        } else if is_import_manifest(input) {
            files.push(input.clone());
        } else {
            log::warn!("skipping {}: not a *{} file", input.display(), MANIFEST_SUFFIX);
        }
    }
    files
}

/// Spritegroup - group sprites into texture atlas pages
#[derive(Parser)]
#[command(name = "sgroup")]
#[command(about = "Spritegroup - group sprite importers into atlas pages by packing tag and settings")]
#[command(version)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group importer manifests into atlas pages
    Group {
        /// Importer manifests (*.import.json) or directories to search
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Build target to resolve import settings for
        #[arg(short, long)]
        target: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to spritegroup.toml (default: discovered)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat each input as its own batch and run batches in parallel
        #[arg(long)]
        separate: bool,
    },

    /// Show how a packing tag is interpreted
    Tag {
        /// Packing tag to parse
        tag: String,

        /// Override the tight packing prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Match the prefix ignoring case
        #[arg(long)]
        ignore_case: bool,

        /// Path to spritegroup.toml (default: discovered)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Load configuration and apply command-line overrides, reporting failures.
fn resolve_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<SpritegroupConfig, ExitCode> {
    load_config(path).and_then(|config| overrides.apply(config)).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Group { inputs, target, format, output, config, separate } => {
            let format = match format.parse::<OutputFormat>() {
                Ok(format) => format,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            };
            let overrides = CliOverrides { target, ..Default::default() };
            let config = match resolve_config(config.as_deref(), &overrides) {
                Ok(config) => config,
                Err(code) => return code,
            };
            group::run_group(&inputs, &config, format, output.as_deref(), separate)
        }
        Commands::Tag { tag, prefix, ignore_case, config } => {
            let overrides = CliOverrides {
                tag_prefix: prefix,
                ignore_case: ignore_case.then_some(true),
                ..Default::default()
            };
            let config = match resolve_config(config.as_deref(), &overrides) {
                Ok(config) => config,
                Err(code) => return code,
            };
            tag::run_tag(&tag, &config)
        }
    }
}
