//! Command-line front end for `fractal-tree-lib`
//!
//! Parses settings (optionally merged from an options file), builds the
//! tree, estimates its dimension and prints a report.

pub mod logging;
pub mod run;
pub mod settings;

pub use run::{RunReport, run};
pub use settings::Settings;

use std::path::PathBuf;

/// Errors surfaced by the command-line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Fractal(#[from] fractal_tree_lib::FractalError),

    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("Options file {path}: {source}")]
    OptionsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
