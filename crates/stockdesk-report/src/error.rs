use std::path::PathBuf;

use thiserror::Error;

/// Failures that make a report impossible to produce. These end the run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid template: {0}")]
    TemplateSyntax(String),

    #[error("failed to render report: {0}")]
    Render(String),
}
