// src/infra/errors.rs — Error types for evoforest

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolveError {
    // Responder errors (retriable when flagged)
    #[error("Responder '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<EvolveError>,
    },

    // Fail-fast configuration errors
    #[error("{var} is not set. Export it or add it to your environment before evolving.")]
    MissingCredential { var: String },

    #[error("Template '{name}' is invalid: {message}")]
    Template { name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    // Dataset errors
    #[error("{}: row {row}: {message}", path.display())]
    Dataset {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EvolveError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            EvolveError::Provider {
                retriable: true,
                ..
            } | EvolveError::RateLimited { .. }
        )
    }

    /// True when a retry budget ran out. The scheduler treats this as fatal.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, EvolveError::RetriesExhausted { .. })
    }
}

impl From<minijinja::Error> for EvolveError {
    fn from(e: minijinja::Error) -> Self {
        EvolveError::Template {
            name: e.name().unwrap_or("<inline>").to_string(),
            message: e.to_string(),
        }
    }
}
