//! Error types for each stage of a run.

use thiserror::Error;

use crate::types::DataType;

/// Startup configuration could not be built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingVar(&'static str),

    #[error("Failed to load chain registry: {0}")]
    Registry(#[from] serde_json::Error),
}

/// A single rejected command-line field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// Malformed command-line input, with every offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid command options: {}", format_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether `field` was among the rejected fields
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetching or decoding one address' data failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {data_type} for {address}: {status} {status_text}")]
    Status {
        data_type: DataType,
        address: String,
        status: u16,
        status_text: String,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected {data_type} response for {address}: {reason}")]
    UnexpectedResponse {
        data_type: DataType,
        address: String,
        reason: String,
    },

    #[error("Failed to decode {data_type} record for {address}: {source}")]
    Decode {
        data_type: DataType,
        address: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Filtering aborted; no partial result is produced
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Record is not a {expected} entry")]
    UnexpectedRecord { expected: DataType },
}

/// Any failure that ends a run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid chain specified for {data_type}: {chain}")]
    ChainMismatch { chain: String, data_type: DataType },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
