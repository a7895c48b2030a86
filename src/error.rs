// src/error.rs
//
// Everything that can abort a run. Row-level rejects are not errors; see
// `specs::nodes::RowOutcome`.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::consts::ENV_SOURCE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("source URL is not configured (pass --url or set {ENV_SOURCE_URL})")]
    MissingSourceUrl,

    #[error("source URL must start with http:// or https://, got {0:?}")]
    InvalidSourceUrl(String),

    #[error("invalid table class signature {class:?}: {reason}")]
    TableClass { class: String, reason: String },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// The fetched page does not have the shape the extractor needs.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StructureError(pub String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid node document: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unexpected page structure: {0}")]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serializing nodes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("nothing scraped and no history found")]
    EmptyResult,
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
