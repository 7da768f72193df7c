//! Error taxonomy for one digest run.
//!
//! Source and summarization errors are recovered where they happen (the
//! source is treated as empty, the raw sections are used instead). Publish
//! and pipeline errors end the run with a non-zero exit code.

use reqwest::StatusCode;
use thiserror::Error;

/// A source could not deliver anything usable for this run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("could not parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("missing OpenRouter API key")]
    MissingCredential,

    #[error("summarization request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected summarization response: {0}")]
    MalformedResponse(String),

    #[error("summarization returned no content")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("publisher rejected message: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failure of a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{source_name} fetch task failed: {reason}")]
    FetchTask {
        source_name: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),
}
