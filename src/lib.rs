// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod commands;
pub mod config;
pub mod digest;
pub mod errors;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, DigestSettings};
pub use crate::digest::{Digest, DigestBuilder};
pub use crate::errors::{ConfigError, PipelineError, PublishError, SourceError, SummarizationError};
pub use crate::ingest::types::{Headline, HeadlineSource, NewsSource, RedditCategory, TrendsSource};
pub use crate::notify::{LogPublisher, Publisher, TelegramPublisher};
pub use crate::pipeline::{Pipeline, RunReport, RunState};
