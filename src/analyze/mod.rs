// src/analyze/mod.rs
//! Turning raw section text into the channel summary.

pub mod summarizer;

pub use summarizer::{DisabledSummarizer, OpenRouterSummarizer, Summarizer};
