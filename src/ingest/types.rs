// src/ingest/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized headline from the social or news feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
    pub author: Option<String>,
}

/// Source of the headline sections of the digest.
///
/// `None` means "source unavailable for this run"; implementations log the
/// reason themselves and never propagate it.
#[async_trait::async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch_latest(&self, limit: usize) -> Option<Vec<Headline>>;
    fn name(&self) -> &'static str;
}

/// Source of the single trends line.
#[async_trait::async_trait]
pub trait TrendsSource: Send + Sync {
    async fn fetch_trends_line(&self, limit: usize) -> Option<String>;

    /// Release long-lived resources held across fetches.
    async fn shutdown(&self) {}

    fn name(&self) -> &'static str {
        "trends"
    }
}

/// Subreddits the social feed can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedditCategory {
    WorldNews,
    Trending,
    Popular,
}

impl RedditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedditCategory::WorldNews => "worldnews",
            RedditCategory::Trending => "trending",
            RedditCategory::Popular => "popular",
        }
    }
}

impl fmt::Display for RedditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedditCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "worldnews" => Ok(RedditCategory::WorldNews),
            "trending" => Ok(RedditCategory::Trending),
            "popular" => Ok(RedditCategory::Popular),
            other => Err(format!("unknown reddit category '{other}'")),
        }
    }
}

/// Named RSS feeds the news source can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSource {
    Reuters,
    Bbc,
    Cnn,
    AlJazeera,
}

impl NewsSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsSource::Reuters => "reuters",
            NewsSource::Bbc => "bbc",
            NewsSource::Cnn => "cnn",
            NewsSource::AlJazeera => "aljazeera",
        }
    }

    pub fn feed_url(&self) -> &'static str {
        match self {
            NewsSource::Reuters => "https://www.reutersagency.com/feed/?best-topics=top-news",
            NewsSource::Bbc => "http://feeds.bbci.co.uk/news/world/rss.xml",
            NewsSource::Cnn => "http://rss.cnn.com/rss/edition.rss",
            NewsSource::AlJazeera => "https://www.aljazeera.com/xml/rss/all.xml",
        }
    }
}

impl fmt::Display for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuters" => Ok(NewsSource::Reuters),
            "bbc" => Ok(NewsSource::Bbc),
            "cnn" => Ok(NewsSource::Cnn),
            "aljazeera" => Ok(NewsSource::AlJazeera),
            other => Err(format!("unknown news source '{other}'")),
        }
    }
}
