// src/ingest/providers/reddit.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::errors::SourceError;
use crate::ingest::types::{Headline, HeadlineSource, RedditCategory};
use crate::ingest::{normalize_text, record_source_outcome};

pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    author: Option<String>,
    created_utc: f64,
}

/// Reddit's public JSON listings, fetched with a browser-like header set to
/// reduce the chance of bot blocking.
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
    category: RedditCategory,
}

fn browser_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    h.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    h.insert(
        header::REFERER,
        HeaderValue::from_static("https://www.reddit.com/"),
    );
    h.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    h.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    h
}

impl RedditClient {
    pub fn new(category: RedditCategory) -> Result<Self, SourceError> {
        Self::with_base_url(category, REDDIT_BASE_URL)
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_base_url(
        category: RedditCategory,
        base_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(browser_headers())
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            category,
        })
    }

    pub fn listing_url(&self, category: RedditCategory, limit: usize) -> String {
        format!("{}/r/{}.json?limit={}", self.base_url, category, limit)
    }

    /// Fetch and normalize one listing. `None` when the source is unavailable.
    pub async fn fetch_headlines(
        &self,
        category: RedditCategory,
        limit: usize,
    ) -> Option<Vec<Headline>> {
        tracing::info!(source = "reddit", %category, limit, "fetching reddit posts");
        match self.try_fetch(category, limit).await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(error = %e, source = "reddit", %category, "reddit source unavailable");
                None
            }
        }
    }

    pub async fn try_fetch(
        &self,
        category: RedditCategory,
        limit: usize,
    ) -> Result<Vec<Headline>, SourceError> {
        let url = self.listing_url(category, limit);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { status, url });
        }
        let body = resp.text().await?;
        parse_listing(&body, &self.base_url)
    }
}

/// Map a listing document into headlines, in listing order.
pub fn parse_listing(body: &str, base_url: &str) -> Result<Vec<Headline>, SourceError> {
    let listing: Listing = serde_json::from_str(body).map_err(|e| SourceError::Parse {
        what: "reddit listing",
        reason: e.to_string(),
    })?;

    let mut out = Vec::with_capacity(listing.data.children.len());
    for Child { data: post } in listing.data.children {
        let title = normalize_text(&post.title);
        if title.is_empty() {
            continue;
        }
        let Some(published_at) = epoch_to_utc(post.created_utc) else {
            tracing::debug!(title = %title, created_utc = post.created_utc, "skipping post with bad timestamp");
            continue;
        };
        let source_url = post
            .url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| post.permalink.map(|p| format!("{base_url}{p}")))
            .unwrap_or_default();

        out.push(Headline {
            title,
            source_url,
            published_at,
            author: post.author.filter(|a| !a.is_empty()),
        });
    }
    Ok(out)
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp(secs.trunc() as i64, 0)
}

#[async_trait]
impl HeadlineSource for RedditClient {
    async fn fetch_latest(&self, limit: usize) -> Option<Vec<Headline>> {
        let t0 = Instant::now();
        let out = self.fetch_headlines(self.category, limit).await;
        record_source_outcome(
            "reddit",
            out.as_ref().map(Vec::len),
            t0.elapsed().as_secs_f64() * 1_000.0,
        );
        out
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_maps_posts_in_order() {
        let body = r#"{"data":{"children":[
            {"data":{"title":"First &amp; foremost","url":"https://a.example/1","permalink":"/r/worldnews/1","author":"alice","created_utc":1700000000.0}},
            {"data":{"title":"  ","url":"https://a.example/2","permalink":"/r/worldnews/2","author":"bob","created_utc":1700000001.0}},
            {"data":{"title":"Third","url":"","permalink":"/r/worldnews/3","created_utc":1700000002}}
        ]}}"#;
        let items = parse_listing(body, REDDIT_BASE_URL).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First & foremost");
        assert_eq!(items[0].author.as_deref(), Some("alice"));
        assert_eq!(items[0].published_at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert_eq!(
            items[1].source_url,
            "https://www.reddit.com/r/worldnews/3"
        );
        assert!(items[1].author.is_none());
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let err = parse_listing(r#"{"kind":"Listing"}"#, REDDIT_BASE_URL).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
