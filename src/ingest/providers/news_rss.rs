// src/ingest/providers/news_rss.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::errors::SourceError;
use crate::ingest::types::{Headline, HeadlineSource, NewsSource};
use crate::ingest::{normalize_text, record_source_outcome};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    author: Option<String>,
    // quick-xml matches the local name, so `dc:creator` arrives as `creator`.
    #[serde(rename = "creator")]
    creator: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    let dt = OffsetDateTime::parse(ts.trim(), &Rfc2822).ok()?;
    DateTime::<Utc>::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
}

/// Named syndication feeds (BBC, Reuters, CNN, Al Jazeera).
pub struct NewsFeedClient {
    http: reqwest::Client,
    source: NewsSource,
    url_override: Option<String>,
}

impl NewsFeedClient {
    pub fn new(source: NewsSource, user_agent: &str) -> Result<Self, SourceError> {
        let ua = if user_agent.trim().is_empty() {
            "hot-bot/1.0"
        } else {
            user_agent
        };
        let http = reqwest::Client::builder()
            .user_agent(ua)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            source,
            url_override: None,
        })
    }

    /// Read the feed from another URL instead of the source's fixed one.
    pub fn with_url_override(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    fn feed_url(&self, source: NewsSource) -> String {
        self.url_override
            .clone()
            .unwrap_or_else(|| source.feed_url().to_string())
    }

    /// Fetch the whole feed, parse it, then keep the first `limit` items.
    pub async fn fetch_headlines(&self, source: NewsSource, limit: usize) -> Option<Vec<Headline>> {
        tracing::info!(source = "news", feed = %source, limit, "fetching news feed");
        match self.try_fetch(source, limit).await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(error = %e, source = "news", feed = %source, "news source unavailable");
                None
            }
        }
    }

    pub async fn try_fetch(
        &self,
        source: NewsSource,
        limit: usize,
    ) -> Result<Vec<Headline>, SourceError> {
        let url = self.feed_url(source);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { status, url });
        }
        let body = resp.text().await?;
        let mut items = parse_feed(&body, Utc::now())?;
        items.truncate(limit);
        Ok(items)
    }
}

/// Parse an RSS 2.0 document. Items without a title are dropped; items
/// without a usable date are stamped with `fetched_at`.
pub fn parse_feed(xml: &str, fetched_at: DateTime<Utc>) -> Result<Vec<Headline>, SourceError> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).map_err(|e| SourceError::Parse {
        what: "rss feed",
        reason: e.to_string(),
    })?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        out.push(Headline {
            title,
            source_url: it.link.or(it.guid).unwrap_or_default().trim().to_string(),
            published_at: it
                .pub_date
                .as_deref()
                .and_then(parse_rfc2822)
                .unwrap_or(fetched_at),
            author: it
                .author
                .or(it.creator)
                .map(|a| normalize_text(&a))
                .filter(|a| !a.is_empty()),
        });
    }
    Ok(out)
}

#[async_trait]
impl HeadlineSource for NewsFeedClient {
    async fn fetch_latest(&self, limit: usize) -> Option<Vec<Headline>> {
        let t0 = Instant::now();
        let out = self.fetch_headlines(self.source, limit).await;
        record_source_outcome(
            "news",
            out.as_ref().map(Vec::len),
            t0.elapsed().as_secs_f64() * 1_000.0,
        );
        out
    }

    fn name(&self) -> &'static str {
        "news"
    }
}

// HTML entities that are not valid XML and show up in real feeds.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
