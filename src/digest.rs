//! # Digest composition
//! Turns normalized source outputs into the one message published per run.
//!
//! Layout, top to bottom: trends block, Reddit/news sections (summarized when
//! the summarizer succeeds, raw otherwise), footer. Blocks are separated by a
//! single blank line and absent blocks leave no trace.

use metrics::counter;

use crate::analyze::summarizer::{Summarizer, NEWS_TITLE, REDDIT_TITLE};
use crate::ingest::escape_markdown;
use crate::ingest::types::Headline;

pub const TRENDS_HEADER: &str = "🔥 *GOOGLE TRENDS*";
pub const FOOTER: &str = "🌐 _Stay updated with trends & world news_";

/// Maximum headlines per section.
pub const SECTION_SIZE: usize = 5;

/// Reddit megathreads are not headlines.
const LIVE_THREAD_MARKER: &str = "live thread";

const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSection {
    pub title: String,
    /// Rendered, numbered lines (`1. …`), at most [`SECTION_SIZE`].
    pub items: Vec<String>,
}

impl DigestSection {
    pub fn from_headlines<'a, I>(title: &str, headlines: I) -> Self
    where
        I: IntoIterator<Item = &'a Headline>,
    {
        let items = headlines
            .into_iter()
            .take(SECTION_SIZE)
            .enumerate()
            .map(|(i, h)| format!("{}. {}", i + 1, escape_markdown(&h.title)))
            .collect();
        Self {
            title: title.to_string(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Title line followed by the numbered lines; `None` for an empty section.
    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut out = self.title.clone();
        for line in &self.items {
            out.push('\n');
            out.push_str(line);
        }
        Some(out)
    }
}

pub fn is_live_thread(title: &str) -> bool {
    title.to_lowercase().contains(LIVE_THREAD_MARKER)
}

/// First five Reddit posts that are not live threads.
pub fn reddit_section(posts: &[Headline]) -> DigestSection {
    DigestSection::from_headlines(REDDIT_TITLE, posts.iter().filter(|p| !is_live_thread(&p.title)))
}

/// First five news articles, unfiltered.
pub fn news_section(articles: &[Headline]) -> DigestSection {
    DigestSection::from_headlines(NEWS_TITLE, articles)
}

/// Raw sections joined by a blank line; what gets published when the
/// summarizer is unavailable.
pub fn raw_sections_text(reddit: Option<&str>, news: Option<&str>) -> String {
    [reddit, news]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Assemble the final message from the trends line and the sections text.
pub fn compose_message(trends_line: Option<&str>, sections_text: &str) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(3);
    if let Some(line) = trends_line.filter(|l| !l.trim().is_empty()) {
        blocks.push(format!("{TRENDS_HEADER}\n{line}"));
    }
    if !sections_text.trim().is_empty() {
        blocks.push(sections_text.to_string());
    }
    blocks.push(FOOTER.to_string());
    blocks.join(BLOCK_SEPARATOR)
}

/// One run's composed digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub trends_line: Option<String>,
    pub reddit_section: Option<String>,
    pub news_section: Option<String>,
    /// Summarized sections, or the raw fallback, or empty.
    pub sections_text: String,
    /// Whether `sections_text` came from the summarizer.
    pub summarized: bool,
    pub combined_text: String,
}

impl Digest {
    pub fn is_publishable(&self) -> bool {
        self.trends_line.as_deref().is_some_and(|l| !l.is_empty()) || !self.sections_text.is_empty()
    }
}

pub struct DigestBuilder<'a> {
    summarizer: &'a dyn Summarizer,
}

impl<'a> DigestBuilder<'a> {
    pub fn new(summarizer: &'a dyn Summarizer) -> Self {
        Self { summarizer }
    }

    pub async fn build(
        &self,
        reddit_posts: &[Headline],
        news_articles: &[Headline],
        trends_line: Option<&str>,
    ) -> Digest {
        let reddit = reddit_section(reddit_posts).render();
        let news = news_section(news_articles).render();
        let trends_line = trends_line
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        let (sections_text, summarized) = if reddit.is_none() && news.is_none() {
            (String::new(), false)
        } else {
            let reddit_raw = reddit.as_deref().unwrap_or_default();
            let news_raw = news.as_deref().unwrap_or_default();
            match self.summarizer.summarize(reddit_raw, news_raw).await {
                Ok(text) if !text.trim().is_empty() => (text, true),
                Ok(_) => {
                    tracing::warn!(
                        provider = self.summarizer.provider_name(),
                        "summarizer returned nothing, using raw sections"
                    );
                    counter!("digest_summarize_fallback_total").increment(1);
                    (raw_sections_text(reddit.as_deref(), news.as_deref()), false)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        provider = self.summarizer.provider_name(),
                        "summarization failed, using raw sections"
                    );
                    counter!("digest_summarize_fallback_total").increment(1);
                    (raw_sections_text(reddit.as_deref(), news.as_deref()), false)
                }
            }
        };

        let combined_text = compose_message(trends_line.as_deref(), &sections_text);
        Digest {
            trends_line,
            reddit_section: reddit,
            news_section: news,
            sections_text,
            summarized,
            combined_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn h(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            source_url: String::new(),
            published_at: Utc::now(),
            author: None,
        }
    }

    #[test]
    fn empty_section_renders_nothing() {
        assert!(news_section(&[]).render().is_none());
    }

    #[test]
    fn live_thread_check_ignores_case() {
        assert!(is_live_thread("/r/WorldNews LIVE Thread: day 3"));
        assert!(!is_live_thread("Thread about live music"));
    }

    #[test]
    fn section_caps_at_five_and_escapes_titles() {
        let posts: Vec<Headline> = (1..=7).map(|i| h(&format!("post_{i}"))).collect();
        let s = news_section(&posts);
        assert_eq!(s.items.len(), 5);
        assert_eq!(s.items[0], r"1. post\_1");
        assert_eq!(s.items[4], r"5. post\_5");
    }

    #[test]
    fn message_without_blocks_is_footer_only() {
        assert_eq!(compose_message(None, ""), FOOTER);
        assert_eq!(compose_message(Some("  "), ""), FOOTER);
    }

    #[test]
    fn raw_fallback_skips_missing_sections() {
        assert_eq!(raw_sections_text(Some("R"), None), "R");
        assert_eq!(raw_sections_text(Some("R"), Some("N")), "R\n\nN");
        assert_eq!(raw_sections_text(None, None), "");
    }
}
