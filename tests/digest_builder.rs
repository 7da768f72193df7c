// tests/digest_builder.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use hot_bot::analyze::Summarizer;
use hot_bot::digest::{compose_message, raw_sections_text, DigestBuilder, FOOTER, TRENDS_HEADER};
use hot_bot::errors::SummarizationError;
use hot_bot::ingest::types::Headline;

fn h(title: &str) -> Headline {
    Headline {
        title: title.to_string(),
        source_url: "https://example.com".to_string(),
        published_at: Utc::now(),
        author: None,
    }
}

enum Reply {
    Text(&'static str),
    Fail,
}

struct CountingSummarizer {
    reply: Reply,
    calls: AtomicUsize,
}

impl CountingSummarizer {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, _: &str, _: &str) -> Result<String, SummarizationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(t) => Ok(t.to_string()),
            Reply::Fail => Err(SummarizationError::EmptyCompletion),
        }
    }

    fn provider_name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn live_threads_are_filtered_and_sections_capped_at_five() {
    let s = CountingSummarizer::new(Reply::Fail);
    let posts: Vec<Headline> = ["Live Thread: War day 3", "P1", "P2", "LIVE THREAD again", "P3", "P4", "P5", "P6"]
        .into_iter()
        .map(h)
        .collect();
    let d = DigestBuilder::new(&s).build(&posts, &[], None).await;

    let reddit = d.reddit_section.expect("reddit section");
    let lines: Vec<&str> = reddit.lines().skip(1).collect();
    assert_eq!(lines, ["1. P1", "2. P2", "3. P3", "4. P4", "5. P5"]);
    assert!(!reddit.to_lowercase().contains("live thread"));
    assert!(d.news_section.is_none());
}

#[tokio::test]
async fn failed_summary_falls_back_to_raw_sections() {
    let s = CountingSummarizer::new(Reply::Fail);
    let d = DigestBuilder::new(&s)
        .build(&[h("Reddit one")], &[h("News one")], Some("AI Boom 120K+"))
        .await;

    assert!(!d.summarized);
    let raw = raw_sections_text(d.reddit_section.as_deref(), d.news_section.as_deref());
    assert_eq!(d.sections_text, raw);
    assert_eq!(
        d.combined_text,
        compose_message(Some("AI Boom 120K+"), &raw)
    );
    assert!(d.combined_text.starts_with(TRENDS_HEADER));
    assert!(d.combined_text.ends_with(FOOTER));
    assert_eq!(s.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_summary_counts_as_failure() {
    let s = CountingSummarizer::new(Reply::Text("   \n"));
    let d = DigestBuilder::new(&s).build(&[], &[h("News one")], None).await;
    assert!(!d.summarized);
    assert!(d.sections_text.contains("1. News one"));
}

#[tokio::test]
async fn summary_replaces_sections() {
    let s = CountingSummarizer::new(Reply::Text("📱 *REDDIT TRENDING*\n1. Short"));
    let d = DigestBuilder::new(&s).build(&[h("Long title")], &[], None).await;
    assert!(d.summarized);
    assert_eq!(d.sections_text, "📱 *REDDIT TRENDING*\n1. Short");
    assert!(!d.combined_text.contains(TRENDS_HEADER));
}

#[tokio::test]
async fn no_headlines_means_no_summarizer_call() {
    let s = CountingSummarizer::new(Reply::Text("should not be used"));
    let d = DigestBuilder::new(&s).build(&[], &[], Some("")).await;
    assert_eq!(s.calls.load(Ordering::SeqCst), 0);
    assert!(d.trends_line.is_none());
    assert!(!d.is_publishable());
    assert_eq!(d.combined_text, FOOTER);
}

#[tokio::test]
async fn trends_alone_is_publishable() {
    let s = CountingSummarizer::new(Reply::Fail);
    let d = DigestBuilder::new(&s).build(&[], &[], Some("Elections 80K+")).await;
    assert!(d.is_publishable());
    assert_eq!(
        d.combined_text,
        format!("{TRENDS_HEADER}\nElections 80K+\n\n{FOOTER}")
    );
    assert_eq!(s.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn markdown_markers_in_titles_are_escaped() {
    let s = CountingSummarizer::new(Reply::Fail);
    let d = DigestBuilder::new(&s).build(&[], &[h("snake_case *wins*")], None).await;
    assert!(d.sections_text.contains(r"1. snake\_case \*wins\*"));
}
