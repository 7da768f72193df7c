//! # Digest pipeline
//! One run: fetch the three sources concurrently, build the digest, publish
//! it when there is something to say.
//!
//! Idle → Fetching → Building → Publishing → Done, with Failed reachable from
//! every non-terminal state. A source returning `None` is a degraded result,
//! not a failure.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tokio::task::JoinError;

use crate::analyze::summarizer::Summarizer;
use crate::config::DigestSettings;
use crate::digest::{Digest, DigestBuilder};
use crate::errors::PipelineError;
use crate::ingest::types::{Headline, HeadlineSource, TrendsSource};
use crate::notify::Publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Building,
    Publishing,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Fetching => "fetching",
            RunState::Building => "building",
            RunState::Publishing => "publishing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Raw results of the fetching stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub reddit: Option<Vec<Headline>>,
    pub news: Option<Vec<Headline>>,
    pub trends: Option<String>,
}

impl FetchOutcome {
    pub fn unavailable_sources(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.reddit.is_none() {
            out.push("reddit");
        }
        if self.news.is_none() {
            out.push("news");
        }
        if self.trends.is_none() {
            out.push("trends");
        }
        out
    }
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub final_state: RunState,
    pub published: bool,
    pub unavailable_sources: Vec<&'static str>,
    pub digest: Digest,
}

pub struct Pipeline {
    reddit: Arc<dyn HeadlineSource>,
    news: Arc<dyn HeadlineSource>,
    trends: Arc<dyn TrendsSource>,
    summarizer: Arc<dyn Summarizer>,
    publisher: Arc<dyn Publisher>,
    settings: DigestSettings,
    channel: String,
    state: RunState,
}

fn task_failure(source_name: &'static str, e: JoinError) -> PipelineError {
    let reason = if e.is_panic() {
        "task panicked".to_string()
    } else {
        e.to_string()
    };
    PipelineError::FetchTask {
        source_name,
        reason,
    }
}

impl Pipeline {
    pub fn new(
        reddit: Arc<dyn HeadlineSource>,
        news: Arc<dyn HeadlineSource>,
        trends: Arc<dyn TrendsSource>,
        summarizer: Arc<dyn Summarizer>,
        publisher: Arc<dyn Publisher>,
        settings: DigestSettings,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            reddit,
            news,
            trends,
            summarizer,
            publisher,
            settings,
            channel: channel.into(),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }

    /// Execute one run. The trends browser is shut down before returning,
    /// whatever the outcome.
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        let t0 = Instant::now();
        counter!("digest_runs_total").increment(1);

        let result = self.run_stages().await;
        self.trends.shutdown().await;

        histogram!("digest_run_duration_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        match &result {
            Ok(report) => tracing::info!(
                state = %report.final_state,
                published = report.published,
                unavailable = ?report.unavailable_sources,
                "digest run finished"
            ),
            Err(e) => {
                self.transition(RunState::Failed);
                tracing::error!(error = %e, "digest run failed");
            }
        }
        result
    }

    async fn run_stages(&mut self) -> Result<RunReport, PipelineError> {
        self.transition(RunState::Fetching);
        let fetched = self.fetch_all().await?;
        let unavailable_sources = fetched.unavailable_sources();
        if !unavailable_sources.is_empty() {
            tracing::warn!(sources = ?unavailable_sources, "continuing without some sources");
        }

        self.transition(RunState::Building);
        let digest = self.build(&fetched).await;

        if !digest.is_publishable() {
            tracing::info!("nothing to publish, skipping");
            counter!("digest_skipped_total").increment(1);
            self.transition(RunState::Done);
            return Ok(RunReport {
                final_state: RunState::Done,
                published: false,
                unavailable_sources,
                digest,
            });
        }

        self.transition(RunState::Publishing);
        tracing::info!(
            publisher = self.publisher.name(),
            channel = %self.channel,
            summarized = digest.summarized,
            "publishing digest"
        );
        self.publisher
            .publish(&self.channel, &digest.combined_text)
            .await?;
        counter!("digest_published_total").increment(1);

        self.transition(RunState::Done);
        Ok(RunReport {
            final_state: RunState::Done,
            published: true,
            unavailable_sources,
            digest,
        })
    }

    /// Run the three fetches as independent tasks.
    pub async fn fetch_all(&self) -> Result<FetchOutcome, PipelineError> {
        let reddit_src = Arc::clone(&self.reddit);
        let reddit_limit = self.settings.reddit_limit;
        let reddit = tokio::spawn(async move { reddit_src.fetch_latest(reddit_limit).await });

        let news_src = Arc::clone(&self.news);
        let news_limit = self.settings.news_limit;
        let news = tokio::spawn(async move { news_src.fetch_latest(news_limit).await });

        let trends_src = Arc::clone(&self.trends);
        let trends_limit = self.settings.trends_limit;
        let trends = tokio::spawn(async move { trends_src.fetch_trends_line(trends_limit).await });

        let (reddit, news, trends) = tokio::join!(reddit, news, trends);
        Ok(FetchOutcome {
            reddit: reddit.map_err(|e| task_failure(self.reddit.name(), e))?,
            news: news.map_err(|e| task_failure(self.news.name(), e))?,
            trends: trends.map_err(|e| task_failure(self.trends.name(), e))?,
        })
    }

    /// Always yields a digest; an unpublishable one when every source came back empty.
    async fn build(&self, fetched: &FetchOutcome) -> Digest {
        DigestBuilder::new(self.summarizer.as_ref())
            .build(
                fetched.reddit.as_deref().unwrap_or_default(),
                fetched.news.as_deref().unwrap_or_default(),
                fetched.trends.as_deref(),
            )
            .await
    }
}
