//! Headline summarizer: rewrites the Reddit and news sections through an
//! OpenRouter chat completion.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OpenRouterConfig;
use crate::errors::SummarizationError;

pub const REDDIT_TITLE: &str = "📱 *REDDIT TRENDING*";
pub const NEWS_TITLE: &str = "🌍 *WORLD NEWS*";

/// Rewrites the two raw headline sections into shorter ones.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        reddit_section: &str,
        news_section: &str,
    ) -> Result<String, SummarizationError>;

    fn provider_name(&self) -> &'static str;
}

pub fn system_prompt() -> String {
    format!(
        "You summarize news.\n\n\
         Given up to 8 Reddit + 8 World News headlines:\n\n\
         - Pick top 5 from each.\n\
         - Rewrite in max 6 words per headline.\n\
         - Output: two titled sections, 1-5 each.\n\
         - Use titles: '{REDDIT_TITLE}', '{NEWS_TITLE}'"
    )
}

pub fn user_prompt(reddit_section: &str, news_section: &str) -> String {
    format!(
        "Reddit Headlines:\n{}\n\nWorld News Headlines:\n{}",
        reddit_section.trim(),
        news_section.trim()
    )
}

/// OpenRouter chat-completions client.
pub struct OpenRouterSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenRouterSummarizer {
    pub fn new(config: &OpenRouterConfig) -> Result<Self, SummarizationError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hot-bot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the trimmed first-choice content out of a completion body.
pub fn extract_completion(body: &str) -> Result<String, SummarizationError> {
    let resp: Resp = serde_json::from_str(body)
        .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;
    let Some(first) = resp.choices.into_iter().next() else {
        return Err(SummarizationError::MalformedResponse(
            "response has no choices".to_string(),
        ));
    };
    let content = first.message.content.unwrap_or_default();
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SummarizationError::EmptyCompletion);
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(
        &self,
        reddit_section: &str,
        news_section: &str,
    ) -> Result<String, SummarizationError> {
        if self.api_key.trim().is_empty() {
            return Err(SummarizationError::MissingCredential);
        }

        let sys = system_prompt();
        let user = user_prompt(reddit_section, news_section);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &sys,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
        };

        tracing::info!(model = %self.model, "sending headlines to summarizer");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SummarizationError::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }
        let out = extract_completion(&body)?;
        tracing::info!(chars = out.len(), "summary received");
        Ok(out)
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }
}

/// Always fails with [`SummarizationError::MissingCredential`]; the digest
/// then carries the raw sections.
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _: &str, _: &str) -> Result<String, SummarizationError> {
        Err(SummarizationError::MissingCredential)
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}
