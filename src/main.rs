//! Hot Bot: binary entrypoint.
//! `run` (default) builds and publishes one digest; `serve` answers chat commands.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use teloxide::Bot;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hot_bot::analyze::OpenRouterSummarizer;
use hot_bot::config::digest::load_settings_default;
use hot_bot::config::AppConfig;
use hot_bot::ingest::providers::google_trends::{TrendsScraper, TrendsScraperConfig};
use hot_bot::ingest::providers::news_rss::NewsFeedClient;
use hot_bot::ingest::providers::reddit::RedditClient;
use hot_bot::metrics::{Metrics, ENV_PUSHGATEWAY_URL};
use hot_bot::notify::{LogPublisher, Publisher, TelegramPublisher};
use hot_bot::pipeline::Pipeline;

const EXIT_PIPELINE_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "hot-bot", version, about = "Daily trends & world news digest for a Telegram channel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, summarize and publish one digest.
    Run {
        /// Log the digest instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Answer /start, /help, /info, /ping and /uptime until interrupted.
    Serve,
}

/// `LOG_FORMAT=json` switches to JSON lines; anything else is compact text.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hot_bot=info,warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Serve => {
            hot_bot::commands::serve(Bot::new(config.telegram.bot_token.clone())).await;
            ExitCode::SUCCESS
        }
        Command::Run { dry_run } => run_once(config, dry_run).await,
    }
}

async fn run_once(config: AppConfig, dry_run: bool) -> ExitCode {
    let settings = match load_settings_default() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = ?e, "digest settings invalid");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let config = config.with_digest(settings);
    tracing::info!(settings = ?config.digest, dry_run, "starting digest run");

    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics recorder unavailable");
            None
        }
    };

    let reddit = match RedditClient::new(config.digest.reddit_category) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "cannot build reddit client");
            return ExitCode::from(EXIT_PIPELINE_FAILED);
        }
    };
    let news = match NewsFeedClient::new(config.digest.news_source, &config.feed_user_agent()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "cannot build news client");
            return ExitCode::from(EXIT_PIPELINE_FAILED);
        }
    };
    let summarizer = match OpenRouterSummarizer::new(&config.openrouter) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "cannot build summarizer");
            return ExitCode::from(EXIT_PIPELINE_FAILED);
        }
    };
    let trends = TrendsScraper::new(TrendsScraperConfig::for_channel(
        &config.telegram.channel_username,
    ));
    let publisher: Arc<dyn Publisher> = if dry_run {
        Arc::new(LogPublisher)
    } else {
        Arc::new(TelegramPublisher::new(config.telegram.bot_token.clone()))
    };

    let mut pipeline = Pipeline::new(
        Arc::new(reddit),
        Arc::new(news),
        Arc::new(trends),
        Arc::new(summarizer),
        publisher,
        config.digest.clone(),
        config.telegram.channel_username.clone(),
    );

    let code = match pipeline.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(EXIT_PIPELINE_FAILED),
    };

    if let (Some(metrics), Ok(url)) = (metrics.as_ref(), std::env::var(ENV_PUSHGATEWAY_URL)) {
        if let Err(e) = metrics.push(&url).await {
            tracing::warn!(error = ?e, "metrics push failed");
        }
    }

    code
}
