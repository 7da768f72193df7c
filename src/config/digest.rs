// src/config/digest.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::{NewsSource, RedditCategory};

const ENV_PATH: &str = "DIGEST_CONFIG_PATH";

/// Which feeds to read and how many items to request from each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigestSettings {
    pub reddit_category: RedditCategory,
    pub reddit_limit: usize,
    pub news_source: NewsSource,
    pub news_limit: usize,
    pub trends_limit: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            reddit_category: RedditCategory::WorldNews,
            reddit_limit: 8,
            news_source: NewsSource::Bbc,
            news_limit: 8,
            trends_limit: 25,
        }
    }
}

impl DigestSettings {
    fn validated(self) -> Result<Self> {
        if self.reddit_limit == 0 || self.news_limit == 0 || self.trends_limit == 0 {
            return Err(anyhow!("digest limits must be positive"));
        }
        Ok(self)
    }
}

/// Load settings from an explicit path. Supports TOML or JSON formats.
pub fn load_settings_from(path: &Path) -> Result<DigestSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading digest settings from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_settings(&content, ext.as_str())
        .with_context(|| format!("parsing digest settings in {}", path.display()))
}

/// Load settings using env var + fallbacks:
/// 1) $DIGEST_CONFIG_PATH
/// 2) config/digest.toml
/// 3) config/digest.json
/// 4) built-in defaults
pub fn load_settings_default() -> Result<DigestSettings> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_settings_from(&pb);
        } else {
            return Err(anyhow!("DIGEST_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/digest.toml");
    if toml_p.exists() {
        return load_settings_from(&toml_p);
    }
    let json_p = PathBuf::from("config/digest.json");
    if json_p.exists() {
        return load_settings_from(&json_p);
    }
    Ok(DigestSettings::default())
}

fn parse_settings(s: &str, hint_ext: &str) -> Result<DigestSettings> {
    let parsed = match hint_ext {
        "json" => serde_json::from_str::<DigestSettings>(s)?,
        "toml" => toml::from_str::<DigestSettings>(s)?,
        // No usable extension: JSON documents start with a brace.
        _ if s.trim_start().starts_with('{') => serde_json::from_str::<DigestSettings>(s)?,
        _ => toml::from_str::<DigestSettings>(s)?,
    };
    parsed.validated()
}
