//! Process configuration, read once at startup and passed down explicitly.

pub mod ai;
pub mod digest;

use crate::errors::ConfigError;

pub use ai::OpenRouterConfig;
pub use digest::DigestSettings;

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_CHANNEL_USERNAME: &str = "CHANNEL_USERNAME";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_OPENROUTER_URL: &str = "OPENROUTER_URL";

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Channel handle without the leading `@`.
    pub channel_username: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token_len", &self.bot_token.len())
            .field("channel_username", &self.channel_username)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub openrouter: OpenRouterConfig,
    pub digest: DigestSettings,
}

impl AppConfig {
    /// Read the required values from the process environment.
    /// Digest settings start from defaults; see [`digest::load_settings_default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Every missing required
    /// key is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get(ENV_BOT_TOKEN);
        let channel = get(ENV_CHANNEL_USERNAME);
        let api_key = get(ENV_OPENROUTER_API_KEY);

        let missing: Vec<&'static str> = [
            (ENV_BOT_TOKEN, bot_token.is_none()),
            (ENV_CHANNEL_USERNAME, channel.is_none()),
            (ENV_OPENROUTER_API_KEY, api_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(bot_token), Some(channel), Some(api_key)) = (bot_token, channel, api_key) else {
            return Err(ConfigError::Missing(missing));
        };

        let channel_username = channel.trim_start_matches('@').to_string();
        if channel_username.is_empty() {
            return Err(ConfigError::Invalid {
                key: ENV_CHANNEL_USERNAME,
                reason: "channel handle is empty".to_string(),
            });
        }

        let mut openrouter = OpenRouterConfig::new(api_key);
        if let Some(model) = get(ENV_OPENROUTER_MODEL) {
            openrouter.model = model;
        }
        if let Some(url) = get(ENV_OPENROUTER_URL) {
            openrouter.endpoint = url;
        }

        Ok(Self {
            telegram: TelegramConfig {
                bot_token,
                channel_username,
            },
            openrouter,
            digest: DigestSettings::default(),
        })
    }

    pub fn with_digest(mut self, digest: DigestSettings) -> Self {
        self.digest = digest;
        self
    }

    /// User agent for the RSS and trends requests, derived from the channel.
    pub fn feed_user_agent(&self) -> String {
        self.telegram.channel_username.clone()
    }
}
