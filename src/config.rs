//! Configuration, read once from the environment at startup.

use secrecy::SecretString;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the libSQL database file.
    pub db_path: String,
    /// HTTP listen port.
    pub port: u16,
    /// OpenAI settings for the character generator.
    pub openai: OpenAiConfig,
}

/// OpenAI settings. The key is optional at startup — a missing key is a
/// request-time upstream error on /api/character/generate, not a crash.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<SecretString>,
    pub text_model: String,
    pub image_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("KEEPGOING_DB_PATH")
            .unwrap_or_else(|_| "./data/keepgoing.db".to_string());

        let port: u16 = std::env::var("KEEPGOING_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Self {
            db_path,
            port,
            openai: OpenAiConfig::from_env(),
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let text_model = std::env::var("KEEPGOING_TEXT_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let image_model = std::env::var("KEEPGOING_IMAGE_MODEL")
            .unwrap_or_else(|_| "gpt-image-1".to_string());

        Self {
            api_key,
            text_model,
            image_model,
        }
    }

    /// Config with no key, for tests that must never reach the network.
    pub fn without_key() -> Self {
        Self {
            api_key: None,
            text_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
        }
    }
}
