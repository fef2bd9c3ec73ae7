use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub model: String,
    pub token_ttl_secs: i64,
    pub max_output_tokens: u32,
    pub expose_provider_errors: bool,
    pub allowed_origin: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3000"),
            jwt_secret: require("JWT_SECRET"),
            openai_api_key: require("OPENAI_API_KEY"),
            openai_api_url: try_load(
                "OPENAI_API_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            model: try_load("OPENAI_MODEL", "gpt-3.5-turbo"),
            token_ttl_secs: try_load("TOKEN_TTL_SECS", "86400"),
            max_output_tokens: try_load("MAX_OUTPUT_TOKENS", "1000"),
            expose_provider_errors: try_load("EXPOSE_PROVIDER_ERRORS", "false"),
            allowed_origin: try_load("ALLOWED_ORIGIN", "*"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} is not set");
        })
        .expect("Environment misconfigured!")
}
