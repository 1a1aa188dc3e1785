use crate::{
    error::{BotError, Result},
    fetcher::DEFAULT_API_HOST,
};
use clap::Parser;
use reqwest::Url;
use std::time::Duration;

#[derive(Parser, Clone)]
#[command(author, version, long_about = None)]
#[command(about = "Telegram bot that looks up followers, moderators, VIPs and founders of Twitch channels.")]
pub struct Config {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    /// Base URL of the Twitch tools API
    #[arg(long, env = "TWITCH_API_HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: Url,

    /// Seconds to wait for one API call
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 10)]
    pub request_timeout: u64,

    /// Seconds one update may take before it is abandoned
    #[arg(long, env = "UPDATE_TIMEOUT", default_value_t = 5)]
    pub update_timeout: u64,
}

impl Config {
    /// Reads `.env` if there is one, then the command line and environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("loaded environment from {}", path.display()),
            Err(e) if e.not_found() => log::debug!("no .env file found"),
            Err(e) => return Err(e.into()),
        }
        Self::try_parse()?.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.telegram_token.trim().is_empty() {
            return Err(BotError::Config("TELEGRAM_TOKEN is required".to_string()));
        }
        if self.request_timeout == 0 || self.update_timeout == 0 {
            return Err(BotError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn update_timeout(&self) -> Duration {
        Duration::from_secs(self.update_timeout)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        Config::try_parse_from(["twitch-kit-bot"].iter().chain(args))?.validated()
    }

    #[test]
    fn defaults_test() {
        for key in ["TWITCH_API_HOST", "REQUEST_TIMEOUT", "UPDATE_TIMEOUT"] {
            std::env::remove_var(key);
        }
        let config = parse(&["--telegram-token", "123:abc"]).unwrap();
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.api_host.as_str(), "https://tools.2807.eu/");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.update_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn overrides_test() {
        let config = parse(&[
            "--telegram-token",
            "t",
            "--api-host",
            "http://localhost:8080",
            "--request-timeout",
            "3",
            "--update-timeout",
            "2",
        ])
        .unwrap();
        assert_eq!(config.api_host.as_str(), "http://localhost:8080/");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.update_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn blank_token_test() {
        assert!(matches!(
            parse(&["--telegram-token", "  "]),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_test() {
        assert!(matches!(
            parse(&["--telegram-token", "t", "--update-timeout", "0"]),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn invalid_host_test() {
        assert!(matches!(
            parse(&["--telegram-token", "t", "--api-host", "not a url"]),
            Err(BotError::Cli(_))
        ));
    }
}
