use crate::fetcher::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("failed to initialize bot: {0}")]
    Init(teloxide::RequestError),

    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("failed to fetch data: {0}")]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, BotError>;
