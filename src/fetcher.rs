use crate::types::{DataKind, Follow, Founder, Mod, Vip};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub const DEFAULT_API_HOST: &str = "https://tools.2807.eu";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{}", .0.no_entries_message())]
    NoEntries(DataKind),

    #[error("user not found")]
    UserNotFound,

    #[error("unexpected status code: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API host {0} cannot carry a path")]
    InvalidHost(Url),

    #[error("{0:?} is not a valid channel name")]
    InvalidChannel(String),
}

/// Source of channel relationship lists.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_follows(&self, channel: &str) -> Result<Vec<Follow>, FetchError>;
    async fn fetch_mods(&self, channel: &str) -> Result<Vec<Mod>, FetchError>;
    async fn fetch_vips(&self, channel: &str) -> Result<Vec<Vip>, FetchError>;
    async fn fetch_founders(&self, channel: &str) -> Result<Vec<Founder>, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    host: Url,
}

impl HttpFetcher {
    pub fn new(host: Url, timeout: Duration) -> Result<Self, FetchError> {
        if host.cannot_be_a_base() {
            return Err(FetchError::InvalidHost(host));
        }
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, host })
    }

    /// `<host>/api/<operation>/<channel>`, with the channel encoded as one path segment.
    ///
    /// Only Twitch logins (`[A-Za-z0-9_]+`) are accepted: the url crate drops
    /// `.` and `..` segments, which would otherwise leave the channel out of the path.
    pub fn endpoint(&self, kind: DataKind, channel: &str) -> Result<Url, FetchError> {
        if !is_valid_login(channel) {
            return Err(FetchError::InvalidChannel(channel.to_string()));
        }
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidHost(self.host.clone()))?
            .pop_if_empty()
            .extend(["api", kind.operation(), channel]);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        kind: DataKind,
        channel: &str,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.endpoint(kind, channel)?;
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        log::debug!("{} answered {} with {} bytes", kind.operation(), status, body.len());
        decode(kind, status, &body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_follows(&self, channel: &str) -> Result<Vec<Follow>, FetchError> {
        self.get(DataKind::Follows, channel).await
    }

    async fn fetch_mods(&self, channel: &str) -> Result<Vec<Mod>, FetchError> {
        self.get(DataKind::Moders, channel).await
    }

    async fn fetch_vips(&self, channel: &str) -> Result<Vec<Vip>, FetchError> {
        self.get(DataKind::Vips, channel).await
    }

    async fn fetch_founders(&self, channel: &str) -> Result<Vec<Founder>, FetchError> {
        self.get(DataKind::Founders, channel).await
    }
}

pub fn is_valid_login(channel: &str) -> bool {
    !channel.is_empty()
        && channel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Maps an API answer to records or to the error the status code stands for.
pub fn decode<T: DeserializeOwned>(
    kind: DataKind,
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<T>, FetchError> {
    match status {
        StatusCode::OK => Ok(serde_json::from_slice(body)?),
        StatusCode::BAD_REQUEST => Err(FetchError::NoEntries(kind)),
        StatusCode::NOT_FOUND => Err(FetchError::UserNotFound),
        other => Err(FetchError::UnexpectedStatus(other)),
    }
}
