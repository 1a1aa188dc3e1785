use crate::{
    chunker::{is_oversized, split_message, MESSAGE_LIMIT},
    error::Result,
    fetcher::{FetchError, Fetcher},
    formatter,
    handlers::command_handler::{parse_command, CommandRegistry},
    session::SessionStore,
    types::DataKind,
};
use std::{sync::Arc, time::Duration};
use teloxide::{types::ChatId, utils::command::ParseError};

pub const MENU_PROMPT: &str = "Select the option:";
pub const CHANNEL_PROMPT: &str = "Enter the channel name:";
pub const UNKNOWN_COMMAND: &str = "Unknown command.";
pub const UNKNOWN_OPTION: &str = "Unknown option.";

/// An update reduced to what the conversation cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Command {
        chat: ChatId,
        text: String,
    },
    Callback {
        chat: ChatId,
        query_id: String,
        data: Option<String>,
    },
    Text {
        chat: ChatId,
        text: String,
    },
}

impl Incoming {
    pub fn chat(&self) -> ChatId {
        match self {
            Incoming::Command { chat, .. }
            | Incoming::Callback { chat, .. }
            | Incoming::Text { chat, .. } => *chat,
        }
    }
}

/// Something to send back to the chat the update came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// HTML text, sent with link previews disabled.
    Html(String),
    /// [`MENU_PROMPT`] with the keyboard of data kinds.
    Menu,
    AnswerCallback(String),
}

/// Everything a handler may touch while processing one update.
pub struct Context {
    pub fetcher: Arc<dyn Fetcher>,
    pub sessions: SessionStore,
    pub bot_username: String,
}

impl Context {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        sessions: SessionStore,
        bot_username: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            sessions,
            bot_username: bot_username.into(),
        }
    }
}

pub struct Controller {
    ctx: Context,
    commands: CommandRegistry,
    update_timeout: Duration,
}

impl Controller {
    pub fn new(ctx: Context, update_timeout: Duration) -> Self {
        Self {
            ctx,
            commands: CommandRegistry::new(),
            update_timeout,
        }
    }

    pub fn update_timeout(&self) -> Duration {
        self.update_timeout
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.ctx.sessions
    }

    pub async fn handle(&self, incoming: Incoming) -> Result<Vec<Reply>> {
        match incoming {
            Incoming::Command { chat, text } => self.on_command(chat, &text).await,
            Incoming::Callback {
                chat,
                query_id,
                data,
            } => Ok(self.on_callback(chat, query_id, data.as_deref()).await),
            Incoming::Text { chat, text } => Ok(self.on_text(chat, &text).await),
        }
    }

    async fn on_command(&self, chat: ChatId, text: &str) -> Result<Vec<Reply>> {
        let cmd = match parse_command(text, &self.ctx.bot_username) {
            Ok(cmd) => cmd,
            Err(ParseError::WrongBotName(name)) => {
                log::debug!("{} addressed @{}, ignored", text, name);
                return Ok(vec![]);
            }
            Err(e) => {
                log::debug!("{}: {}", chat, e);
                self.drop_pending(chat).await;
                return Ok(vec![Reply::Text(UNKNOWN_COMMAND.to_string()), Reply::Menu]);
            }
        };

        self.drop_pending(chat).await;
        log::debug!("got command {:?} in {}", cmd, chat);
        match self.commands.get(cmd) {
            Some(handler) => handler.handle(&self.ctx, chat).await,
            None => Ok(vec![Reply::Text(UNKNOWN_COMMAND.to_string()), Reply::Menu]),
        }
    }

    async fn on_callback(&self, chat: ChatId, query_id: String, data: Option<&str>) -> Vec<Reply> {
        let mut replies = vec![Reply::AnswerCallback(query_id)];
        match data.map(str::parse::<DataKind>) {
            Some(Ok(kind)) => {
                log::debug!("{} pressed {}", chat, kind);
                self.ctx.sessions.begin(chat, kind).await;
                replies.push(Reply::Text(CHANNEL_PROMPT.to_string()));
            }
            Some(Err(e)) => {
                log::warn!("{} sent callback data we never offered: {}", chat, e);
                replies.extend([Reply::Text(UNKNOWN_OPTION.to_string()), Reply::Menu]);
            }
            None => {
                log::warn!("{} sent a callback without data", chat);
                replies.extend([Reply::Text(UNKNOWN_OPTION.to_string()), Reply::Menu]);
            }
        }
        replies
    }

    async fn on_text(&self, chat: ChatId, text: &str) -> Vec<Reply> {
        let channel = text.trim();
        if channel.is_empty() {
            return if self.ctx.sessions.is_awaiting(chat).await {
                vec![Reply::Text(CHANNEL_PROMPT.to_string())]
            } else {
                vec![Reply::Menu]
            };
        }

        let Some(session) = self.ctx.sessions.take_pending(chat).await else {
            return vec![Reply::Menu];
        };

        log::debug!("{} asked for {} of {}", chat, session.pressed, channel);
        let mut replies = match self.render(session.pressed, channel).await {
            Ok(text) => split_message(&text, MESSAGE_LIMIT)
                .into_iter()
                .inspect(|chunk| {
                    if is_oversized(chunk, MESSAGE_LIMIT) {
                        log::warn!(
                            "a single line of {} for {} exceeds {} characters",
                            session.pressed,
                            channel,
                            MESSAGE_LIMIT
                        );
                    }
                })
                .map(Reply::Html)
                .collect(),
            Err(e) => {
                log::info!("failed to fetch {} of {}: {}", session.pressed, channel, e);
                vec![Reply::Text(format!("Failed to fetch data: {}.", e))]
            }
        };
        replies.push(Reply::Menu);
        replies
    }

    async fn render(&self, kind: DataKind, channel: &str) -> std::result::Result<String, FetchError> {
        let fetcher = &self.ctx.fetcher;
        Ok(match kind {
            DataKind::Follows => formatter::format_follows(channel, &fetcher.fetch_follows(channel).await?),
            DataKind::Moders => formatter::format_mods(channel, &fetcher.fetch_mods(channel).await?),
            DataKind::Vips => formatter::format_vips(channel, &fetcher.fetch_vips(channel).await?),
            DataKind::Founders => {
                formatter::format_founders(channel, &fetcher.fetch_founders(channel).await?)
            }
        })
    }

    async fn drop_pending(&self, chat: ChatId) {
        if let Some(s) = self.ctx.sessions.clear(chat).await {
            log::debug!("{} abandoned waiting for a channel name for {}", chat, s.pressed);
        }
    }
}
