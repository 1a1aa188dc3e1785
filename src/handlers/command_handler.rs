use crate::{
    controller::{Context, Reply},
    error::Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use teloxide::{
    types::ChatId,
    utils::command::{BotCommands, ParseError},
};

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Choose which list of a Twitch channel to look up.")]
    Start,
    #[command(description = "Display this text.")]
    Help,
}

/// Parses the leading `/command[@bot]` of a message, ignoring any arguments after it.
pub fn parse_command(text: &str, bot_username: &str) -> std::result::Result<Command, ParseError> {
    let head = text.split_whitespace().next().unwrap_or_default();
    Command::parse(head, bot_username)
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &Context, chat: ChatId) -> Result<Vec<Reply>>;
}

pub struct StartHandler;

#[async_trait]
impl CommandHandler for StartHandler {
    async fn handle(&self, _ctx: &Context, chat: ChatId) -> Result<Vec<Reply>> {
        log::debug!("got command start in {}", chat);
        Ok(vec![Reply::Menu])
    }
}

pub struct HelpHandler;

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _ctx: &Context, chat: ChatId) -> Result<Vec<Reply>> {
        log::debug!("got command help in {}", chat);
        Ok(vec![
            Reply::Text(Command::descriptions().to_string()),
            Reply::Menu,
        ])
    }
}

pub struct CommandRegistry(HashMap<Command, Box<dyn CommandHandler>>);

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self(HashMap::new());
        registry.register(Command::Start, StartHandler);
        registry.register(Command::Help, HelpHandler);
        registry
    }

    fn register(&mut self, cmd: Command, handler: impl CommandHandler + 'static) {
        self.0.insert(cmd, Box::new(handler));
    }

    pub fn get(&self, cmd: Command) -> Option<&dyn CommandHandler> {
        self.0.get(&cmd).map(Box::as_ref)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
