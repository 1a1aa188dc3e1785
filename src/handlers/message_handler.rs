use crate::controller::{Controller, Incoming};
use std::sync::Arc;
use teloxide::prelude::*;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    controller: Arc<Controller>,
) -> ResponseResult<()> {
    log::debug!("got message {} in {}", msg.id.0, msg.chat.id);
    super::process(bot, controller, to_incoming(&msg)).await
}

/// Slash-prefixed text is a command; anything else, even without text, is plain input.
pub fn to_incoming(msg: &Message) -> Incoming {
    let chat = msg.chat.id;
    match msg.text() {
        Some(text) if text.starts_with('/') => Incoming::Command {
            chat,
            text: text.to_string(),
        },
        text => Incoming::Text {
            chat,
            text: text.unwrap_or_default().to_string(),
        },
    }
}
