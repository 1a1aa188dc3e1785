use crate::controller::{Controller, Incoming};
use std::sync::Arc;
use teloxide::prelude::*;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    controller: Arc<Controller>,
) -> ResponseResult<()> {
    log::debug!("got callback {:?} from {}", q.data, q.from.id);
    super::process(bot, controller, to_incoming(&q)).await
}

/// Buttons live on the bot's own messages; without one the presser's private chat is used.
pub fn to_incoming(q: &CallbackQuery) -> Incoming {
    let chat = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| q.from.id.into());
    Incoming::Callback {
        chat,
        query_id: q.id.clone(),
        data: q.data.clone(),
    }
}

#[cfg(test)]
mod callback_handler_test {
    use super::*;
    use teloxide::types::ChatId;

    const FROM: &str = r#""from": {
        "id": 7,
        "is_bot": false,
        "first_name": "Foo",
        "username": "Foo_Bar",
        "language_code": "en"
    }"#;

    #[test]
    fn callback_on_message_test() {
        let q = serde_json::from_str::<CallbackQuery>(&format!(
            r#"{{
            "id": "4382",
            {},
            "message": {{
                "message_id": 10,
                "date": 1689699600,
                "chat": {{
                    "id": -1001,
                    "title": "test",
                    "type": "supergroup",
                    "is_forum": false
                }},
                "text": "Select the option:",
                "entities": [],
                "is_topic_message": false,
                "is_automatic_forward": false,
                "has_protected_content": false
            }},
            "chat_instance": "-5",
            "data": "vips"
        }}"#,
            FROM
        ))
        .unwrap();
        assert_eq!(
            to_incoming(&q),
            Incoming::Callback {
                chat: ChatId(-1001),
                query_id: "4382".to_string(),
                data: Some("vips".to_string())
            }
        );
    }

    #[test]
    fn callback_without_message_test() {
        let q = serde_json::from_str::<CallbackQuery>(&format!(
            r#"{{
            "id": "4383",
            {},
            "inline_message_id": "AAA",
            "chat_instance": "-5",
            "data": "founders"
        }}"#,
            FROM
        ))
        .unwrap();
        assert_eq!(to_incoming(&q).chat(), ChatId(7));
    }
}
