use crate::common::context::Context;
use crate::common::redis_json::Json;
use crate::common::website;
use crate::models::events::{NewMessageEvent, conversation_channel};
use crate::models::messages::Message;
use redis::AsyncCommands;
use tracing::{debug, warn};
use uuid::Uuid;

/// Publishes a [`NewMessageEvent`] when Redis is configured. Best effort.
pub async fn publish_new_message<C: Context>(ctx: &C, recipient_id: Uuid, message: &Message) {
    let Some(conn) = ctx.redis().await else {
        return;
    };
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(e) => {
            warn!(message_id = %message.id, "Failed to acquire redis connection: {e}");
            return;
        }
    };

    let event = NewMessageEvent {
        conversation_id: message.conversation_id,
        recipient_id,
        link: website::get_conversation_link(message.conversation_id),
        message,
    };
    let payload = match Json::encode(&event) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(message_id = %message.id, "Failed to encode message event: {e}");
            return;
        }
    };
    let channel = conversation_channel(message.conversation_id);
    let result: redis::RedisResult<i64> = conn.publish(&channel, payload).await;
    match result {
        Ok(receivers) => debug!(channel = %channel, receivers, "Published message event"),
        Err(e) => warn!(channel = %channel, "Failed to publish message event: {e}"),
    }
}
