use crate::entities::messages::{Message, NewMessage};
use crate::repositories::postgres::PgStore;
use crate::repositories::{MessageRepository, StoreResult};
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

const READ_QUERY: &str = const_str::concat!(
    "SELECT m.id, m.conversation_id, m.sender_id, p.full_name AS sender_name, ",
    "p.avatar_url AS sender_avatar, m.content, m.message_type, m.attachments, m.created_at ",
    "FROM messages m LEFT JOIN profiles p ON p.id = m.sender_id "
);

#[async_trait]
impl MessageRepository for PgStore {
    async fn insert_message(&self, args: NewMessage<'_>) -> StoreResult<Message> {
        const QUERY: &str = const_str::concat!(
            "WITH m AS (",
            "INSERT INTO messages (conversation_id, sender_id, content, message_type, attachments) ",
            "VALUES ($1, $2, $3, $4, $5) RETURNING *) ",
            "SELECT m.id, m.conversation_id, m.sender_id, p.full_name AS sender_name, ",
            "p.avatar_url AS sender_avatar, m.content, m.message_type, m.attachments, m.created_at ",
            "FROM m LEFT JOIN profiles p ON p.id = m.sender_id"
        );
        let message = sqlx::query_as(QUERY)
            .bind(args.conversation_id)
            .bind(args.sender_id)
            .bind(args.content)
            .bind(args.message_type)
            .bind(Json(args.attachments))
            .fetch_one(self.db())
            .await?;
        Ok(message)
    }

    async fn fetch_messages(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>> {
        const QUERY: &str = const_str::concat!(
            READ_QUERY,
            "WHERE m.conversation_id = $1 ORDER BY m.created_at ASC"
        );
        let messages = sqlx::query_as(QUERY)
            .bind(conversation_id)
            .fetch_all(self.db())
            .await?;
        Ok(messages)
    }

    async fn fetch_last_message(&self, conversation_id: Uuid) -> StoreResult<Option<Message>> {
        const QUERY: &str = const_str::concat!(
            READ_QUERY,
            "WHERE m.conversation_id = $1 ORDER BY m.created_at DESC LIMIT 1"
        );
        let message = sqlx::query_as(QUERY)
            .bind(conversation_id)
            .fetch_optional(self.db())
            .await?;
        Ok(message)
    }
}
