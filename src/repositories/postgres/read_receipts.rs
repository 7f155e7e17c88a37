use crate::entities::read_receipts::ReadReceipt;
use crate::repositories::postgres::PgStore;
use crate::repositories::{ReadReceiptRepository, StoreResult};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl ReadReceiptRepository for PgStore {
    async fn insert_read_receipts(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<u64> {
        const QUERY: &str = const_str::concat!(
            "INSERT INTO message_read_status (message_id, user_id, read_at) ",
            "SELECT m.id, $2, NOW() FROM messages m ",
            "WHERE m.conversation_id = $1 AND m.sender_id <> $2 ",
            "ON CONFLICT (message_id, user_id) DO NOTHING"
        );
        let result = sqlx::query(QUERY)
            .bind(conversation_id)
            .bind(user_id)
            .execute(self.db())
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_read_receipts(&self, conversation_id: Uuid) -> StoreResult<Vec<ReadReceipt>> {
        const QUERY: &str = const_str::concat!(
            "SELECT r.message_id, r.user_id, r.read_at FROM message_read_status r ",
            "INNER JOIN messages m ON m.id = r.message_id ",
            "WHERE m.conversation_id = $1 ORDER BY r.read_at ASC"
        );
        let receipts = sqlx::query_as(QUERY)
            .bind(conversation_id)
            .fetch_all(self.db())
            .await?;
        Ok(receipts)
    }

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<i64> {
        const QUERY: &str = const_str::concat!(
            "SELECT COUNT(*) FROM messages m ",
            "WHERE m.conversation_id = $1 AND m.sender_id <> $2 AND NOT EXISTS (",
            "SELECT 1 FROM message_read_status r ",
            "WHERE r.message_id = m.id AND r.user_id = $2)"
        );
        let unread = sqlx::query_scalar(QUERY)
            .bind(conversation_id)
            .bind(user_id)
            .fetch_one(self.db())
            .await?;
        Ok(unread)
    }
}
