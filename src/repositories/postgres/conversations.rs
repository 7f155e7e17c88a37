use crate::entities::conversations::{Conversation, ConversationDetails, NewConversation};
use crate::repositories::postgres::PgStore;
use crate::repositories::{ConversationRepository, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const TABLE_NAME: &str = "conversations";
const READ_FIELDS: &str = "id, participant_1, participant_2, subject, job_id, tender_id, \
                           last_message_at, created_at, updated_at";
const DETAILS_QUERY: &str = const_str::concat!(
    "SELECT c.id, c.participant_1, c.participant_2, c.subject, c.job_id, c.tender_id, ",
    "c.last_message_at, c.created_at, c.updated_at, ",
    "p1.full_name AS participant_1_name, p1.avatar_url AS participant_1_avatar, ",
    "p1.role AS participant_1_role, ",
    "p2.full_name AS participant_2_name, p2.avatar_url AS participant_2_avatar, ",
    "p2.role AS participant_2_role, ",
    "j.title AS job_title, t.title AS tender_title ",
    "FROM conversations c ",
    "LEFT JOIN profiles p1 ON p1.id = c.participant_1 ",
    "LEFT JOIN profiles p2 ON p2.id = c.participant_2 ",
    "LEFT JOIN jobs j ON j.id = c.job_id ",
    "LEFT JOIN tenders t ON t.id = c.tender_id "
);

#[async_trait]
impl ConversationRepository for PgStore {
    async fn insert_conversation(&self, args: NewConversation<'_>) -> StoreResult<Conversation> {
        const QUERY: &str = const_str::concat!(
            "INSERT INTO ",
            TABLE_NAME,
            " (participant_1, participant_2, subject, job_id, tender_id, last_message_at) ",
            "VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING ",
            READ_FIELDS
        );
        let conversation = sqlx::query_as(QUERY)
            .bind(args.participant_1)
            .bind(args.participant_2)
            .bind(args.subject)
            .bind(args.job_id)
            .bind(args.tender_id)
            .fetch_one(self.db())
            .await?;
        Ok(conversation)
    }

    async fn fetch_conversation(&self, conversation_id: Uuid) -> StoreResult<Option<Conversation>> {
        const QUERY: &str = const_str::concat!(
            "SELECT ",
            READ_FIELDS,
            " FROM ",
            TABLE_NAME,
            " WHERE id = $1"
        );
        let conversation = sqlx::query_as(QUERY)
            .bind(conversation_id)
            .fetch_optional(self.db())
            .await?;
        Ok(conversation)
    }

    async fn fetch_conversation_details(
        &self,
        conversation_id: Uuid,
    ) -> StoreResult<Option<ConversationDetails>> {
        const QUERY: &str = const_str::concat!(DETAILS_QUERY, "WHERE c.id = $1");
        let conversation = sqlx::query_as(QUERY)
            .bind(conversation_id)
            .fetch_optional(self.db())
            .await?;
        Ok(conversation)
    }

    async fn find_by_participants(
        &self,
        participant_1: Uuid,
        participant_2: Uuid,
    ) -> StoreResult<Option<Uuid>> {
        const QUERY: &str = const_str::concat!(
            "SELECT id FROM ",
            TABLE_NAME,
            " WHERE participant_1 = $1 AND participant_2 = $2 ",
            "ORDER BY created_at ASC LIMIT 1"
        );
        let conversation_id = sqlx::query_scalar(QUERY)
            .bind(participant_1)
            .bind(participant_2)
            .fetch_optional(self.db())
            .await?;
        Ok(conversation_id)
    }

    async fn fetch_for_user(&self, user_id: Uuid) -> StoreResult<Vec<ConversationDetails>> {
        const QUERY: &str = const_str::concat!(
            DETAILS_QUERY,
            "WHERE c.participant_1 = $1 OR c.participant_2 = $1 ",
            "ORDER BY c.last_message_at DESC"
        );
        let conversations = sqlx::query_as(QUERY)
            .bind(user_id)
            .fetch_all(self.db())
            .await?;
        Ok(conversations)
    }

    async fn touch_conversation(
        &self,
        conversation_id: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        const QUERY: &str = const_str::concat!(
            "UPDATE ",
            TABLE_NAME,
            " SET last_message_at = $2, updated_at = $2 WHERE id = $1"
        );
        sqlx::query(QUERY)
            .bind(conversation_id)
            .bind(at)
            .execute(self.db())
            .await?;
        Ok(())
    }
}
