//! Storage seam for the messaging tables.
//!
//! Both implementations hand out row shapes from [`crate::entities`]; turning
//! them into domain models is the job of the usecases.

pub mod memory;
pub mod postgres;

use crate::entities::contractors::Contractor;
use crate::entities::conversations::{Conversation, ConversationDetails, NewConversation};
use crate::entities::managers::PropertyManager;
use crate::entities::messages::{Message, NewMessage};
use crate::entities::notifications::{NewNotification, Notification};
use crate::entities::profiles::Profile;
use crate::entities::read_receipts::ReadReceipt;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub type StoreResult<T> = anyhow::Result<T>;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn insert_conversation(&self, args: NewConversation<'_>) -> StoreResult<Conversation>;

    async fn fetch_conversation(&self, conversation_id: Uuid) -> StoreResult<Option<Conversation>>;

    async fn fetch_conversation_details(
        &self,
        conversation_id: Uuid,
    ) -> StoreResult<Option<ConversationDetails>>;

    /// Matches the exact slot ordering only.
    async fn find_by_participants(
        &self,
        participant_1: Uuid,
        participant_2: Uuid,
    ) -> StoreResult<Option<Uuid>>;

    /// Every conversation the user takes part in, most recently active first.
    async fn fetch_for_user(&self, user_id: Uuid) -> StoreResult<Vec<ConversationDetails>>;

    async fn touch_conversation(&self, conversation_id: Uuid, at: DateTime<Utc>)
    -> StoreResult<()>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, args: NewMessage<'_>) -> StoreResult<Message>;

    /// Oldest first.
    async fn fetch_messages(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>>;

    async fn fetch_last_message(&self, conversation_id: Uuid) -> StoreResult<Option<Message>>;
}

#[async_trait]
pub trait ReadReceiptRepository: Send + Sync {
    /// Writes a receipt for every message in the conversation not sent by the
    /// user, skipping receipts that already exist. Returns how many were new.
    async fn insert_read_receipts(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<u64>;

    async fn fetch_read_receipts(&self, conversation_id: Uuid) -> StoreResult<Vec<ReadReceipt>>;

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<i64>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_notification(&self, args: NewNotification<'_>) -> StoreResult<Uuid>;

    async fn fetch_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>>;
}

#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn fetch_contractor(&self, contractor_id: Uuid) -> StoreResult<Option<Contractor>>;

    async fn fetch_manager(&self, manager_id: Uuid) -> StoreResult<Option<PropertyManager>>;
}

pub trait Store:
    ConversationRepository
    + MessageRepository
    + ReadReceiptRepository
    + NotificationRepository
    + DirectoryRepository
{
}

impl<T> Store for T where
    T: ConversationRepository
        + MessageRepository
        + ReadReceiptRepository
        + NotificationRepository
        + DirectoryRepository
{
}
