//! In-process store used for the `mock` data source and in tests.
//!
//! Enforces the same constraints the hosted schema does: participants must
//! reference existing profiles, messages must reference an existing
//! conversation, and read receipts are unique per `(message_id, user_id)`.

use crate::entities::contractors::Contractor;
use crate::entities::conversations::{Conversation, ConversationDetails, NewConversation};
use crate::entities::managers::PropertyManager;
use crate::entities::messages::{Message, NewMessage};
use crate::entities::notifications::{NewNotification, Notification};
use crate::entities::profiles::Profile;
use crate::entities::read_receipts::ReadReceipt;
use crate::repositories::{
    ConversationRepository, DirectoryRepository, MessageRepository, NotificationRepository,
    ReadReceiptRepository, StoreResult,
};
use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashbrown::{HashMap, HashSet};
use sqlx::types::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    InsertConversation,
    FetchConversations,
    InsertMessage,
    FetchMessages,
    TouchConversation,
    InsertReadReceipts,
    InsertNotification,
    FetchDirectory,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    contractors: HashMap<Uuid, Contractor>,
    managers: HashMap<Uuid, PropertyManager>,
    jobs: HashMap<Uuid, String>,
    tenders: HashMap<Uuid, String>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    read_receipts: Vec<ReadReceipt>,
    notifications: Vec<Notification>,
    failing: HashSet<StoreOperation>,
}

impl Tables {
    fn check(&self, operation: StoreOperation) -> StoreResult<()> {
        if self.failing.contains(&operation) {
            bail!("simulated store failure during {operation:?}");
        }
        Ok(())
    }

    fn details(&self, conversation: &Conversation) -> ConversationDetails {
        let p1 = self.profiles.get(&conversation.participant_1);
        let p2 = self.profiles.get(&conversation.participant_2);
        ConversationDetails {
            id: conversation.id,
            participant_1: conversation.participant_1,
            participant_2: conversation.participant_2,
            subject: conversation.subject.clone(),
            job_id: conversation.job_id,
            tender_id: conversation.tender_id,
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            participant_1_name: p1.and_then(|p| p.full_name.clone()),
            participant_1_avatar: p1.and_then(|p| p.avatar_url.clone()),
            participant_1_role: p1.map(|p| p.role.clone()),
            participant_2_name: p2.and_then(|p| p.full_name.clone()),
            participant_2_avatar: p2.and_then(|p| p.avatar_url.clone()),
            participant_2_role: p2.map(|p| p.role.clone()),
            job_title: conversation.job_id.and_then(|id| self.jobs.get(&id).cloned()),
            tender_title: conversation
                .tender_id
                .and_then(|id| self.tenders.get(&id).cloned()),
        }
    }

    fn is_read_by(&self, message_id: Uuid, user_id: Uuid) -> bool {
        self.read_receipts
            .iter()
            .any(|r| r.message_id == message_id && r.user_id == user_id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_profile(&self, profile: Profile) {
        let mut tables = self.tables.write().await;
        tables.profiles.insert(profile.id, profile);
    }

    pub async fn add_contractor(&self, contractor: Contractor) {
        let mut tables = self.tables.write().await;
        tables.contractors.insert(contractor.id, contractor);
    }

    pub async fn add_manager(&self, manager: PropertyManager) {
        let mut tables = self.tables.write().await;
        tables.managers.insert(manager.id, manager);
    }

    pub async fn add_job(&self, job_id: Uuid, title: &str) {
        let mut tables = self.tables.write().await;
        tables.jobs.insert(job_id, title.to_string());
    }

    pub async fn add_tender(&self, tender_id: Uuid, title: &str) {
        let mut tables = self.tables.write().await;
        tables.tenders.insert(tender_id, title.to_string());
    }

    pub async fn fail_on(&self, operation: StoreOperation) {
        self.tables.write().await.failing.insert(operation);
    }

    pub async fn recover(&self, operation: StoreOperation) {
        self.tables.write().await.failing.remove(&operation);
    }

    pub async fn conversation_count(&self) -> usize {
        self.tables.read().await.conversations.len()
    }

    pub async fn message_count(&self) -> usize {
        self.tables.read().await.messages.len()
    }

    /// A small, fixed data set for running the service without a database.
    pub async fn with_demo_data() -> Self {
        let store = Self::new();
        let manager_user = Uuid::from_u128(0x1);
        let contractor_user = Uuid::from_u128(0x2);
        store
            .add_profile(Profile {
                id: manager_user,
                full_name: Some("Alice Morgan".to_string()),
                avatar_url: None,
                role: "manager".to_string(),
            })
            .await;
        store
            .add_profile(Profile {
                id: contractor_user,
                full_name: Some("Bob Fletcher".to_string()),
                avatar_url: None,
                role: "contractor".to_string(),
            })
            .await;
        store
            .add_manager(PropertyManager {
                id: Uuid::from_u128(0x10),
                user_id: Some(manager_user),
                company_name: "Morgan Lettings".to_string(),
            })
            .await;
        store
            .add_contractor(Contractor {
                id: Uuid::from_u128(0x20),
                user_id: Some(contractor_user),
                company_name: "Fletcher Roofing".to_string(),
            })
            .await;
        store
            .add_contractor(Contractor {
                id: Uuid::from_u128(0x21),
                user_id: None,
                company_name: "Unclaimed Plumbing Ltd".to_string(),
            })
            .await;
        store
            .add_job(Uuid::from_u128(0x100), "Replace communal boiler")
            .await;
        store
    }
}

#[async_trait]
impl ConversationRepository for MemoryStore {
    async fn insert_conversation(&self, args: NewConversation<'_>) -> StoreResult<Conversation> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOperation::InsertConversation)?;
        for participant in [args.participant_1, args.participant_2] {
            if !tables.profiles.contains_key(&participant) {
                bail!("foreign key violation: participant {participant} has no profile");
            }
        }
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_1: args.participant_1,
            participant_2: args.participant_2,
            subject: args.subject.map(str::to_string),
            job_id: args.job_id,
            tender_id: args.tender_id,
            last_message_at: now,
            created_at: now,
            updated_at: now,
        };
        tables.conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn fetch_conversation(&self, conversation_id: Uuid) -> StoreResult<Option<Conversation>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchConversations)?;
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned())
    }

    async fn fetch_conversation_details(
        &self,
        conversation_id: Uuid,
    ) -> StoreResult<Option<ConversationDetails>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchConversations)?;
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .map(|c| tables.details(c)))
    }

    async fn find_by_participants(
        &self,
        participant_1: Uuid,
        participant_2: Uuid,
    ) -> StoreResult<Option<Uuid>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchConversations)?;
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.participant_1 == participant_1 && c.participant_2 == participant_2)
            .map(|c| c.id))
    }

    async fn fetch_for_user(&self, user_id: Uuid) -> StoreResult<Vec<ConversationDetails>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchConversations)?;
        let mut conversations: Vec<_> = tables
            .conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .map(|c| tables.details(c))
            .collect();
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(conversations)
    }

    async fn touch_conversation(
        &self,
        conversation_id: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOperation::TouchConversation)?;
        if let Some(conversation) = tables
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.last_message_at = at;
            conversation.updated_at = at;
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn insert_message(&self, args: NewMessage<'_>) -> StoreResult<Message> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOperation::InsertMessage)?;
        if !tables
            .conversations
            .iter()
            .any(|c| c.id == args.conversation_id)
        {
            bail!(
                "foreign key violation: conversation {} does not exist",
                args.conversation_id
            );
        }
        // Keep creation times non-decreasing even when the clock is coarse.
        let now = Utc::now();
        let created_at = tables
            .messages
            .last()
            .map(|m| m.created_at.max(now))
            .unwrap_or(now);
        let sender = tables.profiles.get(&args.sender_id);
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: args.conversation_id,
            sender_id: args.sender_id,
            sender_name: sender.and_then(|p| p.full_name.clone()),
            sender_avatar: sender.and_then(|p| p.avatar_url.clone()),
            content: args.content.to_string(),
            message_type: args.message_type.to_string(),
            attachments: Json(args.attachments),
            created_at,
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn fetch_messages(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchMessages)?;
        let mut messages: Vec<_> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn fetch_last_message(&self, conversation_id: Uuid) -> StoreResult<Option<Message>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchMessages)?;
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .max_by_key(|m| m.created_at)
            .cloned())
    }
}

#[async_trait]
impl ReadReceiptRepository for MemoryStore {
    async fn insert_read_receipts(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOperation::InsertReadReceipts)?;
        let unread: Vec<Uuid> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != user_id)
            .filter(|m| !tables.is_read_by(m.id, user_id))
            .map(|m| m.id)
            .collect();
        let read_at = Utc::now();
        for message_id in &unread {
            tables.read_receipts.push(ReadReceipt {
                message_id: *message_id,
                user_id,
                read_at,
            });
        }
        Ok(unread.len() as u64)
    }

    async fn fetch_read_receipts(&self, conversation_id: Uuid) -> StoreResult<Vec<ReadReceipt>> {
        let tables = self.tables.read().await;
        let message_ids: HashSet<Uuid> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .map(|m| m.id)
            .collect();
        Ok(tables
            .read_receipts
            .iter()
            .filter(|r| message_ids.contains(&r.message_id))
            .cloned()
            .collect())
    }

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchMessages)?;
        let unread = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != user_id)
            .filter(|m| !tables.is_read_by(m.id, user_id))
            .count();
        Ok(unread as i64)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert_notification(&self, args: NewNotification<'_>) -> StoreResult<Uuid> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOperation::InsertNotification)?;
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: args.user_id,
            kind: args.kind.to_string(),
            title: args.title.to_string(),
            message: args.message.to_string(),
            data: args.data,
            action_url: args.action_url.map(str::to_string),
            priority: args.priority.to_string(),
            created_at: Utc::now(),
        };
        let notification_id = notification.id;
        tables.notifications.push(notification);
        Ok(notification_id)
    }

    async fn fetch_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let mut notifications: Vec<_> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.reverse();
        Ok(notifications)
    }
}

#[async_trait]
impl DirectoryRepository for MemoryStore {
    async fn fetch_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchDirectory)?;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn fetch_contractor(&self, contractor_id: Uuid) -> StoreResult<Option<Contractor>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchDirectory)?;
        Ok(tables.contractors.get(&contractor_id).cloned())
    }

    async fn fetch_manager(&self, manager_id: Uuid) -> StoreResult<Option<PropertyManager>> {
        let tables = self.tables.read().await;
        tables.check(StoreOperation::FetchDirectory)?;
        Ok(tables.managers.get(&manager_id).cloned())
    }
}
