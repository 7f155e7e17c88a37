use crate::entities::messages::{Attachment as AttachmentEntity, Message as MessageEntity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    System,
    ApplicationUpdate,
}

impl MessageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::System => "system",
            MessageType::ApplicationUpdate => "application_update",
        }
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        match value {
            "system" => MessageType::System,
            "application_update" => MessageType::ApplicationUpdate,
            _ => MessageType::Text,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    Image,
    Document,
    #[default]
    Other,
}

impl AttachmentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttachmentType::Image => "image",
            AttachmentType::Document => "document",
            AttachmentType::Other => "other",
        }
    }

    /// Classifies a file by its extension.
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "heic" | "svg" => AttachmentType::Image,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "odt" | "txt" | "csv" => {
                AttachmentType::Document
            }
            _ => AttachmentType::Other,
        }
    }
}

impl From<&str> for AttachmentType {
    fn from(value: &str) -> Self {
        match value {
            "image" => AttachmentType::Image,
            "document" => AttachmentType::Document,
            _ => AttachmentType::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttachment {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
    pub size: u64,
}

impl From<AttachmentEntity> for MessageAttachment {
    fn from(value: AttachmentEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            url: value.url,
            attachment_type: AttachmentType::from(value.kind.as_str()),
            size: value.size.max(0) as u64,
        }
    }
}

/// Fails when `size` does not fit the stored column.
impl TryFrom<&MessageAttachment> for AttachmentEntity {
    type Error = std::num::TryFromIntError;

    fn try_from(value: &MessageAttachment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            name: value.name.clone(),
            url: value.url.clone(),
            kind: value.attachment_type.as_str().to_string(),
            size: i64::try_from(value.size)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub attachments: Vec<MessageAttachment>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
}

impl From<MessageEntity> for Message {
    fn from(value: MessageEntity) -> Self {
        Self {
            id: value.id,
            conversation_id: value.conversation_id,
            sender_id: value.sender_id,
            sender_name: value
                .sender_name
                .unwrap_or_else(|| crate::models::users::Participant::UNKNOWN_NAME.to_string()),
            sender_avatar: value.sender_avatar,
            content: value.content,
            timestamp: value.created_at,
            read: false,
            attachments: value
                .attachments
                .0
                .into_iter()
                .map(MessageAttachment::from)
                .collect(),
            message_type: MessageType::from(value.message_type.as_str()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageArgs {
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<MessageAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MarkAsReadResponse {
    pub success: bool,
}
