use crate::entities::conversations::ConversationDetails;
use crate::models::messages::Message;
use crate::models::users::Participant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub participants: [Participant; 2],
    pub subject: Option<String>,
    /// Not populated by the conversation list query; see
    /// `usecases::conversations::fetch_conversation_summaries`.
    pub last_message: Option<Message>,
    pub unread_count: u32,
    pub job_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn other_participant(&self, user_id: Uuid) -> Option<&Participant> {
        match &self.participants {
            [a, b] if a.user_id == user_id => Some(b),
            [a, b] if b.user_id == user_id => Some(a),
            _ => None,
        }
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }
}

impl From<ConversationDetails> for Conversation {
    fn from(value: ConversationDetails) -> Self {
        let participant_1 = Participant::new(
            value.participant_1,
            value.participant_1_name,
            value.participant_1_avatar,
            value.participant_1_role.as_deref(),
        );
        let participant_2 = Participant::new(
            value.participant_2,
            value.participant_2_name,
            value.participant_2_avatar,
            value.participant_2_role.as_deref(),
        );
        Self {
            id: value.id,
            participants: [participant_1, participant_2],
            subject: value.subject,
            last_message: None,
            unread_count: 0,
            job_id: value.job_id,
            tender_id: value.tender_id,
            job_title: value.job_title.or(value.tender_title),
            last_message_at: value.last_message_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartConversationArgs {
    pub other_user_id: Uuid,
    pub subject: Option<String>,
    pub job_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactArgs {
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupArgs {
    pub other_user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationIdResponse {
    pub conversation_id: Uuid,
}
