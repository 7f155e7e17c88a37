use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_1: Uuid,
    pub participant_2: Uuid,
    pub subject: Option<String>,
    pub job_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participant_1 == user_id || self.participant_2 == user_id
    }

    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        if self.participant_1 == user_id {
            Some(self.participant_2)
        } else if self.participant_2 == user_id {
            Some(self.participant_1)
        } else {
            None
        }
    }
}

/// A conversation row joined with both participant profiles and the title of
/// the job or tender it was started from.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationDetails {
    pub id: Uuid,
    pub participant_1: Uuid,
    pub participant_2: Uuid,
    pub subject: Option<String>,
    pub job_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub participant_1_name: Option<String>,
    pub participant_1_avatar: Option<String>,
    pub participant_1_role: Option<String>,
    pub participant_2_name: Option<String>,
    pub participant_2_avatar: Option<String>,
    pub participant_2_role: Option<String>,

    pub job_title: Option<String>,
    pub tender_title: Option<String>,
}

pub struct NewConversation<'a> {
    pub participant_1: Uuid,
    pub participant_2: Uuid,
    pub subject: Option<&'a str>,
    pub job_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
}
