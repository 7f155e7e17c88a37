use crate::models::messages::Message;
use serde::Serialize;
use uuid::Uuid;

/// Published after a message has been stored so that connected clients of the
/// recipient can refresh without waiting for their next fetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent<'a> {
    pub conversation_id: Uuid,
    pub recipient_id: Uuid,
    /// Absolute link to the conversation in the web client.
    pub link: String,
    pub message: &'a Message,
}

pub fn conversation_channel(conversation_id: Uuid) -> String {
    format!("messaging:conversations:{conversation_id}")
}
