use crate::settings::AppSettings;
use uuid::Uuid;

pub fn conversation_path(conversation_id: Uuid) -> String {
    format!("/messages?conversation={conversation_id}")
}

pub fn get_conversation_link(conversation_id: Uuid) -> String {
    let frontend_base = &AppSettings::get().frontend_base_url;
    let path = conversation_path(conversation_id);
    format!("{frontend_base}{path}")
}
