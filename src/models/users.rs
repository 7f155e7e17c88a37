use crate::entities::profiles::Profile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Manager,
    #[default]
    Contractor,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Contractor => "contractor",
        }
    }

    /// Unknown roles are treated as contractors, the larger user group.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("manager") | Some("property_manager") => UserRole::Manager,
            _ => UserRole::Contractor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    /// There is no presence channel, so this is always `false`.
    pub is_online: bool,
}

impl Participant {
    pub const UNKNOWN_NAME: &'static str = "Unknown user";

    pub fn new(
        user_id: Uuid,
        name: Option<String>,
        avatar: Option<String>,
        role: Option<&str>,
    ) -> Self {
        Self {
            user_id,
            name: name.unwrap_or_else(|| Self::UNKNOWN_NAME.to_string()),
            avatar,
            role: UserRole::from_db(role),
            is_online: false,
        }
    }
}

impl From<Profile> for Participant {
    fn from(value: Profile) -> Self {
        Participant::new(
            value.id,
            value.full_name,
            value.avatar_url,
            Some(value.role.as_str()),
        )
    }
}
