use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::common::website;
use crate::entities::notifications::NewNotification;
use crate::models::messages::Message;
use crate::models::notifications::{Notification, NotificationKind, NotificationPriority};
use crate::repositories::NotificationRepository;
use tracing::warn;
use uuid::Uuid;

const PREVIEW_LENGTH: usize = 100;

#[allow(clippy::too_many_arguments)]
pub async fn create_notification<C: Context>(
    ctx: &C,
    user_id: Uuid,
    kind: NotificationKind,
    title: &str,
    message: &str,
    data: serde_json::Value,
    action_url: Option<&str>,
    priority: NotificationPriority,
) -> ServiceResult<Uuid> {
    let args = NewNotification {
        user_id,
        kind: kind.as_str(),
        title,
        message,
        data,
        action_url,
        priority: priority.as_str(),
    };
    match ctx.store().insert_notification(args).await {
        Ok(notification_id) => Ok(notification_id),
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_notifications<C: Context>(
    ctx: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<Notification>> {
    match ctx.store().fetch_notifications(user_id).await {
        Ok(notifications) => Ok(notifications.into_iter().map(Notification::from).collect()),
        Err(e) => unexpected(e),
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LENGTH {
        return content.to_string();
    }
    let truncated: String = content.chars().take(PREVIEW_LENGTH).collect();
    format!("{}...", truncated.trim_end())
}

/// Best effort: a failure is logged and otherwise ignored.
pub async fn notify_new_message<C: Context>(ctx: &C, recipient_id: Uuid, message: &Message) {
    let title = format!("New message from {}", message.sender_name);
    let body = if message.content.trim().is_empty() {
        format!("{} attachment(s)", message.attachments.len())
    } else {
        preview(&message.content)
    };
    let data = serde_json::json!({
        "conversationId": message.conversation_id,
        "messageId": message.id,
        "senderId": message.sender_id,
    });
    let action_url = website::conversation_path(message.conversation_id);
    if let Err(e) = create_notification(
        ctx,
        recipient_id,
        NotificationKind::NewMessage,
        &title,
        &body,
        data,
        Some(&action_url),
        NotificationPriority::Normal,
    )
    .await
    {
        warn!(
            %recipient_id,
            message_id = %message.id,
            code = e.code(),
            "Failed to create message notification"
        );
    }
}
