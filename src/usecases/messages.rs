use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::messages::{Attachment, NewMessage};
use crate::models::messages::{MAX_MESSAGE_LENGTH, Message, MessageAttachment, MessageType};
use crate::repositories::{ConversationRepository, MessageRepository, ReadReceiptRepository};
use crate::usecases::{events, notifications};
use hashbrown::HashSet;
use tracing::warn;
use uuid::Uuid;

fn validate_content(content: &str, attachments: &[MessageAttachment]) -> ServiceResult<()> {
    if content.trim().is_empty() && attachments.is_empty() {
        return Err(AppError::MessagesEmpty);
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::MessagesTooLong);
    }
    Ok(())
}

/// Stores a message and bumps the conversation's activity timestamp.
///
/// The two writes are independent: if the second one fails the message is
/// kept and the conversation's `last_message_at` stays stale.
pub async fn send_message<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
    sender_id: Uuid,
    content: &str,
    message_type: MessageType,
    attachments: Vec<MessageAttachment>,
) -> ServiceResult<Uuid> {
    validate_content(content, &attachments)?;

    let conversation = match ctx.store().fetch_conversation(conversation_id).await {
        Ok(Some(conversation)) => conversation,
        Ok(None) => return Err(AppError::ConversationsNotFound),
        Err(e) => return unexpected(e),
    };
    let Some(recipient_id) = conversation.other_participant(sender_id) else {
        warn!(%conversation_id, %sender_id, "Sender is not a participant of the conversation");
        return Err(AppError::ConversationsNotParticipant);
    };

    let Ok(stored_attachments) = attachments
        .iter()
        .map(Attachment::try_from)
        .collect::<Result<Vec<_>, _>>()
    else {
        return Err(AppError::MessagesInvalidAttachment);
    };
    let args = NewMessage {
        conversation_id,
        sender_id,
        content,
        message_type: message_type.as_str(),
        attachments: stored_attachments,
    };
    let message = match ctx.store().insert_message(args).await {
        Ok(message) => Message::from(message),
        Err(e) => return unexpected(e),
    };

    if let Err(e) = ctx
        .store()
        .touch_conversation(conversation_id, message.timestamp)
        .await
    {
        warn!(
            %conversation_id,
            message_id = %message.id,
            "Failed to bump conversation activity: {e:?}"
        );
    }

    notifications::notify_new_message(ctx, recipient_id, &message).await;
    events::publish_new_message(ctx, recipient_id, &message).await;
    Ok(message.id)
}

/// Messages of a conversation, oldest first.
///
/// With a `viewer_id`, `read` reflects that user's read receipts; messages the
/// viewer sent themselves always count as read.
pub async fn fetch_conversation_messages<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
    viewer_id: Option<Uuid>,
) -> ServiceResult<Vec<Message>> {
    let messages = match ctx.store().fetch_messages(conversation_id).await {
        Ok(messages) => messages,
        Err(e) => return unexpected(e),
    };
    let mut messages: Vec<Message> = messages.into_iter().map(Message::from).collect();

    if let Some(viewer_id) = viewer_id {
        let receipts = match ctx.store().fetch_read_receipts(conversation_id).await {
            Ok(receipts) => receipts,
            Err(e) => return unexpected(e),
        };
        let read_ids: HashSet<Uuid> = receipts
            .into_iter()
            .filter(|r| r.user_id == viewer_id)
            .map(|r| r.message_id)
            .collect();
        for message in messages.iter_mut() {
            message.read = message.sender_id == viewer_id || read_ids.contains(&message.id);
        }
    }
    Ok(messages)
}
