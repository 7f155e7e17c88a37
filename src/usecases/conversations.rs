use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::conversations::NewConversation;
use crate::models::conversations::Conversation;
use crate::models::messages::Message;
use crate::repositories::{ConversationRepository, MessageRepository, ReadReceiptRepository};
use crate::usecases::directory;
use tracing::info;
use uuid::Uuid;

pub async fn create_conversation<C: Context>(
    ctx: &C,
    participant_1: Uuid,
    participant_2: Uuid,
    subject: Option<&str>,
    job_id: Option<Uuid>,
    tender_id: Option<Uuid>,
) -> ServiceResult<Uuid> {
    if participant_1 == participant_2 {
        return Err(AppError::ConversationsSameParticipant);
    }
    let args = NewConversation {
        participant_1,
        participant_2,
        subject,
        job_id,
        tender_id,
    };
    match ctx.store().insert_conversation(args).await {
        Ok(conversation) => {
            info!(
                conversation_id = %conversation.id,
                %participant_1,
                %participant_2,
                "Created conversation"
            );
            Ok(conversation.id)
        }
        Err(e) => unexpected(e),
    }
}

/// Looks up the conversation between two users regardless of which slot
/// either of them was stored in.
pub async fn find_existing_conversation<C: Context>(
    ctx: &C,
    user_a: Uuid,
    user_b: Uuid,
) -> ServiceResult<Option<Uuid>> {
    for (participant_1, participant_2) in [(user_a, user_b), (user_b, user_a)] {
        match ctx
            .store()
            .find_by_participants(participant_1, participant_2)
            .await
        {
            Ok(Some(conversation_id)) => return Ok(Some(conversation_id)),
            Ok(None) => continue,
            Err(e) => return unexpected(e),
        }
    }
    Ok(None)
}

pub async fn find_or_create_conversation<C: Context>(
    ctx: &C,
    initiator_id: Uuid,
    recipient_id: Uuid,
    subject: Option<&str>,
    job_id: Option<Uuid>,
    tender_id: Option<Uuid>,
) -> ServiceResult<Uuid> {
    if let Some(conversation_id) = find_existing_conversation(ctx, initiator_id, recipient_id).await?
    {
        return Ok(conversation_id);
    }
    create_conversation(ctx, initiator_id, recipient_id, subject, job_id, tender_id).await
}

pub async fn fetch_conversation<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
) -> ServiceResult<Option<Conversation>> {
    match ctx.store().fetch_conversation_details(conversation_id).await {
        Ok(details) => Ok(details.map(Conversation::from)),
        Err(e) => unexpected(e),
    }
}

/// Fetches a conversation on behalf of one of its participants.
pub async fn fetch_for_participant<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
    user_id: Uuid,
) -> ServiceResult<Conversation> {
    let conversation = fetch_conversation(ctx, conversation_id)
        .await?
        .ok_or(AppError::ConversationsNotFound)?;
    if !conversation.has_participant(user_id) {
        return Err(AppError::ConversationsNotParticipant);
    }
    Ok(conversation)
}

/// Conversations the user takes part in, most recently active first.
///
/// `last_message` and `unread_count` are left empty; use
/// [`fetch_conversation_summaries`] when those are needed.
pub async fn fetch_user_conversations<C: Context>(
    ctx: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<Conversation>> {
    match ctx.store().fetch_for_user(user_id).await {
        Ok(conversations) => Ok(conversations.into_iter().map(Conversation::from).collect()),
        Err(e) => unexpected(e),
    }
}

/// Like [`fetch_user_conversations`], with the last message and the user's
/// unread count filled in for every conversation.
pub async fn fetch_conversation_summaries<C: Context>(
    ctx: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<Conversation>> {
    let mut conversations = fetch_user_conversations(ctx, user_id).await?;
    for conversation in conversations.iter_mut() {
        let unread_count = match ctx.store().count_unread(conversation.id, user_id).await {
            Ok(count) => count.max(0) as u32,
            Err(e) => return unexpected(e),
        };
        let last_message = match ctx.store().fetch_last_message(conversation.id).await {
            Ok(message) => message.map(Message::from),
            Err(e) => return unexpected(e),
        };
        conversation.unread_count = unread_count;
        conversation.last_message = last_message.map(|mut message| {
            // Receipts are written for the whole conversation at once, so any
            // unread message means the newest one from the other side is unread.
            message.read = message.sender_id == user_id || unread_count == 0;
            message
        });
    }
    Ok(conversations)
}

pub async fn start_conversation_with_contractor<C: Context>(
    ctx: &C,
    viewer_id: Uuid,
    contractor_id: Uuid,
    subject: Option<&str>,
) -> ServiceResult<Uuid> {
    let Some(contractor) = directory::fetch_contractor(ctx, contractor_id).await? else {
        return Err(AppError::ContractorsNotFound);
    };
    let Some(recipient_id) = contractor.user_id else {
        return Err(AppError::UsersNotFound);
    };
    let subject = subject.map(str::to_string).unwrap_or_else(|| {
        format!("Collaboration with {}", contractor.company_name)
    });
    find_or_create_conversation(ctx, viewer_id, recipient_id, Some(&subject), None, None).await
}

pub async fn start_conversation_with_manager<C: Context>(
    ctx: &C,
    viewer_id: Uuid,
    manager_id: Uuid,
    subject: Option<&str>,
) -> ServiceResult<Uuid> {
    let Some(recipient_id) = directory::resolve_manager_user(ctx, manager_id).await? else {
        return Err(AppError::ManagersNotFound);
    };
    find_or_create_conversation(ctx, viewer_id, recipient_id, subject, None, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::messages::MessageType;
    use crate::models::users::UserRole;
    use crate::repositories::memory::StoreOperation;
    use crate::usecases::testing::TestContext;
    use crate::usecases::{messages, read_receipts};

    #[tokio::test]
    async fn lookup_is_order_independent() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let conversation_id = create_conversation(&ctx, a, b, Some("Gutters"), None, None)
            .await
            .unwrap();

        assert_eq!(
            find_existing_conversation(&ctx, a, b).await.unwrap(),
            Some(conversation_id)
        );
        assert_eq!(
            find_existing_conversation(&ctx, b, a).await.unwrap(),
            Some(conversation_id)
        );
    }

    #[tokio::test]
    async fn missing_conversation_is_not_an_error() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        assert_eq!(find_existing_conversation(&ctx, a, b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lookup_failure_is_a_store_error() {
        let ctx = TestContext::default();
        ctx.store.fail_on(StoreOperation::FetchConversations).await;
        let result = find_existing_conversation(&ctx, Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(result, Err(AppError::Unexpected));
    }

    #[tokio::test]
    async fn unknown_participant_fails_at_the_store() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let result = create_conversation(&ctx, a, Uuid::new_v4(), None, None, None).await;
        assert_eq!(result, Err(AppError::Unexpected));
        assert_eq!(ctx.store.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn same_participant_twice_is_rejected() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let result = create_conversation(&ctx, a, a, None, None, None).await;
        assert_eq!(result, Err(AppError::ConversationsSameParticipant));
    }

    #[tokio::test]
    async fn find_or_create_reuses_existing_conversation() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let first = find_or_create_conversation(&ctx, a, b, None, None, None)
            .await
            .unwrap();
        let second = find_or_create_conversation(&ctx, b, a, None, None, None)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.store.conversation_count().await, 1);
    }

    #[tokio::test]
    async fn conversation_list_joins_profiles_and_job_title() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let job_id = Uuid::new_v4();
        ctx.store.add_job(job_id, "Fix the lift").await;
        let conversation_id = create_conversation(&ctx, a, b, None, Some(job_id), None)
            .await
            .unwrap();
        messages::send_message(&ctx, conversation_id, a, "Hello", MessageType::Text, vec![])
            .await
            .unwrap();

        let conversations = fetch_user_conversations(&ctx, b).await.unwrap();
        assert_eq!(conversations.len(), 1);
        let conversation = &conversations[0];
        assert_eq!(conversation.job_title.as_deref(), Some("Fix the lift"));
        assert_eq!(conversation.participants[0].role, UserRole::Manager);
        assert_eq!(conversation.participants[1].name, "Bob");
        assert!(!conversation.participants[1].is_online);
        assert_eq!(conversation.last_message, None);
        assert_eq!(conversation.unread_count, 0);
    }

    #[tokio::test]
    async fn tender_title_is_used_without_a_job() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let tender_id = Uuid::new_v4();
        ctx.store.add_tender(tender_id, "Annual grounds maintenance").await;
        let conversation_id = create_conversation(&ctx, a, b, None, None, Some(tender_id))
            .await
            .unwrap();
        let conversation = fetch_conversation(&ctx, conversation_id).await.unwrap().unwrap();
        assert_eq!(
            conversation.job_title.as_deref(),
            Some("Annual grounds maintenance")
        );
    }

    #[tokio::test]
    async fn collaboration_scenario_counts_the_unread_message() {
        let ctx = TestContext::default();
        let manager = ctx.add_user("Alice", "manager").await;
        let contractor_user = ctx.add_user("Bob", "contractor").await;
        let contractor = ctx.add_contractor("Bob's Roofing", Some(contractor_user)).await;

        let conversation_id = start_conversation_with_contractor(&ctx, manager, contractor, None)
            .await
            .unwrap();
        messages::send_message(
            &ctx,
            conversation_id,
            manager,
            "Interested in your services",
            MessageType::Text,
            vec![],
        )
        .await
        .unwrap();

        let conversations = fetch_conversation_summaries(&ctx, contractor_user)
            .await
            .unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].unread_count, 1);
        let last_message = conversations[0].last_message.as_ref().unwrap();
        assert_eq!(last_message.content, "Interested in your services");
        assert!(!last_message.read);

        let history = messages::fetch_conversation_messages(&ctx, conversation_id, None)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);

        read_receipts::mark_messages_as_read(&ctx, conversation_id, contractor_user)
            .await
            .unwrap();
        let conversations = fetch_conversation_summaries(&ctx, contractor_user)
            .await
            .unwrap();
        assert_eq!(conversations[0].unread_count, 0);
    }

    #[tokio::test]
    async fn unlinked_manager_cannot_be_contacted() {
        let ctx = TestContext::default();
        let viewer = ctx.add_user("Bob", "contractor").await;
        let result = start_conversation_with_manager(&ctx, viewer, Uuid::new_v4(), None).await;
        assert_eq!(result, Err(AppError::ManagersNotFound));
    }

    #[tokio::test]
    async fn outsiders_cannot_fetch_a_conversation() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let c = ctx.add_user("Carol", "contractor").await;
        let conversation_id = create_conversation(&ctx, a, b, None, None, None)
            .await
            .unwrap();
        let result = fetch_for_participant(&ctx, conversation_id, c).await;
        assert_eq!(result, Err(AppError::ConversationsNotParticipant));
        let result = fetch_for_participant(&ctx, Uuid::new_v4(), a).await;
        assert_eq!(result, Err(AppError::ConversationsNotFound));
    }
}
