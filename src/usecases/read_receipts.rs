use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::repositories::ReadReceiptRepository;
use tracing::debug;
use uuid::Uuid;

/// Marks every message in the conversation that `user_id` did not send as
/// read by them. Existing receipts are left untouched, so repeating the call
/// is a no-op.
pub async fn mark_messages_as_read<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
    user_id: Uuid,
) -> ServiceResult<bool> {
    match ctx
        .store()
        .insert_read_receipts(conversation_id, user_id)
        .await
    {
        Ok(written) => {
            debug!(%conversation_id, %user_id, written, "Marked messages as read");
            Ok(true)
        }
        Err(e) => unexpected(e),
    }
}

pub async fn count_unread<C: Context>(
    ctx: &C,
    conversation_id: Uuid,
    user_id: Uuid,
) -> ServiceResult<u32> {
    match ctx.store().count_unread(conversation_id, user_id).await {
        Ok(count) => Ok(count.max(0) as u32),
        Err(e) => unexpected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::messages::MessageType;
    use crate::usecases::testing::TestContext;
    use crate::usecases::{conversations, messages};

    #[tokio::test]
    async fn marking_twice_yields_the_same_receipts() {
        let ctx = TestContext::default();
        let a = ctx.add_user("Alice", "manager").await;
        let b = ctx.add_user("Bob", "contractor").await;
        let conversation_id = conversations::create_conversation(&ctx, a, b, None, None, None)
            .await
            .unwrap();
        for content in ["first", "second"] {
            messages::send_message(&ctx, conversation_id, a, content, MessageType::Text, vec![])
                .await
                .unwrap();
        }
        messages::send_message(&ctx, conversation_id, b, "reply", MessageType::Text, vec![])
            .await
            .unwrap();

        assert!(mark_messages_as_read(&ctx, conversation_id, b).await.unwrap());
        let once: Vec<_> = ctx
            .store()
            .fetch_read_receipts(conversation_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.message_id, r.user_id))
            .collect();
        assert!(mark_messages_as_read(&ctx, conversation_id, b).await.unwrap());
        let twice: Vec<_> = ctx
            .store()
            .fetch_read_receipts(conversation_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.message_id, r.user_id))
            .collect();

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
        assert!(once.iter().all(|(_, user_id)| *user_id == b));
        assert_eq!(count_unread(&ctx, conversation_id, b).await.unwrap(), 0);
        assert_eq!(count_unread(&ctx, conversation_id, a).await.unwrap(), 1);
    }
}
