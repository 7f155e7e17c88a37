use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::website;
use crate::models::messages::MessageType;
use crate::models::notifications::{NotificationKind, NotificationPriority};
use crate::models::quote_requests::{QuoteRequest, QuoteRequestOutcome};
use crate::usecases::{conversations, directory, messages, notifications};
use tracing::{info, warn};
use uuid::Uuid;

/// Opens (or reuses) a conversation with the contractor's representative and
/// sends the quote request as its next message.
///
/// A contractor without a linked account is not an error: the request is
/// reported as accepted with a `note` and nothing is written.
pub async fn submit_quote_request<C: Context>(
    ctx: &C,
    requester_id: Uuid,
    request: &QuoteRequest,
) -> ServiceResult<QuoteRequestOutcome> {
    if !request.has_valid_budget() {
        return Err(AppError::QuoteRequestsInvalidBudget);
    }

    let Some(contractor) = directory::fetch_contractor(ctx, request.contractor_id).await? else {
        return Err(AppError::ContractorsNotFound);
    };
    let Some(recipient_id) = contractor.user_id else {
        info!(
            contractor_id = %contractor.id,
            %requester_id,
            "Quote request for a contractor without a linked account"
        );
        return Ok(QuoteRequestOutcome {
            success: true,
            conversation_id: None,
            message_id: None,
            note: Some(format!(
                "{} has not set up an account yet, so your request could not be \
                 delivered. Please try again once they have joined.",
                contractor.company_name
            )),
        });
    };

    let subject = request.subject();
    let conversation_id = conversations::find_or_create_conversation(
        ctx,
        requester_id,
        recipient_id,
        Some(&subject),
        request.job_id,
        None,
    )
    .await?;

    let message_id = messages::send_message(
        ctx,
        conversation_id,
        requester_id,
        &request.message_content(),
        MessageType::Text,
        vec![],
    )
    .await?;

    let mut data = request.metadata();
    data["conversationId"] = serde_json::json!(conversation_id);
    let action_url = website::conversation_path(conversation_id);
    if let Err(e) = notifications::create_notification(
        ctx,
        recipient_id,
        NotificationKind::QuoteRequest,
        "New quote request",
        &format!("You have a new quote request: {}", request.project_title),
        data,
        Some(&action_url),
        NotificationPriority::High,
    )
    .await
    {
        warn!(
            %recipient_id,
            %conversation_id,
            code = e.code(),
            "Failed to notify contractor about quote request"
        );
    }

    Ok(QuoteRequestOutcome {
        success: true,
        conversation_id: Some(conversation_id),
        message_id: Some(message_id),
        note: None,
    })
}
