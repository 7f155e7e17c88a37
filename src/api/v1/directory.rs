use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::common::viewer::ViewerId;
use crate::models::conversations::{ContactArgs, ConversationIdResponse};
use crate::usecases::conversations;
use axum::Json;
use axum::extract::Path;
use uuid::Uuid;

/// "Ask about collaboration" from a contractor's profile page.
pub async fn contact_contractor(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(contractor_id): Path<Uuid>,
    args: Option<Json<ContactArgs>>,
) -> ServiceResponse<ConversationIdResponse> {
    let subject = args.and_then(|Json(args)| args.subject);
    let conversation_id = conversations::start_conversation_with_contractor(
        &ctx,
        viewer_id,
        contractor_id,
        subject.as_deref(),
    )
    .await?;
    Ok(Json(ConversationIdResponse { conversation_id }))
}

pub async fn contact_manager(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(manager_id): Path<Uuid>,
    args: Option<Json<ContactArgs>>,
) -> ServiceResponse<ConversationIdResponse> {
    let subject = args.and_then(|Json(args)| args.subject);
    let conversation_id = conversations::start_conversation_with_manager(
        &ctx,
        viewer_id,
        manager_id,
        subject.as_deref(),
    )
    .await?;
    Ok(Json(ConversationIdResponse { conversation_id }))
}
