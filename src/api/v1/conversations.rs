use crate::api::RequestContext;
use crate::common::error::{AppError, ServiceResponse};
use crate::common::viewer::ViewerId;
use crate::models::conversations::{
    Conversation, ConversationIdResponse, LookupArgs, StartConversationArgs,
};
use crate::usecases::conversations;
use axum::Json;
use axum::extract::{Path, Query};
use uuid::Uuid;

pub async fn list(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
) -> ServiceResponse<Vec<Conversation>> {
    let conversations = conversations::fetch_conversation_summaries(&ctx, viewer_id).await?;
    Ok(Json(conversations))
}

pub async fn start(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Json(args): Json<StartConversationArgs>,
) -> ServiceResponse<ConversationIdResponse> {
    let conversation_id = conversations::find_or_create_conversation(
        &ctx,
        viewer_id,
        args.other_user_id,
        args.subject.as_deref(),
        args.job_id,
        args.tender_id,
    )
    .await?;
    Ok(Json(ConversationIdResponse { conversation_id }))
}

pub async fn lookup(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Query(args): Query<LookupArgs>,
) -> ServiceResponse<ConversationIdResponse> {
    match conversations::find_existing_conversation(&ctx, viewer_id, args.other_user_id).await? {
        Some(conversation_id) => Ok(Json(ConversationIdResponse { conversation_id })),
        None => Err(AppError::ConversationsNotFound),
    }
}

pub async fn fetch_one(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(conversation_id): Path<Uuid>,
) -> ServiceResponse<Conversation> {
    let conversation =
        conversations::fetch_for_participant(&ctx, conversation_id, viewer_id).await?;
    Ok(Json(conversation))
}
