use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::common::viewer::ViewerId;
use crate::models::messages::{
    MarkAsReadResponse, Message, MessageType, SendMessageArgs, SendMessageResponse,
};
use crate::usecases::{conversations, messages, read_receipts};
use axum::Json;
use axum::extract::Path;
use uuid::Uuid;

pub async fn history(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(conversation_id): Path<Uuid>,
) -> ServiceResponse<Vec<Message>> {
    conversations::fetch_for_participant(&ctx, conversation_id, viewer_id).await?;
    let messages =
        messages::fetch_conversation_messages(&ctx, conversation_id, Some(viewer_id)).await?;
    Ok(Json(messages))
}

pub async fn send(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(conversation_id): Path<Uuid>,
    Json(args): Json<SendMessageArgs>,
) -> ServiceResponse<SendMessageResponse> {
    let message_id = messages::send_message(
        &ctx,
        conversation_id,
        viewer_id,
        &args.content,
        MessageType::Text,
        args.attachments,
    )
    .await?;
    Ok(Json(SendMessageResponse { message_id }))
}

pub async fn mark_as_read(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Path(conversation_id): Path<Uuid>,
) -> ServiceResponse<MarkAsReadResponse> {
    conversations::fetch_for_participant(&ctx, conversation_id, viewer_id).await?;
    let success = read_receipts::mark_messages_as_read(&ctx, conversation_id, viewer_id).await?;
    Ok(Json(MarkAsReadResponse { success }))
}
