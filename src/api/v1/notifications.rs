use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::common::viewer::ViewerId;
use crate::models::notifications::Notification;
use crate::usecases::notifications;
use axum::Json;

pub async fn list(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
) -> ServiceResponse<Vec<Notification>> {
    let notifications = notifications::fetch_notifications(&ctx, viewer_id).await?;
    Ok(Json(notifications))
}
