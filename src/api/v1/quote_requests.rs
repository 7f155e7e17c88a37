use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::common::viewer::ViewerId;
use crate::models::quote_requests::{QuoteRequest, QuoteRequestOutcome};
use crate::usecases::quote_requests;
use axum::Json;

pub async fn submit(
    ctx: RequestContext,
    ViewerId(viewer_id): ViewerId,
    Json(request): Json<QuoteRequest>,
) -> ServiceResponse<QuoteRequestOutcome> {
    let outcome = quote_requests::submit_quote_request(&ctx, viewer_id, &request).await?;
    Ok(Json(outcome))
}
