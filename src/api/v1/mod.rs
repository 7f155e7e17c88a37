pub mod conversations;
pub mod directory;
pub mod messages;
pub mod notifications;
pub mod quote_requests;

use crate::common::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(conversations::list).post(conversations::start),
        )
        .route("/conversations/lookup", get(conversations::lookup))
        .route("/conversations/{conversation_id}", get(conversations::fetch_one))
        .route(
            "/conversations/{conversation_id}/messages",
            get(messages::history).post(messages::send),
        )
        .route(
            "/conversations/{conversation_id}/read",
            post(messages::mark_as_read),
        )
        .route(
            "/contractors/{contractor_id}/conversations",
            post(directory::contact_contractor),
        )
        .route(
            "/managers/{manager_id}/conversations",
            post(directory::contact_manager),
        )
        .route("/quote-requests", post(quote_requests::submit))
        .route("/notifications", get(notifications::list))
}
