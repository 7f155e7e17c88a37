use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tradeboard_messaging::api;
use tradeboard_messaging::common::state::AppState;
use tradeboard_messaging::entities::profiles::Profile;
use tradeboard_messaging::repositories::memory::MemoryStore;
use tradeboard_messaging::settings::DataSource;
use uuid::Uuid;

async fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState {
        live: None,
        mock: store.clone(),
        redis: None,
        default_data_source: DataSource::Mock,
    };
    (api::router().with_state(state), store)
}

async fn add_user(store: &MemoryStore, name: &str, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    store
        .add_profile(Profile {
            id,
            full_name: Some(name.to_string()),
            avatar_url: None,
            role: role.to_string(),
        })
        .await;
    id
}

fn request(method: &str, uri: &str, viewer: Option<Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(viewer) = viewer {
        builder = builder.header("X-User-Id", viewer.to_string());
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn requests_without_a_viewer_are_rejected() {
    let (app, _) = app().await;
    let (status, body) = call(&app, request("GET", "/api/v1/conversations", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn conversation_flow() {
    let (app, store) = app().await;
    let alice = add_user(&store, "Alice", "manager").await;
    let bob = add_user(&store, "Bob", "contractor").await;

    let start = json!({ "other_user_id": bob, "subject": "Leaking boiler" });
    let (status, body) = call(
        &app,
        request("POST", "/api/v1/conversations", Some(alice), Some(start.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let conversation_id = body["conversationId"].as_str().unwrap().to_string();

    // Starting again from the other side reuses the conversation.
    let start = json!({ "other_user_id": alice });
    let (_, body) = call(
        &app,
        request("POST", "/api/v1/conversations", Some(bob), Some(start)),
    )
    .await;
    assert_eq!(body["conversationId"], conversation_id.as_str());

    let messages_uri = format!("/api/v1/conversations/{conversation_id}/messages");
    let (status, body) = call(
        &app,
        request(
            "POST",
            &messages_uri,
            Some(alice),
            Some(json!({ "content": "Can you come by on Monday?" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messageId"].is_string());

    let (status, body) = call(&app, request("GET", "/api/v1/conversations", Some(bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    let conversations = body.as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["unreadCount"], 1);
    assert_eq!(
        conversations[0]["lastMessage"]["content"],
        "Can you come by on Monday?"
    );

    let read_uri = format!("/api/v1/conversations/{conversation_id}/read");
    let (status, body) = call(&app, request("POST", &read_uri, Some(bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = call(&app, request("GET", &messages_uri, Some(bob), None)).await;
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["read"], true);
    assert_eq!(history[0]["senderName"], "Alice");

    let (_, body) = call(&app, request("GET", "/api/v1/notifications", Some(bob), None)).await;
    assert_eq!(body[0]["type"], "new_message");
}

#[tokio::test]
async fn clients_can_only_send_text_messages() {
    let (app, store) = app().await;
    let alice = add_user(&store, "Alice", "manager").await;
    let bob = add_user(&store, "Bob", "contractor").await;

    let (_, body) = call(
        &app,
        request(
            "POST",
            "/api/v1/conversations",
            Some(alice),
            Some(json!({ "other_user_id": bob })),
        ),
    )
    .await;
    let conversation_id = body["conversationId"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/conversations/{conversation_id}/messages");
    let send = json!({ "content": "Your job was approved", "type": "system" });
    let (status, _) = call(&app, request("POST", &uri, Some(alice), Some(send))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, request("GET", &uri, Some(bob), None)).await;
    assert_eq!(body[0]["type"], "text");
}

#[tokio::test]
async fn outsiders_cannot_read_a_conversation() {
    let (app, store) = app().await;
    let alice = add_user(&store, "Alice", "manager").await;
    let bob = add_user(&store, "Bob", "contractor").await;
    let mallory = add_user(&store, "Mallory", "contractor").await;

    let (_, body) = call(
        &app,
        request(
            "POST",
            "/api/v1/conversations",
            Some(alice),
            Some(json!({ "other_user_id": bob })),
        ),
    )
    .await;
    let conversation_id = body["conversationId"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/conversations/{conversation_id}/messages");
    let (status, body) = call(&app, request("GET", &uri, Some(mallory), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "conversations.not_participant");
}

#[tokio::test]
async fn unconfigured_live_source_is_unavailable() {
    let (app, _) = app().await;
    let mut request = request("GET", "/api/v1/conversations", Some(Uuid::new_v4()), None);
    request
        .headers_mut()
        .insert("x-data-source", "live".parse().unwrap());
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "data_source_unavailable");
}

#[tokio::test]
async fn unknown_data_source_is_a_bad_request() {
    let (app, _) = app().await;
    let mut request = request("GET", "/api/v1/conversations", Some(Uuid::new_v4()), None);
    request
        .headers_mut()
        .insert("x-data-source", "staging".parse().unwrap());
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
