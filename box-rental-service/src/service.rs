use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    driver::{DialogueDriver, DialogueStatus},
    tasks::BookingSession,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, user_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "user_id": user_id
        })),
    )
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub driver: DialogueDriver,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub user_id: String,
    pub response: String,
    pub choices: Vec<String>,
    pub status: DialogueStatus,
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/message", post(handle_message))
        .route("/session/{user_id}", get(get_session))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(from_fn(correlation_id_middleware)),
        )
        .with_state(app_state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<MessageResponse> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(bad_request_error("user_id must not be empty"));
    }

    info!(
        user_id = %user_id,
        text_length = request.text.len(),
        "processing message"
    );

    let reply = state.driver.handle_message(user_id, &request.text).await;

    Ok(Json(MessageResponse {
        user_id: user_id.to_string(),
        response: reply.text,
        choices: reply.choices,
        status: reply.status,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<BookingSession> {
    match state.driver.session(&user_id).await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err(not_found_error("no active booking session", &user_id)),
        Err(e) => {
            error!(user_id = %user_id, error = %e, "failed to get session");
            Err(internal_error("failed to load session"))
        }
    }
}
