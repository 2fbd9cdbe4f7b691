use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::{get, post},
};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::review::orchestrator::Orchestrator;
use crate::types::{CodeReviewRequest, CodeReviewResponse};

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub api_key_configured: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/review", post(review))
        .route("/ws/review", get(ws_review))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "reviewcrew code review API",
        "version": env!("CARGO_PKG_VERSION"),
        "agents": ["security", "performance", "style"],
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "api_key_configured": state.api_key_configured,
    }))
}

/// Synchronous review: no live updates, the full response at the end.
async fn review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CodeReviewRequest>,
) -> Json<CodeReviewResponse> {
    Json(state.orchestrator.review_code(&request, None).await)
}

async fn ws_review(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws(state, socket))
}

/// Streaming review. Protocol: the client sends one request message; the
/// server emits "started", then "status" frames as agents progress, then a
/// final "complete" frame with the full response. A malformed request gets
/// an "error" frame instead of "started"; any other mid-flight fault gets
/// an "error" frame before the channel closes.
async fn handle_ws(state: Arc<AppState>, mut socket: WebSocket) {
    let Some(Ok(Message::Text(text))) = socket.recv().await else {
        return;
    };

    let request: CodeReviewRequest = match serde_json::from_str(text.as_str()) {
        Ok(request) => request,
        Err(_) => {
            let _ = send_json(
                &mut socket,
                json!({"type": "error", "message": "Invalid JSON format"}),
            )
            .await;
            return;
        }
    };

    if send_json(
        &mut socket,
        json!({"type": "started", "message": "Code review started"}),
    )
    .await
    .is_err()
    {
        return;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let task_state = state.clone();
    let task =
        tokio::spawn(async move { task_state.orchestrator.review_code(&request, Some(tx)).await });

    // Forward status updates until the review drops its sender.
    while let Some(update) = rx.recv().await {
        let frame = json!({
            "type": "status",
            "agent": update.agent,
            "message": update.message,
        });
        if send_json(&mut socket, frame).await.is_err() {
            debug!("WebSocket client went away mid-review");
            break;
        }
    }

    match task.await {
        Ok(response) => {
            let _ = send_json(&mut socket, json!({"type": "complete", "data": response})).await;
        }
        Err(error) => {
            // A panic in the review task; surface it as a generic failure.
            warn!("Review task aborted: {error}");
            let _ = send_json(
                &mut socket,
                json!({"type": "error", "message": error.to_string()}),
            )
            .await;
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

async fn send_json(socket: &mut WebSocket, value: serde_json::Value) -> Result<(), axum::Error> {
    socket.send(Message::Text(value.to_string().into())).await
}
