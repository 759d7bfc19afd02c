//! HTTP/SSE transport surface for streaming debates.
//!
//! `POST /api/debate` with `{"topic": "..."}` answers with a Server-Sent
//! Events stream: a `start` event, one `message` event per transcript entry
//! as the orchestrator produces it, and a terminal `complete` or `error`
//! event.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::client::InferenceClient;
use crate::orchestrator::DebateOrchestrator;
use crate::transcript::TranscriptEntry;

#[derive(Debug, Deserialize)]
struct DebateRequest {
    topic: Option<String>,
}

/// Wire events for the SSE stream.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamEvent {
    Start { topic: String },
    Message { entry: TranscriptEntry },
    Complete,
    Error { message: String },
}

/// Build the debate API router.
pub fn router<C: InferenceClient + 'static>(
    orchestrator: Arc<DebateOrchestrator<C>>,
) -> Router {
    Router::new()
        .route("/api/debate", post(debate_handler::<C>))
        .with_state(orchestrator)
}

/// Bind and serve the debate API.
pub async fn serve<C: InferenceClient + 'static>(
    addr: SocketAddr,
    orchestrator: Arc<DebateOrchestrator<C>>,
) -> Result<()> {
    let app = router(orchestrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("debate API listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn debate_handler<C: InferenceClient + 'static>(
    State(orchestrator): State<Arc<DebateOrchestrator<C>>>,
    Json(request): Json<DebateRequest>,
) -> Response {
    let topic = match request.topic {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Topic is required and must be a string" })),
            )
                .into_response();
        }
    };

    info!(%topic, "starting debate via API");

    let (tx, rx) = mpsc::unbounded_channel::<StreamEvent>();
    let _ = tx.send(StreamEvent::Start {
        topic: topic.clone(),
    });

    // The run owns its sender; the channel closes (ending the SSE stream)
    // once the terminal event has been sent.
    tokio::spawn(async move {
        let sink_tx = tx.clone();
        let sink = move |entry: TranscriptEntry| {
            let _ = sink_tx.send(StreamEvent::Message { entry });
        };
        match orchestrator.run_streaming(&topic, &sink).await {
            Ok(_) => {
                let _ = tx.send(StreamEvent::Complete);
            }
            Err(e) => {
                error!(error = %e, "debate run failed");
                let _ = tx.send(StreamEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Event::default().json_data(&event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}
