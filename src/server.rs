//! HTTP + WebSocket chat server.
//!
//! Exposes the ingestion and conversation pipeline over axum:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/upload_pdf` | Upload one document (multipart field `file`) and index it |
//! | `GET`  | `/get_documents` | List indexed source file names |
//! | `GET`  | `/ws/chat` | Persistent conversational WebSocket |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Each WebSocket connection is one session: it gets fresh conversation
//! memory and processes questions strictly sequentially. Answers stream
//! back as JSON frames `{"event_type": "answer", "data": "<fragment>"}`;
//! the protocol sends no end-of-answer sentinel. Generation failures
//! surface as an `{"event_type": "error", ...}` frame and leave the session
//! memory unchanged. A disconnect mid-stream terminates only that session.
//!
//! # Error Contract
//!
//! HTTP error responses follow the shape:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing 'file' field" } }
//! ```
//!
//! Error codes: `bad_request` (400), `ingestion_failed` (500), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::answer::AnswerEngine;
use crate::config::Config;
use crate::embedding::{create_embedder, Embedder};
use crate::error::ChatError;
use crate::ingest;
use crate::llm::{create_model, LanguageModel};
use crate::memory::ConversationMemory;
use crate::retrieve::Retriever;
use crate::store::{sqlite::SqliteStore, VectorStore};
use crate::stream::{stream_answer, Event, EventSink};
use crate::{db, migrate};

/// Shared application state passed to all route handlers.
///
/// The store, embedder, and model are process-wide collaborators created
/// once at startup and shared by reference across sessions.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn VectorStore>,
    pub embedder: Arc<dyn Embedder>,
    pub model: Arc<dyn LanguageModel>,
}

/// Starts the chat server.
///
/// Connects the store, runs migrations, instantiates the configured
/// embedding and LLM providers, and serves until the process terminates.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;

    let state = AppState {
        store: Arc::new(SqliteStore::new(pool)),
        embedder: create_embedder(&config.embedding)?.into(),
        model: create_model(&config.llm)?.into(),
        config: Arc::new(config.clone()),
    };

    let bind_addr = state.config.server.bind.clone();
    let app = router(state);

    info!("chat server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the axum router for the given state. Split out so tests can serve
/// the app on an ephemeral port with fake providers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/upload_pdf", post(handle_upload))
        .route("/get_documents", get(handle_get_documents))
        .route("/ws/chat", get(handle_ws))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn ingestion_failed(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "ingestion_failed".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /upload_pdf ============

#[derive(Serialize)]
struct UploadResponse {
    message: String,
}

/// Handler for `POST /upload_pdf`.
///
/// Accepts one multipart field named `file`, writes the bytes to the intake
/// directory under the sanitized basename, and runs the ingestion pipeline.
/// The chunk count is informational only and not part of the response
/// contract.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| bad_request("file field has no filename"))?;

        let name = ingest::basename(&file_name);
        if name.is_empty() {
            return Err(bad_request(format!("invalid file name: {:?}", file_name)));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(e.to_string()))?;

        // Keep the original upload in durable intake storage
        let intake_dir = &state.config.intake.dir;
        std::fs::create_dir_all(intake_dir).map_err(|e| internal(e.to_string()))?;
        std::fs::write(intake_dir.join(&name), &bytes).map_err(|e| internal(e.to_string()))?;

        let count = ingest::ingest_bytes(
            state.store.as_ref(),
            state.embedder.as_ref(),
            &state.config.chunking,
            &name,
            &bytes,
        )
        .await
        .map_err(|e| ingestion_failed(e.to_string()))?;

        info!(file = %name, chunks = count, "upload processed");

        return Ok(Json(UploadResponse {
            message: "PDF uploaded and processed successfully".to_string(),
        }));
    }

    Err(bad_request("missing 'file' field"))
}

// ============ GET /get_documents ============

#[derive(Serialize)]
struct DocumentsResponse {
    data: Vec<String>,
}

/// Handler for `GET /get_documents`.
///
/// Returns the de-duplicated source file names present in the store's
/// metadata. Order is unspecified (set semantics).
async fn handle_get_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, AppError> {
    let data = state
        .store
        .list_sources()
        .await
        .map_err(|e| internal(e.to_string()))?;
    Ok(Json(DocumentsResponse { data }))
}

// ============ GET /ws/chat ============

async fn handle_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| chat_session(socket, state))
}

/// [`EventSink`] over one session's WebSocket.
struct WsSink<'a> {
    socket: &'a mut WebSocket,
}

#[async_trait]
impl EventSink for WsSink<'_> {
    async fn send(&mut self, event: Event) -> Result<(), ChatError> {
        let frame =
            serde_json::to_string(&event).map_err(|e| ChatError::Transport(e.to_string()))?;
        self.socket
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }
}

/// One conversational session: fresh memory, questions processed strictly
/// sequentially, terminated by disconnect or transport error.
async fn chat_session(mut socket: WebSocket, state: AppState) {
    let retriever = Retriever::new(
        state.store.clone(),
        state.embedder.clone(),
        state.config.retrieval.top_k,
    );
    let engine = AnswerEngine::new(retriever, state.model.clone());
    let mut memory = ConversationMemory::new();
    let delay = Duration::from_millis(state.config.streaming.delay_ms);

    info!("chat session opened");

    while let Some(received) = socket.recv().await {
        let message = match received {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "chat session transport error");
                break;
            }
        };

        let question = match message {
            Message::Text(text) => text.to_string(),
            Message::Close(_) => break,
            // Ping/pong are answered by axum; binary frames are not part
            // of the protocol.
            _ => continue,
        };

        match engine.answer(&question, &mut memory).await {
            Ok(result) => {
                let mut sink = WsSink {
                    socket: &mut socket,
                };
                if let Err(e) = stream_answer(&result, &mut sink, delay).await {
                    warn!(error = %e, "answer stream aborted");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "question failed");
                let mut sink = WsSink {
                    socket: &mut socket,
                };
                if sink.send(Event::error(e.to_string())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(turns = memory.turns().len(), "chat session closed");
}
