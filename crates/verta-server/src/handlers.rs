//! HTTP/WebSocket Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verta_catalog::{Deployment, DeploymentStatus};
use verta_core::{
    AgentProfile, ChatMessage, SendOutcome, TranscriptEntry, provider::ModelInfo,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    /// Search term matched against name and description
    #[serde(default)]
    pub q: String,

    /// Category filter ("all" or absent = every category)
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentProfile>,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    pub agent_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeploymentRequest {
    pub status: DeploymentStatus,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    /// "completed", "recovered", or "ignored"
    pub outcome: &'static str,

    /// The finalized assistant reply, absent when the turn was ignored
    pub reply: Option<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub pending: bool,
    pub entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(what: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: what.to_string(),
            code: "NOT_FOUND".into(),
        }),
    )
}

fn agent_busy() -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: "The agent is still responding. Wait for the current reply to finish.".into(),
            code: "AGENT_BUSY".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
    })
}

/// List models available from the provider
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "PROVIDER_UNAVAILABLE".into(),
            }),
        )
    })
}

/// Marketplace: search agents and list categories
pub async fn list_agents(
    State(state): State<AppState>,
    Query(query): Query<AgentQuery>,
) -> Json<AgentsResponse> {
    let agents = state
        .marketplace
        .search(&query.q, query.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    let categories = state
        .marketplace
        .categories()
        .into_iter()
        .map(String::from)
        .collect();

    Json(AgentsResponse { agents, categories })
}

/// Deploy an agent from the catalog
pub async fn create_deployment(
    State(state): State<AppState>,
    Json(payload): Json<DeployRequest>,
) -> Result<(StatusCode, Json<Deployment>), ApiError> {
    let profile = state
        .marketplace
        .get(&payload.agent_id)
        .map_err(not_found)?
        .clone();

    let deployment = state.deployments.deploy(profile, payload.name);
    Ok((StatusCode::CREATED, Json(deployment)))
}

/// List deployed agents, newest first
pub async fn list_deployments(State(state): State<AppState>) -> Json<Vec<Deployment>> {
    Json(state.deployments.list())
}

/// Update a deployment's status
pub async fn update_deployment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeploymentRequest>,
) -> Result<Json<Deployment>, ApiError> {
    state
        .deployments
        .set_status(id, payload.status)
        .map(Json)
        .map_err(not_found)
}

/// Tear down a deployment and discard its chat session
pub async fn delete_deployment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.deployments.remove(id).map_err(not_found)?;
    state.sessions.remove(id);
    Ok(StatusCode::NO_CONTENT)
}

/// Current transcript of a deployment's chat session
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let deployment = state.deployments.get(id).map_err(not_found)?;
    let session = state.sessions.get_or_create(&deployment);
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: session.id.to_string(),
        pending: session.is_pending(),
        entries: session.transcript.entries().to_vec(),
    }))
}

/// Run one chat turn (non-streaming)
pub async fn chat_turn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChatTurnRequest>,
) -> Result<Json<ChatTurnResponse>, ApiError> {
    let deployment = state.deployments.get(id).map_err(not_found)?;
    let session = state.sessions.get_or_create(&deployment);

    // A held lock is the turn in flight; reject instead of queueing.
    let mut session = session.try_lock().map_err(|_| agent_busy())?;

    let outcome = state.engine.send(&mut session, &payload.message).await;

    Ok(Json(match outcome {
        SendOutcome::Completed(reply) => ChatTurnResponse {
            outcome: "completed",
            reply: Some(reply),
        },
        SendOutcome::Recovered(reply) => ChatTurnResponse {
            outcome: "recovered",
            reply: Some(reply),
        },
        SendOutcome::Ignored => ChatTurnResponse {
            outcome: "ignored",
            reply: None,
        },
    }))
}

/// WebSocket streaming chat for one deployment
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state, id))
}

async fn handle_stream(socket: WebSocket, state: AppState, deployment_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        // Parse request
        let request: ChatTurnRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        let deployment = match state.deployments.get(deployment_id) {
            Ok(d) => d,
            Err(e) => {
                let error = serde_json::json!({
                    "type": "error", "error": e.to_string(), "code": "NOT_FOUND",
                });
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                break;
            }
        };

        let session = state.sessions.get_or_create(&deployment);
        let mut session = match session.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                let error = serde_json::json!({
                    "type": "error",
                    "error": "The agent is still responding.",
                    "code": "AGENT_BUSY",
                });
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        // Chunks flow through a channel so they reach the socket in
        // delivery order while the turn is still running.
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

        let turn = async {
            let outcome = state
                .engine
                .send_observed(&mut session, &request.message, |chunk| {
                    let _ = tx.send(chunk.to_string());
                })
                .await;
            drop(tx);
            outcome
        };

        let forward = async {
            while let Some(chunk) = rx.recv().await {
                let envelope = serde_json::json!({"type": "chunk", "content": chunk});
                if sender
                    .send(Message::Text(envelope.to_string().into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        };

        let (outcome, ()) = tokio::join!(turn, forward);

        let envelope = match outcome {
            SendOutcome::Completed(reply) => serde_json::json!({
                "type": "done",
                "id": reply.id.to_string(),
                "content": reply.content,
            }),
            SendOutcome::Recovered(reply) => serde_json::json!({
                "type": "done",
                "recovered": true,
                "id": reply.id.to_string(),
                "content": reply.content,
            }),
            SendOutcome::Ignored => serde_json::json!({"type": "ignored"}),
        };

        if sender
            .send(Message::Text(envelope.to_string().into()))
            .await
            .is_err()
        {
            break;
        }
    }
}
