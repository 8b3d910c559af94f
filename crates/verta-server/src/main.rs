//! Verta Platform Server
//!
//! Axum-based server exposing the agent marketplace, deployments, and
//! chat (REST and WebSocket streaming) endpoints.

mod handlers;
mod sessions;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verta_catalog::{DeploymentRegistry, Marketplace};
use verta_core::{ChatEngine, EngineConfig, GenerationOptions, LlmProvider};
use verta_runtime::OllamaProvider;

use crate::handlers::{
    chat_stream_handler, chat_turn, create_deployment, delete_deployment, get_transcript,
    health_check, list_agents, list_deployments, list_models, update_deployment,
};
use crate::sessions::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_env());

    // Verify provider connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - chat turns will fail over to the error reply");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Chat engine configuration
    let model = std::env::var("VERTA_MODEL").unwrap_or_else(|_| "llama3.2".into());
    let engine = Arc::new(ChatEngine::new(
        provider.clone(),
        EngineConfig {
            generation: GenerationOptions {
                model: model.clone(),
                max_tokens: 500,
                ..GenerationOptions::default()
            },
            ..EngineConfig::default()
        },
    ));
    tracing::info!("Chat model: {}", model);

    // Agent catalog
    let marketplace = Arc::new(Marketplace::builtin());
    tracing::info!("Loaded {} catalog agents:", marketplace.agents().len());
    for agent in marketplace.agents() {
        tracing::info!("  • {} ({})", agent.name, agent.category);
    }

    // Build application state
    let state = AppState {
        provider,
        engine,
        marketplace,
        deployments: Arc::new(DeploymentRegistry::new()),
        sessions: Arc::new(SessionRegistry::new()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        // Marketplace
        .route("/api/agents", get(list_agents))
        // Deployments
        .route(
            "/api/deployments",
            post(create_deployment).get(list_deployments),
        )
        .route(
            "/api/deployments/{id}",
            patch(update_deployment).delete(delete_deployment),
        )
        // Chat
        .route("/api/deployments/{id}/messages", get(get_transcript))
        .route("/api/deployments/{id}/chat", post(chat_turn))
        .route("/api/deployments/{id}/chat/stream", get(chat_stream_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 verta server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health                          - Health check");
    tracing::info!("  GET    /api/models                      - List available models");
    tracing::info!("  GET    /api/agents                      - Marketplace search");
    tracing::info!("  POST   /api/deployments                 - Deploy an agent");
    tracing::info!("  GET    /api/deployments                 - List deployments");
    tracing::info!("  PATCH  /api/deployments/{{id}}            - Update status");
    tracing::info!("  DELETE /api/deployments/{{id}}            - Tear down");
    tracing::info!("  GET    /api/deployments/{{id}}/messages   - Transcript");
    tracing::info!("  POST   /api/deployments/{{id}}/chat       - Send message");
    tracing::info!("  GET    /api/deployments/{{id}}/chat/stream - WebSocket streaming");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
