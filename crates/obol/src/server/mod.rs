mod balance;
mod error;
mod facilitator;
mod wallet;

use std::sync::Arc;

use axum::routing::{any, get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use obol_core::keypair::Keypair;
use obol_core::rpc::SolanaRpc;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub rpc: Arc<dyn SolanaRpc>,
    pub signer: Arc<Keypair>,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState) -> Router {
    let shared = Arc::new(state);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/sign-payment", post(wallet::sign_payment))
        .route("/api/v1/check-balance", post(balance::check_balance))
        .route(
            "/api/v1/facilitate-payment",
            post(facilitator::facilitate_payment),
        )
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
