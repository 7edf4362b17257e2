//! The check-balance endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use obol_core::balance;
use obol_core::types::Pubkey;

use super::error::AppError;
use super::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckBalanceRequest {
    #[serde(default)]
    public_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckBalanceResponse {
    public_key: String,
    balance_lamports: u64,
    balance_sol: f64,
}

pub(super) async fn check_balance(
    State(state): State<SharedState>,
    req: Result<Json<CheckBalanceRequest>, JsonRejection>,
) -> Result<Json<CheckBalanceResponse>, AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let Some(public_key) = req.public_key else {
        return Err(AppError::BadRequest(
            "Missing publicKey in request body".to_string(),
        ));
    };

    let pubkey: Pubkey = public_key
        .parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid public key or network issue: {e}")))?;

    let balance = balance::fetch_balance(state.rpc.as_ref(), &pubkey)
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid public key or network issue: {e}")))?;

    info!(public_key = %pubkey, lamports = balance.lamports, "balance fetched");

    Ok(Json(CheckBalanceResponse {
        public_key,
        balance_lamports: balance.lamports,
        balance_sol: balance.sol,
    }))
}
