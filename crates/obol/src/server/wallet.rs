//! The sign-payment endpoint: builds and signs a SOL transfer from the
//! service's wallet to the requested target.
//!
//! Contract quirk: validation failures answer HTTP 200 with
//! `{"success": false, "error": ...}` — callers branch on `success`,
//! never on the status code.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use obol_core::transfer;
use obol_core::types::Pubkey;

use super::SharedState;

/// Shortest plausible base58 address; anything shorter is rejected
/// before we bother parsing it.
const MIN_ADDRESS_LEN: usize = 32;

const INVALID_INPUT: &str = "Missing or invalid targetWallet or amountLamports";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignPaymentRequest {
    #[serde(default)]
    target_wallet: Option<String>,
    #[serde(default)]
    amount_lamports: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignPaymentResponse {
    success: bool,
    signed_transaction_b64: String,
    from: String,
    to: String,
    amount_lamports: u64,
    /// Repeats the payload for callers that only read `message`.
    message: String,
}

pub(super) async fn sign_payment(
    State(state): State<SharedState>,
    req: Result<Json<SignPaymentRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "malformed sign-payment request body");
            return reject(INVALID_INPUT);
        }
    };

    info!(
        target_wallet = req.target_wallet.as_deref().unwrap_or("<missing>"),
        amount_lamports = req.amount_lamports,
        "sign-payment request"
    );

    let (target_wallet, amount_lamports) = match (req.target_wallet, req.amount_lamports) {
        (Some(wallet), Some(amount)) if wallet.len() >= MIN_ADDRESS_LEN && amount > 0 => {
            (wallet, amount)
        }
        _ => {
            warn!("sign-payment request failed input validation");
            return reject(INVALID_INPUT);
        }
    };

    let recipient: Pubkey = match target_wallet.parse() {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "target wallet does not parse as an address");
            return reject(e.to_string());
        }
    };

    match transfer::sign_transfer(
        state.rpc.as_ref(),
        &state.signer,
        recipient,
        amount_lamports,
    )
    .await
    {
        Ok(signed) => {
            info!(from = %signed.from, to = %signed.to, lamports = signed.lamports, "transaction signed");
            Json(SignPaymentResponse {
                success: true,
                message: signed.transaction_b64.clone(),
                signed_transaction_b64: signed.transaction_b64,
                from: signed.from.to_string(),
                to: signed.to.to_string(),
                amount_lamports: signed.lamports,
            })
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "signing failed");
            reject(e.to_string())
        }
    }
}

fn reject(message: impl Into<String>) -> Response {
    Json(serde_json::json!({ "success": false, "error": message.into() })).into_response()
}
