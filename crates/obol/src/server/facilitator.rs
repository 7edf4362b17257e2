//! The facilitate-payment endpoint: relays a previously-signed
//! transaction and reports whether it carried the expected transfer.
//!
//! Like sign-payment, every outcome — including hard failures — is an
//! HTTP 200 whose body carries the verdict in `allowed`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use obol_core::facilitate;

use super::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FacilitatePaymentRequest {
    #[serde(default)]
    signed_transaction_b64: Option<String>,
    #[serde(default)]
    expected_recipient: Option<String>,
    /// Accepted as a JSON integer or a numeric string.
    #[serde(default)]
    expected_amount_lamports: Option<Value>,
}

pub(super) async fn facilitate_payment(
    State(state): State<SharedState>,
    req: Result<Json<FacilitatePaymentRequest>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match req {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "malformed facilitate-payment request body");
            return deny("Missing required fields");
        }
    };

    let (Some(payload_b64), Some(expected_recipient), Some(amount_value)) = (
        req.signed_transaction_b64.filter(|s| !s.is_empty()),
        req.expected_recipient.filter(|s| !s.is_empty()),
        req.expected_amount_lamports.filter(|v| !v.is_null()),
    ) else {
        warn!("facilitate-payment request is missing required fields");
        return deny("Missing required fields");
    };

    let Some(expected_lamports) = parse_lamports(&amount_value).filter(|n| *n > 0) else {
        warn!(value = %amount_value, "expectedAmountLamports is not a positive integer");
        return deny("expectedAmountLamports must be a positive integer");
    };

    let payload_prefix: String = payload_b64.chars().take(24).collect();
    info!(
        expected_recipient = %expected_recipient,
        expected_lamports = %expected_lamports,
        payload_prefix = %payload_prefix,
        "facilitate-payment request"
    );

    let tx_bytes = match base64::engine::general_purpose::STANDARD.decode(&payload_b64) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "signed transaction payload is not valid base64");
            return deny(format!("invalid signedTransactionB64: {e}"));
        }
    };

    match facilitate::facilitate_transfer(
        state.rpc.as_ref(),
        &tx_bytes,
        &expected_recipient,
        expected_lamports,
    )
    .await
    {
        Ok(txid) => {
            info!(%txid, "transfer facilitated");
            Json(json!({ "allowed": true, "txid": txid }))
        }
        Err(e) => {
            warn!(error = %e, "facilitation failed");
            deny(e.to_string())
        }
    }
}

/// `expectedAmountLamports` arrives as a JSON integer or a numeric
/// string; both compare as exact integers downstream.
fn parse_lamports(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn deny(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "allowed": false, "error": message.into() }))
}
