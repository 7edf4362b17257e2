//! Native JSON-RPC client for Solana nodes.
//!
//! Implements [`SolanaRpc`] over JSON-RPC 2.0 using `reqwest`: HTTP(S)
//! transport, monotonically increasing request ids, and structured error
//! mapping. The service issues at most a handful of sequential calls per
//! request, so there is no batching, caching, or rate limiting here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::error::{CoreError, RpcError};
use crate::types::{Commitment, Pubkey};

use super::types::{LatestBlockhash, ParsedTransaction, SignatureStatus};
use super::SolanaRpc;

// ==============================================================================
// JSON-RPC Envelope
// ==============================================================================

#[derive(serde::Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<Value>,
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// The spec defines errors as `{"code": <int>, "message": <string>}`;
/// anything else falls back to `InvalidResponse` with the raw JSON.
fn parse_jsonrpc_error(err: Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
        CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        })
    } else {
        CoreError::Rpc(RpcError::InvalidResponse(format!(
            "non-standard JSON-RPC error: {err}"
        )))
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    RpcError::InvalidResponse(message.into()).into()
}

// ==============================================================================
// Result Parsing
// ==============================================================================

/// Most Solana read methods wrap their payload as
/// `{"context": {...}, "value": <payload>}`; this peels off the wrapper.
fn take_context_value(result: Value, method: &str) -> Result<Value, CoreError> {
    match result {
        Value::Object(mut map) => map
            .remove("value")
            .ok_or_else(|| invalid(format!("{method}: missing `value` field"))),
        other => Err(invalid(format!(
            "{method}: expected an object with `value`, got {other}"
        ))),
    }
}

fn parse_u64(value: &Value, what: &str) -> Result<u64, CoreError> {
    value
        .as_u64()
        .ok_or_else(|| invalid(format!("{what}: expected an unsigned integer, got {value}")))
}

// ==============================================================================
// Client
// ==============================================================================

/// Solana JSON-RPC client over HTTP(S).
#[derive(Debug)]
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a new client for an `http://` or `https://` endpoint URL.
    pub fn new(url: &str) -> Result<Self, CoreError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| CoreError::Config(format!("invalid RPC URL `{url}`: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CoreError::Config(format!(
                    "unsupported RPC URL scheme `{other}`; expected http or https"
                )))
            }
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        Ok(Self {
            client,
            url: url.to_owned(),
            next_id: AtomicU64::new(initial_request_id()),
        })
    }

    async fn rpc_call(&self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        let decoded: JsonRpcResponse = serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!("decode JSON-RPC response: {e}; body={body}"))
        })?;

        if let Some(err) = decoded.error {
            return Err(parse_jsonrpc_error(err));
        }

        Ok(decoded.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl SolanaRpc for HttpRpcClient {
    async fn get_version(&self) -> Result<String, CoreError> {
        let raw = self.rpc_call("getVersion", Vec::new()).await?;
        raw.get("solana-core")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| invalid(format!("getVersion: missing `solana-core` field in {raw}")))
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, CoreError> {
        let raw = self
            .rpc_call(
                "getLatestBlockhash",
                vec![json!({ "commitment": commitment })],
            )
            .await?;
        let value = take_context_value(raw, "getLatestBlockhash")?;

        let blockhash = value
            .get("blockhash")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("getLatestBlockhash: missing `blockhash` field"))?
            .parse()
            .map_err(|e| invalid(format!("getLatestBlockhash: {e}")))?;
        let last_valid_block_height = parse_u64(
            value.get("lastValidBlockHeight").unwrap_or(&Value::Null),
            "getLatestBlockhash.lastValidBlockHeight",
        )?;

        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn get_balance(
        &self,
        pubkey: &Pubkey,
        commitment: Commitment,
    ) -> Result<u64, CoreError> {
        let raw = self
            .rpc_call(
                "getBalance",
                vec![json!(pubkey.to_string()), json!({ "commitment": commitment })],
            )
            .await?;
        let value = take_context_value(raw, "getBalance")?;
        parse_u64(&value, "getBalance")
    }

    async fn send_raw_transaction(&self, tx_bytes: &[u8]) -> Result<String, CoreError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(tx_bytes);
        let raw = self
            .rpc_call(
                "sendTransaction",
                vec![
                    json!(encoded),
                    json!({
                        "encoding": "base64",
                        "skipPreflight": false,
                        "preflightCommitment": Commitment::Confirmed,
                    }),
                ],
            )
            .await?;
        raw.as_str()
            .map(str::to_owned)
            .ok_or_else(|| invalid(format!("sendTransaction: expected a signature string, got {raw}")))
    }

    async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, CoreError> {
        let raw = self
            .rpc_call("getSignatureStatuses", vec![json!([signature])])
            .await?;
        let value = take_context_value(raw, "getSignatureStatuses")?;
        let first = value
            .as_array()
            .and_then(|entries| entries.first())
            .ok_or_else(|| invalid("getSignatureStatuses: empty result array"))?;

        if first.is_null() {
            return Ok(None);
        }
        let status: SignatureStatus = serde_json::from_value(first.clone())
            .map_err(|e| invalid(format!("getSignatureStatuses: {e}")))?;
        Ok(Some(status))
    }

    async fn get_block_height(&self, commitment: Commitment) -> Result<u64, CoreError> {
        let raw = self
            .rpc_call("getBlockHeight", vec![json!({ "commitment": commitment })])
            .await?;
        parse_u64(&raw, "getBlockHeight")
    }

    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, CoreError> {
        let raw = self
            .rpc_call(
                "getTransaction",
                vec![
                    json!(signature),
                    json!({
                        "encoding": "jsonParsed",
                        "commitment": Commitment::Confirmed,
                        "maxSupportedTransactionVersion": 0,
                    }),
                ],
            )
            .await?;

        if raw.is_null() {
            return Ok(None);
        }
        let parsed: ParsedTransaction = serde_json::from_value(raw)
            .map_err(|e| invalid(format!("getTransaction: {e}")))?;
        Ok(Some(parsed))
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
