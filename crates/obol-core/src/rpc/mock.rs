//! A mock Solana RPC backend for tests. Returns canned responses
//! configured via the builder pattern, and counts calls so tests can
//! assert that a rejected request never touched the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};
use crate::types::{Blockhash, Commitment, Pubkey};

use super::types::{LatestBlockhash, ParsedTransaction, SignatureStatus};
use super::SolanaRpc;

pub struct MockRpc {
    version: String,
    latest_blockhash: LatestBlockhash,
    balances: HashMap<String, u64>,
    balance_error: Option<String>,
    send_signature: String,
    send_error: Option<String>,
    statuses: Vec<Option<SignatureStatus>>,
    status_cursor: AtomicUsize,
    block_height: u64,
    parsed_transaction: Option<ParsedTransaction>,
    calls: AtomicUsize,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            version: "2.3.1".into(),
            latest_blockhash: LatestBlockhash {
                blockhash: Blockhash::new([1u8; 32]),
                last_valid_block_height: 1_000,
            },
            balances: HashMap::new(),
            balance_error: None,
            send_signature: "MockSignature1111111111111111111111111111111".into(),
            send_error: None,
            statuses: vec![Some(confirmed_status())],
            block_height: 0,
            parsed_transaction: None,
        }
    }

    /// Total number of RPC calls this mock has served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A successful status at `confirmed` commitment.
pub fn confirmed_status() -> SignatureStatus {
    SignatureStatus {
        confirmation_status: Some(Commitment::Confirmed),
        err: None,
    }
}

/// A status whose transaction landed but failed on chain.
pub fn failed_status(reason: serde_json::Value) -> SignatureStatus {
    SignatureStatus {
        confirmation_status: Some(Commitment::Confirmed),
        err: Some(reason),
    }
}

/// A parsed transaction fixture carrying a single system transfer,
/// built through serde so the wire shape stays exercised.
pub fn parsed_transfer_to(destination: &str, lamports: u64) -> ParsedTransaction {
    serde_json::from_value(serde_json::json!({
        "slot": 1,
        "transaction": {
            "signatures": ["MockSignature1111111111111111111111111111111"],
            "message": {
                "instructions": [{
                    "program": "system",
                    "programId": "11111111111111111111111111111111",
                    "parsed": {
                        "type": "transfer",
                        "info": {
                            "source": "MockSource111111111111111111111111111111111",
                            "destination": destination,
                            "lamports": lamports,
                        },
                    },
                }],
            },
        },
    }))
    .expect("mock transfer fixture must deserialize")
}

pub struct MockRpcBuilder {
    version: String,
    latest_blockhash: LatestBlockhash,
    balances: HashMap<String, u64>,
    balance_error: Option<String>,
    send_signature: String,
    send_error: Option<String>,
    statuses: Vec<Option<SignatureStatus>>,
    block_height: u64,
    parsed_transaction: Option<ParsedTransaction>,
}

impl MockRpcBuilder {
    pub fn with_latest_blockhash(mut self, checkpoint: LatestBlockhash) -> Self {
        self.latest_blockhash = checkpoint;
        self
    }

    pub fn with_balance(mut self, pubkey: &Pubkey, lamports: u64) -> Self {
        self.balances.insert(pubkey.to_string(), lamports);
        self
    }

    pub fn with_balance_error(mut self, message: &str) -> Self {
        self.balance_error = Some(message.to_owned());
        self
    }

    pub fn with_send_signature(mut self, signature: &str) -> Self {
        self.send_signature = signature.to_owned();
        self
    }

    pub fn with_send_error(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_owned());
        self
    }

    /// Status returned by each successive poll; the last entry repeats.
    pub fn with_status_sequence(mut self, statuses: Vec<Option<SignatureStatus>>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.block_height = height;
        self
    }

    pub fn with_parsed_transaction(mut self, transaction: ParsedTransaction) -> Self {
        self.parsed_transaction = Some(transaction);
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            version: self.version,
            latest_blockhash: self.latest_blockhash,
            balances: self.balances,
            balance_error: self.balance_error,
            send_signature: self.send_signature,
            send_error: self.send_error,
            statuses: self.statuses,
            status_cursor: AtomicUsize::new(0),
            block_height: self.block_height,
            parsed_transaction: self.parsed_transaction,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SolanaRpc for MockRpc {
    async fn get_version(&self) -> Result<String, CoreError> {
        self.record_call();
        Ok(self.version.clone())
    }

    async fn get_latest_blockhash(
        &self,
        _commitment: Commitment,
    ) -> Result<LatestBlockhash, CoreError> {
        self.record_call();
        Ok(self.latest_blockhash.clone())
    }

    async fn get_balance(
        &self,
        pubkey: &Pubkey,
        _commitment: Commitment,
    ) -> Result<u64, CoreError> {
        self.record_call();
        if let Some(message) = &self.balance_error {
            return Err(RpcError::ServerError {
                code: -32602,
                message: message.clone(),
            }
            .into());
        }
        // Accounts the cluster has never seen simply hold zero lamports.
        Ok(self.balances.get(&pubkey.to_string()).copied().unwrap_or(0))
    }

    async fn send_raw_transaction(&self, _tx_bytes: &[u8]) -> Result<String, CoreError> {
        self.record_call();
        if let Some(message) = &self.send_error {
            return Err(RpcError::ServerError {
                code: -32002,
                message: message.clone(),
            }
            .into());
        }
        Ok(self.send_signature.clone())
    }

    async fn get_signature_status(
        &self,
        _signature: &str,
    ) -> Result<Option<SignatureStatus>, CoreError> {
        self.record_call();
        let cursor = self.status_cursor.fetch_add(1, Ordering::SeqCst);
        let index = cursor.min(self.statuses.len().saturating_sub(1));
        Ok(self.statuses.get(index).cloned().flatten())
    }

    async fn get_block_height(&self, _commitment: Commitment) -> Result<u64, CoreError> {
        self.record_call();
        Ok(self.block_height)
    }

    async fn get_parsed_transaction(
        &self,
        _signature: &str,
    ) -> Result<Option<ParsedTransaction>, CoreError> {
        self.record_call();
        Ok(self.parsed_transaction.clone())
    }
}
