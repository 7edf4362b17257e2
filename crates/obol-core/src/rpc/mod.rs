//! Solana RPC abstraction layer.
//!
//! Defines the [`SolanaRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::HttpRpcClient;
pub use types::{LatestBlockhash, ParsedTransaction, SignatureStatus};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{Commitment, Pubkey};

/// Minimal trait covering the Solana RPC methods the payment service
/// needs.
///
/// Implementations handle transport, serialization, and JSON-RPC error
/// mapping internally. Every method is a single blocking network call
/// from the caller's perspective; nothing is cached between calls.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Node software version. Used once at startup as a connectivity
    /// probe before the server starts accepting requests.
    async fn get_version(&self) -> Result<String, CoreError>;

    /// Latest blockhash and its validity ceiling at the given commitment.
    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, CoreError>;

    /// Account balance in lamports at the given commitment.
    async fn get_balance(&self, pubkey: &Pubkey, commitment: Commitment)
        -> Result<u64, CoreError>;

    /// Submit a serialized signed transaction with preflight checks at
    /// `confirmed` commitment. Returns the transaction signature.
    async fn send_raw_transaction(&self, tx_bytes: &[u8]) -> Result<String, CoreError>;

    /// Cluster-reported status for a signature, or `None` while the
    /// cluster does not know it yet.
    async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, CoreError>;

    /// Current block height at the given commitment.
    async fn get_block_height(&self, commitment: Commitment) -> Result<u64, CoreError>;

    /// A confirmed transaction with instructions parsed by the node, or
    /// `None` if the cluster cannot return it.
    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, CoreError>;
}
