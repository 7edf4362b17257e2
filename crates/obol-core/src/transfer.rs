//! Payment signing: build, sign, and serialize a native SOL transfer.

use base64::Engine as _;
use tracing::debug;

use crate::error::CoreError;
use crate::keypair::Keypair;
use crate::rpc::SolanaRpc;
use crate::transaction::{system_transfer, Message};
use crate::types::{Commitment, Pubkey};

/// A signed, serialized transfer ready for transport.
#[derive(Debug, Clone)]
pub struct SignedTransfer {
    /// Base64 of the serialized signed transaction.
    pub transaction_b64: String,
    pub from: Pubkey,
    pub to: Pubkey,
    pub lamports: u64,
}

/// Build a single-instruction SOL transfer from the local signer to
/// `recipient`, anchored to the latest finalized blockhash, then sign,
/// serialize, and base64-encode it.
pub async fn sign_transfer(
    rpc: &dyn SolanaRpc,
    payer: &Keypair,
    recipient: Pubkey,
    lamports: u64,
) -> Result<SignedTransfer, CoreError> {
    let checkpoint = rpc.get_latest_blockhash(Commitment::Finalized).await?;
    debug!(
        blockhash = %checkpoint.blockhash,
        last_valid_block_height = checkpoint.last_valid_block_height,
        "building transfer transaction"
    );

    let from = payer.pubkey();
    let instruction = system_transfer(from, recipient, lamports);
    let signed = Message::compile(from, &[instruction], checkpoint.blockhash).sign(payer);
    let transaction_b64 = base64::engine::general_purpose::STANDARD.encode(signed.serialize());

    Ok(SignedTransfer {
        transaction_b64,
        from,
        to: recipient,
        lamports,
    })
}
