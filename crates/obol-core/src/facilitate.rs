//! Payment facilitation: relay a signed transaction, wait for the
//! cluster to confirm it, and verify it carries the expected transfer.
//!
//! The flow is strictly linear — submit, confirm, fetch, validate — with
//! no retries: any failure terminates the request with a negative result.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::rpc::{LatestBlockhash, SolanaRpc};
use crate::types::Commitment;

/// How often the confirmation wait polls the signature status.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Submit `tx_bytes`, wait until the cluster confirms the transaction,
/// and verify it contains at least one system transfer whose destination
/// and lamport amount both exactly match the expectation. Returns the
/// transaction signature on success.
pub async fn facilitate_transfer(
    rpc: &dyn SolanaRpc,
    tx_bytes: &[u8],
    expected_recipient: &str,
    expected_lamports: u128,
) -> Result<String, CoreError> {
    let signature = rpc.send_raw_transaction(tx_bytes).await?;
    info!(%signature, "transaction submitted");

    // A fresh checkpoint bounds how long the confirmation wait may block.
    let checkpoint = rpc.get_latest_blockhash(Commitment::Finalized).await?;
    await_confirmation(rpc, &signature, &checkpoint, Commitment::Confirmed).await?;

    let Some(parsed) = rpc.get_parsed_transaction(&signature).await? else {
        warn!(%signature, "confirmed transaction could not be fetched");
        return Err(CoreError::UnparsedTransaction);
    };
    let instructions = &parsed.transaction.message.instructions;
    if instructions.is_empty() {
        warn!(%signature, "fetched transaction carries no instructions");
        return Err(CoreError::UnparsedTransaction);
    }

    let matched = instructions.iter().any(|instruction| {
        instruction
            .as_system_transfer()
            .is_some_and(|(destination, lamports)| {
                debug!(
                    destination,
                    lamports = %lamports,
                    expected_recipient,
                    expected_lamports = %expected_lamports,
                    "inspecting transfer instruction"
                );
                destination == expected_recipient && lamports == expected_lamports
            })
    });
    if !matched {
        warn!(%signature, expected_recipient, "transfer does not match expected values");
        return Err(CoreError::TransferMismatch);
    }

    info!(%signature, "transfer validated");
    Ok(signature)
}

/// Block until the cluster reports `signature` at `commitment` or
/// better. Gives up once the chain's block height passes the
/// checkpoint's validity ceiling, after which the transaction can no
/// longer land.
pub async fn await_confirmation(
    rpc: &dyn SolanaRpc,
    signature: &str,
    checkpoint: &LatestBlockhash,
    commitment: Commitment,
) -> Result<(), CoreError> {
    loop {
        if let Some(status) = rpc.get_signature_status(signature).await? {
            if let Some(err) = status.err {
                return Err(CoreError::TransactionFailed {
                    signature: signature.to_owned(),
                    reason: err.to_string(),
                });
            }
            if status
                .confirmation_status
                .is_some_and(|level| level >= commitment)
            {
                return Ok(());
            }
        }

        let height = rpc.get_block_height(commitment).await?;
        if height > checkpoint.last_valid_block_height {
            return Err(CoreError::ConfirmationExpired {
                signature: signature.to_owned(),
                last_valid_block_height: checkpoint.last_valid_block_height,
            });
        }

        tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
    }
}
