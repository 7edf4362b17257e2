//! Account balance lookup with lamport/SOL unit scaling.

use crate::error::CoreError;
use crate::rpc::SolanaRpc;
use crate::types::{lamports_to_sol, Commitment, Pubkey};

/// An account balance in both native and whole-unit terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub lamports: u64,
    pub sol: f64,
}

/// Fetch the balance of `pubkey` at confirmed commitment.
pub async fn fetch_balance(rpc: &dyn SolanaRpc, pubkey: &Pubkey) -> Result<Balance, CoreError> {
    let lamports = rpc.get_balance(pubkey, Commitment::Confirmed).await?;
    Ok(Balance {
        lamports,
        sol: lamports_to_sol(lamports),
    })
}
