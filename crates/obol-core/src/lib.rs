pub mod balance;
pub mod error;
pub mod facilitate;
pub mod keypair;
pub mod rpc;
pub mod transaction;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod test_util;

pub use error::{CoreError, RpcError};
pub use types::{Blockhash, Commitment, Pubkey, LAMPORTS_PER_SOL};
