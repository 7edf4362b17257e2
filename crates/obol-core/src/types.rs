//! Shared domain types: base58 keys, blockhashes, commitment levels, and
//! lamport/SOL unit scaling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lamports per whole SOL. Balances on the wire are always lamports.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Scale an integer lamport balance to whole SOL.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

fn decode_base58_32(encoded: &str) -> Result<[u8; 32], String> {
    let decoded = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| format!("not base58: {e}"))?;
    let len = decoded.len();
    <[u8; 32]>::try_from(decoded).map_err(|_| format!("expected 32 bytes, got {len}"))
}

// ==============================================================================
// Pubkey
// ==============================================================================

/// A 32-byte ed25519 public key, shown in its base58 text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base58_32(s)
            .map(Self)
            .map_err(CoreError::InvalidAddress)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

// ==============================================================================
// Blockhash
// ==============================================================================

/// A recent blockhash: the network checkpoint a transaction references to
/// bound its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blockhash([u8; 32]);

impl Blockhash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Blockhash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base58_32(s)
            .map(Self)
            .map_err(CoreError::InvalidBlockhash)
    }
}

impl fmt::Display for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

// ==============================================================================
// Commitment
// ==============================================================================

/// Durability level requested when reading chain state or confirming a
/// transaction. Variant order matters: `Finalized` > `Confirmed` >
/// `Processed`, so levels compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
