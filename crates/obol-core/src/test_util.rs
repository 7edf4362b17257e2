//! Shared helpers for unit tests: deterministic keys, addresses, and
//! blockhashes so fixtures stay readable at the call site.

use ed25519_dalek::SigningKey;

use crate::keypair::Keypair;
use crate::rpc::LatestBlockhash;
use crate::types::{Blockhash, Pubkey};

/// Deterministic signing key from a single distinguishing byte.
pub fn test_signing_key(seed_byte: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed_byte; 32])
}

/// A deterministic key in its base58 64-byte encoded form, together with
/// the underlying signing key.
pub fn encoded_secret(seed_byte: u8) -> (SigningKey, String) {
    let signing = test_signing_key(seed_byte);
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(signing.as_bytes());
    bytes.extend_from_slice(signing.verifying_key().as_bytes());
    (signing, bs58::encode(bytes).into_string())
}

/// A ready-to-use deterministic [`Keypair`].
pub fn test_keypair(seed_byte: u8) -> Keypair {
    let (_, encoded) = encoded_secret(seed_byte);
    Keypair::from_base58(&encoded).expect("deterministic test key must parse")
}

/// An address that is distinct from any test keypair's.
pub fn test_pubkey(byte: u8) -> Pubkey {
    Pubkey::new([byte; 32])
}

pub fn test_blockhash(byte: u8) -> Blockhash {
    Blockhash::new([byte; 32])
}

pub fn test_checkpoint(byte: u8, last_valid_block_height: u64) -> LatestBlockhash {
    LatestBlockhash {
        blockhash: test_blockhash(byte),
        last_valid_block_height,
    }
}
