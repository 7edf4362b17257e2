//! Local signing key management.
//!
//! The signer's secret is loaded from configuration (environment variable
//! or flag) and never logged, serialized, or embedded in source.

use ed25519_dalek::{Signer, SigningKey};

use crate::error::CoreError;
use crate::types::Pubkey;

/// Byte length of the conventional encoded secret: the 32-byte ed25519
/// seed followed by the 32-byte public key.
const SECRET_KEY_LEN: usize = 64;

pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Build a keypair directly from a 32-byte ed25519 seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// Parse a base58-encoded 64-byte secret key (seed followed by public
    /// key). The embedded public half must match the key derived from the
    /// seed; a mismatch means the key material is corrupt.
    pub fn from_base58(encoded: &str) -> Result<Self, CoreError> {
        let decoded = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| CoreError::InvalidKey(format!("not base58: {e}")))?;
        if decoded.len() != SECRET_KEY_LEN {
            return Err(CoreError::InvalidKey(format!(
                "expected {SECRET_KEY_LEN} bytes, got {}",
                decoded.len()
            )));
        }

        let seed: [u8; 32] = decoded[..32]
            .try_into()
            .expect("length checked against SECRET_KEY_LEN above");
        let signing = SigningKey::from_bytes(&seed);

        if decoded[32..] != signing.verifying_key().to_bytes() {
            return Err(CoreError::InvalidKey(
                "public key half does not match the seed".to_owned(),
            ));
        }

        Ok(Self { signing })
    }

    /// The signer's public address.
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing.verifying_key().to_bytes())
    }

    /// Sign arbitrary message bytes.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in debug output.
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey().to_string())
            .finish_non_exhaustive()
    }
}
