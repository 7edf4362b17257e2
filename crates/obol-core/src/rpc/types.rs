//! Wire types for the Solana JSON-RPC methods this service consumes.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{Blockhash, Commitment};

// ==============================================================================
// Latest Blockhash
// ==============================================================================

/// Result of `getLatestBlockhash`: the checkpoint a new transaction must
/// reference, and the block height at which the node stops accepting it.
#[derive(Debug, Clone)]
pub struct LatestBlockhash {
    pub blockhash: Blockhash,
    pub last_valid_block_height: u64,
}

// ==============================================================================
// Signature Status
// ==============================================================================

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// Highest commitment level the cluster reports for the signature.
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
    /// On-chain execution error, present when the transaction landed in a
    /// block but failed.
    #[serde(default)]
    pub err: Option<Value>,
}

// ==============================================================================
// Parsed Transaction
// ==============================================================================

/// A `getTransaction` response with `jsonParsed` encoding, reduced to the
/// parts the facilitator inspects.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTransaction {
    pub slot: u64,
    pub transaction: ParsedTransactionBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTransactionBody {
    pub message: ParsedMessage,
    #[serde(default)]
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedMessage {
    #[serde(default)]
    pub instructions: Vec<ParsedInstruction>,
}

/// A single instruction as rendered by the node's parser. Programs the
/// node cannot decode carry raw `data`/`accounts` fields instead of
/// `parsed`, and some parsers emit `parsed` as a bare string, so the
/// payload stays an untyped [`Value`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInstruction {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub parsed: Option<Value>,
}

impl ParsedInstruction {
    /// Destination address and lamport amount, if this instruction is a
    /// system-program transfer. Amounts are read as exact integers
    /// whether the node rendered them as a JSON number or a string.
    pub fn as_system_transfer(&self) -> Option<(&str, u128)> {
        if self.program.as_deref() != Some("system") {
            return None;
        }
        let parsed = self.parsed.as_ref()?;
        if parsed.get("type").and_then(Value::as_str) != Some("transfer") {
            return None;
        }

        let info = parsed.get("info")?;
        let destination = info.get("destination")?.as_str()?;
        let lamports = match info.get("lamports")? {
            Value::Number(n) => u128::from(n.as_u64()?),
            Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        Some((destination, lamports))
    }
}
