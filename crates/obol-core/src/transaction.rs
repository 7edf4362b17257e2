//! Legacy Solana transaction wire format, built and signed locally.
//!
//! A serialized transaction is the compact-u16 signature count, the
//! 64-byte signatures, then the message:
//!
//! ```text
//! num_required_signatures   u8
//! num_readonly_signed       u8
//! num_readonly_unsigned     u8
//! account_keys              compact-u16 count, then 32 bytes each
//! recent_blockhash          32 bytes
//! instructions              compact-u16 count, then per instruction:
//!   program_id_index        u8
//!   account_indices         compact-u16 count, then u8 each
//!   data                    compact-u16 length, then raw bytes
//! ```
//!
//! Account keys are ordered writable signers first (fee payer leading),
//! then read-only signers, writable non-signers, and read-only
//! non-signers; the first `num_required_signatures` keys must sign.

use crate::keypair::Keypair;
use crate::types::{Blockhash, Pubkey};

/// The system program owns native SOL transfers. Its id is 32 zero bytes
/// (base58 `11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// System program instruction index for `Transfer`, little-endian u32.
const TRANSFER_OPCODE: u32 = 2;

// ==============================================================================
// Instructions
// ==============================================================================

/// An account referenced by an instruction, with its access privileges.
#[derive(Debug, Clone)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An instruction before compilation into a message.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// The system program transfer: moves `lamports` from `from` to `to`.
/// Instruction data is the opcode followed by the amount, both
/// little-endian.
pub fn system_transfer(from: Pubkey, to: Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_OPCODE.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

// ==============================================================================
// Message Compilation
// ==============================================================================

#[derive(Debug, Clone)]
struct CompiledInstruction {
    program_id_index: u8,
    account_indices: Vec<u8>,
    data: Vec<u8>,
}

/// A compiled message: deduplicated, canonically ordered account keys
/// plus instructions referring to them by index.
#[derive(Debug, Clone)]
pub struct Message {
    account_keys: Vec<Pubkey>,
    num_required_signatures: u8,
    num_readonly_signed: u8,
    num_readonly_unsigned: u8,
    recent_blockhash: Blockhash,
    instructions: Vec<CompiledInstruction>,
}

fn merge_key(keys: &mut Vec<(Pubkey, bool, bool)>, key: Pubkey, signer: bool, writable: bool) {
    match keys.iter_mut().find(|(k, _, _)| *k == key) {
        Some(entry) => {
            entry.1 |= signer;
            entry.2 |= writable;
        }
        None => keys.push((key, signer, writable)),
    }
}

impl Message {
    /// Compile `instructions` into a message anchored to
    /// `recent_blockhash`, with `payer` as the leading writable signer.
    /// Duplicate account references are merged with the union of their
    /// privileges, so a payer that is also the transfer recipient still
    /// compiles to a well-formed message.
    pub fn compile(
        payer: Pubkey,
        instructions: &[Instruction],
        recent_blockhash: Blockhash,
    ) -> Self {
        let mut keys: Vec<(Pubkey, bool, bool)> = vec![(payer, true, true)];
        for instruction in instructions {
            for meta in &instruction.accounts {
                merge_key(&mut keys, meta.pubkey, meta.is_signer, meta.is_writable);
            }
            merge_key(&mut keys, instruction.program_id, false, false);
        }

        // Canonical ordering; the sort is stable and the payer sorts into
        // the leading writable-signer group, so it stays first.
        keys.sort_by_key(|&(_, signer, writable)| match (signer, writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        let num_required_signatures = keys.iter().filter(|k| k.1).count() as u8;
        let num_readonly_signed = keys.iter().filter(|k| k.1 && !k.2).count() as u8;
        let num_readonly_unsigned = keys.iter().filter(|k| !k.1 && !k.2).count() as u8;

        let account_keys: Vec<Pubkey> = keys.iter().map(|k| k.0).collect();
        let index_of = |key: Pubkey| -> u8 {
            account_keys
                .iter()
                .position(|k| *k == key)
                .expect("every referenced key was collected above") as u8
        };

        let instructions = instructions
            .iter()
            .map(|instruction| CompiledInstruction {
                program_id_index: index_of(instruction.program_id),
                account_indices: instruction
                    .accounts
                    .iter()
                    .map(|meta| index_of(meta.pubkey))
                    .collect(),
                data: instruction.data.clone(),
            })
            .collect();

        Self {
            account_keys,
            num_required_signatures,
            num_readonly_signed,
            num_readonly_unsigned,
            recent_blockhash,
            instructions,
        }
    }

    pub fn account_keys(&self) -> &[Pubkey] {
        &self.account_keys
    }

    /// Message bytes in wire order; this is what gets signed.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            3 + 3 + self.account_keys.len() * 32 + 32 + self.instructions.len() * 16,
        );
        out.push(self.num_required_signatures);
        out.push(self.num_readonly_signed);
        out.push(self.num_readonly_unsigned);

        push_compact_len(&mut out, self.account_keys.len() as u16);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(self.recent_blockhash.as_bytes());

        push_compact_len(&mut out, self.instructions.len() as u16);
        for instruction in &self.instructions {
            out.push(instruction.program_id_index);
            push_compact_len(&mut out, instruction.account_indices.len() as u16);
            out.extend_from_slice(&instruction.account_indices);
            push_compact_len(&mut out, instruction.data.len() as u16);
            out.extend_from_slice(&instruction.data);
        }

        out
    }

    /// Sign the message with the fee payer's key. The message must
    /// require exactly one signature, the payer's own.
    pub fn sign(&self, payer: &Keypair) -> SignedTransaction {
        debug_assert_eq!(self.num_required_signatures, 1);
        debug_assert_eq!(self.account_keys.first(), Some(&payer.pubkey()));

        let message = self.serialize();
        let signature = payer.sign(&message);
        SignedTransaction {
            signatures: vec![signature],
            message,
        }
    }
}

// ==============================================================================
// Signed Transaction
// ==============================================================================

/// A signed message ready for wire serialization.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    signatures: Vec<[u8; 64]>,
    message: Vec<u8>,
}

impl SignedTransaction {
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + self.message.len());
        push_compact_len(&mut out, self.signatures.len() as u16);
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&self.message);
        out
    }

    pub fn signatures(&self) -> &[[u8; 64]] {
        &self.signatures
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }
}

/// Append `value` in compact-u16 form: 7 bits per byte, little-endian,
/// high bit set on every byte but the last.
fn push_compact_len(out: &mut Vec<u8>, mut value: u16) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{test_blockhash, test_keypair, test_pubkey};

    fn compact(value: u16) -> Vec<u8> {
        let mut out = Vec::new();
        push_compact_len(&mut out, value);
        out
    }

    #[test]
    fn compact_u16_encodings() {
        assert_eq!(compact(0), vec![0x00]);
        assert_eq!(compact(1), vec![0x01]);
        assert_eq!(compact(0x7f), vec![0x7f]);
        assert_eq!(compact(0x80), vec![0x80, 0x01]);
        assert_eq!(compact(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(compact(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(compact(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn transfer_instruction_data_layout() {
        let instruction = system_transfer(test_pubkey(1), test_pubkey(2), 23);
        assert_eq!(instruction.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(instruction.data.len(), 12);
        assert_eq!(&instruction.data[..4], &2u32.to_le_bytes());
        assert_eq!(&instruction.data[4..], &23u64.to_le_bytes());
    }

    #[test]
    fn compile_orders_and_counts_accounts() {
        let payer = test_keypair(1).pubkey();
        let recipient = test_pubkey(2);
        let instruction = system_transfer(payer, recipient, 500);
        let message = Message::compile(payer, &[instruction], test_blockhash(9));

        assert_eq!(message.account_keys(), &[payer, recipient, SYSTEM_PROGRAM_ID]);
        assert_eq!(message.num_required_signatures, 1);
        assert_eq!(message.num_readonly_signed, 0);
        assert_eq!(message.num_readonly_unsigned, 1);

        let compiled = &message.instructions[0];
        assert_eq!(compiled.program_id_index, 2);
        assert_eq!(compiled.account_indices, vec![0, 1]);
    }

    #[test]
    fn compile_merges_duplicate_accounts() {
        // Paying yourself: the payer appears as both sender and recipient.
        let payer = test_keypair(1).pubkey();
        let instruction = system_transfer(payer, payer, 10);
        let message = Message::compile(payer, &[instruction], test_blockhash(3));

        assert_eq!(message.account_keys(), &[payer, SYSTEM_PROGRAM_ID]);
        assert_eq!(message.num_required_signatures, 1);
        assert_eq!(message.instructions[0].account_indices, vec![0, 0]);
    }

    #[test]
    fn message_serialization_layout() {
        let payer = test_keypair(1).pubkey();
        let recipient = test_pubkey(2);
        let blockhash = test_blockhash(7);
        let instruction = system_transfer(payer, recipient, 23);
        let bytes = Message::compile(payer, &[instruction], blockhash).serialize();

        // Header, key count, three keys, blockhash, instruction count.
        assert_eq!(&bytes[..3], &[1, 0, 1]);
        assert_eq!(bytes[3], 3);
        assert_eq!(&bytes[4..36], payer.as_bytes());
        assert_eq!(&bytes[36..68], recipient.as_bytes());
        assert_eq!(&bytes[68..100], SYSTEM_PROGRAM_ID.as_bytes());
        assert_eq!(&bytes[100..132], blockhash.as_bytes());
        assert_eq!(bytes[132], 1);
        // Instruction: program index, account indices, 12 bytes of data.
        assert_eq!(&bytes[133..137], &[2, 2, 0, 1]);
        assert_eq!(bytes[137], 12);
        assert_eq!(&bytes[138..142], &2u32.to_le_bytes());
        assert_eq!(&bytes[142..150], &23u64.to_le_bytes());
        assert_eq!(bytes.len(), 150);
    }

    #[test]
    fn signed_transaction_serializes_and_verifies() {
        let payer = test_keypair(5);
        let recipient = test_pubkey(6);
        let instruction = system_transfer(payer.pubkey(), recipient, 23);
        let message = Message::compile(payer.pubkey(), &[instruction], test_blockhash(1));
        let signed = message.sign(&payer);
        let bytes = signed.serialize();

        assert_eq!(bytes[0], 1);
        assert_eq!(bytes.len(), 1 + 64 + signed.message_bytes().len());
        assert_eq!(&bytes[65..], signed.message_bytes());

        let verifying = ed25519_dalek::VerifyingKey::from_bytes(payer.pubkey().as_bytes())
            .expect("payer pubkey must be a valid verifying key");
        let signature = ed25519_dalek::Signature::from_bytes(&signed.signatures()[0]);
        verifying
            .verify_strict(signed.message_bytes(), &signature)
            .expect("transaction signature must verify over the message bytes");
    }

    #[test]
    fn randomly_generated_keys_sign_valid_transactions() {
        use rand::rngs::OsRng;

        let signing = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let mut secret = Vec::with_capacity(64);
        secret.extend_from_slice(signing.as_bytes());
        secret.extend_from_slice(signing.verifying_key().as_bytes());
        let payer = crate::keypair::Keypair::from_base58(&bs58::encode(secret).into_string())
            .expect("generated key must parse");

        let instruction = system_transfer(payer.pubkey(), test_pubkey(8), 1);
        let signed = Message::compile(payer.pubkey(), &[instruction], test_blockhash(2)).sign(&payer);

        let signature = ed25519_dalek::Signature::from_bytes(&signed.signatures()[0]);
        signing
            .verifying_key()
            .verify_strict(signed.message_bytes(), &signature)
            .expect("signature must verify");
    }
}
