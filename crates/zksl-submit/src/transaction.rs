//! Multi-instruction transaction composition: compute-budget request,
//! pre-verification signature check, and the anchor-proof call itself.

use zksl_codec::le::write_u32;
use zksl_core::LedgerPubkey;

/// Sentinel meaning "the current instruction" in the signature-check
/// instruction's offset table, matching the external program's own
/// convention for self-referential instruction indices.
pub const CURRENT_INSTRUCTION_SENTINEL: u16 = 0xFFFF;

const COMPUTE_BUDGET_UNITS: u32 = 200_000;

/// Compute-budget request instruction. Layout: a single-byte tag (`0x02`,
/// "request units") followed by the requested unit count (u32 LE).
pub fn compute_budget_instruction() -> Vec<u8> {
    let mut out = Vec::with_capacity(5);
    out.push(0x02);
    write_u32(&mut out, COMPUTE_BUDGET_UNITS);
    out
}

/// Pre-verification Ed25519 signature-check instruction. Mirrors the
/// well-known native sig-verify instruction shape: a signature-count byte,
/// a padding byte, one 14-byte offsets record per signature, then the raw
/// signature/pubkey/message bytes those offsets point into.
///
/// Because all three pieces live in this same instruction, every
/// `*_instruction_index` field is the [`CURRENT_INSTRUCTION_SENTINEL`].
pub fn signature_check_instruction(pubkey: &LedgerPubkey, signature: &[u8; 64], message: &[u8]) -> Vec<u8> {
    const HEADER_LEN: usize = 2;
    const OFFSETS_LEN: usize = 14;
    let data_start = HEADER_LEN + OFFSETS_LEN;

    let signature_offset = data_start as u16;
    let public_key_offset = signature_offset + 64;
    let message_data_offset = public_key_offset + 32;
    let message_data_size = message.len() as u16;

    let mut out = Vec::with_capacity(data_start + 64 + 32 + message.len());
    out.push(1); // num_signatures
    out.push(0); // padding

    out.extend_from_slice(&signature_offset.to_le_bytes());
    out.extend_from_slice(&CURRENT_INSTRUCTION_SENTINEL.to_le_bytes());
    out.extend_from_slice(&public_key_offset.to_le_bytes());
    out.extend_from_slice(&CURRENT_INSTRUCTION_SENTINEL.to_le_bytes());
    out.extend_from_slice(&message_data_offset.to_le_bytes());
    out.extend_from_slice(&message_data_size.to_le_bytes());
    out.extend_from_slice(&CURRENT_INSTRUCTION_SENTINEL.to_le_bytes());

    out.extend_from_slice(signature);
    out.extend_from_slice(&pubkey.0);
    out.extend_from_slice(message);

    debug_assert_eq!(out.len(), data_start + 64 + 32 + message.len());
    out
}

/// The seven accounts referenced by the anchor-proof call, in the exact
/// order the verifier program expects them.
#[derive(Debug, Clone, Copy)]
pub struct AnchorCallAccounts {
    pub fee_payer: LedgerPubkey,
    pub configuration: LedgerPubkey,
    pub aggregator_state: LedgerPubkey,
    pub range_state: LedgerPubkey,
    pub proof_record: LedgerPubkey,
    pub instructions_sysvar: LedgerPubkey,
    pub system_program: LedgerPubkey,
}

impl AnchorCallAccounts {
    /// Ordered `(pubkey, is_signer, is_writable)` tuples, in the key order
    /// the anchor call requires.
    pub fn ordered(&self) -> [(LedgerPubkey, bool, bool); 7] {
        [
            (self.fee_payer, true, true),
            (self.configuration, false, true),
            (self.aggregator_state, false, true),
            (self.range_state, false, true),
            (self.proof_record, false, true),
            (self.instructions_sysvar, false, false),
            (self.system_program, false, false),
        ]
    }
}

/// A fully composed, three-instruction anchor transaction. Instructions are
/// plain byte blobs here — account metadata is carried alongside since this
/// workspace treats ledger transaction framing as the (out-of-scope)
/// ledger node's concern and only needs to hand it a well-formed list.
pub struct AnchorTransaction {
    pub instructions: Vec<Vec<u8>>,
    pub accounts: AnchorCallAccounts,
}

pub fn compose(
    anchor_call_payload: Vec<u8>,
    sig_pubkey: &LedgerPubkey,
    signature: &[u8; 64],
    signed_message: &[u8],
    accounts: AnchorCallAccounts,
) -> AnchorTransaction {
    let instructions = vec![
        compute_budget_instruction(),
        signature_check_instruction(sig_pubkey, signature, signed_message),
        anchor_call_payload,
    ];
    AnchorTransaction {
        instructions,
        accounts,
    }
}

/// Next sequence number to anchor, per the spec's monotonic rule: the
/// aggregator-state record's `last_seq` (0 if the record is absent) plus one.
pub fn next_seq(last_seq: Option<u64>) -> u64 {
    last_seq.unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_budget_instruction_requests_200k_units() {
        let ins = compute_budget_instruction();
        assert_eq!(ins.len(), 5);
        assert_eq!(u32::from_le_bytes(ins[1..5].try_into().unwrap()), 200_000);
    }

    #[test]
    fn signature_check_instruction_embeds_all_three_pieces() {
        let pubkey = LedgerPubkey([9u8; 32]);
        let signature = [3u8; 64];
        let message = vec![1u8; 110];
        let ins = signature_check_instruction(&pubkey, &signature, &message);

        assert_eq!(ins.len(), 2 + 14 + 64 + 32 + 110);
        assert_eq!(&ins[16..16 + 64], &signature[..]);
        assert_eq!(&ins[80..80 + 32], &pubkey.0[..]);
        assert_eq!(&ins[112..], &message[..]);
    }

    #[test]
    fn sentinel_marks_every_instruction_index_as_current() {
        let ins = signature_check_instruction(&LedgerPubkey([0u8; 32]), &[0u8; 64], &[]);
        let sig_idx = u16::from_le_bytes(ins[4..6].try_into().unwrap());
        let pk_idx = u16::from_le_bytes(ins[8..10].try_into().unwrap());
        let msg_idx = u16::from_le_bytes(ins[14..16].try_into().unwrap());
        assert_eq!(sig_idx, CURRENT_INSTRUCTION_SENTINEL);
        assert_eq!(pk_idx, CURRENT_INSTRUCTION_SENTINEL);
        assert_eq!(msg_idx, CURRENT_INSTRUCTION_SENTINEL);
    }

    #[test]
    fn next_seq_starts_at_one_when_absent() {
        assert_eq!(next_seq(None), 1);
        assert_eq!(next_seq(Some(41)), 42);
    }

    #[test]
    fn anchor_call_accounts_preserve_key_order() {
        let accounts = AnchorCallAccounts {
            fee_payer: LedgerPubkey([1u8; 32]),
            configuration: LedgerPubkey([2u8; 32]),
            aggregator_state: LedgerPubkey([3u8; 32]),
            range_state: LedgerPubkey([4u8; 32]),
            proof_record: LedgerPubkey([5u8; 32]),
            instructions_sysvar: LedgerPubkey([6u8; 32]),
            system_program: LedgerPubkey([7u8; 32]),
        };
        let ordered = accounts.ordered();
        assert_eq!(ordered[0], (accounts.fee_payer, true, true));
        assert_eq!(ordered[5], (accounts.instructions_sysvar, false, false));
        assert_eq!(ordered[6], (accounts.system_program, false, false));
    }
}
