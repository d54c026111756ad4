use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use thiserror::Error;
use zksl_commitment::CommitmentPreimage;
use zksl_core::{AggregatorConfig, LedgerPubkey, Seq};

#[derive(Debug, Error)]
pub enum SigningError {
    #[error(
        "aggregator key mismatch: locally loaded key does not match the allowed pubkey for seq {seq}"
    )]
    AggregatorKeyMismatch { seq: Seq },
    #[error("invalid signature")]
    InvalidSignature,
}

/// Holds the aggregator's Ed25519 keypair and produces detached signatures
/// over commitment preimages, enforcing the current-vs-next key schedule.
///
/// The secret key never leaves this process; `Debug` only ever prints the
/// public half.
pub struct AggregatorSigner {
    signing_key: SigningKey,
}

impl AggregatorSigner {
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    pub fn public_key(&self) -> LedgerPubkey {
        LedgerPubkey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `preimage` for anchoring at `seq`, under `config`'s activation
    /// schedule. Fails with [`SigningError::AggregatorKeyMismatch`] if the
    /// locally loaded public key is not the allowed pubkey for `seq`.
    pub fn sign(
        &self,
        preimage: &CommitmentPreimage,
        seq: Seq,
        config: &AggregatorConfig,
    ) -> Result<Signature, SigningError> {
        let allowed = config.allowed_pubkey(seq);
        if self.public_key().0 != allowed.0 {
            return Err(SigningError::AggregatorKeyMismatch { seq });
        }
        Ok(self.signing_key.sign(preimage.as_bytes()))
    }
}

impl std::fmt::Debug for AggregatorSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AggregatorSigner {{ public_key: {:?} }}", self.public_key())
    }
}

/// Verify a detached Ed25519 signature over a 110-byte preimage. Used both
/// by tests and by the pre-verification path mirrored in the transaction
/// the submitter assembles (see `zksl-submit`).
pub fn verify(
    pubkey: &LedgerPubkey,
    preimage: &CommitmentPreimage,
    signature: &Signature,
) -> Result<(), SigningError> {
    let vk = VerifyingKey::from_bytes(&pubkey.0).map_err(|_| SigningError::InvalidSignature)?;
    vk.verify(preimage.as_bytes(), signature)
        .map_err(|_| SigningError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use zksl_commitment::CommitmentInputs;
    use zksl_core::ProofHash;

    fn preimage() -> CommitmentPreimage {
        CommitmentPreimage::build(&CommitmentInputs {
            chain_id: 1,
            program_id: LedgerPubkey([0u8; 32]),
            proof_hash: ProofHash::from_bytes([0u8; 32]),
            start_slot: 1,
            end_slot: 1,
            seq: 1,
        })
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let key = SigningKey::generate(&mut OsRng);
        let pubkey = LedgerPubkey(key.verifying_key().to_bytes());
        let signer = AggregatorSigner::new(key);
        let config = AggregatorConfig {
            aggregator_pubkey: pubkey,
            next_aggregator_pubkey: pubkey,
            activation_seq: 1000,
            chain_id: 1,
        };
        let sig = signer.sign(&preimage(), 1, &config).unwrap();
        assert!(verify(&pubkey, &preimage(), &sig).is_ok());
    }

    #[test]
    fn signing_fails_when_key_not_allowed_for_seq() {
        let current = SigningKey::generate(&mut OsRng);
        let other = SigningKey::generate(&mut OsRng);
        let config = AggregatorConfig {
            aggregator_pubkey: LedgerPubkey(current.verifying_key().to_bytes()),
            next_aggregator_pubkey: LedgerPubkey(other.verifying_key().to_bytes()),
            activation_seq: 5,
            chain_id: 1,
        };

        // Signer holds the *current* key but seq has crossed the activation
        // cliff, so `next_aggregator_pubkey` is now required.
        let signer = AggregatorSigner::new(current);
        let err = signer.sign(&preimage(), 5, &config).unwrap_err();
        assert!(matches!(err, SigningError::AggregatorKeyMismatch { seq: 5 }));
    }

    #[test]
    fn tampered_preimage_fails_verification() {
        let key = SigningKey::generate(&mut OsRng);
        let pubkey = LedgerPubkey(key.verifying_key().to_bytes());
        let signer = AggregatorSigner::new(key);
        let config = AggregatorConfig {
            aggregator_pubkey: pubkey,
            next_aggregator_pubkey: pubkey,
            activation_seq: 1000,
            chain_id: 1,
        };
        let sig = signer.sign(&preimage(), 1, &config).unwrap();

        let mut tampered = preimage();
        tampered.0[0] ^= 0xff;
        assert!(verify(&pubkey, &tampered, &sig).is_err());
    }
}
