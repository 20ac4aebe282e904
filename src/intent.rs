//! Intent signature verification.

use crate::{
    eip712::{delegated_account_domain, intent_digest},
    error::IntentError,
    types::Intent,
};
use alloy::{
    primitives::{Address, B256, ChainId, Signature},
    sol_types::Eip712Domain,
};

/// Reconstructs intent digests and recovers their signers.
#[derive(Debug, Clone)]
pub struct IntentVerifier {
    domain: Eip712Domain,
}

impl IntentVerifier {
    /// Create a verifier for intents signed for the delegated account at `delegated_account` on
    /// `chain_id`.
    pub fn new(chain_id: ChainId, delegated_account: Address) -> Self {
        Self { domain: delegated_account_domain(chain_id, delegated_account) }
    }

    /// Returns the delegated account domain.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Computes the digest the user signed.
    pub fn digest(&self, intent: &Intent) -> B256 {
        intent_digest(intent, &self.domain)
    }

    /// Recovers the signer of `intent` from a 65 byte `r || s || v` signature.
    pub fn recover_signer(&self, intent: &Intent, signature: &[u8]) -> Result<Address, IntentError> {
        let signature = Signature::try_from(signature)
            .map_err(|err| IntentError::InvalidSignature(err.to_string()))?;
        signature
            .recover_address_from_prehash(&self.digest(intent))
            .map_err(|err| IntentError::InvalidSignature(err.to_string()))
    }

    /// Verifies that `user` signed `intent`, returning the digest.
    pub fn verify(
        &self,
        user: Address,
        intent: &Intent,
        signature: &[u8],
    ) -> Result<B256, IntentError> {
        let recovered = self.recover_signer(intent, signature)?;
        // `Address` equality is byte equality, so hex casing never matters here
        if recovered != user {
            return Err(IntentError::SignatureVerificationFailed { expected: user, recovered });
        }
        Ok(self.digest(intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IERC20;
    use alloy::{
        primitives::{U256, address},
        signers::{SignerSync, local::PrivateKeySigner},
        sol_types::SolCall,
    };

    fn intent() -> Intent {
        Intent {
            destination: address!("0x1111111111111111111111111111111111111111"),
            value: U256::ZERO,
            data: IERC20::transferCall {
                to: address!("0x3333333333333333333333333333333333333333"),
                amount: U256::from(1_000_000),
            }
            .abi_encode()
            .into(),
            nonce: U256::ZERO,
            deadline: U256::from(1_900_000_000u64),
        }
    }

    #[test]
    fn verifies_user_signature() {
        let user = PrivateKeySigner::random();
        let verifier = IntentVerifier::new(5887, address!("0x2222222222222222222222222222222222222222"));
        let intent = intent();

        let signature = user.sign_hash_sync(&verifier.digest(&intent)).unwrap();
        let digest = verifier.verify(user.address(), &intent, &signature.as_bytes()).unwrap();
        assert_eq!(digest, verifier.digest(&intent));
    }

    #[test]
    fn rejects_other_signer() {
        let user = PrivateKeySigner::random();
        let attacker = PrivateKeySigner::random();
        let verifier = IntentVerifier::new(5887, Address::ZERO);
        let intent = intent();

        let signature = attacker.sign_hash_sync(&verifier.digest(&intent)).unwrap();
        let err = verifier.verify(user.address(), &intent, &signature.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IntentError::SignatureVerificationFailed { expected, recovered }
                if expected == user.address() && recovered == attacker.address()
        ));
    }

    #[test]
    fn rejects_tampered_intent() {
        let user = PrivateKeySigner::random();
        let verifier = IntentVerifier::new(5887, Address::ZERO);
        let intent = intent();
        let signature = user.sign_hash_sync(&verifier.digest(&intent)).unwrap();

        let tampered = Intent { nonce: U256::from(1), ..intent };
        assert!(verifier.verify(user.address(), &tampered, &signature.as_bytes()).is_err());
    }

    #[test]
    fn rejects_signature_for_other_chain() {
        let user = PrivateKeySigner::random();
        let intent = intent();
        let other = IntentVerifier::new(1, Address::ZERO);
        let signature = user.sign_hash_sync(&other.digest(&intent)).unwrap();

        let verifier = IntentVerifier::new(5887, Address::ZERO);
        assert!(verifier.verify(user.address(), &intent, &signature.as_bytes()).is_err());
    }

    #[test]
    fn rejects_malformed_signature() {
        let verifier = IntentVerifier::new(5887, Address::ZERO);
        let err = verifier.recover_signer(&intent(), &[0u8; 64]).unwrap_err();
        assert!(matches!(err, IntentError::InvalidSignature(_)));
    }
}
