//! EIP-712 domains and digests.
//!
//! Two domains are in play:
//!
//! - the delegated account domain, under which users sign [`Intent`]s. It must match the
//!   verifying contract bit for bit, otherwise signatures recover to the wrong address on-chain.
//! - the fee quote domain, under which the relayer signs [`FeeQuote`]s.

use crate::{
    constants::{DELEGATED_ACCOUNT_DOMAIN_NAME, EIP712_DOMAIN_VERSION, FEE_QUOTE_DOMAIN_NAME},
    types::{FeeQuote, Intent},
};
use alloy::{
    primitives::{Address, B256, ChainId},
    sol_types::{Eip712Domain, SolStruct, eip712_domain},
};

/// Returns the domain of the delegated account at `verifying_contract`.
pub fn delegated_account_domain(chain_id: ChainId, verifying_contract: Address) -> Eip712Domain {
    eip712_domain! {
        name: DELEGATED_ACCOUNT_DOMAIN_NAME,
        version: EIP712_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: verifying_contract,
    }
}

/// Returns the domain fee quotes signed by `relayer` live under.
pub fn fee_quote_domain(chain_id: ChainId, relayer: Address) -> Eip712Domain {
    eip712_domain! {
        name: FEE_QUOTE_DOMAIN_NAME,
        version: EIP712_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: relayer,
    }
}

/// Computes the digest the user signs for `intent`.
///
/// `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(intent))`
pub fn intent_digest(intent: &Intent, domain: &Eip712Domain) -> B256 {
    intent.eip712_signing_hash(domain)
}

/// Computes the digest the relayer signs for `quote`.
pub fn fee_quote_digest(quote: &FeeQuote, domain: &Eip712Domain) -> B256 {
    quote.eip712_signing_hash(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{Bytes, U256, address, keccak256},
        sol_types::SolValue,
    };

    const DOMAIN_TYPE: &str =
        "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
    const INTENT_TYPE: &str =
        "Intent(address destination,uint256 value,bytes data,uint256 nonce,uint256 deadline)";

    fn intent() -> Intent {
        Intent {
            destination: address!("0x1111111111111111111111111111111111111111"),
            value: U256::ZERO,
            data: Bytes::from_static(&[0xa9, 0x05, 0x9c, 0xbb, 0x01, 0x02]),
            nonce: U256::from(3),
            deadline: U256::from(1_700_000_000u64),
        }
    }

    #[test]
    fn intent_type_matches_contract() {
        assert_eq!(Intent::eip712_encode_type(), INTENT_TYPE);
        assert_eq!(intent().eip712_type_hash(), keccak256(INTENT_TYPE));
    }

    #[test]
    fn intent_digest_matches_manual_encoding() {
        let chain_id = 5887u64;
        let account = address!("0x2222222222222222222222222222222222222222");
        let intent = intent();

        let domain_separator = keccak256(
            (
                keccak256(DOMAIN_TYPE),
                keccak256(DELEGATED_ACCOUNT_DOMAIN_NAME),
                keccak256(EIP712_DOMAIN_VERSION),
                U256::from(chain_id),
                account,
            )
                .abi_encode(),
        );
        let intent_hash = keccak256(
            (
                keccak256(INTENT_TYPE),
                intent.destination,
                intent.value,
                keccak256(&intent.data),
                intent.nonce,
                intent.deadline,
            )
                .abi_encode(),
        );
        let expected = keccak256(
            [&[0x19, 0x01][..], domain_separator.as_slice(), intent_hash.as_slice()].concat(),
        );

        let domain = delegated_account_domain(chain_id, account);
        assert_eq!(domain.separator(), domain_separator);
        assert_eq!(intent_digest(&intent, &domain), expected);
    }

    #[test]
    fn digest_is_domain_bound() {
        let account = address!("0x2222222222222222222222222222222222222222");
        let intent = intent();
        let digest = intent_digest(&intent, &delegated_account_domain(1, account));

        assert_ne!(digest, intent_digest(&intent, &delegated_account_domain(2, account)));
        assert_ne!(digest, intent_digest(&intent, &delegated_account_domain(1, Address::ZERO)));
        assert_ne!(digest, intent_digest(&intent, &fee_quote_domain(1, account)));
    }

    #[test]
    fn fee_quote_type_matches_verifier() {
        assert_eq!(
            FeeQuote::eip712_encode_type(),
            "FeeQuote(address feeToken,uint256 feeAmount,uint256 deadline)"
        );
    }
}
