//! The relayer's own account.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, Signature},
    signers::{Signer, local::PrivateKeySigner},
    sol_types::{Eip712Domain, SolStruct},
};
use eyre::{Context, bail};
use std::{fmt, str::FromStr};

/// The relay's funded account.
///
/// Signs fee quotes and pays gas for relayed transactions. Loaded once at startup.
#[derive(Clone)]
pub struct RelayerIdentity {
    signer: PrivateKeySigner,
}

impl fmt::Debug for RelayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelayerIdentity").field(&self.address()).finish()
    }
}

impl RelayerIdentity {
    /// Loads the relayer from a hex encoded secret key.
    pub fn from_secret_key(key: &str) -> eyre::Result<Self> {
        let key = key.trim();
        if key.is_empty() {
            bail!("relayer secret key is not set");
        }
        let signer = PrivateKeySigner::from_str(key).wrap_err("invalid relayer secret key")?;
        Ok(Self { signer })
    }

    /// Returns a [`RelayerIdentity`] for `signer`.
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// Returns the relayer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Returns a wallet signing transactions as the relayer.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Signs `message` as EIP-712 typed data under `domain`.
    pub async fn sign_typed_data<T: SolStruct + Sync>(
        &self,
        domain: &Eip712Domain,
        message: &T,
    ) -> eyre::Result<Signature> {
        self.sign_hash(message.eip712_signing_hash(domain)).await
    }

    /// Signs a prehashed EIP-712 digest.
    pub async fn sign_hash(&self, digest: B256) -> eyre::Result<Signature> {
        Ok(self.signer.sign_hash(&digest).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::eip712_domain};

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn loads_from_secret_key() {
        let relayer = RelayerIdentity::from_secret_key(ANVIL_KEY).unwrap();
        assert_eq!(relayer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn rejects_missing_or_malformed_keys() {
        assert!(RelayerIdentity::from_secret_key("").is_err());
        assert!(RelayerIdentity::from_secret_key("   ").is_err());
        assert!(RelayerIdentity::from_secret_key("0x1234").is_err());
        assert!(RelayerIdentity::from_secret_key("not a key").is_err());
    }

    #[tokio::test]
    async fn signs_typed_data() {
        alloy::sol! {
            struct Ping {
                uint256 id;
            }
        }

        let relayer = RelayerIdentity::from_secret_key(ANVIL_KEY).unwrap();
        let domain = eip712_domain! {
            name: "Test",
            version: "1",
            chain_id: 1,
            verifying_contract: relayer.address(),
        };
        let message = Ping { id: alloy::primitives::U256::from(7) };

        let signature = relayer.sign_typed_data(&domain, &message).await.unwrap();
        let recovered = signature
            .recover_address_from_prehash(&message.eip712_signing_hash(&domain))
            .unwrap();
        assert_eq!(recovered, relayer.address());
    }
}
