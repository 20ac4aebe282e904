//! # Gasless Relay
//!
//! Library for a relay that submits EIP-7702 delegated ERC20 transfers on behalf of users and
//! charges them in the transferred token.
//!
//! - [`fees::FeeQuoter`] prices and signs fee quotes.
//! - [`nonce::NonceResolver`] tells users which nonce to sign.
//! - [`relay::RelayExecutor`] verifies signed intents and broadcasts them.
//! - [`rpc::Relay`] serves all of the above over HTTP.

pub mod chain;
pub mod cli;
pub mod config;
pub mod constants;
pub mod eip712;
pub mod error;
pub mod fees;
pub mod gas;
pub mod intent;
pub mod metrics;
pub mod nonce;
pub mod relay;
pub mod rpc;
pub mod serde;
pub mod signers;
pub mod spawn;
pub mod time;
pub mod types;
pub mod version;
