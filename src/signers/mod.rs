//! Relay signers.

mod relayer;
pub use relayer::RelayerIdentity;
