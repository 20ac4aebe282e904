use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Errors returned by the chain collaborator.
#[derive(Debug, Error)]
pub enum ChainError {
    /// An error occurred talking to RPC.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// A contract call or transaction failed.
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
    /// The chain could not serve the request.
    #[error("{0}")]
    Unavailable(String),
}
