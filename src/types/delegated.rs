use alloy::sol;

sol! {
    /// An action the account owner authorized off-chain.
    ///
    /// Signed as EIP-712 typed data under the delegated account domain.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct Intent {
        /// The contract the delegated call targets.
        address destination;
        /// Native value forwarded with the call.
        uint256 value;
        /// Encoded call, e.g. an ERC20 `transfer`.
        bytes data;
        /// Replay-protection counter the account expects.
        uint256 nonce;
        /// Unix timestamp after which the intent is invalid.
        uint256 deadline;
    }

    /// The EIP-7702 delegated account implementation users delegate their EOA to.
    ///
    /// Calls are made against the user's own address, so `nonces(account)` and `execute` run in
    /// the account's storage context.
    #[sol(rpc)]
    #[derive(Debug)]
    interface IDelegatedAccount {
        function nonces(address account) external view returns (uint256);
        function execute(Intent calldata intent, bytes calldata signature) external payable;
    }
}
