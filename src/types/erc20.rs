//! ERC20 bindings.
use alloy::sol;

sol! {
    /// The ERC20 call a relayed intent carries.
    #[derive(Debug)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
