//! Relay constants.

use alloy::primitives::U256;
use std::time::Duration;

/// Static gas estimate for a delegated ERC20 transfer through `execute`.
///
/// Quoting cannot simulate the call: the intent is not signed yet, and a dummy signature fails
/// ECDSA recovery inside the delegated account.
pub const DEFAULT_EXECUTE_GAS: u64 = 150_000;

/// Percentage added on top of simulated `execute` gas before broadcasting.
pub const DEFAULT_EXECUTE_GAS_BUFFER_PERCENT: u64 = 20;

/// Gas price ceiling, in gwei, above which the relay refuses to broadcast.
pub const DEFAULT_MAX_GAS_PRICE_GWEI: u64 = 100;

/// Percentage buffer added to the converted gas cost of a fee quote.
pub const DEFAULT_FEE_BUFFER_PERCENT: u64 = 20;

/// How long a signed fee quote stays valid.
pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(300);

/// How long a signed fee quote is served from the quote cache.
pub const QUOTE_CACHE_TTL: Duration = Duration::from_secs(3);

/// Fixed-point scale applied to the native/token price ratio.
pub const PRICE_SCALE: u64 = 1_000_000;

/// Decimals of the chain's native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Wei per gwei.
pub const GWEI_TO_WEI: u128 = 1_000_000_000;

/// Relayer balance (0.1 native units) at or below which the relayer is reported unhealthy.
pub const MIN_HEALTHY_BALANCE: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// EIP-712 domain name of fee quotes signed by the relayer.
pub const FEE_QUOTE_DOMAIN_NAME: &str = "MantraUSD Pay";

/// EIP-712 domain name of the delegated account contract.
pub const DELEGATED_ACCOUNT_DOMAIN_NAME: &str = "DelegatedAccount";

/// EIP-712 domain version shared by both domains.
pub const EIP712_DOMAIN_VERSION: &str = "1";

/// Default maximum number of in-flight HTTP requests.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1000;
