//! Relay types.

mod delegated;
pub use delegated::*;

mod erc20;
pub use erc20::*;

mod intent;
pub use intent::*;

mod quote;
pub use quote::*;

pub mod rpc;

use alloy::primitives::Address;

/// Parses a `0x`-prefixed 20 byte hex account address.
///
/// Casing is ignored, so mixed-case input is accepted whether or not it is a valid EIP-55
/// checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"))?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    hex.to_ascii_lowercase().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn parses_addresses() {
        let expected = address!("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");

        assert_eq!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"), Some(expected));
        assert_eq!(parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"), Some(expected));
        assert_eq!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"), Some(expected));
        // not a valid checksum
        assert_eq!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"), Some(expected));
    }

    #[test]
    fn rejects_malformed_addresses() {
        // missing prefix
        assert_eq!(parse_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"), None);
        // too short
        assert_eq!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea"), None);
        // not hex
        assert_eq!(parse_address("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed"), None);
        assert_eq!(parse_address("not-an-address"), None);
    }
}
