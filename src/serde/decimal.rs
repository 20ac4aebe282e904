//! Helpers for (de)serializing on-chain integers as decimal strings.
//!
//! Amounts, nonces and deadlines cross the HTTP boundary as decimal strings to avoid precision
//! loss in JavaScript clients. Deserialization also accepts JSON numbers and `0x` hex strings.

use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serializer, de::Error};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Serializes a [`U256`] as a decimal string.
pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Deserializes a [`U256`] from a decimal string, `0x` hex string, or number.
pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(U256::from(n)),
        NumberOrString::String(s) => parse_u256(&s).map_err(D::Error::custom),
    }
}

/// Parses a non-empty decimal or `0x` hex string into a [`U256`].
pub fn parse_u256(input: &str) -> Result<U256, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("expected a numeric string, got an empty string".to_string());
    }
    U256::from_str(input).map_err(|err| format!("invalid numeric string {input:?}: {err}"))
}

/// Same as the parent module, for chain ids and other `u64` values.
pub mod chain_id {
    use super::NumberOrString;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serializes a `u64` as a JSON number.
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*value)
    }

    /// Deserializes a `u64` from a number or decimal string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}
