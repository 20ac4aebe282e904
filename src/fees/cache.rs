//! Short-lived cache of signed fee quotes.
//!
//! Avoids re-signing and re-reading the gas price for bursts of identical quote requests. Entries
//! expire long before the quote's own signed deadline, and a quote evicted from the cache stays
//! verifiable until that deadline.

use crate::types::FeeQuoteDto;
use alloy::primitives::{Address, U256};
use dashmap::DashMap;
use metrics::counter;
use std::time::{Duration, Instant};
use tracing::trace;

/// Quote cache key.
///
/// The sender is not part of the key since the fee only depends on gas usage.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct QuoteKey {
    /// Fee token.
    pub token: Address,
    /// Transfer amount.
    pub amount: U256,
    /// Transfer recipient.
    pub recipient: Address,
}

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: FeeQuoteDto,
    expires_at: Instant,
}

/// In-memory quote cache with sweep-on-access eviction.
#[derive(Debug, Default)]
pub struct QuoteCache {
    entries: DashMap<QuoteKey, CachedQuote>,
}

impl QuoteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live quote for `key`, if any.
    pub fn get(&self, key: &QuoteKey) -> Option<FeeQuoteDto> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &QuoteKey, now: Instant) -> Option<FeeQuoteDto> {
        let entry = self.entries.get(key).filter(|entry| entry.expires_at > now);
        if entry.is_some() {
            counter!("relay_quote_cache_hits_total").increment(1);
        } else {
            counter!("relay_quote_cache_misses_total").increment(1);
        }
        entry.map(|entry| entry.quote.clone())
    }

    /// Caches `quote` under `key` for `ttl`.
    pub fn put(&self, key: QuoteKey, quote: FeeQuoteDto, ttl: Duration) {
        self.entries.insert(key, CachedQuote { quote, expires_at: Instant::now() + ttl });
    }

    /// Removes every expired entry, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            trace!(removed, "Evicted expired quotes");
        }
        removed
    }

    /// Number of cached entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;

    fn key(amount: u64) -> QuoteKey {
        QuoteKey {
            token: Address::repeat_byte(1),
            amount: U256::from(amount),
            recipient: Address::repeat_byte(2),
        }
    }

    fn quote(fee: u64) -> FeeQuoteDto {
        FeeQuoteDto {
            fee_amount: U256::from(fee),
            fee_token: Address::repeat_byte(1),
            deadline: U256::from(1_900_000_000u64),
            signature: Bytes::from_static(&[1; 65]),
            relayer_address: Address::repeat_byte(3),
            buffer_percent: 20,
            estimated_gas: U256::from(150_000),
            gas_price: U256::from(10),
        }
    }

    #[test]
    fn returns_live_entries() {
        let cache = QuoteCache::new();
        assert_eq!(cache.get(&key(1)), None);

        cache.put(key(1), quote(10), Duration::from_secs(60));
        assert_eq!(cache.get(&key(1)), Some(quote(10)));
        assert_eq!(cache.get(&key(2)), None);
    }

    #[test]
    fn expired_entries_are_misses_until_swept() {
        let cache = QuoteCache::new();
        cache.put(key(1), quote(10), Duration::from_secs(3));
        cache.put(key(2), quote(20), Duration::from_secs(60));

        let later = Instant::now() + Duration::from_secs(10);
        assert_eq!(cache.get_at(&key(1), later), None);
        assert_eq!(cache.get_at(&key(2), later), Some(quote(20)));
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.sweep_at(later), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.sweep_at(later), 0);
    }

    #[test]
    fn put_replaces_entry() {
        let cache = QuoteCache::new();
        cache.put(key(1), quote(10), Duration::from_secs(60));
        cache.put(key(1), quote(11), Duration::from_secs(60));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(1)), Some(quote(11)));
    }
}
