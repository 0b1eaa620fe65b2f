//! Request-scoped approval cache.
//!
//! One multi-chain request may ask the same ledger about the same deployer
//! more than once (current chain plus every target). Answers are reused for
//! the lifetime of the request only; a fresh cache is created per request so
//! a revocation is always observed by the next one.

use alloy_primitives::Address;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::network::ChainId;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that went to the ledger
    pub misses: u64,
    /// Current number of cached answers
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<(ChainId, Address), bool>,
    stats: CacheStats,
}

/// `(chain, deployer) → approved` answers for a single request.
///
/// Only successful ledger reads are stored; an unreachable ledger is asked
/// again on the next lookup.
#[derive(Debug, Default)]
pub struct ApprovalCache {
    inner: Mutex<Inner>,
}

impl ApprovalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer, counting a hit or a miss.
    pub fn get(&self, chain_id: ChainId, deployer: Address) -> Option<bool> {
        let mut inner = self.lock();
        let found = inner.entries.get(&(chain_id, deployer)).copied();
        match found {
            Some(_) => inner.stats.hits += 1,
            None => inner.stats.misses += 1,
        }
        found
    }

    /// Record a ledger answer.
    pub fn insert(&self, chain_id: ChainId, deployer: Address, approved: bool) {
        let mut inner = self.lock();
        inner.entries.insert((chain_id, deployer), approved);
        inner.stats.entries = inner.entries.len();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned map only holds plain bools; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
