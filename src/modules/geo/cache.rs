use dashmap::DashMap;
use serde::Serialize;
use std::time::{Duration, Instant};

use super::resolver::ResolvedAddress;

/// In-memory TTL cache for resolved addresses, keyed by the exact input
/// string. Expired entries are evicted on lookup.
pub struct AddressCache {
    entries: DashMap<String, CacheEntry>,
    max_age: Duration,
}

struct CacheEntry {
    value: ResolvedAddress,
    stored_at: Instant,
}

#[derive(Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub entries: Vec<CacheEntryStats>,
}

#[derive(Serialize)]
pub struct CacheEntryStats {
    pub address: String,
    pub age_minutes: u64,
}

impl AddressCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_age,
        }
    }

    pub fn get(&self, address: &str) -> Option<ResolvedAddress> {
        if let Some(entry) = self.entries.get(address) {
            if entry.stored_at.elapsed() < self.max_age {
                tracing::debug!(%address, "address cache hit");
                return Some(entry.value.clone());
            }
            drop(entry);
            self.entries.remove(address);
            tracing::debug!(%address, "address cache entry expired");
        }
        None
    }

    pub fn set(&self, address: String, value: ResolvedAddress) {
        self.entries.insert(
            address,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
        tracing::info!("address cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        let entries: Vec<CacheEntryStats> = self
            .entries
            .iter()
            .map(|e| CacheEntryStats {
                address: e.key().clone(),
                age_minutes: e.value().stored_at.elapsed().as_secs() / 60,
            })
            .collect();
        CacheStats {
            total_entries: entries.len(),
            entries,
        }
    }
}
