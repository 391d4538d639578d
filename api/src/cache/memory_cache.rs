//! Process-wide memory cache
//!
//! Values are type-erased so a single cache instance can be shared by every
//! service. Each key holds one slot: a once-cell tagged with the change token
//! it was created under. Concurrent callers for the same key share the slot,
//! so only one of them runs the factory while the others wait for its value.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use super::region::{CacheRegion, ChangeToken};
use crate::error::DomainError;

type CachedValue = Arc<dyn Any + Send + Sync>;

struct CacheSlot {
    token: ChangeToken,
    cell: OnceCell<CachedValue>,
}

impl CacheSlot {
    fn new(token: ChangeToken) -> Self {
        Self {
            token,
            cell: OnceCell::new(),
        }
    }
}

/// Cleans up after a computation that failed or was abandoned mid-flight
///
/// The slot leaves the map only when no other caller holds it. Otherwise the
/// next waiter runs its factory on the same slot and late callers keep
/// joining that slot, so at most one factory runs per key and token.
struct PendingSlot<'a> {
    entries: &'a DashMap<String, Arc<CacheSlot>>,
    key: &'a str,
    slot: &'a Arc<CacheSlot>,
    armed: bool,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            // One reference is the map's, one is ours
            self.entries.remove_if(self.key, |_, s| {
                Arc::ptr_eq(s, self.slot) && Arc::strong_count(s) <= 2
            });
        }
    }
}

/// Build a cache key from a service, a method and its serialized arguments
pub fn cache_key<C: Serialize>(
    service: &str,
    method: &str,
    criteria: &C,
) -> Result<String, DomainError> {
    let json = serde_json::to_vec(criteria)
        .map_err(|e| DomainError::Internal(format!("Failed to fingerprint criteria: {}", e)))?;
    let digest = Sha256::digest(&json);
    Ok(format!("{}:{}:{}", service, method, hex::encode(digest)))
}

/// Shared cache with change-token expiration and single-flight population
#[derive(Default)]
pub struct PlatformMemoryCache {
    entries: DashMap<String, Arc<CacheSlot>>,
}

impl PlatformMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value cached under `key`, computing it with `factory` on a miss
    ///
    /// Entries are tied to the current token of `region` and recomputed once
    /// the region expires. While a computation is in flight, other callers for
    /// the same key wait for it. A failed computation is not cached: its error
    /// goes to the caller that ran it and the next waiting caller runs its own
    /// factory in its place. With nobody waiting, a failed or abandoned
    /// computation leaves no entry behind.
    pub async fn get_or_create_exclusive<T, F, Fut>(
        &self,
        key: &str,
        region: &CacheRegion,
        factory: F,
    ) -> Result<T, DomainError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let slot = self.slot_for(key, region);

        if slot.cell.initialized() {
            tracing::debug!(key, "Cache hit");
        }

        let entries = &self.entries;
        let pending_slot = &slot;
        let result = slot
            .cell
            .get_or_try_init(move || async move {
                let mut pending = PendingSlot {
                    entries,
                    key,
                    slot: pending_slot,
                    armed: true,
                };
                tracing::debug!(key, "Cache miss");
                let value = factory().await?;
                pending.armed = false;
                Ok(Arc::new(value) as CachedValue)
            })
            .await;

        let value = result?;

        value.downcast_ref::<T>().cloned().ok_or_else(|| {
            DomainError::Internal(format!("Cache entry {} holds a different type", key))
        })
    }

    /// Whether `key` holds a value that is current for `region`
    pub fn is_cached(&self, key: &str, region: &CacheRegion) -> bool {
        self.entries
            .get(key)
            .map(|slot| slot.cell.initialized() && region.is_current(&slot.token))
            .unwrap_or(false)
    }

    /// Whether any slot, finished or in flight, exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current slot for `key`, replacing one created under an expired token
    fn slot_for(&self, key: &str, region: &CacheRegion) -> Arc<CacheSlot> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(CacheSlot::new(region.token())));

        if !region.is_current(&entry.token) {
            *entry = Arc::new(CacheSlot::new(region.token()));
        }

        Arc::clone(entry.value())
    }
}
