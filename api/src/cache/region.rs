//! Cache regions
//!
//! A region is a versioned invalidation signal. Cache entries remember the
//! token they were computed under; bumping the region version makes every
//! one of them stale at once.

use std::sync::atomic::{AtomicU64, Ordering};

/// Region name for dynamic properties and their dictionary items
pub const DYNAMIC_PROPERTIES_REGION: &str = "DynamicPropertiesRegion";

/// Snapshot of a region version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeToken {
    region: &'static str,
    version: u64,
}

impl ChangeToken {
    pub fn region(&self) -> &'static str {
        self.region
    }
}

/// A named, versioned invalidation signal
#[derive(Debug)]
pub struct CacheRegion {
    name: &'static str,
    version: AtomicU64,
}

impl CacheRegion {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            version: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Token for entries computed from now on
    pub fn token(&self) -> ChangeToken {
        ChangeToken {
            region: self.name,
            version: self.version.load(Ordering::Acquire),
        }
    }

    /// Mint a new version, expiring every token issued so far
    pub fn expire(&self) {
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(region = self.name, version, "Cache region expired");
    }

    /// Whether an entry computed under `token` is still valid
    pub fn is_current(&self, token: &ChangeToken) -> bool {
        token.region == self.name && token.version == self.version.load(Ordering::Acquire)
    }
}
