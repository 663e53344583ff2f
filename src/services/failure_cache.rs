use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Symbol has no data at the provider
    NoData,
    /// Temporary provider rate limit
    RateLimited,
    /// Any other provider error
    Upstream,
}

impl FailureKind {
    fn ttl(&self) -> Duration {
        match self {
            FailureKind::NoData => Duration::hours(24),
            FailureKind::RateLimited => Duration::hours(1),
            FailureKind::Upstream => Duration::hours(6),
        }
    }
}

#[derive(Debug, Clone)]
struct FailedFetch {
    failed_at: DateTime<Utc>,
    kind: FailureKind,
}

/// Thread-safe record of symbols whose price fetch recently failed, so
/// repeated analytics calls don't re-hit a known-bad ticker before its TTL
/// expires.
#[derive(Clone, Default)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailedFetch>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a recorded failure is still within its TTL. Expired
    /// entries are evicted on the way out.
    pub fn should_skip(&self, symbol: &str) -> bool {
        if let Some(entry) = self.cache.get(symbol) {
            let expiry = entry.failed_at + entry.kind.ttl();
            if Utc::now() < expiry {
                return true;
            }
            drop(entry);
            self.cache.remove(symbol);
        }
        false
    }

    pub fn record(&self, symbol: &str, kind: FailureKind) {
        self.cache.insert(
            symbol.to_string(),
            FailedFetch {
                failed_at: Utc::now(),
                kind,
            },
        );
    }

    /// Forget a symbol, e.g. after a successful fetch.
    pub fn clear(&self, symbol: &str) {
        self.cache.remove(symbol);
    }
}
