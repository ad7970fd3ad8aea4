//! Scope-keyed LRU cache for derived artifacts.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use rpt_model::Scope;

/// Anything that drops state when a scope changes.
pub trait ScopeInvalidation: Send + Sync {
    fn invalidate(&self, scope: &Scope);
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    /// Partition the value was built from (a client may be served from global).
    resolved_from: Scope,
}

/// LRU cache keyed by requested scope.
///
/// Invalidating a scope drops the entry for that scope and every entry that
/// was resolved from it, so a global change reaches clients that fell back
/// to the global configuration.
#[derive(Debug)]
pub struct ScopedCache<V> {
    entries: Mutex<LruCache<Scope, CachedEntry<V>>>,
}

impl<V: Clone> ScopedCache<V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<Scope, CachedEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, scope: &Scope) -> Option<V> {
        self.entries().get(scope).map(|e| e.value.clone())
    }

    pub fn insert(&self, scope: Scope, resolved_from: Scope, value: V) {
        self.entries().put(
            scope,
            CachedEntry {
                value,
                resolved_from,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl<V: Clone + Send> ScopeInvalidation for ScopedCache<V> {
    fn invalidate(&self, scope: &Scope) {
        let mut entries = self.entries();
        let stale: Vec<Scope> = entries
            .iter()
            .filter(|(key, entry)| *key == scope || &entry.resolved_from == scope)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        tracing::debug!(scope = %scope, dropped = stale.len(), "invalidated cache entries");
    }
}
