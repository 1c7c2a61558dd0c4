//! Per-component memoization of realized variants for a resolution session.
//!
//! Realization itself keeps no cache. Callers that may ask for the same
//! component from several resolution paths at once can route requests through
//! a [`RealizationCache`]: one realization runs per component identity, and
//! concurrent requesters for that identity wait for it and share the result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use realm_core::identifier::ComponentIdentifier;
use realm_core::variant::RealizedVariant;
use realm_util::errors::RealmError;

type Slot = Arc<Mutex<Option<Arc<Vec<RealizedVariant>>>>>;

/// Single-flight memo of realized variants keyed by component identity.
///
/// Failures are returned to the requester that ran the realization and are
/// not stored; the next requester runs it again.
#[derive(Debug, Default)]
pub struct RealizationCache {
    slots: Mutex<HashMap<ComponentIdentifier, Slot>>,
}

impl RealizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached variants for `component`, or run `realize` once to produce them.
    pub fn get_or_realize<F>(
        &self,
        component: &ComponentIdentifier,
        realize: F,
    ) -> Result<Arc<Vec<RealizedVariant>>, RealmError>
    where
        F: FnOnce() -> Result<Vec<RealizedVariant>, RealmError>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(component.clone()).or_default())
        };

        // Holding the slot lock makes concurrent requesters for this
        // component wait; other components are unaffected.
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref realized) = *entry {
            tracing::trace!("Reusing realized variants of {}", component);
            return Ok(Arc::clone(realized));
        }
        let realized = Arc::new(realize()?);
        *entry = Some(Arc::clone(&realized));
        Ok(realized)
    }

    /// Whether a successful realization of `component` is cached.
    pub fn contains(&self, component: &ComponentIdentifier) -> bool {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(component) {
                Some(slot) => Arc::clone(slot),
                None => return false,
            }
        };
        let entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        entry.is_some()
    }

    /// Drop the cached result for `component`.
    pub fn invalidate(&self, component: &ComponentIdentifier) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn component(module: &str) -> ComponentIdentifier {
        ComponentIdentifier::new("org.example", module, "1.0")
    }

    #[test]
    fn realizes_once_per_component() {
        let cache = RealizationCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .get_or_realize(&component("lib"), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Vec::new())
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&component("lib")));
        assert!(!cache.contains(&component("other")));
    }

    #[test]
    fn concurrent_requests_share_one_realization() {
        let cache = RealizationCache::new();
        let calls = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache
                        .get_or_realize(&component("lib"), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            Ok(Vec::new())
                        })
                        .unwrap();
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = RealizationCache::new();
        let first = cache.get_or_realize(&component("lib"), || {
            Err(RealmError::Generic {
                message: "broken rule".to_string(),
            })
        });
        assert!(first.is_err());
        assert!(!cache.contains(&component("lib")));

        let second = cache.get_or_realize(&component("lib"), || Ok(Vec::new()));
        assert!(second.is_ok());
    }

    #[test]
    fn invalidate_forces_a_new_realization() {
        let cache = RealizationCache::new();
        let calls = AtomicUsize::new(0);
        let realize = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        };
        cache.get_or_realize(&component("lib"), realize).unwrap();
        cache.invalidate(&component("lib"));
        cache.get_or_realize(&component("lib"), realize).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
