//! In-process observer registry.
//!
//! A change at locator `L` reaches:
//! - observers registered at exactly `L`;
//! - observers registered at an ancestor of `L` that asked for descendants;
//! - observers registered at any descendant of `L`.

use crate::notify::ChangeNotifier;
use crate::routing::locator::ResourceLocator;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Receiver of change notifications.
pub trait ContentObserver: Send + Sync {
    fn on_change(&self, locator: &ResourceLocator);
}

impl<F> ContentObserver for F
where
    F: Fn(&ResourceLocator) + Send + Sync,
{
    fn on_change(&self, locator: &ResourceLocator) {
        self(locator);
    }
}

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration {
    id: ObserverId,
    locator: ResourceLocator,
    notify_for_descendants: bool,
    observer: Arc<dyn ContentObserver>,
}

impl Registration {
    fn wants(&self, changed: &ResourceLocator) -> bool {
        self.locator == *changed
            || changed.is_ancestor_of(&self.locator)
            || (self.notify_for_descendants && self.locator.is_ancestor_of(changed))
    }
}

/// Thread-safe registry that dispatches notifications to observers.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    registrations: Mutex<Vec<Registration>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for changes at `locator`.
    pub fn register(
        &self,
        locator: ResourceLocator,
        notify_for_descendants: bool,
        observer: Arc<dyn ContentObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            "event=observer_register module=notify status=ok locator={locator} descendants={notify_for_descendants}"
        );
        self.lock().push(Registration {
            id,
            locator,
            notify_for_descendants,
            observer,
        });
        id
    }

    /// Removes a registration. Returns `false` when `id` is unknown.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut registrations = self.lock();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        registrations.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Registration>> {
        // Observers run outside the lock; a poisoned list is still consistent.
        self.registrations.lock().unwrap_or_else(|poisoned| {
            warn!("event=observer_lock module=notify status=error error_code=poisoned");
            poisoned.into_inner()
        })
    }
}

impl ChangeNotifier for ObserverRegistry {
    fn notify_change(&self, locator: &ResourceLocator) {
        let targets: Vec<Arc<dyn ContentObserver>> = self
            .lock()
            .iter()
            .filter(|registration| registration.wants(locator))
            .map(|registration| Arc::clone(&registration.observer))
            .collect();

        debug!(
            "event=notify_change module=notify status=ok locator={locator} observers={}",
            targets.len()
        );
        for observer in targets {
            observer.on_change(locator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObserverRegistry;
    use crate::notify::ChangeNotifier;
    use crate::routing::locator::ResourceLocator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn locator(value: &str) -> ResourceLocator {
        value.parse().expect("test locator should parse")
    }

    fn counting(registry: &ObserverRegistry, at: &str, descendants: bool) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&hits);
        registry.register(
            locator(at),
            descendants,
            Arc::new(move |_: &ResourceLocator| {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
        );
        hits
    }

    #[test]
    fn item_change_reaches_exact_and_descendant_aware_ancestors() {
        let registry = ObserverRegistry::new();
        let exact = counting(&registry, "content://shop/products/1", false);
        let sibling = counting(&registry, "content://shop/products/2", false);
        let shallow = counting(&registry, "content://shop/products", false);
        let deep = counting(&registry, "content://shop/products", true);

        registry.notify_change(&locator("content://shop/products/1"));

        assert_eq!(exact.load(Ordering::SeqCst), 1);
        assert_eq!(sibling.load(Ordering::SeqCst), 0);
        assert_eq!(shallow.load(Ordering::SeqCst), 0);
        assert_eq!(deep.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn collection_change_reaches_item_observers() {
        let registry = ObserverRegistry::new();
        let item = counting(&registry, "content://shop/products/1", false);
        let collection = counting(&registry, "content://shop/products", false);
        let other = counting(&registry, "content://other/products", true);

        registry.notify_change(&locator("content://shop/products"));

        assert_eq!(item.load(Ordering::SeqCst), 1);
        assert_eq!(collection.load(Ordering::SeqCst), 1);
        assert_eq!(other.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unregister_stops_delivery() {
        let registry = ObserverRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&hits);
        let id = registry.register(
            locator("content://shop/products"),
            true,
            Arc::new(move |_: &ResourceLocator| {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());

        registry.notify_change(&locator("content://shop/products"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
