//! Change notification channel.
//!
//! # Responsibility
//! - Define the publish-only contract the router calls after mutations.
//! - Provide an in-process observer registry implementing that contract.
//!
//! # Invariants
//! - Notification is advisory: no acknowledgement, no delivery guarantee.
//! - Observers must tolerate repeated notifications for the same locator.

pub mod observer_registry;

use crate::routing::locator::ResourceLocator;
use std::sync::Arc;

pub use observer_registry::{ContentObserver, ObserverId, ObserverRegistry};

/// Publish side of the change channel.
pub trait ChangeNotifier {
    /// Signals that data reachable through `locator` may have changed.
    fn notify_change(&self, locator: &ResourceLocator);
}

impl<N: ChangeNotifier + ?Sized> ChangeNotifier for &N {
    fn notify_change(&self, locator: &ResourceLocator) {
        (**self).notify_change(locator);
    }
}

impl<N: ChangeNotifier + ?Sized> ChangeNotifier for Arc<N> {
    fn notify_change(&self, locator: &ResourceLocator) {
        (**self).notify_change(locator);
    }
}
