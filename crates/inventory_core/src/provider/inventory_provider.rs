//! Locator-routed CRUD provider.
//!
//! # Responsibility
//! - Own the matcher, storage engine and notifier of one collection.
//! - Implement query/get_type/insert/update/delete on top of them.
//!
//! # Invariants
//! - Single-item calls always filter on `id_column = <locator id>`; the
//!   caller's selection is discarded.
//! - Insert notifies only after a row was created.
//! - Update and delete on a matched route notify after the storage attempt,
//!   whatever its outcome.

use crate::contract::ProviderConfig;
use crate::notify::ChangeNotifier;
use crate::provider::{Cursor, Operation, ProviderError, ProviderResult};
use crate::routing::locator::ResourceLocator;
use crate::routing::matcher::{ResourceMatcher, RouteKind};
use crate::storage::{Record, Selection, StorageEngine};
use log::{info, warn};
use std::borrow::Cow;

/// CRUD router for one collection.
///
/// Every call blocks until the storage engine returns. The provider holds no
/// locks of its own; concurrent access safety is the engine's concern.
pub struct InventoryProvider<E, N> {
    config: ProviderConfig,
    matcher: ResourceMatcher,
    dir_mime_type: String,
    item_mime_type: String,
    engine: E,
    notifier: N,
}

impl<E: StorageEngine, N: ChangeNotifier> InventoryProvider<E, N> {
    pub fn new(config: ProviderConfig, engine: E, notifier: N) -> Self {
        Self {
            matcher: ResourceMatcher::for_config(&config),
            dir_mime_type: config.dir_mime_type(),
            item_mime_type: config.item_mime_type(),
            config,
            engine,
            notifier,
        }
    }

    /// Provider for the default product collection.
    pub fn with_default_config(engine: E, notifier: N) -> Self {
        Self::new(ProviderConfig::default(), engine, notifier)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn collection_locator(&self) -> ResourceLocator {
        self.config.collection_locator()
    }

    pub fn classify(&self, locator: &ResourceLocator) -> RouteKind {
        self.matcher.classify(locator)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Reads rows addressed by `locator`.
    ///
    /// The returned cursor carries `locator` as its notification locator.
    ///
    /// # Errors
    /// - `ProviderError::Routing` for unmatched locators, before any storage
    ///   access.
    pub fn query(
        &self,
        locator: &ResourceLocator,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> ProviderResult<Cursor> {
        let route = self.matcher.classify(locator);
        let selection = self
            .effective_selection(route, selection)
            .ok_or_else(|| self.routing_error(Operation::Query, locator))?;

        let rows = self
            .engine
            .query_rows(&self.config.table, projection, &selection, sort_order)?;
        info!(
            "event=provider_query module=provider status=ok route={} rows={}",
            route_label(route),
            rows.len()
        );
        Ok(Cursor::new(rows, locator.clone()))
    }

    /// Returns the MIME type of the data addressed by `locator`.
    ///
    /// Purely structural; the storage engine is never consulted.
    pub fn get_type(&self, locator: &ResourceLocator) -> ProviderResult<&str> {
        match self.matcher.classify(locator) {
            RouteKind::Collection => Ok(self.dir_mime_type.as_str()),
            RouteKind::SingleItem(_) => Ok(self.item_mime_type.as_str()),
            RouteKind::Unmatched => Err(self.routing_error(Operation::GetType, locator)),
        }
    }

    /// Inserts `record` into the collection and returns the new item locator.
    ///
    /// # Errors
    /// - `ProviderError::Routing` unless `locator` is the collection itself.
    /// - `ProviderError::Insert` when the engine created no row.
    pub fn insert(
        &self,
        locator: &ResourceLocator,
        record: &Record,
    ) -> ProviderResult<ResourceLocator> {
        if self.matcher.classify(locator) != RouteKind::Collection {
            return Err(self.routing_error(Operation::Insert, locator));
        }

        let row_id = match self.engine.insert_row(&self.config.table, record)? {
            Some(row_id) => row_id,
            None => {
                warn!(
                    "event=provider_insert module=provider status=error error_code=insert_failed columns={}",
                    record.len()
                );
                return Err(ProviderError::Insert {
                    locator: locator.clone(),
                });
            }
        };

        self.notifier.notify_change(locator);
        info!("event=provider_insert module=provider status=ok row_id={row_id}");
        Ok(locator.with_appended_id(row_id))
    }

    /// Deletes rows addressed by `locator` and returns how many were removed.
    ///
    /// A collection locator with `Selection::all()` empties the table.
    ///
    /// Unlike every other operation, an unmatched locator is not an error
    /// here: it deletes nothing, notifies nobody and returns `Ok(0)`.
    // TODO: return `ProviderError::Routing` here to match update once no
    // caller depends on `Ok(0)` for foreign locators.
    pub fn delete(&self, locator: &ResourceLocator, selection: &Selection) -> ProviderResult<usize> {
        let route = self.matcher.classify(locator);
        let Some(selection) = self.effective_selection(route, selection) else {
            warn!(
                "event=provider_delete module=provider status=skipped error_code=route_unmatched locator={locator}"
            );
            return Ok(0);
        };

        let outcome = self.engine.delete_rows(&self.config.table, &selection);
        self.notifier.notify_change(locator);

        let deleted = outcome?;
        info!(
            "event=provider_delete module=provider status=ok route={} rows={deleted}",
            route_label(route)
        );
        Ok(deleted)
    }

    /// Updates rows addressed by `locator` and returns how many changed.
    ///
    /// # Errors
    /// - `ProviderError::Routing` for unmatched locators; nothing is notified.
    /// - `ProviderError::Storage` for engine faults, reported after the
    ///   notification fired.
    pub fn update(
        &self,
        locator: &ResourceLocator,
        record: &Record,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        let route = self.matcher.classify(locator);
        let selection = self
            .effective_selection(route, selection)
            .ok_or_else(|| self.routing_error(Operation::Update, locator))?;

        let outcome = self
            .engine
            .update_rows(&self.config.table, record, &selection);
        self.notifier.notify_change(locator);

        let updated = outcome?;
        info!(
            "event=provider_update module=provider status=ok route={} rows={updated} columns={}",
            route_label(route),
            record.len()
        );
        Ok(updated)
    }

    /// Returns the selection actually sent to storage, or `None` when the
    /// route is unmatched.
    fn effective_selection<'a>(
        &self,
        route: RouteKind,
        selection: &'a Selection,
    ) -> Option<Cow<'a, Selection>> {
        match route {
            RouteKind::Collection => Some(Cow::Borrowed(selection)),
            RouteKind::SingleItem(id) => Some(Cow::Owned(Selection::by_id(
                &self.config.id_column,
                id,
            ))),
            RouteKind::Unmatched => None,
        }
    }

    fn routing_error(&self, operation: Operation, locator: &ResourceLocator) -> ProviderError {
        warn!(
            "event=provider_{operation} module=provider status=error error_code=route_unmatched locator={locator}"
        );
        ProviderError::Routing {
            operation,
            locator: locator.clone(),
        }
    }
}

fn route_label(route: RouteKind) -> &'static str {
    match route {
        RouteKind::Collection => "collection",
        RouteKind::SingleItem(_) => "single_item",
        RouteKind::Unmatched => "unmatched",
    }
}
