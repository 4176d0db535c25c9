//! Query result tagged with the locator it was read through.

use crate::routing::locator::ResourceLocator;
use crate::storage::Record;

/// Materialized query result.
///
/// `notification_locator` is the locator passed to `query`; callers register
/// observers on it to learn when the result may be stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    rows: Vec<Record>,
    notification_locator: ResourceLocator,
}

impl Cursor {
    pub fn new(rows: Vec<Record>, notification_locator: ResourceLocator) -> Self {
        Self {
            rows,
            notification_locator,
        }
    }

    pub fn notification_locator(&self) -> &ResourceLocator {
        &self.notification_locator
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }
}

impl IntoIterator for Cursor {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cursor {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
