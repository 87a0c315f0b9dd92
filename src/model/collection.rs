use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use super::car::{Car, Locator};

/// Where the local list stands relative to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing fetched yet
    Empty,
    /// A mutation succeeded and its refresh has not resolved yet
    PendingRefresh,
    /// Exact mirror of the fetch that resolved at `at`
    Synced { at: DateTime<Utc> },
}

/// The car list held by the controller. Records are only ever replaced as a
/// whole, in server response order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarCollection {
    cars: Vec<Car>,
    status: SyncStatus,
}

impl Default for CarCollection {
    fn default() -> Self {
        Self {
            cars: Vec::new(),
            status: SyncStatus::Empty,
        }
    }
}

impl CarCollection {
    pub fn mirror(cars: Vec<Car>, at: DateTime<Utc>) -> Self {
        Self {
            cars,
            status: SyncStatus::Synced { at },
        }
    }

    /// Keeps the records, flags them as out of date
    pub fn mark_pending(&mut self) {
        self.status = SyncStatus::PendingRefresh;
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn find(&self, locator: &Locator) -> Option<&Car> {
        self.cars.iter().find(|car| &car.links.self_link.href == locator.as_str())
    }

    /// Row lookup by 1-based position, as shown in the table
    pub fn row(&self, position: usize) -> Option<&Car> {
        position.checked_sub(1).and_then(|i| self.cars.get(i))
    }

    pub fn locators(&self) -> Vec<Locator> {
        self.cars.iter().map(Car::locator).collect()
    }
}

/// Locators that appear more than once, in first-repeat order
pub fn duplicate_locators(cars: &[Car]) -> Vec<Locator> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for car in cars {
        let locator = car.locator();
        if !seen.insert(locator.clone()) && !dupes.contains(&locator) {
            dupes.push(locator);
        }
    }
    dupes
}
