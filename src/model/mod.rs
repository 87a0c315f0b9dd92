pub mod car;
pub mod collection;

pub use car::{Car, CarFields, CarLinks, Field, Link, Locator};
pub use collection::{duplicate_locators, CarCollection, SyncStatus};
