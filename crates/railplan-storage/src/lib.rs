//! Relational storage for train movements and the alert configuration.
//!
//! [`RailStore`] wraps a SeaORM connection (SQLite by default) and runs the
//! `migration` crate on connect so the schema is always current.

pub mod entities;
pub mod error;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{Result, StorageError};
pub use store::train::{NewTrain, TrainFilter, TrainLookup, TrainSummary};
pub use store::RailStore;
