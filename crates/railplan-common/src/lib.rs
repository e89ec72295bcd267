//! Domain types shared by the RailPlan storage, notification and server
//! crates.

pub mod datetime;
pub mod i18n;
pub mod types;
