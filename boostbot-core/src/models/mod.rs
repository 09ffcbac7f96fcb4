//! Domain models for `BoostBot`.
//!
//! ## Submodules
//!
//! - [`snapshot`] - Card snapshot and its status
//! - [`credentials`] - Site login pair
//! - [`strategy`] - Session strategy tags

mod credentials;
mod snapshot;
mod strategy;

pub use credentials::Credentials;
pub use snapshot::{CardSnapshot, SnapshotStatus};
pub use strategy::StrategyKind;
