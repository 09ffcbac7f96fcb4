// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BoostBot` Core
//!
//! Core types, models, and traits for the `BoostBot` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `BoostBot` crates:
//!
//! - Domain models (card snapshots, credentials, strategy tags)
//! - Error types
//! - The [`SnapshotSource`] trait implemented by the site fetcher
//!
//! ## Key Types
//!
//! - [`CardSnapshot`] - Point-in-time result of the extraction pipeline
//! - [`SnapshotStatus`] - Outcome of one fetch (Ok or one failure kind)
//! - [`Credentials`] - Site login pair, redacted in debug output
//! - [`StrategyKind`] - Which session strategy tier is in use

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{CardSnapshot, Credentials, SnapshotStatus, StrategyKind};

// Re-export traits
pub use traits::SnapshotSource;
