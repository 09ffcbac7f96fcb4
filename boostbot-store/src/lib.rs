// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BoostBot` Store
//!
//! Configuration and shared state for the `BoostBot` application.
//!
//! This crate provides:
//!
//! - **`BotConfig`** / **`SiteConfig`**: configuration read from the environment
//! - **`SnapshotCache`**: one fetch at a time, shared by concurrent callers
//!
//! ## Usage
//!
//! ```ignore
//! use boostbot_store::{BotConfig, SnapshotCache};
//!
//! let config = BotConfig::from_env()?;
//! let cache = SnapshotCache::new(fetcher, config.cache_cooldown);
//!
//! let snapshot = cache.get_or_fetch().await;
//! ```

pub mod config;
pub mod error;
pub mod snapshot_cache;

pub use config::{BotConfig, DeliveryMode, SiteConfig, redact_token};
pub use error::StoreError;
pub use snapshot_cache::{CacheStats, SnapshotCache};
