//! Trait definitions for `BoostBot`.

use crate::models::CardSnapshot;

/// Something that can produce a fresh [`CardSnapshot`] on demand.
///
/// Implementors run one complete authentication-plus-extraction sequence
/// per call and fold every failure into the snapshot status; they never
/// return a raw transport error. The `&mut self` receiver reflects that a
/// source owns mutable session state; callers serialize access.
pub trait SnapshotSource: Send + 'static {
    /// Fetches a new snapshot from upstream.
    fn fetch_snapshot(&mut self) -> impl std::future::Future<Output = CardSnapshot> + Send;
}
