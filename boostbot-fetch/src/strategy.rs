//! Session strategy trait and factory.
//!
//! A strategy is one way of reaching the site: plain HTTP, HTTP that
//! waits out a bot check, or a full browser. It is chosen once from
//! configuration; callers only ever see [`SessionStrategy`].

use async_trait::async_trait;
use boostbot_core::StrategyKind;
use serde::Serialize;

use crate::context::FetchSettings;
use crate::error::FetchError;
use crate::session::SessionHandle;
use crate::strategies::{BrowserStrategy, ChallengeStrategy, PlainStrategy};

// ============================================================================
// Session Strategy Trait
// ============================================================================

/// A way of opening sessions against the site.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct RecordedStrategy;
///
/// #[async_trait]
/// impl SessionStrategy for RecordedStrategy {
///     fn id(&self) -> &str {
///         "recorded"
///     }
///
///     fn kind(&self) -> StrategyKind {
///         StrategyKind::Plain
///     }
///
///     async fn open(&self) -> Result<SessionHandle, FetchError> {
///         Ok(SessionHandle::new(self.kind(), Box::new(RecordedTransport::load()?), TIMEOUT))
///     }
/// }
/// ```
#[async_trait]
pub trait SessionStrategy: Send + Sync {
    /// Unique identifier for this strategy (e.g., "http.plain").
    fn id(&self) -> &str;

    /// The tier this strategy implements.
    fn kind(&self) -> StrategyKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.kind().display_name())
    }

    /// Opens a new, not yet authenticated session.
    ///
    /// Any preparation the tier needs (warm-up requests, launching a
    /// browser) happens here, so the returned handle is ready for the
    /// login handshake.
    async fn open(&self) -> Result<SessionHandle, FetchError>;
}

// ============================================================================
// Strategy Info
// ============================================================================

/// Information about a strategy (for reporting).
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    /// Strategy ID.
    pub id: String,
    /// Strategy kind.
    pub kind: StrategyKind,
}

impl StrategyInfo {
    /// Creates strategy info from a strategy implementation.
    pub fn from_strategy(strategy: &dyn SessionStrategy) -> Self {
        Self {
            id: strategy.id().to_string(),
            kind: strategy.kind(),
        }
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds the strategy selected in `settings`.
pub fn build_strategy(settings: &FetchSettings) -> Box<dyn SessionStrategy> {
    match settings.strategy {
        StrategyKind::Plain => Box::new(PlainStrategy::new(settings.clone())),
        StrategyKind::Challenge => Box::new(ChallengeStrategy::new(settings.clone())),
        StrategyKind::Browser => Box::new(BrowserStrategy::new(settings.clone())),
    }
}

// ============================================================================
// Tests
// ============================================================================
