//! Primary-or-bundled read policy.
//!
//! A read resolves to exactly one source: the primary rows, or the fallback
//! rows when the trigger fires. The two are never merged.

use std::fmt::Display;

use serde::Serialize;
use tracing::warn;

pub use configs::FallbackTrigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub origin: Origin,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub trigger: FallbackTrigger,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self { trigger: FallbackTrigger::OnErrorOrEmpty }
    }
}

impl FallbackPolicy {
    pub fn new(trigger: FallbackTrigger) -> Self {
        Self { trigger }
    }

    /// Errors become an empty primary result.
    pub fn never() -> Self {
        Self::new(FallbackTrigger::Never)
    }

    fn on_error(&self) -> bool {
        matches!(self.trigger, FallbackTrigger::OnError | FallbackTrigger::OnErrorOrEmpty)
    }

    fn on_empty(&self) -> bool {
        matches!(self.trigger, FallbackTrigger::OnEmpty | FallbackTrigger::OnErrorOrEmpty)
    }

    /// Resolve a primary read. `fallback` runs only when the trigger fires.
    /// Primary errors are logged here and never returned.
    ///
    /// # Examples
    /// ```
    /// use service::fallback::{FallbackPolicy, Origin};
    /// let policy = FallbackPolicy::default();
    /// let r = policy.resolve("vets", Err::<Vec<u8>, _>("offline"), || vec![1, 2]);
    /// assert_eq!(r.origin, Origin::Fallback);
    /// assert_eq!(r.items, vec![1, 2]);
    /// ```
    pub fn resolve<T, E, F>(&self, entity: &str, primary: Result<Vec<T>, E>, fallback: F) -> Resolved<T>
    where
        E: Display,
        F: FnOnce() -> Vec<T>,
    {
        match primary {
            Ok(items) if items.is_empty() && self.on_empty() => {
                warn!(entity, "primary returned no rows; serving bundled data");
                Resolved { origin: Origin::Fallback, items: fallback() }
            }
            Ok(items) => Resolved { origin: Origin::Primary, items },
            Err(e) if self.on_error() => {
                warn!(entity, error = %e, "primary read failed; serving bundled data");
                Resolved { origin: Origin::Fallback, items: fallback() }
            }
            Err(e) => {
                warn!(entity, error = %e, "primary read failed; serving empty result");
                Resolved { origin: Origin::Primary, items: Vec::new() }
            }
        }
    }
}
