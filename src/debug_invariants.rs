//! Invariant checks for committed forests.
//!
//! Forests built by the adaptation driver are trusted; forests assembled from
//! user data are validated eagerly. Both paths share [`DebugInvariants`].

use crate::forest_error::ForestError;

/// Structural invariants of a forest-like container.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), ForestError>;

    /// Panic on the first violation when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "forest");
    }
}

/// Run a fallible check and panic on error when invariant checking is enabled
/// (debug builds, or the `strict-invariants` / `check-invariants` features).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
