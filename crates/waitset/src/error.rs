// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors surfaced by WaitSet operations.
//!
//! Only attaching can fail. Detaching, firing and teardown invalidation are
//! total operations.

use thiserror::Error;

/// Errors returned by [`crate::WaitSet`] construction and attach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Every slot is taken. Detach a trigger or construct a larger WaitSet.
    #[error("waitset capacity exceeded (max {capacity})")]
    CapacityExceeded { capacity: usize },

    /// A WaitSet must be able to hold at least one trigger.
    #[error("invalid waitset capacity: {0} (must be > 0)")]
    InvalidCapacity(usize),
}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::CapacityExceeded { capacity: 4 }.to_string(),
            "waitset capacity exceeded (max 4)"
        );
        assert_eq!(
            Error::InvalidCapacity(0).to_string(),
            "invalid waitset capacity: 0 (must be > 0)"
        );
    }
}
