// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WaitSet configuration.
//!
//! The only tunable is the registration capacity, fixed when the WaitSet is
//! constructed. It can be set programmatically or through the environment:
//!
//! - `WAITSET_CAPACITY`: maximum number of attached triggers (default: 128)
//!
//! # Example
//!
//! ```bash
//! export WAITSET_CAPACITY=512
//! ```

use crate::error::{Error, Result};
use std::env;

/// Default maximum number of triggers attached to a single WaitSet.
pub const DEFAULT_CAPACITY: usize = 128;

/// Environment variable overriding [`DEFAULT_CAPACITY`].
pub const ENV_CAPACITY: &str = "WAITSET_CAPACITY";

/// Construction-time settings for a [`crate::WaitSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSetConfig {
    /// Maximum number of simultaneously attached triggers.
    pub capacity: usize,
}

impl Default for WaitSetConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl WaitSetConfig {
    /// Configuration with an explicit capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Load configuration from environment variables.
    ///
    /// Missing, empty or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity = lookup(ENV_CAPACITY)
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match s.trim().parse::<usize>() {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!(
                        "[waitset] ignoring {}={:?}: {}, using default {}",
                        ENV_CAPACITY,
                        s,
                        err,
                        DEFAULT_CAPACITY
                    );
                    None
                }
            })
            .unwrap_or(DEFAULT_CAPACITY);

        Self { capacity }
    }

    /// Reject configurations that cannot hold a single trigger.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}
