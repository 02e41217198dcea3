//! Retention window for free-tier blobs.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Age threshold beyond which a free-tier blob becomes eligible for
/// deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetentionWindow(i64);

impl RetentionWindow {
    /// Creates a retention window of the given number of days.
    pub fn days(days: i64) -> Self {
        Self(days)
    }

    /// Returns the window length in days.
    pub fn as_days(&self) -> i64 {
        self.0
    }

    /// Records created before this instant have outlived the window.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now.minus_days(self.0)
    }
}

impl Default for RetentionWindow {
    /// 60 days, the product's free-tier retention policy.
    fn default() -> Self {
        Self(60)
    }
}
