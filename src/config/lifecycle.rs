//! Lifecycle configuration - retention policy for the storage sweep.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::storage::RetentionWindow;

/// Lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Days a free-tier blob is kept before becoming reap-eligible
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl LifecycleConfig {
    /// The configured retention window.
    pub fn retention_window(&self) -> RetentionWindow {
        RetentionWindow::days(self.retention_days)
    }

    /// Validate lifecycle configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retention_days < 1 {
            return Err(ValidationError::InvalidRetentionWindow);
        }
        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn default_retention_days() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retention_is_sixty_days() {
        let config = LifecycleConfig::default();
        assert_eq!(config.retention_window().as_days(), 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_day_retention_is_rejected() {
        let config = LifecycleConfig { retention_days: 0 };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetentionWindow)
        ));
    }
}
