//! Scheduled job configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Cron endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CronConfig {
    /// Shared secret the scheduler passes as `?key=`
    #[serde(default)]
    pub secret: String,

    /// Pending invoices due this many days ahead get a reminder
    #[serde(default = "default_reminder_days_ahead")]
    pub reminder_days_ahead: u64,
}

impl CronConfig {
    /// Validate cron configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.secret.is_empty() && *environment == Environment::Production {
            return Err(ValidationError::CronSecretRequired);
        }
        if !(1..=60).contains(&self.reminder_days_ahead) {
            return Err(ValidationError::InvalidReminderWindow);
        }
        Ok(())
    }
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            reminder_days_ahead: default_reminder_days_ahead(),
        }
    }
}

fn default_reminder_days_ahead() -> u64 {
    10
}
