use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_CHECK_TTL_MS;
use crate::constants::DEFAULT_DEREGISTER_CRITICAL_AFTER_MS;
use crate::Error;
use crate::Result;

/// TTL health check attached to every service registration.
///
/// Not tunable per call: every registration made by a client shares these
/// values.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServiceCheckConfig {
    /// Liveness TTL. Default: 3 seconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Interval after which an instance stuck in critical state is removed.
    /// Default: 10 seconds
    #[serde(default = "default_deregister_critical_after_ms")]
    pub deregister_critical_after_ms: u64,
}

fn default_ttl_ms() -> u64 {
    DEFAULT_CHECK_TTL_MS
}

fn default_deregister_critical_after_ms() -> u64 {
    DEFAULT_DEREGISTER_CRITICAL_AFTER_MS
}

impl Default for ServiceCheckConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            deregister_critical_after_ms: default_deregister_critical_after_ms(),
        }
    }
}

impl ServiceCheckConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn deregister_critical_after(&self) -> Duration {
        Duration::from_millis(self.deregister_critical_after_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ttl_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "service_check ttl_ms must be greater than 0".to_string(),
            )));
        }

        if self.deregister_critical_after_ms < self.ttl_ms {
            return Err(Error::Config(ConfigError::Message(format!(
                "service_check deregister_critical_after_ms({}) must not be shorter than ttl_ms({})",
                self.deregister_critical_after_ms, self.ttl_ms
            ))));
        }

        Ok(())
    }
}
