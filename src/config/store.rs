use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_MAX_WAIT_MS;
use crate::Error;
use crate::Result;

/// Settings for the bundled [`crate::MemStore`]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreConfig {
    /// How long a blocking fetch may wait for a change before answering with
    /// the current state. Default: 5 minutes
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

fn default_max_wait_ms() -> u64 {
    DEFAULT_MAX_WAIT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl StoreConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_wait_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "store max_wait_ms must be greater than 0".to_string(),
            )));
        }
        Ok(())
    }
}
