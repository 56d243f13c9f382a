use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_WATCH_CHANNEL_CAPACITY;
use crate::constants::SENTINEL_WAIT_INDEX;
use crate::Error;
use crate::Result;

/// Long-poll watch parameters
///
/// ```toml
/// [watch]
/// channel_capacity = 1
/// sentinel_index = 1
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WatchConfig {
    /// Buffered entries between the watch loop and its consumer.
    ///
    /// Default: 1 (the loop blocks until the consumer receives)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Wait index used for keys with no recorded revision
    #[serde(default = "default_sentinel_index")]
    pub sentinel_index: u64,
}

fn default_channel_capacity() -> usize {
    DEFAULT_WATCH_CHANNEL_CAPACITY
}

fn default_sentinel_index() -> u64 {
    SENTINEL_WAIT_INDEX
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            sentinel_index: default_sentinel_index(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        // tokio's bounded channel panics on zero capacity
        if self.channel_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "watch channel_capacity must be greater than 0".to_string(),
            )));
        }

        if self.sentinel_index == 0 {
            return Err(Error::Config(ConfigError::Message(
                "watch sentinel_index must be greater than 0".to_string(),
            )));
        }

        Ok(())
    }
}
