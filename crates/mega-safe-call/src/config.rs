use serde::{Deserialize, Serialize};

use crate::constants::MAX_BATCH_SIZE;

/// Configuration of the value transfer coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafeCallConfig {
    /// The maximum number of recipients in one batch transfer.
    pub max_batch_size: usize,
}

impl Default for SafeCallConfig {
    fn default() -> Self {
        Self { max_batch_size: MAX_BATCH_SIZE }
    }
}

impl SafeCallConfig {
    /// Sets the maximum batch size.
    pub const fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }
}
