//! Exchange options.

use serde::{Deserialize, Serialize};

/// Tuning for one side of an exchange. Both peers may pick different values;
/// none of them affect the records themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncOptions {
    /// Records per batch handed to the sink.
    pub batch_size: usize,
    /// Log every record sent or received at `trace` level.
    pub trace_records: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            trace_records: false,
        }
    }
}

impl SyncOptions {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_trace_records(mut self, trace_records: bool) -> Self {
        self.trace_records = trace_records;
        self
    }
}
