//! Bus configuration parameters
//!
//! Tunables for the debounced aggregator and the query operations.
//! Stored as JSON for humans or postcard for compact persistence.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default coalescing window for antenna pick/place bursts.
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Quiet period before a burst of antenna events is reported (ms)
    pub debounce_window_ms: u32,
    /// Bound on query operations (ms). `None` waits for the reply forever.
    pub query_timeout_ms: Option<u32>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            query_timeout_ms: None,
        }
    }
}

impl BusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.debounce_window_ms == 0 {
            return Err(Error::Config("debounce window must be non-zero"));
        }
        if self.query_timeout_ms == Some(0) {
            return Err(Error::Config("query timeout must be non-zero"));
        }
        Ok(())
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON config"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Config("config not serialisable"))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("malformed config blob"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("config not serialisable"))
    }
}
