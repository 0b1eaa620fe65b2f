//! Deployment settings.
//!
//! Defaults suit public mainnets. A JSON file can override any subset of
//! fields, and the CLI can override the file. Durations are expressed in
//! milliseconds on the wire.

use alloy_primitives::U256;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DIRECT_GAS_LIMIT, DEFAULT_DIRECT_GAS_PRICE_WEI, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SUBMIT_RETRIES,
};
use crate::tracker::{Backoff, ReceiptPolicy};

/// Tunables for a multi-chain deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeploySettings {
    /// Receipt polling schedule applied on every chain
    pub receipt_policy: ReceiptPolicy,
    /// Extra submission attempts after a connection failure
    pub submit_retries: u32,
    /// First delay between submission attempts (doubles each retry)
    #[serde(with = "serde_millis")]
    pub submit_backoff: Duration,
    /// Overall budget for a multi-chain request
    #[serde(with = "serde_millis")]
    pub request_timeout: Duration,
    /// Gas limit for a direct deployment on the current chain
    pub direct_gas_limit: u64,
    /// Gas price for a direct deployment on the current chain
    pub direct_gas_price: U256,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            receipt_policy: ReceiptPolicy::default(),
            submit_retries: DEFAULT_SUBMIT_RETRIES,
            submit_backoff: Duration::from_millis(500),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            direct_gas_limit: DEFAULT_DIRECT_GAS_LIMIT,
            direct_gas_price: U256::from(DEFAULT_DIRECT_GAS_PRICE_WEI),
        }
    }
}

impl DeploySettings {
    /// Load settings from a JSON file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .wrap_err_with(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Backoff used between submission retries.
    pub fn submit_backoff(&self) -> Backoff {
        Backoff::new(self.submit_backoff, 2, self.receipt_policy.max_interval)
    }
}

/// `Duration` as integer milliseconds.
pub mod serde_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    /// `Option<Duration>` as optional integer milliseconds.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
        }
    }
}
