//! Transaction finality tracking.
//!
//! Polls a [`ChainClient`] for a receipt on a bounded exponential backoff.
//! A missing receipt is normal while the transaction is pending; a
//! transaction the node has never heard of is not, and fails fast.

pub mod backoff;

pub use backoff::Backoff;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::chain::{ChainClient, Receipt};
use crate::errors::DeployError;
use crate::settings::serde_millis;

/// Receipt polling schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPolicy {
    /// Delay before the second poll
    #[serde(with = "serde_millis")]
    pub initial_interval: Duration,
    /// Growth factor applied to the delay after each poll
    pub multiplier: u32,
    /// Upper bound for a single delay
    #[serde(with = "serde_millis")]
    pub max_interval: Duration,
    /// Total number of receipt polls
    pub max_attempts: u32,
    /// Optional wall-clock budget across all polls
    #[serde(default, with = "serde_millis::option")]
    pub max_duration: Option<Duration>,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            multiplier: 2,
            max_interval: Duration::from_secs(12),
            max_attempts: 30,
            max_duration: Some(Duration::from_secs(300)),
        }
    }
}

impl ReceiptPolicy {
    /// Backoff schedule described by this policy.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_interval, self.multiplier, self.max_interval)
    }
}

/// Waits for transactions to be mined.
#[derive(Debug, Clone, Default)]
pub struct ReceiptTracker {
    policy: ReceiptPolicy,
}

impl ReceiptTracker {
    pub fn new(policy: ReceiptPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReceiptPolicy {
        &self.policy
    }

    /// Poll `client` until `tx_hash` has a receipt.
    ///
    /// Fails with `ReceiptNotFound` when the node reports the transaction as
    /// unknown once a first poll came back empty, and with `ReceiptTimeout`
    /// when the attempt or duration budget runs out. Transport errors while
    /// polling consume an attempt but are otherwise ignored.
    pub async fn await_receipt(
        &self,
        tx_hash: B256,
        client: &dyn ChainClient,
    ) -> Result<Receipt, DeployError> {
        let started = Instant::now();
        let mut backoff = self.policy.backoff();
        let mut attempts = 0u32;
        let mut known = false;

        loop {
            attempts += 1;
            match client.get_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    debug!(%tx_hash, attempts, success = receipt.success, "receipt found");
                    return Ok(receipt);
                }
                Ok(None) if !known => match client.get_transaction(tx_hash).await {
                    Ok(Some(_)) => known = true,
                    Ok(None) => return Err(DeployError::ReceiptNotFound { tx_hash }),
                    Err(err) => warn!(%tx_hash, %err, "transaction lookup failed"),
                },
                Ok(None) => {}
                Err(err) => warn!(%tx_hash, attempts, %err, "receipt poll failed"),
            }

            if attempts >= self.policy.max_attempts {
                return Err(DeployError::ReceiptTimeout { tx_hash, attempts });
            }
            let delay = backoff.next_delay();
            if let Some(max_duration) = self.policy.max_duration {
                if started.elapsed() + delay > max_duration {
                    return Err(DeployError::ReceiptTimeout { tx_hash, attempts });
                }
            }
            tokio::time::sleep(delay).await;
        }
    }
}

/// Convenience form of [`ReceiptTracker::await_receipt`].
pub async fn await_receipt(
    tx_hash: B256,
    client: &dyn ChainClient,
    policy: &ReceiptPolicy,
) -> Result<Receipt, DeployError> {
    ReceiptTracker::new(policy.clone()).await_receipt(tx_hash, client).await
}
