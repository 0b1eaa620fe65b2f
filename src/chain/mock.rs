//! In-memory Chain Client used by unit tests.

use alloy_primitives::{keccak256, Bytes, FixedBytes, B256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::{ChainClient, Receipt, TxInfo, TxRequest};
use crate::bridge::{codec, selectors};
use crate::errors::ChainError;
use crate::network::ChainId;

/// Behaviour of a [`MockChainClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockMode {
    /// Transactions are accepted and mined successfully
    Healthy,
    /// Every call fails with `ChainError::Unavailable`
    Unavailable,
    /// Submissions are rejected by the node
    Rejecting,
    /// Transactions are accepted but never mined
    NeverMined,
    /// Transactions are mined but revert
    Reverting,
    /// Transactions are accepted, then forgotten by the node
    Dropped,
}

#[derive(Debug, Default)]
struct MockState {
    submitted: Vec<(B256, TxRequest)>,
    polls_per_tx: HashMap<B256, u32>,
    receipt_polls: u64,
}

#[derive(Debug)]
pub(crate) struct MockChainClient {
    chain_id: ChainId,
    reported_chain_id: ChainId,
    mode: MockMode,
    confirmations_after: u32,
    serves_transactions: bool,
    submit_failures: AtomicU64,
    bridge_in_selector: FixedBytes<4>,
    bridge_out_selector: FixedBytes<4>,
    state: Mutex<MockState>,
}

impl MockChainClient {
    pub(crate) fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            reported_chain_id: chain_id,
            mode: MockMode::Healthy,
            confirmations_after: 0,
            serves_transactions: true,
            submit_failures: AtomicU64::new(0),
            bridge_in_selector: selectors::bridge_in(),
            bridge_out_selector: selectors::bridge_out(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub(crate) fn with_mode(mut self, mode: MockMode) -> Self {
        self.mode = mode;
        self
    }

    /// Receipts only appear after `polls` empty polls per transaction.
    pub(crate) fn with_confirmations_after(mut self, polls: u32) -> Self {
        self.confirmations_after = polls;
        self
    }

    /// `get_transaction` always answers `None`, receipts are unaffected.
    pub(crate) fn without_transaction_lookup(mut self) -> Self {
        self.serves_transactions = false;
        self
    }

    /// The first `count` submissions fail with `Unavailable`.
    pub(crate) fn with_submit_failures(self, count: u64) -> Self {
        self.submit_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Selector returned by `bridgeIn` calls.
    pub(crate) fn with_bridge_in_selector(mut self, selector: FixedBytes<4>) -> Self {
        self.bridge_in_selector = selector;
        self
    }

    /// Selector returned by `bridgeOut` calls.
    pub(crate) fn with_bridge_out_selector(mut self, selector: FixedBytes<4>) -> Self {
        self.bridge_out_selector = selector;
        self
    }

    /// Chain id reported by `chain_id()`, for misconfiguration tests.
    pub(crate) fn with_reported_chain_id(mut self, chain_id: ChainId) -> Self {
        self.reported_chain_id = chain_id;
        self
    }

    pub(crate) fn submitted(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().submitted.iter().map(|(_, tx)| tx.clone()).collect()
    }

    pub(crate) fn receipt_polls(&self) -> u64 {
        self.state.lock().unwrap().receipt_polls
    }

    fn find(&self, tx_hash: B256) -> Option<TxRequest> {
        let state = self.state.lock().unwrap();
        state.submitted.iter().find(|(hash, _)| *hash == tx_hash).map(|(_, tx)| tx.clone())
    }

    fn output_for(&self, tx: &TxRequest) -> Bytes {
        let selector = tx.data.get(..4).map(FixedBytes::<4>::from_slice);
        if selector == Some(selectors::bridge_out()) {
            codec::encode_bridge_out_return(self.bridge_out_selector, &tx.data[4..])
        } else if selector == Some(selectors::bridge_in()) {
            codec::encode_bridge_in_return(self.bridge_in_selector)
        } else {
            Bytes::new()
        }
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        if self.mode == MockMode::Unavailable {
            return Err(ChainError::Unavailable("connection refused".into()));
        }
        Ok(self.reported_chain_id)
    }

    async fn submit(&self, tx: TxRequest) -> Result<B256, ChainError> {
        match self.mode {
            MockMode::Unavailable => {
                return Err(ChainError::Unavailable("connection refused".into()))
            }
            MockMode::Rejecting => return Err(ChainError::Rejected("nonce too low".into())),
            _ => {}
        }
        let remaining = self.submit_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.submit_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ChainError::Unavailable("connection reset".into()));
        }

        let mut state = self.state.lock().unwrap();
        let mut preimage = self.chain_id.get().to_be_bytes().to_vec();
        preimage.extend_from_slice(&(state.submitted.len() as u64).to_be_bytes());
        preimage.extend_from_slice(&tx.data);
        let hash = keccak256(preimage);
        state.submitted.push((hash, tx));
        Ok(hash)
    }

    async fn get_receipt(&self, tx_hash: B256) -> Result<Option<Receipt>, ChainError> {
        {
            let mut state = self.state.lock().unwrap();
            state.receipt_polls += 1;
        }
        if self.mode == MockMode::Unavailable {
            return Err(ChainError::Unavailable("connection refused".into()));
        }
        if self.find(tx_hash).is_none() || matches!(self.mode, MockMode::NeverMined | MockMode::Dropped) {
            return Ok(None);
        }

        let mut state = self.state.lock().unwrap();
        let polls = state.polls_per_tx.entry(tx_hash).or_insert(0);
        *polls += 1;
        if *polls <= self.confirmations_after {
            return Ok(None);
        }
        Ok(Some(Receipt {
            tx_hash,
            success: self.mode != MockMode::Reverting,
            block_number: 100 + state.submitted.len() as u64,
            contract_address: None,
        }))
    }

    async fn get_transaction(&self, tx_hash: B256) -> Result<Option<TxInfo>, ChainError> {
        if self.mode == MockMode::Unavailable {
            return Err(ChainError::Unavailable("connection refused".into()));
        }
        if !self.serves_transactions || self.mode == MockMode::Dropped {
            return Ok(None);
        }
        Ok(self.find(tx_hash).map(|tx| TxInfo {
            hash: tx_hash,
            to: Some(tx.to),
            block_number: (self.mode != MockMode::NeverMined).then_some(100),
            output: self.output_for(&tx),
        }))
    }
}
