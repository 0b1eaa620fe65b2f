//! Deployer approval.
//!
//! The Genesis contract on each chain owns the list of approved deployers and
//! a single global approval nonce. This module reads that state through the
//! chain's [`LedgerReader`](crate::chain::LedgerReader) and prepares the
//! signed `approveDeployer` call that changes it. Nothing is cached beyond a
//! single request (see [`ApprovalCache`]).

pub mod cache;

pub use cache::{ApprovalCache, CacheStats};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use tracing::{info, warn};

use crate::bridge::abi::{approveDeployerCall, VerificationAbi};
use crate::chain::{retry_unavailable, transact_with_retry, LedgerReader, Receipt};
use crate::deployment::Verification;
use crate::errors::DeployError;
use crate::network::{ChainId, NetworkContext};
use crate::settings::DeploySettings;
use crate::signer::{recover_personal, sign_personal, Signer};
use crate::tracker::ReceiptTracker;

/// Client-side view of the Genesis deployer registry.
#[derive(Debug, Clone)]
pub struct DeployerApprovalRegistry {
    network: Arc<NetworkContext>,
    settings: DeploySettings,
    tracker: ReceiptTracker,
}

impl DeployerApprovalRegistry {
    pub fn new(network: Arc<NetworkContext>, settings: DeploySettings) -> Self {
        let tracker = ReceiptTracker::new(settings.receipt_policy.clone());
        Self { network, settings, tracker }
    }

    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    /// `keccak256(nonce ‖ candidate ‖ approve)`, tightly packed (32 + 20 + 1 bytes).
    pub fn approval_message(nonce: U256, candidate: Address, approve: bool) -> B256 {
        let mut packed = [0u8; 53];
        packed[..32].copy_from_slice(&nonce.to_be_bytes::<32>());
        packed[32..52].copy_from_slice(candidate.as_slice());
        packed[52] = u8::from(approve);
        keccak256(packed)
    }

    /// Sign an approval under the personal-message prefix.
    ///
    /// `nonce` must be the next nonce the Genesis contract expects; a stale
    /// one is only detected when the call is submitted.
    pub async fn build_approval_signature(
        nonce: U256,
        candidate: Address,
        approve: bool,
        signer: &dyn Signer,
    ) -> Result<Verification, DeployError> {
        sign_personal(signer, Self::approval_message(nonce, candidate, approve)).await
    }

    /// Calldata for `approveDeployer(nonce, candidate, approve, signature)`.
    pub fn approval_calldata(
        nonce: U256,
        candidate: Address,
        approve: bool,
        signature: &Verification,
    ) -> Bytes {
        let call = approveDeployerCall {
            nonce,
            deployer: candidate,
            approve,
            signature: VerificationAbi { r: signature.r, s: signature.s, v: signature.v },
        };
        call.abi_encode().into()
    }

    /// Whether `deployer` is approved on `chain_id`. Unreachable ledgers are
    /// retried on the submit schedule before failing with `ChainUnavailable`.
    pub async fn is_approved(&self, chain_id: ChainId, deployer: Address) -> Result<bool, DeployError> {
        let ledger: &dyn LedgerReader = self.network.endpoint(chain_id)?.ledger.as_ref();
        retry_unavailable(
            chain_id,
            "isApprovedDeployer",
            self.settings.submit_retries,
            self.settings.submit_backoff(),
            move || ledger.is_approved_deployer(deployer),
        )
        .await
    }

    /// [`is_approved`](Self::is_approved) through a request-scoped cache.
    pub async fn is_approved_cached(
        &self,
        cache: &ApprovalCache,
        chain_id: ChainId,
        deployer: Address,
    ) -> Result<bool, DeployError> {
        if let Some(approved) = cache.get(chain_id, deployer) {
            return Ok(approved);
        }
        let approved = self.is_approved(chain_id, deployer).await?;
        cache.insert(chain_id, deployer, approved);
        Ok(approved)
    }

    /// Next approval nonce expected by the Genesis contract on `chain_id`.
    pub async fn current_nonce(&self, chain_id: ChainId) -> Result<U256, DeployError> {
        let ledger: &dyn LedgerReader = self.network.endpoint(chain_id)?.ledger.as_ref();
        retry_unavailable(
            chain_id,
            "currentApprovalNonce",
            self.settings.submit_retries,
            self.settings.submit_backoff(),
            move || ledger.current_approval_nonce(),
        )
        .await
    }

    /// Sign and submit an approval change on the current chain, then wait
    /// for it to be mined.
    ///
    /// A reverted transaction is classified by re-reading the nonce: if it
    /// moved, another approval landed first and the call is re-signed with
    /// the fresh nonce once; otherwise the revert is reported as is.
    pub async fn submit_approval(
        &self,
        candidate: Address,
        approve: bool,
        signer: &dyn Signer,
    ) -> Result<Receipt, DeployError> {
        let chain_id = self.network.current();
        let genesis = self.network.genesis_on(chain_id)?;
        let client = genesis.client();
        let mut retried = false;

        loop {
            let nonce = self.current_nonce(chain_id).await?;
            let signature = Self::build_approval_signature(nonce, candidate, approve, signer).await?;
            let calldata = Self::approval_calldata(nonce, candidate, approve, &signature);

            let tx_hash = transact_with_retry(
                genesis.as_ref(),
                calldata,
                U256::ZERO,
                self.settings.direct_gas_limit,
                self.settings.direct_gas_price,
                self.settings.submit_retries,
                self.settings.submit_backoff(),
            )
            .await?;
            info!(%chain_id, %tx_hash, %candidate, approve, %nonce, "approval submitted");

            let receipt = self.tracker.await_receipt(tx_hash, client.as_ref()).await?;
            if receipt.success {
                info!(%chain_id, %tx_hash, block = receipt.block_number, "approval confirmed");
                return Ok(receipt);
            }

            let latest = self.current_nonce(chain_id).await?;
            if latest == nonce {
                return Err(DeployError::Reverted { tx_hash });
            }
            let mismatch = DeployError::NonceMismatch { expected: latest, got: nonce };
            if retried {
                return Err(mismatch);
            }
            warn!(%chain_id, %tx_hash, %nonce, %latest, "approval nonce moved, re-signing");
            retried = true;
        }
    }
}

/// Address that signed an approval.
pub fn recover_approver(
    nonce: U256,
    candidate: Address,
    approve: bool,
    signature: &Verification,
) -> Result<Address, DeployError> {
    recover_personal(signature, DeployerApprovalRegistry::approval_message(nonce, candidate, approve))
}
