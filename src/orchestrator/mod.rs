//! Multi-chain deployment.
//!
//! A [`DeploymentRequest`] is validated and gated once, then fanned out to
//! one task per target chain. Tasks run independently and share nothing but
//! their own outcome slot; the request returns once every task finished or
//! the request timeout fired.
//!
//! ```text
//!   deploy(request)
//!     → validate                   (InvalidConfig aborts)
//!     → authorization gate         (UnauthorizedDeployer aborts)
//!     → JoinSet: one ChainTask per chain
//!         Direct:  factory.deployHolographableContract → receipt
//!         Bridged: source.bridgeOut → receipt → magic value
//!                  → target.bridgeIn → receipt → magic value
//!     → finalize slots (Failed: timeout) → DeploymentReport
//! ```

pub mod report;
pub mod request;

pub use report::{ChainFailure, ChainOutcome, ChainStatus, DeploymentReport, Route};
pub use request::{BridgeSettings, DeploymentRequest};

use alloy_primitives::{Address, Bytes, B256, U256};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::approval::{ApprovalCache, DeployerApprovalRegistry};
use crate::bridge::{classify_bridge_in, classify_bridge_out, BridgeMessage};
use crate::chain::{
    retry_unavailable, transact_with_retry, ChainClient, ChainContract, LedgerReader, Receipt, TxInfo,
};
use crate::deployment::{compute_address, verify_config};
use crate::errors::{DeployError, FailureKind};
use crate::network::{ChainId, NetworkContext};
use crate::settings::DeploySettings;
use crate::tracker::ReceiptTracker;

type Slot = Arc<Mutex<ChainOutcome>>;

fn lock(slot: &Slot) -> std::sync::MutexGuard<'_, ChainOutcome> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fans a deployment out to every target chain.
#[derive(Debug, Clone)]
pub struct MultiChainDeploymentOrchestrator {
    network: Arc<NetworkContext>,
    settings: DeploySettings,
    registry: DeployerApprovalRegistry,
    tracker: ReceiptTracker,
}

impl MultiChainDeploymentOrchestrator {
    pub fn new(network: Arc<NetworkContext>, settings: DeploySettings) -> Self {
        let registry = DeployerApprovalRegistry::new(network.clone(), settings.clone());
        let tracker = ReceiptTracker::new(settings.receipt_policy.clone());
        Self { network, settings, registry, tracker }
    }

    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    pub fn registry(&self) -> &DeployerApprovalRegistry {
        &self.registry
    }

    /// Deploy `request` on every chain it targets.
    ///
    /// Returns `Err` only when the request is rejected as a whole, before
    /// anything is broadcast. Per-chain failures are reported in the
    /// [`DeploymentReport`], which always lists every target with a terminal
    /// status.
    pub async fn deploy(&self, request: DeploymentRequest) -> Result<DeploymentReport, DeployError> {
        let current = self.network.current();
        let targets = self.validate(&request)?;
        let address = compute_address(&request.config, self.network.factory());
        let excluded = self.authorize(&request, &targets).await?;
        let budget = request.timeout.unwrap_or(self.settings.request_timeout);
        info!(%current, %address, signer = %request.signer, targets = targets.len(), "deployment started");

        let request = Arc::new(request);
        let mut slots: BTreeMap<ChainId, Slot> = BTreeMap::new();
        let mut tasks = JoinSet::new();

        for chain_id in targets {
            let route = if chain_id == current { Route::Direct } else { Route::Bridged };
            let slot = Arc::new(Mutex::new(ChainOutcome::pending(chain_id, route)));
            slots.insert(chain_id, slot.clone());

            if let Some(failure) = excluded.get(&chain_id) {
                lock(&slot).fail_with(failure.clone());
                continue;
            }
            let task = ChainTask {
                network: self.network.clone(),
                settings: self.settings.clone(),
                tracker: self.tracker.clone(),
                request: request.clone(),
                chain_id,
                route,
                address,
                slot,
            };
            tasks.spawn(task.run().instrument(info_span!("chain", %chain_id)));
        }

        let joined = tokio::time::timeout(budget, async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(err) = joined {
                    warn!(%err, "chain task ended abnormally");
                }
            }
        })
        .await;

        let timed_out = joined.is_err();
        if timed_out {
            warn!(?budget, "deployment timed out, abandoning pending chains");
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
        }

        let chains = slots
            .into_values()
            .map(|slot| finalize(&slot, timed_out, budget))
            .collect();
        let report = DeploymentReport::new(address, chains);
        info!(
            confirmed = report.confirmed().count(),
            failed = report.failed().count(),
            "deployment finished"
        );
        Ok(report)
    }

    /// Structural checks. Nothing has been sent when this fails.
    fn validate(&self, request: &DeploymentRequest) -> Result<Vec<ChainId>, DeployError> {
        let current = self.network.current();
        request.config.validate()?;
        self.network.endpoint(current)?;

        let targets = request.targets(current)?;
        for settings in &request.bridge_settings {
            if settings.to_chain == current {
                return Err(DeployError::InvalidConfig(format!(
                    "cannot bridge to the current chain {current}; deploy directly instead"
                )));
            }
            settings.to_chain.as_u32()?;
        }
        if !request.bridge_settings.is_empty() {
            current.as_u32()?;
        }
        for chain_id in &targets {
            self.network.endpoint(*chain_id)?;
        }

        verify_config(&request.config, request.signer, &request.verification)?;
        Ok(targets)
    }

    /// The signer must be approved on the current chain and on every target.
    ///
    /// Returns the chains that cannot be reached; those fail without taking
    /// the rest of the request down.
    async fn authorize(
        &self,
        request: &DeploymentRequest,
        targets: &[ChainId],
    ) -> Result<BTreeMap<ChainId, ChainFailure>, DeployError> {
        let current = self.network.current();
        let signer = request.signer;
        let cache = ApprovalCache::new();
        let mut unreachable = BTreeMap::new();

        match self.registry.is_approved_cached(&cache, current, signer).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(DeployError::UnauthorizedDeployer { deployer: signer, chain_id: current })
            }
            Err(err @ DeployError::ChainUnavailable { .. }) => {
                // Every route starts on the current chain.
                warn!(%current, %err, "current chain ledger unreachable");
                let failure = ChainFailure::from(&err);
                return Ok(targets.iter().map(|chain_id| (*chain_id, failure.clone())).collect());
            }
            Err(err) => return Err(err),
        }

        for chain_id in targets.iter().copied() {
            match self.registry.is_approved_cached(&cache, chain_id, signer).await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(DeployError::UnauthorizedDeployer { deployer: signer, chain_id })
                }
                Err(err @ DeployError::ChainUnavailable { .. }) => {
                    warn!(%chain_id, %err, "ledger unreachable, skipping chain");
                    unreachable.insert(chain_id, ChainFailure::from(&err));
                }
                Err(err) => return Err(err),
            }
        }
        debug!(stats = ?cache.stats(), "authorization checked");
        Ok(unreachable)
    }
}

fn finalize(slot: &Slot, timed_out: bool, budget: Duration) -> ChainOutcome {
    let mut outcome = lock(slot).clone();
    if !outcome.is_terminal() {
        let failure = if timed_out {
            ChainFailure { kind: FailureKind::Timeout, message: format!("request timed out after {budget:?}") }
        } else {
            ChainFailure {
                kind: FailureKind::ChainUnavailable,
                message: "chain task ended without an outcome".into(),
            }
        };
        outcome.fail_with(failure);
    }
    outcome
}

/// Work for one target chain. Owns its slot exclusively.
struct ChainTask {
    network: Arc<NetworkContext>,
    settings: DeploySettings,
    tracker: ReceiptTracker,
    request: Arc<DeploymentRequest>,
    chain_id: ChainId,
    route: Route,
    address: Address,
    slot: Slot,
}

impl ChainTask {
    async fn run(self) {
        let result = match self.route {
            Route::Direct => self.deploy_direct().await,
            Route::Bridged => self.deploy_bridged().await,
        };
        match result {
            Ok(()) => {
                lock(&self.slot).confirm(self.address);
                info!(chain_id = %self.chain_id, address = %self.address, "chain confirmed");
            }
            Err(err) => {
                warn!(chain_id = %self.chain_id, %err, "chain failed");
                lock(&self.slot).fail(&err);
            }
        }
    }

    async fn deploy_direct(&self) -> Result<(), DeployError> {
        self.check_endpoint(self.chain_id).await?;
        let factory = self.network.factory_on(self.chain_id)?;
        self.execute(
            factory.as_ref(),
            self.request.deploy_calldata(),
            U256::ZERO,
            self.settings.direct_gas_limit,
            self.settings.direct_gas_price,
        )
        .await?;
        Ok(())
    }

    async fn deploy_bridged(&self) -> Result<(), DeployError> {
        let source = self.network.current();
        let target = self.chain_id;
        let settings = self
            .request
            .bridge_settings
            .iter()
            .find(|s| s.to_chain == target)
            .cloned()
            .ok_or_else(|| DeployError::InvalidConfig(format!("no bridge settings for chain {target}")))?;
        self.check_endpoint(target).await?;

        let message = self.request.bridge_message(source, target);
        if self.already_applied(&message).await? {
            info!(chain_id = %target, message_id = %message.id(), "bridge message already applied");
            return Ok(());
        }

        let source_bridge = self.network.bridge_on(source)?;
        let out = self
            .call(
                source_bridge.as_ref(),
                message.bridge_out_calldata()?,
                settings.value,
                self.settings.direct_gas_limit,
                self.settings.direct_gas_price,
            )
            .await?;
        let forwarded = classify_bridge_out(&out.output).map_err(|r| r.into_error(source))?;
        // The source chain has emitted the message from here on, even if
        // this task is aborted by the request timeout.
        lock(&self.slot).mark_bridge_out_accepted();
        debug!(chain_id = %target, bytes = forwarded.data.len(), "bridgeOut accepted");

        self.bridge_in(&message, &forwarded.data, &settings).await
    }

    async fn bridge_in(
        &self,
        message: &BridgeMessage,
        data: &[u8],
        settings: &BridgeSettings,
    ) -> Result<(), DeployError> {
        let target_bridge = self.network.bridge_on(self.chain_id)?;
        let info = self
            .call(
                target_bridge.as_ref(),
                message.bridge_in_calldata(data)?,
                U256::ZERO,
                settings.gas_limit,
                settings.gas_price,
            )
            .await?;
        classify_bridge_in(&info.output).map_err(|r| r.into_error(self.chain_id))?;
        Ok(())
    }

    /// Like [`Self::execute`], then fetch the call's return data.
    async fn call(
        &self,
        contract: &dyn ChainContract,
        calldata: Bytes,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
    ) -> Result<TxInfo, DeployError> {
        let receipt = self.execute(contract, calldata, value, gas_limit, gas_price).await?;
        let client = contract.client();
        self.transaction(contract.chain_id(), client.as_ref(), receipt.tx_hash).await
    }

    /// Submit and wait for a successful receipt.
    async fn execute(
        &self,
        contract: &dyn ChainContract,
        calldata: Bytes,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
    ) -> Result<Receipt, DeployError> {
        let chain_id = contract.chain_id();
        let tx_hash = transact_with_retry(
            contract,
            calldata,
            value,
            gas_limit,
            gas_price,
            self.settings.submit_retries,
            self.settings.submit_backoff(),
        )
        .await?;
        lock(&self.slot).submitted(tx_hash);
        info!(%chain_id, %tx_hash, to = %contract.address(), "transaction submitted");

        let client = contract.client();
        let receipt = self.tracker.await_receipt(tx_hash, client.as_ref()).await?;
        if !receipt.success {
            return Err(DeployError::Reverted { tx_hash });
        }
        Ok(receipt)
    }

    async fn transaction(
        &self,
        chain_id: ChainId,
        client: &dyn ChainClient,
        tx_hash: B256,
    ) -> Result<TxInfo, DeployError> {
        retry_unavailable(
            chain_id,
            "getTransaction",
            self.settings.submit_retries,
            self.settings.submit_backoff(),
            move || client.get_transaction(tx_hash),
        )
        .await?
        .ok_or(DeployError::ReceiptNotFound { tx_hash })
    }

    async fn already_applied(&self, message: &BridgeMessage) -> Result<bool, DeployError> {
        let ledger: &dyn LedgerReader = self.network.endpoint(self.chain_id)?.ledger.as_ref();
        let id = message.id();
        retry_unavailable(
            self.chain_id,
            "isBridgeMessageApplied",
            self.settings.submit_retries,
            self.settings.submit_backoff(),
            move || ledger.is_bridge_message_applied(id),
        )
        .await
    }

    /// The endpoint registered for `chain_id` must actually serve that chain.
    async fn check_endpoint(&self, chain_id: ChainId) -> Result<(), DeployError> {
        let client: &dyn ChainClient = self.network.endpoint(chain_id)?.client.as_ref();
        let reported = retry_unavailable(
            chain_id,
            "chainId",
            self.settings.submit_retries,
            self.settings.submit_backoff(),
            move || client.chain_id(),
        )
        .await?;
        if reported != chain_id {
            return Err(DeployError::InvalidConfig(format!(
                "endpoint for chain {chain_id} serves chain {reported}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{MockChainClient, MockMode};
    use crate::deployment::{contract_type_from_name, sign_config, DeploymentConfig, DeploymentConfigBuilder};
    use crate::ledger::MemoryLedger;
    use crate::network::{ChainEndpoint, ChainType};
    use crate::signer::{dev, Signer};
    use crate::tracker::ReceiptPolicy;
    use alloy_primitives::{address, bytes, FixedBytes};

    const FACTORY: Address = address!("1111111111111111111111111111111111111111");
    const BRIDGE: Address = address!("2222222222222222222222222222222222222222");
    const GENESIS: Address = address!("3333333333333333333333333333333333333333");

    const MAINNET: ChainId = ChainId::new(1);
    const POLYGON: ChainId = ChainId::new(137);
    const BASE: ChainId = ChainId::new(8453);

    struct Chain {
        client: Arc<MockChainClient>,
        ledger: Arc<MemoryLedger>,
    }

    impl Chain {
        fn healthy(chain_id: ChainId) -> Self {
            Self::with_client(MockChainClient::new(chain_id), chain_id)
        }

        fn with_client(client: MockChainClient, chain_id: ChainId) -> Self {
            let ledger = MemoryLedger::new(chain_id).with_deployer(dev::dev_signer(0).address());
            Self { client: Arc::new(client), ledger: Arc::new(ledger) }
        }

        fn with_ledger(client: MockChainClient, ledger: MemoryLedger) -> Self {
            Self { client: Arc::new(client), ledger: Arc::new(ledger) }
        }
    }

    struct Harness {
        chains: BTreeMap<ChainId, Chain>,
    }

    impl Harness {
        fn healthy() -> Self {
            Self::new(vec![
                (MAINNET, Chain::healthy(MAINNET)),
                (POLYGON, Chain::healthy(POLYGON)),
                (BASE, Chain::healthy(BASE)),
            ])
        }

        fn new(chains: Vec<(ChainId, Chain)>) -> Self {
            Self { chains: chains.into_iter().collect() }
        }

        fn replace(mut self, chain_id: ChainId, chain: Chain) -> Self {
            self.chains.insert(chain_id, chain);
            self
        }

        fn client(&self, chain_id: ChainId) -> &MockChainClient {
            &self.chains[&chain_id].client
        }

        fn ledger(&self, chain_id: ChainId) -> &MemoryLedger {
            &self.chains[&chain_id].ledger
        }

        fn total_submitted(&self) -> usize {
            self.chains.values().map(|c| c.client.submitted().len()).sum()
        }

        fn orchestrator(&self, settings: DeploySettings) -> MultiChainDeploymentOrchestrator {
            let mut network = NetworkContext::new(MAINNET, FACTORY, BRIDGE, GENESIS);
            for (chain_id, chain) in &self.chains {
                network = network.with_endpoint(
                    *chain_id,
                    ChainEndpoint::new(chain.client.clone(), chain.ledger.clone()),
                );
            }
            MultiChainDeploymentOrchestrator::new(Arc::new(network), settings)
        }
    }

    fn settings() -> DeploySettings {
        DeploySettings {
            receipt_policy: ReceiptPolicy {
                initial_interval: Duration::from_millis(100),
                multiplier: 2,
                max_interval: Duration::from_secs(1),
                max_attempts: 5,
                max_duration: None,
            },
            submit_retries: 2,
            submit_backoff: Duration::from_millis(100),
            request_timeout: Duration::from_secs(60),
            ..DeploySettings::default()
        }
    }

    fn config() -> DeploymentConfig {
        DeploymentConfigBuilder::new()
            .contract_type(contract_type_from_name("HolographERC721").unwrap())
            .chain_type(ChainType::Ethereum.id())
            .secret("my-secret")
            .byte_code(bytes!("6000"))
            .init_code(bytes!("6080604052"))
            .build()
            .unwrap()
    }

    fn bridge(to_chain: ChainId) -> BridgeSettings {
        BridgeSettings::new(to_chain, U256::from(1_000), 500_000, U256::from(2_000_000_000u64))
    }

    async fn request_signed_by(signer: &dyn Signer) -> DeploymentRequest {
        let config = config();
        let verification = sign_config(&config, signer).await.unwrap();
        DeploymentRequest::new(config, verification, signer.address())
    }

    async fn full_request() -> DeploymentRequest {
        request_signed_by(&dev::dev_signer(0))
            .await
            .with_direct_deploy(true)
            .with_bridge(bridge(POLYGON))
            .with_bridge(bridge(BASE))
    }

    fn status(report: &DeploymentReport, chain_id: ChainId) -> ChainStatus {
        report.get(chain_id).unwrap().status
    }

    fn failure_kind(report: &DeploymentReport, chain_id: ChainId) -> FailureKind {
        report.get(chain_id).unwrap().error.as_ref().unwrap().kind
    }

    // =========================================================================
    // Happy path
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_direct_and_bridged_all_confirm() {
        let harness = Harness::healthy();
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert!(report.is_complete());
        assert!(report.all_confirmed());
        let ids: Vec<_> = report.chains.iter().map(|c| c.chain_id).collect();
        assert_eq!(ids, vec![MAINNET, POLYGON, BASE]);

        let expected = compute_address(&config(), FACTORY);
        assert_eq!(report.address, expected);
        for outcome in &report.chains {
            assert_eq!(outcome.address, Some(expected));
            assert!(outcome.tx_hash.is_some());
            assert!(outcome.error.is_none());
            assert!(!outcome.needs_reconciliation);
        }
        assert_eq!(report.get(MAINNET).unwrap().route, Route::Direct);
        assert_eq!(report.get(BASE).unwrap().route, Route::Bridged);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transactions_use_bridge_settings() {
        let harness = Harness::healthy();
        harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        // direct deploy + two bridgeOut calls on the source chain
        let source = harness.client(MAINNET).submitted();
        assert_eq!(source.len(), 3);
        assert_eq!(source.iter().filter(|tx| tx.to == FACTORY).count(), 1);
        let outs: Vec<_> = source.iter().filter(|tx| tx.to == BRIDGE).collect();
        assert_eq!(outs.len(), 2);
        assert!(outs.iter().all(|tx| tx.value == U256::from(1_000)));

        let polygon = harness.client(POLYGON).submitted();
        assert_eq!(polygon.len(), 1);
        assert_eq!(polygon[0].to, BRIDGE);
        assert_eq!(polygon[0].gas_limit, 500_000);
        assert_eq!(polygon[0].gas_price, U256::from(2_000_000_000u64));
        assert_eq!(&polygon[0].data[..4], crate::bridge::selectors::bridge_in().as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_failures_are_retried() {
        let harness = Harness::healthy().replace(
            BASE,
            Chain::with_client(MockChainClient::new(BASE).with_submit_failures(2), BASE),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert!(report.all_confirmed());
        assert_eq!(harness.client(BASE).submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_serializes_in_chain_order() {
        let harness = Harness::healthy();
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["chains"][0]["chainId"], 1);
        assert_eq!(json["chains"][1]["chainId"], 137);
        assert_eq!(json["chains"][2]["status"], "confirmed");
        assert!(json["chains"][0].get("error").is_none());
    }

    // =========================================================================
    // Independent failure
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_one_chain_fails_others_confirm() {
        let harness = Harness::healthy().replace(
            POLYGON,
            Chain::with_client(MockChainClient::new(POLYGON).with_mode(MockMode::Rejecting), POLYGON),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(status(&report, MAINNET), ChainStatus::Confirmed);
        assert_eq!(status(&report, BASE), ChainStatus::Confirmed);
        assert_eq!(status(&report, POLYGON), ChainStatus::Failed);
        assert_eq!(failure_kind(&report, POLYGON), FailureKind::Rejected);
        // bridgeOut already went through on the source chain
        assert!(report.get(POLYGON).unwrap().needs_reconciliation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_chain_fails_others_confirm() {
        let harness = Harness::healthy().replace(
            POLYGON,
            Chain::with_client(MockChainClient::new(POLYGON).with_mode(MockMode::Unavailable), POLYGON),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(status(&report, MAINNET), ChainStatus::Confirmed);
        assert_eq!(status(&report, BASE), ChainStatus::Confirmed);
        assert_eq!(failure_kind(&report, POLYGON), FailureKind::ChainUnavailable);
        assert!(!report.get(POLYGON).unwrap().needs_reconciliation);
        // direct deploy + bridgeOut towards Base only
        assert_eq!(harness.client(MAINNET).submitted().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_deploy_confirms_on_receipt_alone() {
        let harness = Harness::healthy().replace(
            MAINNET,
            Chain::with_client(MockChainClient::new(MAINNET).without_transaction_lookup(), MAINNET),
        );
        let request = request_signed_by(&dev::dev_signer(0)).await.with_direct_deploy(true);
        let report = harness.orchestrator(settings()).deploy(request).await.unwrap();

        let mainnet = report.get(MAINNET).unwrap();
        assert_eq!(mainnet.status, ChainStatus::Confirmed);
        assert_eq!(mainnet.address, Some(compute_address(&config(), FACTORY)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_transaction_reported_as_timeout() {
        let harness = Harness::healthy().replace(
            BASE,
            Chain::with_client(MockChainClient::new(BASE).with_mode(MockMode::Dropped), BASE),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        let base = report.get(BASE).unwrap();
        let error = base.error.as_ref().unwrap();
        assert_eq!(error.kind, FailureKind::Timeout);
        assert!(error.message.contains("not found"), "got {}", error.message);
        assert!(base.needs_reconciliation);
        assert_eq!(status(&report, POLYGON), ChainStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_direct_deploy() {
        let harness = Harness::healthy().replace(
            MAINNET,
            Chain::with_client(MockChainClient::new(MAINNET).with_mode(MockMode::Reverting), MAINNET),
        );
        let request = request_signed_by(&dev::dev_signer(0)).await.with_direct_deploy(true);
        let report = harness.orchestrator(settings()).deploy(request).await.unwrap();

        assert_eq!(report.chains.len(), 1);
        assert_eq!(failure_kind(&report, MAINNET), FailureKind::Reverted);
        assert!(report.get(MAINNET).unwrap().tx_hash.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_receipt_timeout_fails_only_that_chain() {
        let harness = Harness::healthy().replace(
            BASE,
            Chain::with_client(MockChainClient::new(BASE).with_mode(MockMode::NeverMined), BASE),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(failure_kind(&report, BASE), FailureKind::Timeout);
        assert_eq!(status(&report, POLYGON), ChainStatus::Confirmed);
        assert_eq!(status(&report, MAINNET), ChainStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_endpoint_serving_wrong_chain() {
        let harness = Harness::healthy().replace(
            POLYGON,
            Chain::with_client(
                MockChainClient::new(POLYGON).with_reported_chain_id(ChainId::new(80_002)),
                POLYGON,
            ),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(failure_kind(&report, POLYGON), FailureKind::InvalidConfig);
        assert!(harness.client(POLYGON).submitted().is_empty());
        // direct deploy + bridgeOut towards Base only
        assert_eq!(harness.client(MAINNET).submitted().len(), 2);
    }

    // =========================================================================
    // Request timeout
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout_marks_pending_chains() {
        let harness = Harness::healthy().replace(
            POLYGON,
            Chain::with_client(MockChainClient::new(POLYGON).with_mode(MockMode::NeverMined), POLYGON),
        );
        let mut slow = settings();
        slow.receipt_policy.max_attempts = 10_000;

        let request = full_request().await.with_timeout(Duration::from_secs(30));
        let report = harness.orchestrator(slow).deploy(request).await.unwrap();

        assert!(report.is_complete());
        let polygon = report.get(POLYGON).unwrap();
        assert_eq!(polygon.status, ChainStatus::Failed);
        assert_eq!(polygon.error.as_ref().unwrap().kind, FailureKind::Timeout);
        // the broadcast bridgeIn is still reported
        assert!(polygon.tx_hash.is_some());
        // bridgeOut already went through on the source chain
        assert!(polygon.needs_reconciliation);
        assert_eq!(status(&report, BASE), ChainStatus::Confirmed);
        assert!(!report.get(BASE).unwrap().needs_reconciliation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout_before_bridge_out_is_clean() {
        let harness = Harness::healthy().replace(
            MAINNET,
            Chain::with_client(MockChainClient::new(MAINNET).with_mode(MockMode::NeverMined), MAINNET),
        );
        let mut slow = settings();
        slow.receipt_policy.max_attempts = 10_000;

        let request = full_request().await.with_timeout(Duration::from_secs(30));
        let report = harness.orchestrator(slow).deploy(request).await.unwrap();

        for outcome in &report.chains {
            assert_eq!(outcome.error.as_ref().unwrap().kind, FailureKind::Timeout);
            assert!(!outcome.needs_reconciliation);
        }
        assert!(harness.client(POLYGON).submitted().is_empty());
    }

    // =========================================================================
    // Bridge magic values
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_bridge_in_selector_mismatch_not_retried() {
        let wrong = FixedBytes::from([0xde, 0xad, 0xbe, 0xef]);
        let harness = Harness::healthy().replace(
            BASE,
            Chain::with_client(MockChainClient::new(BASE).with_bridge_in_selector(wrong), BASE),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        let base = report.get(BASE).unwrap();
        assert_eq!(base.error.as_ref().unwrap().kind, FailureKind::BridgeOperationFailed);
        assert!(base.needs_reconciliation);
        assert_eq!(harness.client(BASE).submitted().len(), 1);
        assert_eq!(status(&report, POLYGON), ChainStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_out_selector_mismatch_stops_before_destination() {
        let wrong = FixedBytes::from([0x00, 0x00, 0x00, 0x01]);
        let harness = Harness::healthy().replace(
            MAINNET,
            Chain::with_client(MockChainClient::new(MAINNET).with_bridge_out_selector(wrong), MAINNET),
        );
        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(status(&report, MAINNET), ChainStatus::Confirmed);
        for chain_id in [POLYGON, BASE] {
            let outcome = report.get(chain_id).unwrap();
            assert_eq!(outcome.error.as_ref().unwrap().kind, FailureKind::BridgeOperationFailed);
            assert!(!outcome.needs_reconciliation);
            assert!(harness.client(chain_id).submitted().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_applied_message_is_noop() {
        let harness = Harness::healthy();
        let request = full_request().await;
        harness
            .ledger(POLYGON)
            .apply_bridge_in(&request.bridge_message(MAINNET, POLYGON))
            .await
            .unwrap();

        let report = harness.orchestrator(settings()).deploy(request).await.unwrap();

        let polygon = report.get(POLYGON).unwrap();
        assert_eq!(polygon.status, ChainStatus::Confirmed);
        assert!(polygon.tx_hash.is_none());
        assert!(harness.client(POLYGON).submitted().is_empty());
        // direct deploy + bridgeOut towards Base only
        assert_eq!(harness.client(MAINNET).submitted().len(), 2);
    }

    // =========================================================================
    // Authorization gate
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_unapproved_on_target_aborts_without_broadcast() {
        let harness = Harness::healthy()
            .replace(BASE, Chain::with_ledger(MockChainClient::new(BASE), MemoryLedger::new(BASE)));

        match harness.orchestrator(settings()).deploy(full_request().await).await {
            Err(DeployError::UnauthorizedDeployer { deployer, chain_id }) => {
                assert_eq!(deployer, dev::dev_signer(0).address());
                assert_eq!(chain_id, BASE);
            }
            other => panic!("Expected UnauthorizedDeployer, got {:?}", other),
        }
        assert_eq!(harness.total_submitted(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unapproved_signer_aborts_without_broadcast() {
        let harness = Harness::healthy();
        let request = request_signed_by(&dev::dev_signer(4))
            .await
            .with_direct_deploy(true)
            .with_bridge(bridge(POLYGON));

        let result = harness.orchestrator(settings()).deploy(request).await;
        assert!(matches!(
            result,
            Err(DeployError::UnauthorizedDeployer { chain_id, .. }) if chain_id == MAINNET
        ));
        assert_eq!(harness.total_submitted(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_target_ledger_fails_that_chain() {
        let harness = Harness::healthy();
        harness.ledger(POLYGON).set_reachable(false).await;

        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(failure_kind(&report, POLYGON), FailureKind::ChainUnavailable);
        assert_eq!(status(&report, MAINNET), ChainStatus::Confirmed);
        assert_eq!(status(&report, BASE), ChainStatus::Confirmed);
        assert!(harness.client(POLYGON).submitted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_current_ledger_fails_every_chain() {
        let harness = Harness::healthy();
        harness.ledger(MAINNET).set_reachable(false).await;

        let report = harness.orchestrator(settings()).deploy(full_request().await).await.unwrap();

        assert_eq!(report.chains.len(), 3);
        for outcome in &report.chains {
            assert_eq!(outcome.error.as_ref().unwrap().kind, FailureKind::ChainUnavailable);
        }
        assert_eq!(harness.total_submitted(), 0);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    async fn expect_invalid(harness: &Harness, request: DeploymentRequest) {
        let result = harness.orchestrator(settings()).deploy(request).await;
        assert!(matches!(result, Err(DeployError::InvalidConfig(_))), "got {:?}", result);
        assert_eq!(harness.total_submitted(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_target_rejected() {
        let harness = Harness::healthy();
        let request = full_request().await.with_bridge(bridge(POLYGON));
        expect_invalid(&harness, request).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_to_current_chain_rejected() {
        let harness = Harness::healthy();
        let with_direct = full_request().await.with_bridge(bridge(MAINNET));
        expect_invalid(&harness, with_direct).await;

        let without_direct = request_signed_by(&dev::dev_signer(0)).await.with_bridge(bridge(MAINNET));
        expect_invalid(&harness, without_direct).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_chain_rejected() {
        let harness = Harness::healthy();
        let request = full_request().await.with_bridge(bridge(ChainId::new(42_161)));
        expect_invalid(&harness, request).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_without_targets_rejected() {
        let harness = Harness::healthy();
        expect_invalid(&harness, request_signed_by(&dev::dev_signer(0)).await).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_verification_must_match_signer() {
        let harness = Harness::healthy();
        let mut request = full_request().await;
        request.signer = dev::dev_signer(1).address();
        expect_invalid(&harness, request).await;

        let mut tampered = full_request().await;
        tampered.config.init_code = bytes!("6080604053");
        expect_invalid(&harness, tampered).await;
    }

    #[tokio::test]
    async fn test_request_json_round_trip() {
        let request = full_request().await.with_timeout(Duration::from_secs(90));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["deployOnCurrentChain"], true);
        assert_eq!(json["bridgeSettings"][0]["toChain"], 137);
        assert_eq!(json["timeout"], 90_000);

        let back: DeploymentRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }
}
