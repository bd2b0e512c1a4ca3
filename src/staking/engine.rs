use async_trait::async_trait;
use ethers::types::Bytes;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::StakingConfig;
use crate::contracts::{CallArgs, ContractKind, ContractReader, FieldValue};
use crate::utils::poll::{wait_for_condition, Condition, PollError, PollOptions};

use super::payload::{CheckpointPayload, CALL_CHECKPOINT_ROUND_ID};
use super::state::{LegacyStakingState, StakingState, TokenStakingState};
use super::types::{CheckpointSchedule, StakingError, DATA_KEY};

/// Remote read/build steps of one checkpoint activation.
///
/// Each step is retriable: it performs one contract interaction and reports
/// whether the value it is responsible for has been obtained. The poller
/// drives a step until it is satisfied, so steps stay free of retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStep {
    ServiceStakingState,
    NextCheckpoint,
    LastCheckpoint,
    LivenessPeriod,
    LivenessRatio,
    ServiceInfo,
    CheckpointCallData,
    SafeTxHash,
}

impl CallStep {
    pub fn name(self) -> &'static str {
        match self {
            CallStep::ServiceStakingState => "service_staking_state",
            CallStep::NextCheckpoint => "next_checkpoint",
            CallStep::LastCheckpoint => "last_checkpoint",
            CallStep::LivenessPeriod => "liveness_period",
            CallStep::LivenessRatio => "liveness_ratio",
            CallStep::ServiceInfo => "service_info",
            CallStep::CheckpointCallData => "checkpoint_call_data",
            CallStep::SafeTxHash => "safe_tx_hash",
        }
    }
}

/// Working state of a single checkpoint activation.
///
/// All of it is owned by one activation and discarded once the payload is
/// emitted; nothing here is shared between activations.
pub struct CheckpointCall {
    pub(crate) config: StakingConfig,
    pub(crate) reader: ContractReader,
    synced_timestamp: u64,
    staking_state: StakingState,
    schedule: CheckpointSchedule,
    service_info: Option<FieldValue>,
    pub(crate) checkpoint_data: Bytes,
    pub(crate) safe_tx_hash: String,
}

struct StepCondition<'a> {
    call: &'a mut CheckpointCall,
    step: CallStep,
}

#[async_trait]
impl Condition for StepCondition<'_> {
    type Error = StakingError;

    async fn check(&mut self) -> Result<bool, StakingError> {
        self.call.probe(self.step).await
    }
}

impl CheckpointCall {
    /// `synced_timestamp` is the last agreed round-transition time supplied
    /// by the consensus collaborator, so every replica evaluates the same
    /// due/not-due verdict regardless of its local clock.
    pub fn new(config: StakingConfig, reader: ContractReader, synced_timestamp: u64) -> Self {
        CheckpointCall {
            config,
            reader,
            synced_timestamp,
            staking_state: StakingState::default(),
            schedule: CheckpointSchedule::default(),
            service_info: None,
            checkpoint_data: Bytes::default(),
            safe_tx_hash: String::new(),
        }
    }

    pub fn staking_state(&self) -> StakingState {
        self.staking_state
    }

    pub fn schedule(&self) -> CheckpointSchedule {
        self.schedule
    }

    pub fn service_info(&self) -> Option<&FieldValue> {
        self.service_info.as_ref()
    }

    pub fn synced_timestamp(&self) -> u64 {
        self.synced_timestamp
    }

    /// Whether the next checkpoint is reached at the synchronized time.
    pub fn is_checkpoint_reached(&self) -> bool {
        self.schedule.next_checkpoint_ts <= self.synced_timestamp
    }

    /// Run the activation to completion and emit its payload.
    ///
    /// The staking reads never time out: they are correctness preconditions
    /// and the engine waits for the chain as long as it takes. Exactly one
    /// payload is produced on every successful path.
    pub async fn run(mut self) -> Result<CheckpointPayload, StakingError> {
        self.wait_for(CallStep::ServiceStakingState, None).await?;

        let mut checkpoint_tx_hex = None;
        if self.staking_state == StakingState::Staked {
            self.refresh_schedule().await?;
            if self.is_checkpoint_reached() {
                info!(
                    "checkpoint {} reached at synchronized time {}; preparing the checkpoint transaction",
                    self.schedule.next_checkpoint_ts, self.synced_timestamp
                );
                let descriptor = self.prepare_checkpoint_tx().await?;
                checkpoint_tx_hex = Some(descriptor.to_hex());
            } else {
                info!(
                    "next checkpoint not reached yet: {} > {}",
                    self.schedule.next_checkpoint_ts, self.synced_timestamp
                );
            }
        }

        if self.staking_state == StakingState::Evicted {
            error!("service has been evicted!");
        }

        Ok(CheckpointPayload::new(
            self.config.sender_address,
            CALL_CHECKPOINT_ROUND_ID,
            checkpoint_tx_hex,
            self.staking_state,
        ))
    }

    /// Read the full checkpoint schedule and the service metadata. Only
    /// called on the staked path, where these values are meaningful.
    async fn refresh_schedule(&mut self) -> Result<(), StakingError> {
        self.wait_for(CallStep::NextCheckpoint, None).await?;
        self.wait_for(CallStep::LastCheckpoint, None).await?;
        self.wait_for(CallStep::LivenessPeriod, None).await?;
        self.wait_for(CallStep::LivenessRatio, None).await?;
        self.wait_for(CallStep::ServiceInfo, None).await?;
        Ok(())
    }

    /// Drive one step through the condition poller.
    pub(crate) async fn wait_for(
        &mut self,
        step: CallStep,
        timeout: Option<Duration>,
    ) -> Result<(), StakingError> {
        let options = PollOptions {
            interval: self.config.poll_interval,
            timeout,
        };
        let mut condition = StepCondition { call: self, step };
        match wait_for_condition(&mut condition, options).await {
            Ok(()) => Ok(()),
            Err(PollError::Step(e)) => Err(e),
            Err(PollError::Timeout { waited, timeout }) => Err(StakingError::Timeout {
                step: step.name(),
                waited,
                timeout,
            }),
        }
    }

    async fn probe(&mut self, step: CallStep) -> Result<bool, StakingError> {
        let satisfied = match step {
            CallStep::ServiceStakingState => self.read_staking_state().await,
            CallStep::NextCheckpoint => self.read_next_checkpoint().await,
            CallStep::LastCheckpoint => self.read_last_checkpoint().await,
            CallStep::LivenessPeriod => self.read_liveness_period().await,
            CallStep::LivenessRatio => self.read_liveness_ratio().await,
            CallStep::ServiceInfo => self.read_service_info().await,
            CallStep::CheckpointCallData => self.build_checkpoint_data().await,
            CallStep::SafeTxHash => return self.derive_safe_tx_hash().await,
        };
        Ok(satisfied)
    }

    async fn read_staking_state(&mut self) -> bool {
        let Some(service_id) = self.config.on_chain_service_id else {
            warn!(
                "cannot perform any staking-related operations without a configured \
                 on-chain service id; assuming service status 'UNSTAKED'"
            );
            self.staking_state = StakingState::Unstaked;
            return true;
        };

        let args = CallArgs::new().arg("service_id", FieldValue::uint(service_id));
        let Some(value) = self
            .reader
            .read_field(
                ContractKind::Staking,
                "get_service_staking_state",
                DATA_KEY,
                args,
            )
            .await
        else {
            return false;
        };
        let Some(ordinal) = value.as_u64() else {
            warn!("unexpected staking state value in contract response: {:?}", value);
            return false;
        };

        match self.normalize_raw_state(ordinal) {
            Some(state) => {
                self.staking_state = state;
                true
            }
            None => {
                warn!("unknown staking state ordinal {} reported by the staking contract", ordinal);
                false
            }
        }
    }

    /// Normalize the raw on-chain ordinal through the enumeration of the
    /// configured staking variant.
    fn normalize_raw_state(&self, ordinal: u64) -> Option<StakingState> {
        if self.reader.use_activity_checker() {
            TokenStakingState::try_from(ordinal)
                .ok()
                .map(StakingState::from)
        } else {
            LegacyStakingState::try_from(ordinal)
                .ok()
                .map(StakingState::from)
        }
    }

    async fn read_next_checkpoint(&mut self) -> bool {
        match self.read_u64_field("get_next_checkpoint_ts").await {
            Some(ts) => {
                self.schedule.next_checkpoint_ts = ts;
                true
            }
            None => false,
        }
    }

    async fn read_last_checkpoint(&mut self) -> bool {
        match self.read_u64_field("ts_checkpoint").await {
            Some(ts) => {
                self.schedule.last_checkpoint_ts = ts;
                true
            }
            None => false,
        }
    }

    async fn read_liveness_period(&mut self) -> bool {
        match self.read_u64_field("get_liveness_period").await {
            Some(period) => {
                self.schedule.liveness_period = period;
                true
            }
            None => false,
        }
    }

    async fn read_liveness_ratio(&mut self) -> bool {
        let kind = self.reader.liveness_ratio_kind();
        let Some(value) = self
            .reader
            .read_field(kind, "liveness_ratio", DATA_KEY, CallArgs::new())
            .await
        else {
            return false;
        };
        match value.as_u256() {
            Some(ratio) => {
                self.schedule.liveness_ratio = ratio;
                true
            }
            None => {
                warn!("unexpected liveness ratio value in contract response: {:?}", value);
                false
            }
        }
    }

    async fn read_service_info(&mut self) -> bool {
        let Some(service_id) = self.config.on_chain_service_id else {
            warn!(
                "cannot perform any staking-related operations without a configured \
                 on-chain service id; assuming service status 'UNSTAKED'"
            );
            return true;
        };

        let args = CallArgs::new().arg("service_id", FieldValue::uint(service_id));
        match self
            .reader
            .read_field(ContractKind::Staking, "get_service_info", DATA_KEY, args)
            .await
        {
            Some(value) => {
                self.service_info = Some(value);
                true
            }
            None => false,
        }
    }

    async fn read_u64_field(&self, method: &str) -> Option<u64> {
        let value = self
            .reader
            .read_field(ContractKind::Staking, method, DATA_KEY, CallArgs::new())
            .await?;
        let parsed = value.as_u64();
        if parsed.is_none() {
            warn!("unexpected value for {:?} in contract response: {:?}", method, value);
        }
        parsed
    }
}
