use ethers::types::Address;
use std::sync::Arc;
use tracing::error;

use crate::config::StakingConfig;

use super::gateway::{CallArgs, ContractGateway, ContractInterface, FieldValue};

/// Logical contract capabilities the orchestration reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    Staking,
    ActivityChecker,
    Multisig,
}

/// Facade over the remote call gateway.
///
/// Resolves a logical `ContractKind` to the concrete address and interface
/// backing it, issues exactly one call per `read_field`, and reduces every
/// failure mode (non-success status, absent field) to `None` so callers can
/// feed it straight into the condition poller.
#[derive(Clone)]
pub struct ContractReader {
    gateway: Arc<dyn ContractGateway>,
    staking_address: Address,
    activity_checker_address: Address,
    multisig_address: Address,
    use_activity_checker: bool,
}

impl ContractReader {
    pub fn new(gateway: Arc<dyn ContractGateway>, config: &StakingConfig) -> Self {
        ContractReader {
            gateway,
            staking_address: config.staking_contract_address,
            activity_checker_address: config.activity_checker_address,
            multisig_address: config.safe_contract_address,
            use_activity_checker: config.use_activity_checker(),
        }
    }

    pub fn staking_address(&self) -> Address {
        self.staking_address
    }

    pub fn use_activity_checker(&self) -> bool {
        self.use_activity_checker
    }

    /// The capability backing the `liveness_ratio` read. Newer deployments
    /// move it to the activity checker; the method name stays the same.
    pub fn liveness_ratio_kind(&self) -> ContractKind {
        if self.use_activity_checker {
            ContractKind::ActivityChecker
        } else {
            ContractKind::Staking
        }
    }

    /// Resolve a logical capability to its concrete target. The staking
    /// variant is fixed at configuration time.
    pub fn resolve(&self, kind: ContractKind) -> (Address, ContractInterface) {
        match kind {
            ContractKind::Staking if self.use_activity_checker => {
                (self.staking_address, ContractInterface::StakingToken)
            }
            ContractKind::Staking => {
                (self.staking_address, ContractInterface::ServiceStakingToken)
            }
            ContractKind::ActivityChecker => (
                self.activity_checker_address,
                ContractInterface::ActivityChecker,
            ),
            ContractKind::Multisig => (self.multisig_address, ContractInterface::Multisig),
        }
    }

    /// Issue one contract call and extract a named field from the response.
    ///
    /// Returns `None` when the call reports non-success or the field is
    /// absent; both are logged and left to the caller's retry policy, never
    /// raised.
    pub async fn read_field(
        &self,
        kind: ContractKind,
        method: &str,
        data_key: &str,
        args: CallArgs,
    ) -> Option<FieldValue> {
        let (address, interface) = self.resolve(kind);
        let response = self.gateway.call(address, interface, method, args).await;

        if !response.status.is_success() {
            error!(
                "could not successfully interact with the {} contract using {:?}: {:?}",
                interface, method, response
            );
            return None;
        }

        match response.fields.get(data_key) {
            Some(value) => Some(value.clone()),
            None => {
                error!(
                    "field {:?} missing from the {} contract response to {:?}: {:?}",
                    data_key, interface, method, response
                );
                None
            }
        }
    }
}
