use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tokio::sync::RwLock;

/// Contract interfaces known to the gateway.
///
/// The staking capability is backed by one of two incompatible deployments:
/// the legacy service staking contract and the newer token staking contract.
/// Both expose the same logical method names, so callers select an interface
/// once and never branch on it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractInterface {
    ServiceStakingToken,
    StakingToken,
    ActivityChecker,
    Multisig,
}

impl ContractInterface {
    pub fn id(self) -> &'static str {
        match self {
            ContractInterface::ServiceStakingToken => "service_staking_token",
            ContractInterface::StakingToken => "staking_token",
            ContractInterface::ActivityChecker => "activity_checker",
            ContractInterface::Multisig => "multisig",
        }
    }
}

impl fmt::Display for ContractInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single value inside a contract response field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Uint(U256),
    Address(Address),
    Bytes(Bytes),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn uint<T: Into<U256>>(value: T) -> Self {
        FieldValue::Uint(value.into())
    }

    pub fn as_u256(&self) -> Option<U256> {
        match self {
            FieldValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Uint(value) if *value <= U256::from(u64::MAX) => Some(value.as_u64()),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            FieldValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Named arguments for a contract method call.
///
/// Kept as an ordered list so encoding downstream is deterministic across
/// replicas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs(Vec<(String, FieldValue)>);

impl CallArgs {
    pub fn new() -> Self {
        CallArgs(Vec::new())
    }

    pub fn arg(mut self, name: &str, value: FieldValue) -> Self {
        self.0.push((name.to_string(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallStatus {
    Success,
    Failed(String),
}

impl CallStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CallStatus::Success)
    }
}

/// Response of one remote contract call: a status plus a named field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    pub status: CallStatus,
    pub fields: HashMap<String, FieldValue>,
}

impl CallResponse {
    pub fn success() -> Self {
        CallResponse {
            status: CallStatus::Success,
            fields: HashMap::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        CallResponse {
            status: CallStatus::Failed(reason.into()),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

/// Remote call capability for read-only contract interactions.
///
/// Transport failures are reported through a non-success `CallStatus`, never
/// a panic: callers treat any non-OK response uniformly as a soft failure.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    async fn call(
        &self,
        address: Address,
        interface: ContractInterface,
        method: &str,
        args: CallArgs,
    ) -> CallResponse;
}

/// One call observed by the mock gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub address: Address,
    pub interface: ContractInterface,
    pub method: String,
    pub args: CallArgs,
}

// Mock gateway for testing
#[derive(Default)]
pub struct MockGateway {
    responses: RwLock<HashMap<String, VecDeque<CallResponse>>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        MockGateway::default()
    }

    /// Queue a response for a method. Responses are served in order; the
    /// last queued response is served repeatedly once the queue drains, so
    /// a single `push_response` covers any number of retries.
    pub async fn push_response(&self, method: &str, response: CallResponse) {
        self.responses
            .write()
            .await
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self, method: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.method == method)
            .count()
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    async fn call(
        &self,
        address: Address,
        interface: ContractInterface,
        method: &str,
        args: CallArgs,
    ) -> CallResponse {
        self.calls.write().await.push(RecordedCall {
            address,
            interface,
            method: method.to_string(),
            args,
        });

        let mut responses = self.responses.write().await;
        match responses.get_mut(method) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("queue is non-empty"),
            Some(queue) if queue.len() == 1 => queue.front().expect("queue is non-empty").clone(),
            _ => CallResponse::failed(format!("no mock response programmed for {:?}", method)),
        }
    }
}
