pub mod gateway;
pub mod reader;

pub use gateway::{
    CallArgs, CallResponse, CallStatus, ContractGateway, ContractInterface, FieldValue,
    MockGateway, RecordedCall,
};
pub use reader::{ContractKind, ContractReader};
