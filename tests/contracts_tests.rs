// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::Address;
use staking_keeper::{
    CallArgs, CallResponse, ContractGateway, ContractInterface, ContractKind, ContractReader,
    FieldValue, MockGateway, StakingConfig,
};
use std::sync::Arc;

fn config_with_activity_checker(enabled: bool) -> StakingConfig {
    StakingConfig {
        on_chain_service_id: Some(1),
        staking_contract_address: "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap(),
        activity_checker_address: if enabled {
            "0x2222222222222222222222222222222222222222"
                .parse()
                .unwrap()
        } else {
            Address::zero()
        },
        safe_contract_address: "0x3333333333333333333333333333333333333333"
            .parse()
            .unwrap(),
        ..StakingConfig::default()
    }
}

#[tokio::test]
async fn test_read_field_extracts_the_named_field() {
    let gateway = Arc::new(MockGateway::new());
    gateway
        .push_response(
            "get_liveness_period",
            CallResponse::success().with_field("data", FieldValue::uint(86400u64)),
        )
        .await;

    let reader = ContractReader::new(gateway.clone(), &config_with_activity_checker(false));
    let value = reader
        .read_field(
            ContractKind::Staking,
            "get_liveness_period",
            "data",
            CallArgs::new(),
        )
        .await
        .expect("field should be extracted from a successful response");

    assert_eq!(value.as_u64(), Some(86400));
    assert_eq!(gateway.call_count("get_liveness_period").await, 1);
}

#[tokio::test]
async fn test_failed_call_is_a_soft_failure() {
    let gateway = Arc::new(MockGateway::new());
    gateway
        .push_response(
            "get_liveness_period",
            CallResponse::failed("rpc unreachable"),
        )
        .await;

    let reader = ContractReader::new(gateway.clone(), &config_with_activity_checker(false));
    let value = reader
        .read_field(
            ContractKind::Staking,
            "get_liveness_period",
            "data",
            CallArgs::new(),
        )
        .await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_missing_field_is_a_soft_failure() {
    let gateway = Arc::new(MockGateway::new());
    gateway
        .push_response(
            "get_liveness_period",
            CallResponse::success().with_field("unrelated", FieldValue::uint(1u64)),
        )
        .await;

    let reader = ContractReader::new(gateway.clone(), &config_with_activity_checker(false));
    let value = reader
        .read_field(
            ContractKind::Staking,
            "get_liveness_period",
            "data",
            CallArgs::new(),
        )
        .await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_staking_kind_resolves_to_the_configured_variant() {
    let legacy = ContractReader::new(
        Arc::new(MockGateway::new()),
        &config_with_activity_checker(false),
    );
    let (address, interface) = legacy.resolve(ContractKind::Staking);
    assert_eq!(address, legacy.staking_address());
    assert_eq!(interface, ContractInterface::ServiceStakingToken);

    let token = ContractReader::new(
        Arc::new(MockGateway::new()),
        &config_with_activity_checker(true),
    );
    let (address, interface) = token.resolve(ContractKind::Staking);
    assert_eq!(address, token.staking_address());
    assert_eq!(interface, ContractInterface::StakingToken);
}

#[tokio::test]
async fn test_liveness_ratio_read_targets_the_activity_checker_when_configured() {
    let config = config_with_activity_checker(true);
    let gateway = Arc::new(MockGateway::new());
    gateway
        .push_response(
            "liveness_ratio",
            CallResponse::success().with_field("data", FieldValue::uint(7u64)),
        )
        .await;

    let reader = ContractReader::new(gateway.clone(), &config);
    assert_eq!(reader.liveness_ratio_kind(), ContractKind::ActivityChecker);

    reader
        .read_field(
            reader.liveness_ratio_kind(),
            "liveness_ratio",
            "data",
            CallArgs::new(),
        )
        .await
        .expect("liveness ratio should be readable");

    let calls = gateway.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].address, config.activity_checker_address);
    assert_eq!(calls[0].interface, ContractInterface::ActivityChecker);
}

#[tokio::test]
async fn test_liveness_ratio_read_targets_the_staking_contract_in_legacy_mode() {
    let config = config_with_activity_checker(false);
    let gateway = Arc::new(MockGateway::new());
    gateway
        .push_response(
            "liveness_ratio",
            CallResponse::success().with_field("data", FieldValue::uint(7u64)),
        )
        .await;

    let reader = ContractReader::new(gateway.clone(), &config);
    assert_eq!(reader.liveness_ratio_kind(), ContractKind::Staking);

    reader
        .read_field(
            reader.liveness_ratio_kind(),
            "liveness_ratio",
            "data",
            CallArgs::new(),
        )
        .await
        .expect("liveness ratio should be readable");

    let calls = gateway.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].address, config.staking_contract_address);
    assert_eq!(calls[0].interface, ContractInterface::ServiceStakingToken);
}

#[tokio::test]
async fn test_mock_gateway_serves_queued_responses_in_order_then_repeats_the_last() {
    let gateway = MockGateway::new();
    gateway
        .push_response("method", CallResponse::failed("first attempt"))
        .await;
    gateway
        .push_response(
            "method",
            CallResponse::success().with_field("data", FieldValue::uint(1u64)),
        )
        .await;

    let first = gateway
        .call(
            Address::zero(),
            ContractInterface::Multisig,
            "method",
            CallArgs::new(),
        )
        .await;
    assert!(!first.status.is_success());

    for _ in 0..2 {
        let next = gateway
            .call(
                Address::zero(),
                ContractInterface::Multisig,
                "method",
                CallArgs::new(),
            )
            .await;
        assert!(next.status.is_success());
    }
}
