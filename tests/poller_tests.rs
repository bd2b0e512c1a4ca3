// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use staking_keeper::{wait_for_condition, Condition, PollError, PollOptions};
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::Instant;

struct NeverTrue {
    checks: u32,
}

#[async_trait]
impl Condition for NeverTrue {
    type Error = Infallible;

    async fn check(&mut self) -> Result<bool, Infallible> {
        self.checks += 1;
        Ok(false)
    }
}

struct TrueAfter {
    remaining: u32,
    checks: u32,
}

#[async_trait]
impl Condition for TrueAfter {
    type Error = Infallible;

    async fn check(&mut self) -> Result<bool, Infallible> {
        self.checks += 1;
        if self.remaining == 0 {
            return Ok(true);
        }
        self.remaining -= 1;
        Ok(false)
    }
}

struct FatalStep {
    checks: u32,
}

#[async_trait]
impl Condition for FatalStep {
    type Error = String;

    async fn check(&mut self) -> Result<bool, String> {
        self.checks += 1;
        Err("contract version mismatch".to_string())
    }
}

#[tokio::test]
async fn test_timeout_fires_within_one_sleep_interval_of_the_deadline() {
    let interval = Duration::from_millis(50);
    let timeout = Duration::from_millis(200);
    let mut condition = NeverTrue { checks: 0 };

    let started = Instant::now();
    let result =
        wait_for_condition(&mut condition, PollOptions::with_timeout(interval, timeout)).await;
    let elapsed = started.elapsed();

    match result {
        Err(PollError::Timeout { waited, .. }) => {
            assert!(waited >= timeout);
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
    assert!(elapsed >= timeout, "gave up too early: {:?}", elapsed);
    // Deadline plus at most one more sleep interval, with scheduling slack.
    assert!(
        elapsed < timeout + interval + Duration::from_millis(100),
        "gave up too late: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_condition_without_timeout_retries_until_satisfied() {
    let mut condition = TrueAfter {
        remaining: 3,
        checks: 0,
    };

    wait_for_condition(
        &mut condition,
        PollOptions::forever(Duration::from_millis(1)),
    )
    .await
    .expect("condition should eventually be satisfied");

    assert_eq!(condition.checks, 4);
}

#[tokio::test]
async fn test_satisfied_condition_returns_before_the_timeout() {
    let mut condition = TrueAfter {
        remaining: 1,
        checks: 0,
    };

    wait_for_condition(
        &mut condition,
        PollOptions::with_timeout(Duration::from_millis(1), Duration::from_secs(5)),
    )
    .await
    .expect("condition should be satisfied well before the timeout");

    assert_eq!(condition.checks, 2);
}

#[tokio::test]
async fn test_fatal_step_error_stops_the_poll_immediately() {
    let mut condition = FatalStep { checks: 0 };

    let result = wait_for_condition(
        &mut condition,
        PollOptions::forever(Duration::from_secs(3600)),
    )
    .await;

    match result {
        Err(PollError::Step(reason)) => assert_eq!(reason, "contract version mismatch"),
        other => panic!("expected a step failure, got {:?}", other),
    }
    assert_eq!(condition.checks, 1, "fatal steps must not be retried");
}
