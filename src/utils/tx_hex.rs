// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic hex packing for multisig transaction payloads.
//!
//! Every replica must render byte-identical output for the same inputs, so
//! the encoding is a plain fixed-width concatenation with no separators:
//! hash, 32-byte big-endian value, 32-byte big-endian gas, 20-byte target
//! address, raw call data.

use ethers::types::{Address, U256};

/// Pack a prepared multisig transaction into a single hex string.
///
/// `safe_tx_hash` is expected with its `0x` prefix already stripped.
pub fn hash_payload_to_hex(
    safe_tx_hash: &str,
    ether_value: U256,
    safe_tx_gas: U256,
    to: Address,
    data: &[u8],
) -> String {
    let mut packed =
        String::with_capacity(safe_tx_hash.len() + 64 + 64 + 40 + data.len() * 2);
    packed.push_str(safe_tx_hash);
    packed.push_str(&hex::encode(u256_to_be_bytes(ether_value)));
    packed.push_str(&hex::encode(u256_to_be_bytes(safe_tx_gas)));
    packed.push_str(&hex::encode(to.as_bytes()));
    packed.push_str(&hex::encode(data));
    packed
}

fn u256_to_be_bytes(value: U256) -> [u8; 32] {
    let mut buffer = [0u8; 32];
    value.to_big_endian(&mut buffer);
    buffer
}
