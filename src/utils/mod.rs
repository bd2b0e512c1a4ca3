pub mod logging;
pub mod poll;
pub mod tx_hex;
