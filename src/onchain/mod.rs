//! Starknet contract introspection.
//!
//! Agents carry the address of their token contract. The dashboard enriches
//! each agent with that contract's ABI, fetched from a Starknet JSON-RPC node.
//!
//! - `ClassProvider`: the lookup seam; the agent mapper only sees this trait
//! - `StarknetRpc`: `starknet_getClassAt` over reqwest
//! - `abi`: normalizing legacy and Sierra class ABIs

pub mod abi;
pub mod rpc;

pub use abi::{Abi, AbiSummary};
pub use rpc::StarknetRpc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("node returned status {0}")]
    Status(u16),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("No ABI found for token contract")]
    MissingAbi,
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),
    #[error("malformed RPC response: {0}")]
    Malformed(String),
}

/// Anything that can resolve a deployed contract address to its class ABI.
#[async_trait]
pub trait ClassProvider: Send + Sync {
    async fn get_class_abi(&self, contract_address: &str) -> Result<Abi, RpcError>;
}

/// Prefix a hex address with `0x` if it is not already. Blank input is `None`.
pub fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        Some(trimmed.to_string())
    } else {
        Some(format!("0x{trimmed}"))
    }
}
