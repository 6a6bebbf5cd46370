//! Deployment helper
//!
//! Compilation and deployment happen outside this tool. The helper only renders the
//! constructor arguments a deploy tool needs for the consumer contract.

use alloy::primitives::Address;
use alloy::sol_types::SolValue;

use crate::error::{RelayError, Result};
use crate::services::blockchain::contracts::CONSUMER_CONSTRUCTOR;
use crate::utils::to_prefixed_hex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub constructor: &'static str,
    pub oracle: Address,
    /// ABI-encoded constructor arguments
    pub encoded_args: String,
}

pub fn plan(oracle_address: &str) -> Result<DeploymentPlan> {
    let oracle: Address = oracle_address.trim().parse().map_err(|e| {
        RelayError::Decode(format!("invalid oracle address '{}': {}", oracle_address, e))
    })?;

    Ok(DeploymentPlan {
        constructor: CONSUMER_CONSTRUCTOR,
        oracle,
        encoded_args: to_prefixed_hex(&oracle.abi_encode()),
    })
}
