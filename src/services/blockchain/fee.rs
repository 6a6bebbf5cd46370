use std::sync::Arc;

use alloy::primitives::{utils::format_ether, Address, U256};
use tracing::info;

use super::UpdateChain;
use crate::error::{log_failure, RelayError, Result};
use crate::services::oracle::UpdatePayload;

/// Reads the update fee from the oracle contract
#[derive(Clone)]
pub struct FeeCalculator {
    chain: Arc<dyn UpdateChain>,
    oracle: Address,
}

impl FeeCalculator {
    pub fn new(chain: Arc<dyn UpdateChain>, oracle: Address) -> Self {
        Self { chain, oracle }
    }

    /// Read-only; errors are classified and propagate without fallback
    pub async fn update_fee(&self, payload: &UpdatePayload) -> Result<U256> {
        let fee = match self.chain.update_fee(self.oracle, payload).await {
            Ok(fee) => fee,
            Err(e) => {
                let (hint, message) = log_failure("Fee query", &e);
                return Err(RelayError::FeeQuery { hint, message });
            }
        };
        info!("Update fee: {} wei ({} ETH)", fee, format_ether(fee));
        Ok(fee)
    }
}
