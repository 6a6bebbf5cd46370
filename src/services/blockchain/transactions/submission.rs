use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{utils::format_ether, Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use tracing::info;

use super::ReceiptSummary;
use crate::error::{log_failure, RelayError, Result};
use crate::services::blockchain::contracts::IPriceConsumer;
use crate::services::blockchain::UpdateChain;
use crate::services::oracle::UpdatePayload;

/// Sends price updates to the consumer contract
#[derive(Clone)]
pub struct Submitter {
    chain: Arc<dyn UpdateChain>,
    contract: Address,
    gas_limit: u64,
}

impl Submitter {
    pub fn new(chain: Arc<dyn UpdateChain>, contract: Address, gas_limit: u64) -> Self {
        Self {
            chain,
            contract,
            gas_limit,
        }
    }

    /// `updatePrice(bytes[])` call paying exactly `fee`
    pub fn build_request(&self, payload: &UpdatePayload, fee: U256) -> TransactionRequest {
        let call = IPriceConsumer::updatePriceCall {
            updateData: payload.to_call_data(),
        };

        TransactionRequest::default()
            .with_from(self.chain.sender())
            .with_to(self.contract)
            .with_input(call.abi_encode())
            .with_value(fee)
            .with_gas_limit(self.gas_limit)
    }

    /// Submit the update and wait for confirmation
    ///
    /// Failures are classified and the matching hint is logged before the error is
    /// returned. There is no retry.
    pub async fn submit(&self, payload: &UpdatePayload, fee: U256) -> Result<ReceiptSummary> {
        let tx = self.build_request(payload, fee);
        info!(
            "Submitting price update to {} (fee {} ETH, gas limit {})",
            self.contract,
            format_ether(fee),
            self.gas_limit
        );

        match self.chain.send_and_confirm(tx).await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                let (hint, message) = log_failure("Price update", &e);
                Err(RelayError::Submission { hint, message })
            }
        }
    }
}
