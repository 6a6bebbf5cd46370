use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::error::Result;
use crate::services::blockchain::{
    check_balance, BalanceStatus, FeeCalculator, ReceiptSummary, Submitter, UpdateChain,
};
use crate::services::oracle::{FeedId, OracleClient, PriceUpdate};

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub balance: BalanceStatus,
    pub update: PriceUpdate,
    pub fee: U256,
    pub receipt: ReceiptSummary,
}

/// Fetch → fee → submit, in that order
#[derive(Clone)]
pub struct PriceRelay {
    oracle: OracleClient,
    chain: Arc<dyn UpdateChain>,
    fees: FeeCalculator,
    submitter: Submitter,
    feed_id: FeedId,
}

impl PriceRelay {
    pub fn new(
        oracle: OracleClient,
        chain: Arc<dyn UpdateChain>,
        oracle_contract: Address,
        consumer_contract: Address,
        gas_limit: u64,
        feed_id: FeedId,
    ) -> Self {
        Self {
            oracle,
            fees: FeeCalculator::new(chain.clone(), oracle_contract),
            submitter: Submitter::new(chain.clone(), consumer_contract, gas_limit),
            chain,
            feed_id,
        }
    }

    pub async fn run(&self) -> Result<RelayOutcome> {
        let balance = check_balance(self.chain.as_ref()).await?;

        info!("Fetching latest price update for {}", self.feed_id);
        let update = self.oracle.fetch_update(&self.feed_id).await?;
        let published = update
            .observation
            .publish_datetime()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| update.observation.publish_time.to_string());
        info!(
            "Current price: {} (published {})",
            update.observation.decoded_price(),
            published
        );

        let fee = self.fees.update_fee(&update.payload).await?;
        let receipt = self.submitter.submit(&update.payload, fee).await?;

        info!(
            "✅ Price updated in block {} (gas used {}, tx {})",
            receipt
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            receipt.gas_used,
            receipt.hash
        );

        Ok(RelayOutcome {
            balance,
            update,
            fee,
            receipt,
        })
    }
}
