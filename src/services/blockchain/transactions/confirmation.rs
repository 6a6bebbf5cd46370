use std::fmt;

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use tracing::{debug, info};

use crate::error::{RelayError, Result};

/// The parts of a receipt reported back to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl fmt::Display for ReceiptSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_number {
            Some(block) => write!(f, "{} (block {}, gas used {})", self.hash, block, self.gas_used),
            None => write!(f, "{} (pending block, gas used {})", self.hash, self.gas_used),
        }
    }
}

/// Turn a mined receipt into a summary, treating a failed status as a revert
pub fn summarize(receipt: &TransactionReceipt) -> Result<ReceiptSummary> {
    let summary = ReceiptSummary {
        hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    };
    debug!("Receipt for {}: status={}", summary.hash, receipt.status());

    if !receipt.status() {
        let block = summary
            .block_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(RelayError::Chain(format!(
            "Transaction {} execution reverted in block {}",
            summary.hash, block
        )));
    }

    info!("Transaction {} confirmed", summary);
    Ok(summary)
}
