//! EVM chain access: balance and fee queries, transaction submission.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

pub mod account_management;
pub mod contracts;
pub mod fee;
pub mod service;
pub mod transactions;

pub use account_management::{check_balance, BalanceStatus};
pub use fee::FeeCalculator;
pub use service::EvmChain;
pub use transactions::{ReceiptSummary, Submitter};

use crate::error::Result;
use crate::services::oracle::UpdatePayload;

/// Chain operations the relay depends on
#[async_trait]
pub trait UpdateChain: Send + Sync {
    /// Address transactions are signed with
    fn sender(&self) -> Address;

    async fn balance(&self, owner: Address) -> Result<U256>;

    /// Fee the oracle contract charges to accept `payload`
    async fn update_fee(&self, oracle: Address, payload: &UpdatePayload) -> Result<U256>;

    /// Send a transaction and wait for its receipt
    async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<ReceiptSummary>;
}
