use alloy::primitives::{utils::format_ether, Address, U256};
use tracing::{info, warn};

use super::UpdateChain;
use crate::constants::chain::LOW_BALANCE_THRESHOLD_WEI;
use crate::error::Result;

/// Wallet balance at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceStatus {
    pub address: Address,
    pub balance: U256,
    /// Below the low-balance threshold
    pub low: bool,
}

pub fn low_balance_threshold() -> U256 {
    U256::from(LOW_BALANCE_THRESHOLD_WEI)
}

/// Read the sender's balance; a low balance is only a warning
pub async fn check_balance(chain: &dyn UpdateChain) -> Result<BalanceStatus> {
    let address = chain.sender();
    let balance = chain.balance(address).await?;
    let low = balance < low_balance_threshold();

    info!("Wallet {} balance: {} ETH", address, format_ether(balance));
    if low {
        warn!(
            "⚠️ Low balance: {} ETH is below {} ETH. The update transaction may fail",
            format_ether(balance),
            format_ether(low_balance_threshold())
        );
    }

    Ok(BalanceStatus {
        address,
        balance,
        low,
    })
}
