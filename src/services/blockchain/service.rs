use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::info;

use super::contracts::IPyth;
use super::transactions::{confirmation, ReceiptSummary};
use super::UpdateChain;
use crate::error::{RelayError, Result};
use crate::services::oracle::UpdatePayload;

/// JSON-RPC backed chain client signing with a local private key
#[derive(Clone)]
pub struct EvmChain {
    provider: DynProvider,
    sender: Address,
    rpc_url: String,
}

impl std::fmt::Debug for EvmChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmChain")
            .field("rpc_url", &self.rpc_url)
            .field("sender", &self.sender)
            .finish()
    }
}

impl EvmChain {
    pub fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| RelayError::Chain(format!("Invalid private key: {}", e)))?;
        let sender = signer.address();

        let url: Url = rpc_url
            .parse()
            .map_err(|e| RelayError::Chain(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        // Recommended fillers supply nonce, gas price and chain id
        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect_http(url)
            .erased();

        info!("Chain client ready for {} (sender {})", rpc_url, sender);

        Ok(Self {
            provider,
            sender,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl UpdateChain for EvmChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn balance(&self, owner: Address) -> Result<U256> {
        self.provider
            .get_balance(owner)
            .await
            .map_err(|e| RelayError::Chain(format!("Failed to get balance: {}", e)))
    }

    async fn update_fee(&self, oracle: Address, payload: &UpdatePayload) -> Result<U256> {
        let oracle = IPyth::new(oracle, self.provider.clone());
        oracle
            .getUpdateFee(payload.to_call_data())
            .call()
            .await
            .map_err(|e| RelayError::Chain(format!("Failed to query update fee: {}", e)))
    }

    async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<ReceiptSummary> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(RelayError::chain)?;
        info!("Transaction sent: {}. Waiting for confirmation...", pending.tx_hash());

        let receipt = pending.get_receipt().await.map_err(RelayError::chain)?;
        confirmation::summarize(&receipt)
    }
}
