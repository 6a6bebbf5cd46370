// ABI of the oracle contract: https://docs.pyth.network/price-feeds/core/contract-addresses/evm

use alloy::sol;

sol!(
    #[sol(rpc)]
    interface IPyth {
        function getUpdateFee(bytes[] calldata updateData) external view returns (uint256 feeAmount);
    }
);

// Consumer contract; deployed with `constructor(address pyth)`
sol!(
    #[sol(rpc)]
    interface IPriceConsumer {
        function updatePrice(bytes[] calldata updateData) external payable;
    }
);

pub const CONSUMER_CONSTRUCTOR: &str = "constructor(address pyth)";
