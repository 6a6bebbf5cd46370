//! Application constants and default configuration values.
//!
//! Defaults here are used when the corresponding environment variable is unset.

/// Oracle service constants
pub mod oracle {
    /// Public Hermes endpoint
    pub const DEFAULT_HERMES_URL: &str = "https://hermes.pyth.network";

    /// ETH/USD price feed id
    pub const DEFAULT_PRICE_FEED_ID: &str =
        "0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace";

    /// Pyth contract address shared by most EVM testnets
    pub const DEFAULT_PYTH_CONTRACT_ADDRESS: &str = "0xA2aa501b19aff244D90cc15a4Cf739D2725B5729";

    /// HTTP request timeout in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Native latest-update endpoint
    pub const LATEST_UPDATES_PATH: &str = "/v2/updates/price/latest";

    /// Native server-sent-events endpoint
    pub const STREAM_UPDATES_PATH: &str = "/v2/updates/price/stream";

    /// Legacy REST endpoint for decoded price feeds
    pub const LATEST_PRICE_FEEDS_PATH: &str = "/api/latest_price_feeds";

    /// Legacy REST endpoint for raw signed attestations
    pub const LATEST_VAAS_PATH: &str = "/api/latest_vaas";
}

/// Transaction constants
pub mod chain {
    /// Gas ceiling for the update transaction
    pub const DEFAULT_GAS_LIMIT: u64 = 500_000;

    /// Balance below which a warning is emitted (0.01 ether, in wei)
    pub const LOW_BALANCE_THRESHOLD_WEI: u64 = 10_000_000_000_000_000;
}

/// Price monitor constants
pub mod monitor {
    pub const DEFAULT_DURATION_SECS: u64 = 30;

    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
}
