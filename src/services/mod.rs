// Business logic services
// Oracle client, chain access, relay workflow, price monitor.

pub mod blockchain;
pub mod deployment;
pub mod oracle;
pub mod price_monitor;
pub mod relay;

pub use blockchain::{EvmChain, FeeCalculator, Submitter, UpdateChain};
pub use oracle::{OracleClient, OracleStrategy};
pub use price_monitor::{MonitorReport, PriceMonitor, PriceMonitorConfig};
pub use relay::{PriceRelay, RelayOutcome};
