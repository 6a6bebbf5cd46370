pub mod config;
pub mod constants;
pub mod error;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::RelayError;
