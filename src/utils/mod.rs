// Utility functions
// Hex/base64 encoding helpers shared by the oracle and chain services.

pub mod encoding;

pub use encoding::{decode_base64, decode_hex, to_prefixed_hex};
