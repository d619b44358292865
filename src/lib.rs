// OSI Layer modules
pub mod application; // Translator, monitor, JSON publishing
pub mod data_link; // J1939 PDU and CAN identifier
pub mod network; // J1939 message interpretation
pub mod physical; // Frame sources
pub mod transport; // Multi-packet assembly

// Common types and traits
pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use data_link::Pdu;
pub use error::{JbusError, Result};
pub use network::{Interpreter, J1939Message, Message, Registry};
pub use types::Timestamp;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_valid() {
        assert!(!VERSION.is_empty());
    }
}
