//! Application layer: the stream drivers built on the J1939 core.
//!
//! - [`monitor`] reads frames from a [`crate::physical::PhysicalLayer`],
//!   reassembles multi-packet groups and dispatches them through the registry
//! - [`translate`] converts text records line by line, re-deriving the
//!   message type of raw `PDU` records
//! - [`publish`] renders messages through the key/value hook as JSON
//!
//! # Examples
//!
//! ```rust
//! use libjbus::application::translate::{Translator, TranslatorConfig};
//!
//! let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
//! let mut out = Vec::new();
//! translator
//!     .translate_line("PDU 10:00:00.000 6 0 0 0xFE 0xEE 0 8 90 0xFF 0xFF 0xFF 0xFF 0xFF 0xFF 0xFF", &mut out)
//!     .unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "ETEMP 10:00:00.000 50.00 -255.00 -255.00 -255.00 -255.00 -255.00\n"
//! );
//! ```

pub mod monitor;
pub mod publish;
pub mod translate;

use crate::error::Result;
use crate::types::Config;

pub use monitor::{Dispatch, Monitor, MonitorConfig, MonitorStats};
pub use publish::JsonEncoder;
pub use translate::{TranslateFlags, TranslateStats, Translator, TranslatorConfig};

/// Application layer trait implemented by components that own a bus
pub trait ApplicationLayer {
    type Config: Config;
    type Request;
    type Response;

    fn new(config: Self::Config) -> Result<Self>
    where
        Self: Sized;
    fn open(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn send_request(&mut self, request: &Self::Request) -> Result<Self::Response>;
    fn set_timeout(&mut self, timeout_ms: u32) -> Result<()>;
}
