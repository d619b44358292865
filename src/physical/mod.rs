//! Physical layer: raw CAN frame sources and sinks.
//!
//! The J1939 core never talks to a CAN controller directly. A driver for a
//! real interface implements [`PhysicalLayer`] and hands extended frames to
//! the [`crate::application::monitor::Monitor`]. [`MockPhysical`] replays
//! queued frames and records what is sent, for tests and offline replay.
//!
//! # Examples
//!
//! ```rust
//! use libjbus::physical::{MockPhysical, PhysicalLayer};
//! use libjbus::types::Frame;
//!
//! let mut bus = MockPhysical::with_frames(vec![Frame::default()]);
//! bus.open().unwrap();
//! assert!(bus.receive_frame().is_ok());
//! assert!(bus.receive_frame().is_err());
//! ```

pub mod mock;

pub use mock::{MockConfig, MockPhysical};

use crate::error::Result;
use crate::types::{Config, Frame};

/// Frame-level interface a CAN driver implements
pub trait PhysicalLayer: Send + Sync {
    type Config: Config;

    fn new(config: Self::Config) -> Result<Self>
    where
        Self: Sized;
    fn open(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn send_frame(&mut self, frame: &Frame) -> Result<()>;
    /// Next received frame; `JbusError::Timeout` when none arrives in time
    fn receive_frame(&mut self) -> Result<Frame>;
    fn set_timeout(&mut self, timeout_ms: u32) -> Result<()>;
}
