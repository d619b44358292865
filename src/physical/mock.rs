use std::collections::VecDeque;

use serde::Deserialize;

use super::PhysicalLayer;
use crate::error::{JbusError, Result};
use crate::types::{Config, Frame};

/// Frame handler invoked for every sent frame; a returned frame is queued
/// for reception
pub type MockFrameHandler = Box<dyn Fn(&Frame) -> Option<Frame> + Send + Sync>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub timeout_ms: u32,
    /// Frames queued for reception when the mock is created
    #[serde(skip)]
    pub frames: Vec<Frame>,
}

impl Config for MockConfig {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory physical layer that replays queued frames
pub struct MockPhysical {
    config: MockConfig,
    rx_queue: VecDeque<Frame>,
    sent: Vec<Frame>,
    frame_handler: Option<MockFrameHandler>,
    is_open: bool,
}

impl MockPhysical {
    pub fn with_frames(frames: Vec<Frame>) -> Self {
        Self {
            config: MockConfig::default(),
            rx_queue: frames.into(),
            sent: Vec::new(),
            frame_handler: None,
            is_open: false,
        }
    }

    /// Mock that answers every sent frame with itself
    pub fn new_echo() -> Self {
        let mut mock = Self::with_frames(Vec::new());
        mock.set_frame_handler(Some(Box::new(|frame: &Frame| Some(frame.clone()))));
        mock
    }

    pub fn set_frame_handler(&mut self, handler: Option<MockFrameHandler>) {
        self.frame_handler = handler;
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.rx_queue.push_back(frame);
    }

    /// Frames passed to `send_frame`, oldest first
    pub fn sent_frames(&self) -> &[Frame] {
        &self.sent
    }

    pub fn pending(&self) -> usize {
        self.rx_queue.len()
    }

    pub fn timeout_ms(&self) -> u32 {
        self.config.timeout_ms
    }
}

impl PhysicalLayer for MockPhysical {
    type Config = MockConfig;

    fn new(config: Self::Config) -> Result<Self> {
        config.validate()?;
        let rx_queue = config.frames.iter().cloned().collect();
        Ok(Self {
            config,
            rx_queue,
            sent: Vec::new(),
            frame_handler: None,
            is_open: false,
        })
    }

    fn open(&mut self) -> Result<()> {
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.is_open = false;
        Ok(())
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        if !self.is_open {
            return Err(JbusError::NotInitialized);
        }
        self.sent.push(frame.clone());
        if let Some(handler) = &self.frame_handler {
            if let Some(reply) = handler(frame) {
                self.rx_queue.push_back(reply);
            }
        }
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Frame> {
        if !self.is_open {
            return Err(JbusError::NotInitialized);
        }
        self.rx_queue.pop_front().ok_or(JbusError::Timeout)
    }

    fn set_timeout(&mut self, timeout_ms: u32) -> Result<()> {
        self.config.timeout_ms = timeout_ms;
        Ok(())
    }
}
