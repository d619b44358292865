use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::Deserialize;

use super::ApplicationLayer;
use crate::data_link::Pdu;
use crate::error::{JbusError, Result};
use crate::network::{Command, Message, Registry};
use crate::physical::PhysicalLayer;
use crate::transport::FragmentBuffer;
use crate::types::{Config, Pgn};

/// Monitor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Receive timeout handed to the physical layer
    pub timeout_ms: u32,
    /// Fail on PGNs without an interpreter instead of skipping them
    pub strict: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            strict: false,
        }
    }
}

impl Config for MonitorConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(JbusError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Counters kept by a [`Monitor`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub frames: u64,
    pub messages: u64,
    pub skipped: u64,
    pub errors: u64,
}

/// Outcome of handing one PDU to the monitor
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Message(Message),
    /// Fragment stored, message not complete yet
    Pending,
    /// No interpreter for this PGN
    Skipped(Pgn),
}

/// Reads frames off a physical layer and turns them into typed messages
pub struct Monitor<'r, P: PhysicalLayer> {
    config: MonitorConfig,
    physical: P,
    registry: &'r Registry,
    buffers: HashMap<(Pgn, u8), FragmentBuffer>,
    stats: MonitorStats,
    is_open: bool,
}

impl<P: PhysicalLayer> Monitor<'static, P> {
    /// Creates a monitor over `physical` using the global registry
    pub fn with_physical(config: MonitorConfig, physical: P) -> Result<Self> {
        Self::with_registry(config, physical, Registry::global())
    }
}

impl<'r, P: PhysicalLayer> Monitor<'r, P> {
    pub fn with_registry(config: MonitorConfig, physical: P, registry: &'r Registry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            physical,
            registry,
            buffers: HashMap::new(),
            stats: MonitorStats::default(),
            is_open: false,
        })
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MonitorStats::default();
    }

    pub fn physical(&self) -> &P {
        &self.physical
    }

    pub fn physical_mut(&mut self) -> &mut P {
        &mut self.physical
    }

    /// Fragments held for incomplete multi-packet messages
    pub fn pending_fragments(&self) -> usize {
        self.buffers.values().map(FragmentBuffer::len).sum()
    }

    /// Routes one PDU to its interpreter.
    ///
    /// Multi-packet groups are buffered per PGN and source address until the
    /// last fragment arrives.
    pub fn dispatch(&mut self, pdu: Pdu) -> Result<Dispatch> {
        let registry = self.registry;
        let pgn = pdu.pgn();
        let interpreter = match registry.lookup_pdu(&pdu) {
            Ok(interpreter) => interpreter,
            Err(e) if self.config.strict => {
                self.stats.errors += 1;
                return Err(e);
            }
            Err(_) => {
                debug!("skipping PGN 0x{:04X} from 0x{:02X}", pgn, pdu.src_address);
                self.stats.skipped += 1;
                return Ok(Dispatch::Skipped(pgn));
            }
        };

        let converted = if interpreter.fragments() > 1 {
            let fragments = interpreter.fragments();
            let buffer = self
                .buffers
                .entry((pgn, pdu.src_address))
                .or_insert_with(|| FragmentBuffer::new(pgn, fragments));
            match buffer.push(pdu) {
                Ok(Some(complete)) => interpreter.convert(&complete),
                Ok(None) => {
                    trace!("{} fragment {}/{}", interpreter.name(), buffer.len(), fragments);
                    return Ok(Dispatch::Pending);
                }
                Err(e) => Err(e),
            }
        } else {
            interpreter.convert(&[pdu])
        };

        match converted {
            Ok(message) => {
                self.stats.messages += 1;
                Ok(Dispatch::Message(message))
            }
            Err(e) => {
                warn!("{} conversion failed: {}", interpreter.name(), e);
                self.stats.errors += 1;
                Err(e)
            }
        }
    }

    /// Receives one frame and dispatches it
    pub fn poll(&mut self) -> Result<Dispatch> {
        if !self.is_open {
            return Err(JbusError::NotInitialized);
        }
        let frame = self.physical.receive_frame()?;
        self.stats.frames += 1;
        let pdu = Pdu::from_frame(&frame).map_err(|e| {
            self.stats.errors += 1;
            e
        })?;
        self.dispatch(pdu)
    }

    /// Polls until a complete message arrives; a receive timeout ends the wait
    pub fn next_message(&mut self) -> Result<Message> {
        loop {
            if let Dispatch::Message(message) = self.poll()? {
                return Ok(message);
            }
        }
    }

    /// Puts a composed command on the bus
    pub fn send_command(&mut self, command: &dyn Command) -> Result<()> {
        let pdu = command.to_pdu()?;
        self.send_request(&pdu)
    }
}

impl<'r, P: PhysicalLayer> ApplicationLayer for Monitor<'r, P> {
    type Config = MonitorConfig;
    type Request = Pdu;
    type Response = ();

    fn new(_config: Self::Config) -> Result<Self> {
        Err(JbusError::NotInitialized) // Requires physical layer
    }

    fn open(&mut self) -> Result<()> {
        if self.is_open {
            return Ok(());
        }
        self.physical.set_timeout(self.config.timeout_ms)?;
        self.physical.open()?;
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.is_open {
            return Ok(());
        }
        self.buffers.clear();
        self.physical.close()?;
        self.is_open = false;
        Ok(())
    }

    fn send_request(&mut self, request: &Self::Request) -> Result<Self::Response> {
        if !self.is_open {
            return Err(JbusError::NotInitialized);
        }
        debug!("sending PGN 0x{:04X} to the bus", request.pgn());
        self.physical.send_frame(&request.to_frame())
    }

    fn set_timeout(&mut self, timeout_ms: u32) -> Result<()> {
        if timeout_ms == 0 {
            return Err(JbusError::InvalidParameter);
        }
        self.config.timeout_ms = timeout_ms;
        self.physical.set_timeout(timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physical::MockPhysical;
    use crate::types::{Frame, Timestamp};

    fn frame(id: u32, data: &[u8]) -> Frame {
        Frame {
            id,
            data: data.to_vec(),
            timestamp: Timestamp::new(1, 2, 3, 4),
            is_extended: true,
        }
    }

    fn rcfg_frames(src: u8) -> Vec<Frame> {
        let id = 0x18FE_E100 | u32::from(src);
        (1..=3u8).map(|seq| frame(id, &[seq, 0, 0, 0, 0, 0, 0, 0])).collect()
    }

    #[test]
    fn dispatches_single_frame_messages() {
        let bus = MockPhysical::with_frames(vec![frame(0x0CF0_0400, &[0; 8])]);
        let mut monitor = Monitor::with_physical(MonitorConfig::default(), bus).unwrap();
        monitor.open().unwrap();
        let message = monitor.next_message().unwrap();
        assert_eq!(message.name(), "EEC1");
        assert_eq!(monitor.stats().frames, 1);
        assert_eq!(monitor.stats().messages, 1);
        assert!(matches!(monitor.poll(), Err(JbusError::Timeout)));
    }

    #[test]
    fn interleaved_sources_assemble_separately() {
        let a = rcfg_frames(0x10);
        let b = rcfg_frames(0x29);
        let frames = vec![
            a[0].clone(),
            b[0].clone(),
            a[1].clone(),
            b[1].clone(),
            a[2].clone(),
            b[2].clone(),
        ];
        let mut monitor =
            Monitor::with_physical(MonitorConfig::default(), MockPhysical::with_frames(frames))
                .unwrap();
        monitor.open().unwrap();

        assert_eq!(monitor.poll().unwrap(), Dispatch::Pending);
        assert_eq!(monitor.poll().unwrap(), Dispatch::Pending);
        assert_eq!(monitor.pending_fragments(), 2);
        assert_eq!(monitor.next_message().unwrap().name(), "RCFG");
        assert_eq!(monitor.next_message().unwrap().name(), "RCFG");
        assert_eq!(monitor.pending_fragments(), 0);
        assert_eq!(monitor.stats().messages, 2);
    }

    #[test]
    fn resynchronizes_after_joining_mid_message() {
        let id = 0x18FE_E110;
        let frames = [2u8, 3, 1, 2, 3, 1, 2, 3]
            .iter()
            .map(|seq| frame(id, &[*seq, 0, 0, 0, 0, 0, 0, 0]))
            .collect();
        let mut monitor =
            Monitor::with_physical(MonitorConfig::default(), MockPhysical::with_frames(frames))
                .unwrap();
        monitor.open().unwrap();

        let mut messages = Vec::new();
        for _ in 0..8 {
            if let Ok(Dispatch::Message(message)) = monitor.poll() {
                messages.push(message);
            }
        }
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|message| message.name() == "RCFG"));
        assert_eq!(monitor.stats().frames, 8);
        assert_eq!(monitor.stats().errors, 2);
        assert_eq!(monitor.pending_fragments(), 0);
    }

    #[test]
    fn unknown_pgns_are_skipped_unless_strict() {
        let frames = vec![frame(0x18FE_CA00, &[0; 8])];
        let mut monitor =
            Monitor::with_physical(MonitorConfig::default(), MockPhysical::with_frames(frames.clone()))
                .unwrap();
        monitor.open().unwrap();
        assert_eq!(monitor.poll().unwrap(), Dispatch::Skipped(0xFECA));
        assert_eq!(monitor.stats().skipped, 1);

        let strict = MonitorConfig {
            strict: true,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::with_physical(strict, MockPhysical::with_frames(frames)).unwrap();
        monitor.open().unwrap();
        assert!(matches!(monitor.poll(), Err(JbusError::UnsupportedPgn(0xFECA))));
        assert_eq!(monitor.stats().errors, 1);
    }

    #[test]
    fn standard_frames_are_rejected() {
        let mut standard = frame(0x123, &[0; 8]);
        standard.is_extended = false;
        let mut monitor =
            Monitor::with_physical(MonitorConfig::default(), MockPhysical::with_frames(vec![standard]))
                .unwrap();
        monitor.open().unwrap();
        assert!(matches!(monitor.poll(), Err(JbusError::InvalidFrame(_))));
        assert_eq!(monitor.stats().errors, 1);
    }

    #[test]
    fn requires_open() {
        let mut monitor =
            Monitor::with_physical(MonitorConfig::default(), MockPhysical::with_frames(Vec::new()))
                .unwrap();
        assert!(matches!(monitor.poll(), Err(JbusError::NotInitialized)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = MonitorConfig {
            timeout_ms: 0,
            strict: false,
        };
        assert!(Monitor::with_physical(config, MockPhysical::with_frames(Vec::new())).is_err());
    }
}
