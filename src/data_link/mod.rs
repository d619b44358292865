//! Data link layer: the J1939 protocol data unit.
//!
//! A [`Pdu`] is one received CAN frame with its 29-bit identifier split into
//! the J1939 header fields. The PGN is always derived from the PDU format and
//! PDU specific bytes, never stored.
//!
//! # Examples
//!
//! ```rust
//! use libjbus::data_link::Pdu;
//! use libjbus::types::Timestamp;
//!
//! let pdu = Pdu::new(Timestamp::default(), 3, 0xF0, 0x04, 0x00, &[0xFF; 8]).unwrap();
//! assert_eq!(pdu.pgn(), 0xF004);
//! assert_eq!(pdu.can_id(), 0x0CF00400);
//! ```

use crate::error::{JbusError, Result};
use crate::types::{CanId, Frame, Pgn, Timestamp};

/// Maximum number of payload bytes in a single PDU
pub const PDU_MAX_BYTES: usize = 8;

/// 29-bit extended identifier mask
pub const CAN_ID_MASK: CanId = 0x1FFF_FFFF;

/// Payload filler for bytes that were not transmitted
pub const NOT_TRANSMITTED: u8 = 0xFF;

// Bit offsets of the header fields inside the extended CAN identifier
const PRIORITY_SHIFT: u32 = 26;
const RESERVED_SHIFT: u32 = 25;
const DATA_PAGE_SHIFT: u32 = 24;
const PDU_FORMAT_SHIFT: u32 = 16;
const PDU_SPECIFIC_SHIFT: u32 = 8;

/// J1939 protocol data unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pdu {
    pub timestamp: Timestamp,
    pub priority: u8,
    pub reserved: u8,
    pub data_page: u8,
    pub pdu_format: u8,
    pub pdu_specific: u8,
    pub src_address: u8,
    pub num_bytes: u8,
    pub data: [u8; PDU_MAX_BYTES],
}

impl Pdu {
    /// Creates a PDU with reserved and data page bits cleared.
    ///
    /// Fails when more than eight payload bytes are supplied or the priority
    /// does not fit in three bits.
    pub fn new(
        timestamp: Timestamp,
        priority: u8,
        pdu_format: u8,
        pdu_specific: u8,
        src_address: u8,
        payload: &[u8],
    ) -> Result<Self> {
        if priority > 7 {
            return Err(JbusError::InvalidParameter);
        }
        let mut pdu = Self {
            timestamp,
            priority,
            pdu_format,
            pdu_specific,
            src_address,
            ..Self::default()
        };
        pdu.set_payload(payload)?;
        Ok(pdu)
    }

    /// Parameter Group Number
    pub fn pgn(&self) -> Pgn {
        (Pgn::from(self.pdu_format) << 8) | Pgn::from(self.pdu_specific)
    }

    /// PDU2 (broadcast) format
    pub fn is_broadcast(&self) -> bool {
        self.pdu_format >= 0xF0
    }

    /// Destination address carried in the PDU specific byte of PDU1 frames
    pub fn destination_address(&self) -> Option<u8> {
        if self.is_broadcast() {
            None
        } else {
            Some(self.pdu_specific)
        }
    }

    /// Transmitted payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data[..usize::from(self.num_bytes.min(PDU_MAX_BYTES as u8))]
    }

    /// Full eight byte payload; bytes past `num_bytes` read as not transmitted
    pub fn payload(&self) -> [u8; PDU_MAX_BYTES] {
        let mut payload = [NOT_TRANSMITTED; PDU_MAX_BYTES];
        let bytes = self.bytes();
        payload[..bytes.len()].copy_from_slice(bytes);
        payload
    }

    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > PDU_MAX_BYTES {
            return Err(JbusError::InvalidFrame(format!(
                "{} data bytes, at most {} allowed",
                payload.len(),
                PDU_MAX_BYTES
            )));
        }
        self.data = [NOT_TRANSMITTED; PDU_MAX_BYTES];
        self.data[..payload.len()].copy_from_slice(payload);
        self.num_bytes = payload.len() as u8;
        Ok(())
    }

    /// 29-bit extended CAN identifier built from the header fields
    pub fn can_id(&self) -> CanId {
        ((CanId::from(self.priority) & 0x7) << PRIORITY_SHIFT)
            | ((CanId::from(self.reserved) & 0x1) << RESERVED_SHIFT)
            | ((CanId::from(self.data_page) & 0x1) << DATA_PAGE_SHIFT)
            | (CanId::from(self.pdu_format) << PDU_FORMAT_SHIFT)
            | (CanId::from(self.pdu_specific) << PDU_SPECIFIC_SHIFT)
            | CanId::from(self.src_address)
    }

    /// Splits an extended CAN identifier into the header fields
    pub fn set_can_id(&mut self, id: CanId) {
        let id = id & CAN_ID_MASK;
        self.priority = ((id >> PRIORITY_SHIFT) & 0x7) as u8;
        self.reserved = ((id >> RESERVED_SHIFT) & 0x1) as u8;
        self.data_page = ((id >> DATA_PAGE_SHIFT) & 0x1) as u8;
        self.pdu_format = ((id >> PDU_FORMAT_SHIFT) & 0xFF) as u8;
        self.pdu_specific = ((id >> PDU_SPECIFIC_SHIFT) & 0xFF) as u8;
        self.src_address = (id & 0xFF) as u8;
    }

    pub fn from_can_id(id: CanId, timestamp: Timestamp, payload: &[u8]) -> Result<Self> {
        let mut pdu = Self {
            timestamp,
            ..Self::default()
        };
        pdu.set_can_id(id);
        pdu.set_payload(payload)?;
        Ok(pdu)
    }

    pub fn from_frame(frame: &Frame) -> Result<Self> {
        if !frame.is_extended {
            return Err(JbusError::InvalidFrame("Not an extended frame".into()));
        }
        Self::from_can_id(frame.id, frame.timestamp, &frame.data)
    }

    pub fn to_frame(&self) -> Frame {
        Frame {
            id: self.can_id(),
            data: self.bytes().to_vec(),
            timestamp: self.timestamp,
            is_extended: true,
        }
    }
}
