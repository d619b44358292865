use std::io::Write;

use crate::data_link::{Pdu, PDU_MAX_BYTES};
use crate::error::{JbusError, Result};
use crate::network::interpreter::{
    import_message, print_message, publish_message, Encoder, FieldReader, FieldVisitor,
    Interpreter, J1939Message, Schema, SchemaVersion, PGN_UNINTERPRETED,
};
use crate::network::message::{Message, MessageVariant};
use crate::types::{Pgn, Timestamp};

/// Priority assumed for legacy records, which do not carry one
const LEGACY_PRIORITY: u8 = 6;

const DATA_FIELDS: [&str; PDU_MAX_BYTES] = [
    "data0", "data1", "data2", "data3", "data4", "data5", "data6", "data7",
];

impl J1939Message for Pdu {
    const PGN: Pgn = PGN_UNINTERPRETED;
    const NAME: &'static str = "PDU";
    const SCHEMAS: &'static [Schema] = &[Schema::current(15), Schema::legacy(11)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn pgn(&self) -> Pgn {
        Pdu::pgn(self)
    }

    fn decode(pdu: &Pdu, _data: &[u8]) -> Self {
        *pdu
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("priority", "Priority", self.priority.into());
        v.int("reserved", "Reserved", self.reserved.into());
        v.int("data_page", "Data page", self.data_page.into());
        v.int("pdu_format", "PDU format", self.pdu_format.into());
        v.int("pdu_specific", "PDU specific", self.pdu_specific.into());
        v.int("src_address", "Source address", self.src_address.into());
        v.int("num_bytes", "Number of data bytes", self.num_bytes.into());
        for (name, byte) in DATA_FIELDS.iter().zip(self.data.iter()) {
            v.int(name, name, (*byte).into());
        }
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let mut pdu = Pdu {
            timestamp,
            ..Pdu::default()
        };
        match version {
            SchemaVersion::Current => {
                pdu.priority = f.int()?;
                pdu.reserved = f.int()?;
                pdu.data_page = f.int()?;
                pdu.pdu_format = f.int()?;
                pdu.pdu_specific = f.int()?;
                pdu.src_address = f.int()?;
                pdu.num_bytes = f.int()?;
            }
            SchemaVersion::Legacy => {
                pdu.priority = LEGACY_PRIORITY;
                pdu.pdu_format = f.int()?;
                pdu.pdu_specific = f.int()?;
                pdu.src_address = f.int()?;
                pdu.num_bytes = PDU_MAX_BYTES as u8;
            }
        }
        if pdu.priority > 7 || pdu.reserved > 1 || pdu.data_page > 1 {
            return Err(JbusError::malformed(Self::NAME, "header field out of range"));
        }
        if usize::from(pdu.num_bytes) > PDU_MAX_BYTES {
            return Err(JbusError::malformed(
                Self::NAME,
                format!("num_bytes {} exceeds {}", pdu.num_bytes, PDU_MAX_BYTES),
            ));
        }
        for byte in pdu.data.iter_mut() {
            *byte = f.int()?;
        }
        Ok(pdu)
    }
}

/// Fallback interpreter that passes PDUs through unchanged.
///
/// It claims no PGN: its own PGN is the uninterpreted marker, so
/// [`Interpreter::is_type`] never matches a received PDU.
#[derive(Debug, Default, Clone, Copy)]
pub struct PduInterpreter;

impl Interpreter for PduInterpreter {
    fn pgn(&self) -> Pgn {
        PGN_UNINTERPRETED
    }

    fn name(&self) -> &'static str {
        Pdu::NAME
    }

    fn convert(&self, pdus: &[Pdu]) -> Result<Message> {
        match pdus {
            [pdu] => Ok(Message::Pdu(*pdu)),
            _ => Err(JbusError::assembly(
                pdus.first().map(Pdu::pgn).unwrap_or(PGN_UNINTERPRETED),
                format!("expected 1 fragment, got {}", pdus.len()),
            )),
        }
    }

    fn print(&self, message: &Message, out: &mut dyn Write, numeric: bool) -> Result<()> {
        let pdu = Pdu::from_message(message).ok_or(JbusError::MessageMismatch {
            expected: Pdu::NAME,
            found: message.name(),
        })?;
        print_message(pdu, out, numeric)
    }

    fn import(&self, tokens: &[&str]) -> Result<Message> {
        import_message::<Pdu>(tokens).map(Message::Pdu)
    }

    fn publish(&self, message: &Message, encoder: &mut dyn Encoder) -> Result<()> {
        let pdu = Pdu::from_message(message).ok_or(JbusError::MessageMismatch {
            expected: Pdu::NAME,
            found: message.name(),
        })?;
        publish_message(pdu, encoder);
        Ok(())
    }
}
