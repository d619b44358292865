//! The contract every parameter group interpreter implements.
//!
//! A typed message type implements [`J1939Message`]: how to decode its
//! payload and how to enumerate its fields. [`Interp`] turns any such type
//! into an object-safe [`Interpreter`] that the registry stores by PGN. The
//! three text and key/value renderings (numeric line, labeled report,
//! published object) are all driven by the same field enumeration, so their
//! field order cannot drift apart.

use std::fmt::{self, Write as _};
use std::io::Write;
use std::marker::PhantomData;

use super::message::{Message, MessageVariant};
use crate::data_link::Pdu;
use crate::error::{JbusError, Result};
use crate::transport::assemble;
use crate::types::{Pgn, Timestamp};

/// PGN reported by the raw PDU interpreter; outside the 16-bit PGN space so it
/// never equals a received PDU's PGN
pub const PGN_UNINTERPRETED: Pgn = 0x1_0000;

/// Scaled reading "not available", as decoded from a 0xFF byte
pub const NOT_AVAILABLE_REAL: f64 = super::scaling::NOT_AVAILABLE;
/// 2-bit state "not available"
pub const STATE_NOT_AVAILABLE: u8 = 3;
/// 4-bit code "not available"
pub const NIBBLE_NOT_AVAILABLE: u8 = 0x0F;
/// Byte code or address "not available"
pub const CODE_NOT_AVAILABLE: u8 = 0xFF;

/// Layout generation of a numeric text record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    Current,
    Legacy,
}

/// A numeric record layout, identified by its field count (name and
/// timestamp tokens excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub version: SchemaVersion,
    pub fields: usize,
}

impl Schema {
    pub const fn current(fields: usize) -> Self {
        Self {
            version: SchemaVersion::Current,
            fields,
        }
    }

    pub const fn legacy(fields: usize) -> Self {
        Self {
            version: SchemaVersion::Legacy,
            fields,
        }
    }
}

/// Receives a message's fields in wire order
pub trait FieldVisitor {
    fn int(&mut self, name: &'static str, label: &'static str, value: i64);
    fn real(&mut self, name: &'static str, label: &'static str, value: f64, precision: usize);
    fn reals(&mut self, name: &'static str, label: &'static str, values: &[f64], precision: usize);
}

/// Key/value sink for the publish hook
pub trait Encoder {
    fn start_object(&mut self, name: &str);
    fn end_object(&mut self);
    fn add_int(&mut self, key: &str, value: i64);
    fn add_real(&mut self, key: &str, value: f64);
}

/// A decoded parameter group
pub trait J1939Message:
    MessageVariant + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// PGN the interpreter is registered under by default
    const PGN: Pgn;
    /// Record tag in the text and key/value formats
    const NAME: &'static str;
    /// Number of PDUs carrying one message
    const FRAGMENTS: usize = 1;
    /// Accepted numeric layouts, current first
    const SCHEMAS: &'static [Schema];

    fn timestamp(&self) -> Timestamp;

    fn pgn(&self) -> Pgn {
        Self::PGN
    }

    /// Decodes `data`, which holds at least `8` bytes for single frame
    /// messages and `7 * FRAGMENTS` assembled bytes otherwise.
    fn decode(pdu: &Pdu, data: &[u8]) -> Self;

    /// Enumerates the fields in numeric record order
    fn visit(&self, visitor: &mut dyn FieldVisitor);

    /// Rebuilds a message from the fields of a numeric record
    fn read(timestamp: Timestamp, version: SchemaVersion, fields: &mut FieldReader<'_>)
        -> Result<Self>;
}

/// Per-PGN interpreter as stored in the registry
pub trait Interpreter: Send + Sync {
    fn pgn(&self) -> Pgn;

    fn name(&self) -> &'static str;

    fn fragments(&self) -> usize {
        1
    }

    /// Exact PGN match, no masking
    fn is_type(&self, pdu: &Pdu) -> bool {
        pdu.pgn() == self.pgn()
    }

    fn convert(&self, pdus: &[Pdu]) -> Result<Message>;

    fn print(&self, message: &Message, out: &mut dyn Write, numeric: bool) -> Result<()>;

    fn import(&self, tokens: &[&str]) -> Result<Message>;

    fn publish(&self, message: &Message, encoder: &mut dyn Encoder) -> Result<()>;
}

/// Registry adapter for a [`J1939Message`] type
pub struct Interp<M> {
    pgn: Pgn,
    marker: PhantomData<fn() -> M>,
}

impl<M: J1939Message> Interp<M> {
    pub fn new() -> Self {
        Self::at(M::PGN)
    }

    /// Interpreter answering to a PGN other than the default, e.g. a PDU1
    /// message addressed to another destination
    pub fn at(pgn: Pgn) -> Self {
        Self {
            pgn,
            marker: PhantomData,
        }
    }

    fn typed<'m>(&self, message: &'m Message) -> Result<&'m M> {
        M::from_message(message).ok_or(JbusError::MessageMismatch {
            expected: M::NAME,
            found: message.name(),
        })
    }
}

impl<M: J1939Message> Default for Interp<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: J1939Message> Interpreter for Interp<M> {
    fn pgn(&self) -> Pgn {
        self.pgn
    }

    fn name(&self) -> &'static str {
        M::NAME
    }

    fn fragments(&self) -> usize {
        M::FRAGMENTS
    }

    fn convert(&self, pdus: &[Pdu]) -> Result<Message> {
        let first = pdus
            .first()
            .ok_or_else(|| JbusError::assembly(self.pgn, "no fragments"))?;
        if !self.is_type(first) {
            return Err(JbusError::InvalidFrame(format!(
                "PGN 0x{:04X} is not {} (0x{:04X})",
                first.pgn(),
                M::NAME,
                self.pgn
            )));
        }

        let message = if M::FRAGMENTS == 1 {
            if pdus.len() != 1 {
                return Err(JbusError::assembly(
                    self.pgn,
                    format!("expected 1 fragment, got {}", pdus.len()),
                ));
            }
            M::decode(first, &first.payload())
        } else {
            let data = assemble(pdus, M::FRAGMENTS)?;
            M::decode(first, &data)
        };
        Ok(message.into_message())
    }

    fn print(&self, message: &Message, out: &mut dyn Write, numeric: bool) -> Result<()> {
        print_message(self.typed(message)?, out, numeric)
    }

    fn import(&self, tokens: &[&str]) -> Result<Message> {
        import_message::<M>(tokens).map(MessageVariant::into_message)
    }

    fn publish(&self, message: &Message, encoder: &mut dyn Encoder) -> Result<()> {
        publish_message(self.typed(message)?, encoder);
        Ok(())
    }
}

/// Writes `message` as a numeric line or a labeled report
pub fn print_message<M: J1939Message>(message: &M, out: &mut dyn Write, numeric: bool) -> Result<()> {
    if numeric {
        let mut line = NumericLine::new(M::NAME, message.timestamp());
        message.visit(&mut line);
        writeln!(out, "{}", line.text)?;
    } else {
        let mut report = LabeledReport::new(M::NAME, message.pgn(), message.timestamp());
        message.visit(&mut report);
        out.write_all(report.text.as_bytes())?;
    }
    Ok(())
}

/// Parses a tokenized numeric record, picking the layout by field count
pub fn import_message<M: J1939Message>(tokens: &[&str]) -> Result<M> {
    let (tag, rest) = tokens
        .split_first()
        .ok_or_else(|| JbusError::malformed(M::NAME, "empty record"))?;
    if *tag != M::NAME {
        return Err(JbusError::malformed(
            M::NAME,
            format!("record is tagged {}", tag),
        ));
    }
    let (stamp, fields) = rest
        .split_first()
        .ok_or_else(|| JbusError::malformed(M::NAME, "missing timestamp"))?;
    let timestamp = stamp
        .parse::<Timestamp>()
        .map_err(|_| JbusError::malformed(M::NAME, format!("bad timestamp {:?}", stamp)))?;

    let schema = M::SCHEMAS
        .iter()
        .find(|schema| schema.fields == fields.len())
        .ok_or_else(|| JbusError::FieldCount {
            name: M::NAME.to_string(),
            found: fields.len(),
            expected: M::SCHEMAS.iter().map(|schema| schema.fields).collect(),
        })?;

    let mut reader = FieldReader::new(M::NAME, fields);
    let message = M::read(timestamp, schema.version, &mut reader)?;
    reader.finish()?;
    Ok(message)
}

/// Emits `message` as an `@NAME` object with a timestamp sub-object
pub fn publish_message<M: J1939Message>(message: &M, encoder: &mut dyn Encoder) {
    encoder.start_object(&format!("@{}", M::NAME));

    let ts = message.timestamp();
    encoder.start_object("timestamp");
    encoder.add_int("hour", ts.hour.into());
    encoder.add_int("minute", ts.minute.into());
    encoder.add_int("second", ts.second.into());
    encoder.add_int("millisecond", ts.millisecond.into());
    encoder.end_object();

    message.visit(&mut PublishedFields { encoder });
    encoder.end_object();
}

struct NumericLine {
    text: String,
}

impl NumericLine {
    fn new(name: &str, timestamp: Timestamp) -> Self {
        Self {
            text: format!("{} {}", name, timestamp),
        }
    }
}

impl FieldVisitor for NumericLine {
    fn int(&mut self, _name: &'static str, _label: &'static str, value: i64) {
        let _ = write!(self.text, " {}", value);
    }

    fn real(&mut self, _name: &'static str, _label: &'static str, value: f64, precision: usize) {
        let _ = write!(self.text, " {:.*}", precision, value);
    }

    fn reals(&mut self, _name: &'static str, _label: &'static str, values: &[f64], precision: usize) {
        for value in values {
            let _ = write!(self.text, " {:.*}", precision, value);
        }
    }
}

struct LabeledReport {
    text: String,
}

impl LabeledReport {
    fn new(name: &str, pgn: Pgn, timestamp: Timestamp) -> Self {
        Self {
            text: format!("{} (PGN 0x{:04X}) {}\n", name, pgn, timestamp),
        }
    }
}

impl FieldVisitor for LabeledReport {
    fn int(&mut self, _name: &'static str, label: &'static str, value: i64) {
        let _ = writeln!(self.text, "    {:<44} {}", label, value);
    }

    fn real(&mut self, _name: &'static str, label: &'static str, value: f64, precision: usize) {
        let _ = writeln!(self.text, "    {:<44} {:.*}", label, precision, value);
    }

    fn reals(&mut self, _name: &'static str, label: &'static str, values: &[f64], precision: usize) {
        for (index, value) in values.iter().enumerate() {
            let indexed = format!("{} [{}]", label, index);
            let _ = writeln!(self.text, "    {:<44} {:.*}", indexed, precision, value);
        }
    }
}

struct PublishedFields<'e> {
    encoder: &'e mut dyn Encoder,
}

impl FieldVisitor for PublishedFields<'_> {
    fn int(&mut self, name: &'static str, _label: &'static str, value: i64) {
        self.encoder.add_int(name, value);
    }

    fn real(&mut self, name: &'static str, _label: &'static str, value: f64, _precision: usize) {
        self.encoder.add_real(name, value);
    }

    fn reals(&mut self, name: &'static str, _label: &'static str, values: &[f64], _precision: usize) {
        self.encoder.start_object(name);
        for (index, value) in values.iter().enumerate() {
            self.encoder.add_real(&index.to_string(), *value);
        }
        self.encoder.end_object();
    }
}

/// Sequential reader over the field tokens of one numeric record
pub struct FieldReader<'a> {
    name: &'static str,
    tokens: &'a [&'a str],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(name: &'static str, tokens: &'a [&'a str]) -> Self {
        Self {
            name,
            tokens,
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Result<&'a str> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| JbusError::malformed(self.name, format!("missing field {}", self.pos)))?;
        self.pos += 1;
        Ok(token)
    }

    /// Integer field, decimal or `0x` hexadecimal
    pub fn int<T: TryFrom<i64>>(&mut self) -> Result<T> {
        let token = self.next_token()?;
        let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(hex) => i64::from_str_radix(hex, 16).ok(),
            None => token.parse::<i64>().ok(),
        };
        parsed
            .and_then(|value| T::try_from(value).ok())
            .ok_or_else(|| {
                JbusError::malformed(
                    self.name,
                    format!("field {} is not a valid integer: {:?}", self.pos - 1, token),
                )
            })
    }

    pub fn real(&mut self) -> Result<f64> {
        let token = self.next_token()?;
        token.parse::<f64>().map_err(|_| {
            JbusError::malformed(
                self.name,
                format!("field {} is not a number: {:?}", self.pos - 1, token),
            )
        })
    }

    pub fn reals<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut values = [0.0; N];
        for value in values.iter_mut() {
            *value = self.real()?;
        }
        Ok(values)
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn finish(&self) -> Result<()> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(JbusError::malformed(
                self.name,
                format!("{} unread fields", self.remaining()),
            ))
        }
    }
}
