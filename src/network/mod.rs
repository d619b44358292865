//! J1939 network layer: parameter group interpretation.
//!
//! Received PDUs are dispatched by PGN through a [`Registry`] of
//! [`Interpreter`]s, each producing one variant of the [`Message`] sum type.
//! Messages print as numeric text records or labeled reports, import back
//! from numeric records, and publish into a key/value [`Encoder`].
//!
//! # Examples
//!
//! ```
//! use libjbus::data_link::Pdu;
//! use libjbus::network::{Message, Registry};
//! use libjbus::types::Timestamp;
//!
//! let pdu = Pdu::new(Timestamp::new(8, 0, 0, 0), 6, 0xF0, 0x01, 0x0B, &[0; 8]).unwrap();
//! let message = Registry::global().convert(&[pdu]).unwrap();
//! assert_eq!(message.name(), "EBC1");
//!
//! let mut line = Vec::new();
//! message.print(&mut line, true).unwrap();
//! let text = String::from_utf8(line).unwrap();
//! let tokens: Vec<&str> = text.split_whitespace().collect();
//! let imported: Message = Registry::global().import(&tokens).unwrap();
//! assert_eq!(imported, message);
//! ```

pub mod bits;
pub mod interpreter;
pub mod message;
pub mod messages;
pub mod registry;
pub mod scaling;

pub use interpreter::{
    Encoder, FieldReader, FieldVisitor, Interp, Interpreter, J1939Message, Schema, SchemaVersion,
    PGN_UNINTERPRETED,
};
pub use message::{Message, MessageVariant};
pub use messages::Command;
pub use registry::Registry;
