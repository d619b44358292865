use thiserror::Error;

use crate::types::Pgn;

#[derive(Debug, Error)]
pub enum JbusError {
    // Registry errors
    #[error("unsupported PGN 0x{0:04X}")]
    UnsupportedPgn(Pgn),
    #[error("unknown message name: {0}")]
    UnknownMessage(String),
    #[error("duplicate interpreter for PGN 0x{0:04X}")]
    DuplicatePgn(Pgn),

    // Text record errors
    #[error("malformed {name} record: {detail}")]
    MalformedRecord { name: String, detail: String },
    #[error("malformed {name} record: {found} fields, expected one of {expected:?}")]
    FieldCount {
        name: String,
        found: usize,
        expected: Vec<usize>,
    },

    // Frame and fragment errors
    #[error("fragment assembly failed for PGN 0x{pgn:04X}: {reason}")]
    Assembly { pgn: Pgn, reason: String },
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("{expected} interpreter cannot handle a {found} message")]
    MessageMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // Generic errors
    #[error("configuration error: {0}")]
    Config(String),
    #[error("Operation timed out")]
    Timeout,
    #[error("Component not initialized")]
    NotInitialized,
    #[error("Invalid parameter")]
    InvalidParameter,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JbusError {
    pub(crate) fn malformed(name: &str, detail: impl Into<String>) -> Self {
        JbusError::MalformedRecord {
            name: name.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn assembly(pgn: Pgn, reason: impl Into<String>) -> Self {
        JbusError::Assembly {
            pgn,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JbusError>;
