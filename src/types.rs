use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{JbusError, Result};

/// CAN ID type
pub type CanId = u32;

/// Parameter Group Number, `(pdu_format << 8) | pdu_specific`
pub type Pgn = u32;

/// Generic frame data type
pub type FrameData = Vec<u8>;

/// Wall-clock time of day attached to every PDU and typed message.
///
/// Rendered as `HH:MM:SS.mmm` in the text wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl Timestamp {
    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Current local time of day
    pub fn now() -> Self {
        chrono::Local::now().time().into()
    }
}

impl From<NaiveTime> for Timestamp {
    fn from(time: NaiveTime) -> Self {
        // leap seconds report nanoseconds past 1e9
        let millisecond = (time.nanosecond() / 1_000_000).min(999) as u16;
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            millisecond,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

impl FromStr for Timestamp {
    type Err = JbusError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
            .map(Timestamp::from)
            .map_err(|e| JbusError::malformed("timestamp", format!("{:?}: {}", s, e)))
    }
}

/// Raw CAN frame as delivered by a driver
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: CanId,
    pub data: FrameData,
    pub timestamp: Timestamp,
    pub is_extended: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            id: 0,
            data: Vec::new(),
            timestamp: Timestamp::default(),
            is_extended: true,
        }
    }
}

/// Configuration trait that must be implemented by all component configurations
pub trait Config: Send + Sync {
    fn validate(&self) -> crate::error::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_display_pads_fields() {
        let ts = Timestamp::new(7, 5, 3, 9);
        assert_eq!(ts.to_string(), "07:05:03.009");
    }

    #[test]
    fn timestamp_parses_its_own_output() {
        let ts = Timestamp::new(23, 59, 58, 123);
        let parsed: Timestamp = ts.to_string().parse().unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!("12:xx:00.000".parse::<Timestamp>().is_err());
        assert!("".parse::<Timestamp>().is_err());
    }
}
