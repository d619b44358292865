use log::debug;

use crate::data_link::Pdu;
use crate::error::{JbusError, Result};
use crate::types::Pgn;

/// Payload bytes carried by one fragment after its sequence number
pub const FRAGMENT_DATA_BYTES: usize = 7;

/// Sequence number of the first fragment of a multi-packet message
pub const FIRST_SEQUENCE: u8 = 1;

/// Joins the fragments of a multi-packet message into one data buffer.
///
/// Byte `n` of the result is payload byte `n % 7 + 1` of fragment `n / 7`;
/// byte 0 of every fragment is its sequence number and is dropped. The
/// fragments must all carry the same PGN, there must be exactly `expected`
/// of them, and their sequence numbers must count up by one.
pub fn assemble(fragments: &[Pdu], expected: usize) -> Result<Vec<u8>> {
    let first = fragments
        .first()
        .ok_or_else(|| JbusError::assembly(0, "no fragments"))?;
    let pgn = first.pgn();

    if fragments.len() != expected {
        return Err(JbusError::assembly(
            pgn,
            format!("expected {} fragments, got {}", expected, fragments.len()),
        ));
    }

    for (index, fragment) in fragments.iter().enumerate() {
        check_fragment(pgn, first, index, fragment)?;
    }

    let mut data = Vec::with_capacity(expected * FRAGMENT_DATA_BYTES);
    for fragment in fragments {
        data.extend_from_slice(&fragment.payload()[1..]);
    }
    Ok(data)
}

fn check_fragment(pgn: Pgn, first: &Pdu, index: usize, fragment: &Pdu) -> Result<()> {
    if fragment.pgn() != pgn {
        return Err(JbusError::assembly(
            pgn,
            format!("fragment {} carries PGN 0x{:04X}", index, fragment.pgn()),
        ));
    }
    if fragment.num_bytes == 0 {
        return Err(JbusError::assembly(
            pgn,
            format!("fragment {} has no sequence number", index),
        ));
    }
    let expected_seq = first.data[0].wrapping_add(index as u8);
    if fragment.data[0] != expected_seq {
        return Err(JbusError::assembly(
            pgn,
            format!(
                "fragment {} has sequence number {}, expected {}",
                index, fragment.data[0], expected_seq
            ),
        ));
    }
    Ok(())
}

/// Collects consecutive fragments of one multi-packet message from a stream
#[derive(Debug, Clone)]
pub struct FragmentBuffer {
    pgn: Pgn,
    expected: usize,
    fragments: Vec<Pdu>,
}

impl FragmentBuffer {
    pub fn new(pgn: Pgn, expected: usize) -> Self {
        Self {
            pgn,
            expected,
            fragments: Vec::with_capacity(expected),
        }
    }

    pub fn pgn(&self) -> Pgn {
        self.pgn
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Adds a fragment; returns the full fragment set once the last one arrives.
    ///
    /// A fragment with sequence number [`FIRST_SEQUENCE`] always opens a new
    /// message, dropping any partial one. Other fragments must continue the
    /// open message; one that does not, or that arrives with no message open,
    /// is discarded with an assembly error.
    pub fn push(&mut self, fragment: Pdu) -> Result<Option<Vec<Pdu>>> {
        if fragment.pgn() != self.pgn {
            return Err(JbusError::assembly(
                self.pgn,
                format!("fragment carries PGN 0x{:04X}", fragment.pgn()),
            ));
        }

        if fragment.num_bytes > 0 && fragment.data[0] == FIRST_SEQUENCE {
            if !self.fragments.is_empty() {
                debug!(
                    "PGN 0x{:04X}: dropping {} fragments of an unfinished message",
                    self.pgn,
                    self.fragments.len()
                );
                self.fragments.clear();
            }
        } else if let Some(first) = self.fragments.first() {
            let index = self.fragments.len();
            if let Err(e) = check_fragment(self.pgn, first, index, &fragment) {
                self.fragments.clear();
                return Err(e);
            }
        } else {
            return Err(JbusError::assembly(
                self.pgn,
                format!(
                    "fragment with sequence number {} outside a message",
                    fragment.data[0]
                ),
            ));
        }

        self.fragments.push(fragment);
        if self.fragments.len() == self.expected {
            Ok(Some(std::mem::take(&mut self.fragments)))
        } else {
            Ok(None)
        }
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    fn fragment(pgn: Pgn, seq: u8, fill: u8) -> Pdu {
        let mut payload = [fill; 8];
        payload[0] = seq;
        Pdu::new(
            Timestamp::default(),
            6,
            (pgn >> 8) as u8,
            (pgn & 0xFF) as u8,
            0x0F,
            &payload,
        )
        .unwrap()
    }

    #[test]
    fn assemble_drops_sequence_bytes() {
        let fragments = [
            fragment(0xFEE1, 1, 0x11),
            fragment(0xFEE1, 2, 0x22),
            fragment(0xFEE1, 3, 0x33),
        ];
        let data = assemble(&fragments, 3).unwrap();
        assert_eq!(data.len(), 21);
        for (n, byte) in data.iter().enumerate() {
            let i = n / FRAGMENT_DATA_BYTES;
            let j = n % FRAGMENT_DATA_BYTES;
            assert_eq!(*byte, fragments[i].data[j + 1]);
        }
    }

    #[test]
    fn assemble_rejects_wrong_count() {
        let fragments = [fragment(0xFEE3, 1, 0), fragment(0xFEE3, 2, 0)];
        let err = assemble(&fragments, 4).unwrap_err();
        assert!(matches!(err, JbusError::Assembly { pgn: 0xFEE3, .. }));
    }

    #[test]
    fn assemble_rejects_mixed_pgns() {
        let fragments = [
            fragment(0xFEE1, 1, 0),
            fragment(0xFEE3, 2, 0),
            fragment(0xFEE1, 3, 0),
        ];
        assert!(assemble(&fragments, 3).is_err());
    }

    #[test]
    fn assemble_rejects_sequence_gap() {
        let fragments = [
            fragment(0xFEE1, 1, 0),
            fragment(0xFEE1, 3, 0),
            fragment(0xFEE1, 4, 0),
        ];
        assert!(assemble(&fragments, 3).is_err());
    }

    #[test]
    fn assemble_rejects_empty_input() {
        assert!(assemble(&[], 3).is_err());
    }

    #[test]
    fn buffer_completes_after_last_fragment() {
        let mut buffer = FragmentBuffer::new(0xFEE1, 3);
        assert!(buffer.push(fragment(0xFEE1, 1, 0)).unwrap().is_none());
        assert!(buffer.push(fragment(0xFEE1, 2, 0)).unwrap().is_none());
        let complete = buffer.push(fragment(0xFEE1, 3, 0)).unwrap().unwrap();
        assert_eq!(complete.len(), 3);
        assert!(buffer.is_empty());
    }

    #[test]
    fn buffer_resets_on_sequence_error() {
        let mut buffer = FragmentBuffer::new(0xFEE1, 3);
        buffer.push(fragment(0xFEE1, 1, 0)).unwrap();
        assert!(buffer.push(fragment(0xFEE1, 5, 0)).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn buffer_recovers_after_missing_start() {
        let mut buffer = FragmentBuffer::new(0xFEE1, 3);
        let mut complete = 0;
        let mut errors = 0;
        for seq in [2, 3, 1, 2, 3, 1, 2, 3] {
            match buffer.push(fragment(0xFEE1, seq, 0)) {
                Ok(Some(fragments)) => {
                    assert_eq!(fragments.len(), 3);
                    complete += 1;
                }
                Ok(None) => {}
                Err(_) => errors += 1,
            }
        }
        assert_eq!(complete, 2);
        assert_eq!(errors, 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn start_fragment_replaces_unfinished_message() {
        let mut buffer = FragmentBuffer::new(0xFEE1, 3);
        buffer.push(fragment(0xFEE1, 1, 0x11)).unwrap();
        buffer.push(fragment(0xFEE1, 2, 0x11)).unwrap();
        assert!(buffer.push(fragment(0xFEE1, 1, 0x22)).unwrap().is_none());
        assert_eq!(buffer.len(), 1);
        buffer.push(fragment(0xFEE1, 2, 0x22)).unwrap();
        let complete = buffer.push(fragment(0xFEE1, 3, 0x22)).unwrap().unwrap();
        assert!(complete.iter().all(|pdu| pdu.data[1] == 0x22));
    }

    #[test]
    fn buffer_rejects_foreign_pgn() {
        let mut buffer = FragmentBuffer::new(0xFEE1, 3);
        assert!(buffer.push(fragment(0xFEE3, 1, 0)).is_err());
    }
}
