//! Addressed control commands: torque/speed control and external acceleration.
//!
//! Both are PDU1 parameter groups, so the PDU specific byte carries the
//! destination address and the PGN a message reports depends on it.

use super::{PGN_EXAC, PGN_TSC1, TSC1_DESTINATIONS};
use crate::data_link::Pdu;
use crate::error::{JbusError, Result};
use crate::network::bits::{hi_nibble, lo_nibble, put_word_le, set_bits, two_bits, word_le};
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, CODE_NOT_AVAILABLE,
    NIBBLE_NOT_AVAILABLE,
};
use crate::network::scaling::{
    code_engine_speed, code_percent_m125_to_p125, deceleration, deceleration_to_short,
    percent_m125_to_p125, speed_in_rpm_2byte,
};
use crate::types::{Pgn, Timestamp};

pub const TSC1_PRIORITY: u8 = 3;
pub const EXAC_PRIORITY: u8 = 3;
/// Brake controller, the only EXAC destination with an interpreter
pub const EXAC_DESTINATION: u8 = (PGN_EXAC & 0xFF) as u8;

/// An outbound message that can be put on the bus.
///
/// Only destinations the registry decodes are accepted, so a composed command
/// reads back as the same message type: TSC1 goes to the engine or one of the
/// retarders, EXAC to the brake controller. Any other destination is
/// `InvalidParameter`.
pub trait Command {
    fn to_pdu(&self) -> Result<Pdu>;
}

fn check_state(value: u8) -> Result<u8> {
    if value > 3 {
        Err(JbusError::InvalidParameter)
    } else {
        Ok(value)
    }
}

/// Torque/Speed Control 1
#[derive(Debug, Clone, PartialEq)]
pub struct Tsc1 {
    pub timestamp: Timestamp,
    pub destination_address: u8,
    pub src_address: u8,
    /// Override control mode priority
    pub ovrd_ctrl_m_pr: u8,
    /// Requested speed control conditions
    pub req_spd_ctrl: u8,
    /// Override control mode
    pub ovrd_ctrl_m: u8,
    /// Requested speed or speed limit, rpm
    pub req_spd_lim: f64,
    /// Requested torque or torque limit, percent of reference torque
    pub req_trq_lim: f64,
}

impl J1939Message for Tsc1 {
    const PGN: Pgn = PGN_TSC1;
    const NAME: &'static str = "TSC1";
    const SCHEMAS: &'static [Schema] = &[Schema::current(7), Schema::legacy(5)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Destination-specific PGN; addresses without a TSC1 interpreter,
    /// including the unknown address of legacy records, report the base PGN
    fn pgn(&self) -> Pgn {
        if TSC1_DESTINATIONS.contains(&self.destination_address) {
            PGN_TSC1 | Pgn::from(self.destination_address)
        } else {
            PGN_TSC1
        }
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            destination_address: pdu.pdu_specific,
            src_address: pdu.src_address,
            ovrd_ctrl_m_pr: two_bits(data[0], 4),
            req_spd_ctrl: two_bits(data[0], 2),
            ovrd_ctrl_m: two_bits(data[0], 0),
            req_spd_lim: speed_in_rpm_2byte(word_le(data, 1)),
            req_trq_lim: percent_m125_to_p125(data[3]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("destination_address", "Destination address", self.destination_address.into());
        v.int("src_address", "Source address", self.src_address.into());
        v.int("ovrd_ctrl_m_pr", "Override control mode priority", self.ovrd_ctrl_m_pr.into());
        v.int("req_spd_ctrl", "Requested speed control conditions", self.req_spd_ctrl.into());
        v.int("ovrd_ctrl_m", "Override control mode", self.ovrd_ctrl_m.into());
        v.real("req_spd_lim", "Requested speed/speed limit (rpm)", self.req_spd_lim, 3);
        v.real("req_trq_lim", "Requested torque/torque limit (%)", self.req_trq_lim, 3);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let (destination_address, src_address) = match version {
            SchemaVersion::Current => (f.int()?, f.int()?),
            SchemaVersion::Legacy => (CODE_NOT_AVAILABLE, CODE_NOT_AVAILABLE),
        };
        Ok(Self {
            timestamp,
            destination_address,
            src_address,
            ovrd_ctrl_m_pr: f.int()?,
            req_spd_ctrl: f.int()?,
            ovrd_ctrl_m: f.int()?,
            req_spd_lim: f.real()?,
            req_trq_lim: f.real()?,
        })
    }
}

impl Command for Tsc1 {
    fn to_pdu(&self) -> Result<Pdu> {
        if !TSC1_DESTINATIONS.contains(&self.destination_address) {
            return Err(JbusError::InvalidParameter);
        }
        let mut data = [0xFF; 8];
        set_bits(&mut data[0], 0, 2, check_state(self.ovrd_ctrl_m)?);
        set_bits(&mut data[0], 2, 2, check_state(self.req_spd_ctrl)?);
        set_bits(&mut data[0], 4, 2, check_state(self.ovrd_ctrl_m_pr)?);
        put_word_le(&mut data, 1, code_engine_speed(self.req_spd_lim));
        data[3] = code_percent_m125_to_p125(self.req_trq_lim);

        Pdu::new(
            self.timestamp,
            TSC1_PRIORITY,
            (PGN_TSC1 >> 8) as u8,
            self.destination_address,
            self.src_address,
            &data,
        )
    }
}

/// External Acceleration Control
#[derive(Debug, Clone, PartialEq)]
pub struct Exac {
    pub timestamp: Timestamp,
    pub destination_address: u8,
    pub src_address: u8,
    /// EBS override control mode priority
    pub ebs_ovrd_ctrl_m_pr: u8,
    /// External deceleration control mode
    pub ext_dec_ctrl_m: u8,
    /// Requested acceleration, m/s²
    pub requested_decel: f64,
    /// EDC override control mode priority
    pub edc_ovrd_ctrl_m_pr: u8,
    /// Override control mode
    pub ovrd_ctrl_m: u8,
    /// Requested torque, percent of reference torque
    pub requested_torque: f64,
    /// Rolling message counter, 0..=15
    pub alive_signal: u8,
    pub checksum: u8,
}

impl Exac {
    /// Steps the rolling counter for the next transmission
    pub fn advance_alive_signal(&mut self) {
        self.alive_signal = self.alive_signal.wrapping_add(1) & 0x0F;
    }
}

/// 4-bit message checksum over payload bytes 0..7, the rolling counter and
/// the four identifier bytes
pub fn exac_checksum(data: &[u8], counter: u8, can_id: u32) -> u8 {
    let sum = data
        .iter()
        .take(7)
        .chain(can_id.to_le_bytes().iter())
        .map(|byte| u32::from(*byte))
        .sum::<u32>()
        + u32::from(counter & 0x0F);
    (((sum >> 4) + sum) & 0x0F) as u8
}

impl J1939Message for Exac {
    const PGN: Pgn = PGN_EXAC;
    const NAME: &'static str = "EXAC";
    const SCHEMAS: &'static [Schema] = &[Schema::current(10), Schema::legacy(8)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn pgn(&self) -> Pgn {
        (PGN_EXAC & 0xFF00) | Pgn::from(self.destination_address)
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            destination_address: pdu.pdu_specific,
            src_address: pdu.src_address,
            ebs_ovrd_ctrl_m_pr: two_bits(data[0], 0),
            ext_dec_ctrl_m: two_bits(data[0], 2),
            requested_decel: deceleration(word_le(data, 1)),
            edc_ovrd_ctrl_m_pr: two_bits(data[0], 4),
            ovrd_ctrl_m: two_bits(data[0], 6),
            requested_torque: percent_m125_to_p125(data[3]),
            alive_signal: lo_nibble(data[7]),
            checksum: hi_nibble(data[7]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("destination_address", "Destination address", self.destination_address.into());
        v.int("src_address", "Source address", self.src_address.into());
        v.int("ebs_ovrd_ctrl_m_pr", "EBS override control mode priority", self.ebs_ovrd_ctrl_m_pr.into());
        v.int("ext_dec_ctrl_m", "External deceleration control mode", self.ext_dec_ctrl_m.into());
        v.real("requested_decel", "Requested acceleration (m/s^2)", self.requested_decel, 3);
        v.int("edc_ovrd_ctrl_m_pr", "EDC override control mode priority", self.edc_ovrd_ctrl_m_pr.into());
        v.int("ovrd_ctrl_m", "Override control mode", self.ovrd_ctrl_m.into());
        v.real("requested_torque", "Requested torque (%)", self.requested_torque, 2);
        v.int("alive_signal", "Message counter", self.alive_signal.into());
        v.int("checksum", "Message checksum", self.checksum.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            destination_address: f.int()?,
            src_address: f.int()?,
            ebs_ovrd_ctrl_m_pr: f.int()?,
            ext_dec_ctrl_m: f.int()?,
            requested_decel: f.real()?,
            edc_ovrd_ctrl_m_pr: f.int()?,
            ovrd_ctrl_m: f.int()?,
            requested_torque: f.real()?,
            alive_signal: if current { f.int()? } else { NIBBLE_NOT_AVAILABLE },
            checksum: if current { f.int()? } else { NIBBLE_NOT_AVAILABLE },
        })
    }
}

impl Command for Exac {
    /// Builds the frame with a freshly computed checksum; the stored
    /// `checksum` field is ignored.
    fn to_pdu(&self) -> Result<Pdu> {
        if self.alive_signal > 0x0F || self.destination_address != EXAC_DESTINATION {
            return Err(JbusError::InvalidParameter);
        }
        let mut data = [0xFF; 8];
        set_bits(&mut data[0], 0, 2, check_state(self.ebs_ovrd_ctrl_m_pr)?);
        set_bits(&mut data[0], 2, 2, check_state(self.ext_dec_ctrl_m)?);
        set_bits(&mut data[0], 4, 2, check_state(self.edc_ovrd_ctrl_m_pr)?);
        set_bits(&mut data[0], 6, 2, check_state(self.ovrd_ctrl_m)?);
        put_word_le(&mut data, 1, deceleration_to_short(self.requested_decel));
        data[3] = code_percent_m125_to_p125(self.requested_torque);
        data[7] = self.alive_signal;

        let mut pdu = Pdu::new(
            self.timestamp,
            EXAC_PRIORITY,
            (PGN_EXAC >> 8) as u8,
            self.destination_address,
            self.src_address,
            &data,
        )?;
        let checksum = exac_checksum(&data, self.alive_signal, pdu.can_id());
        data[7] = (checksum << 4) | self.alive_signal;
        pdu.set_payload(&data)?;
        Ok(pdu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::{line, pdu, ts};
    use crate::network::{Interp, Interpreter, Message, Registry};

    fn tsc1() -> Tsc1 {
        Tsc1 {
            timestamp: ts(),
            destination_address: 0x0F,
            src_address: 6,
            ovrd_ctrl_m_pr: 2,
            req_spd_ctrl: 1,
            ovrd_ctrl_m: 0,
            req_spd_lim: 3.0,
            req_trq_lim: 4.0,
        }
    }

    #[test]
    fn tsc1_prints_numeric_line() {
        assert_eq!(
            line(&tsc1().into()),
            "TSC1 12:34:56.789 15 6 2 1 0 3.000 4.000"
        );
    }

    #[test]
    fn tsc1_imports_numeric_line() {
        let tokens = ["TSC1", "12:34:56.789", "15", "6", "2", "1", "0", "3.000", "4.000"];
        let message = Interp::<Tsc1>::new().import(&tokens).unwrap();
        assert_eq!(message, Message::Tsc1(tsc1()));
    }

    #[test]
    fn tsc1_legacy_line_has_no_addresses() {
        let tokens = ["TSC1", "12:34:56.789", "2", "1", "0", "3.000", "4.000"];
        let message = Interp::<Tsc1>::new().import(&tokens).unwrap();
        let Message::Tsc1(tsc1) = message else {
            panic!("expected TSC1");
        };
        assert_eq!(tsc1.destination_address, CODE_NOT_AVAILABLE);
        assert_eq!(tsc1.src_address, CODE_NOT_AVAILABLE);
        assert_eq!(tsc1.req_spd_lim, 3.0);
        assert_eq!(tsc1.pgn(), PGN_TSC1);
    }

    #[test]
    fn tsc1_command_round_trips_through_decode() {
        let command = tsc1();
        let frame = command.to_pdu().unwrap();
        assert_eq!(frame.pgn(), 0x000F);
        assert_eq!(frame.priority, TSC1_PRIORITY);
        assert_eq!(frame.data[0], 0b1110_0100);
        assert_eq!(&frame.data[4..], &[0xFF; 4]);

        let message = Interp::<Tsc1>::at(0x000F).convert(&[frame]).unwrap();
        assert_eq!(message, Message::Tsc1(command));
    }

    #[test]
    fn commands_only_go_to_decoded_destinations() {
        let registry = Registry::global();
        for dest in TSC1_DESTINATIONS {
            let command = Tsc1 {
                destination_address: dest,
                ..tsc1()
            };
            let frame = command.to_pdu().unwrap();
            let message = registry.convert(&[frame]).unwrap();
            assert_eq!(message.pgn(), command.pgn());
            assert_eq!(message, Message::Tsc1(command));
        }

        let unaddressed = Tsc1 {
            destination_address: 5,
            ..tsc1()
        };
        assert!(matches!(unaddressed.to_pdu(), Err(JbusError::InvalidParameter)));
        assert_eq!(unaddressed.pgn(), PGN_TSC1);
    }

    #[test]
    fn exac_rejects_foreign_destination() {
        let command = Exac {
            timestamp: ts(),
            destination_address: 0x0F,
            src_address: 0x2A,
            ebs_ovrd_ctrl_m_pr: 0,
            ext_dec_ctrl_m: 1,
            requested_decel: 0.0,
            edc_ovrd_ctrl_m_pr: 0,
            ovrd_ctrl_m: 0,
            requested_torque: 0.0,
            alive_signal: 0,
            checksum: 0,
        };
        assert!(matches!(command.to_pdu(), Err(JbusError::InvalidParameter)));
    }

    #[test]
    fn tsc1_rejects_wide_state() {
        let mut command = tsc1();
        command.ovrd_ctrl_m = 4;
        assert!(command.to_pdu().is_err());
    }

    #[test]
    fn exac_checksum_matches_frame() {
        let mut command = Exac {
            timestamp: ts(),
            destination_address: 0x0B,
            src_address: 0x2A,
            ebs_ovrd_ctrl_m_pr: 0,
            ext_dec_ctrl_m: 1,
            requested_decel: -2.0,
            edc_ovrd_ctrl_m_pr: 3,
            ovrd_ctrl_m: 0,
            requested_torque: 0.0,
            alive_signal: 15,
            checksum: 0,
        };
        let frame = command.to_pdu().unwrap();
        assert_eq!(frame.pgn(), PGN_EXAC);

        let decoded = Exac::decode(&frame, &frame.payload());
        assert_eq!(decoded.alive_signal, 15);
        assert_eq!(
            decoded.checksum,
            exac_checksum(&frame.data, 15, frame.can_id())
        );
        assert!((decoded.requested_decel - -2.0).abs() < 1e-3);

        command.advance_alive_signal();
        assert_eq!(command.alive_signal, 0);
    }

    #[test]
    fn exac_reports_destination_pgn() {
        let raw = pdu(PGN_EXAC, &[0; 8]);
        let message = Interp::<Exac>::new().convert(&[raw]).unwrap();
        assert_eq!(message.pgn(), PGN_EXAC);
        assert_eq!(message.name(), "EXAC");
    }
}
