use super::{PGN_EBC1, PGN_EBC2};
use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::bits::{two_bits, word_le};
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, NOT_AVAILABLE_REAL,
    STATE_NOT_AVAILABLE,
};
use crate::network::scaling::{percent_0_to_100, wheel_based_mps, wheel_based_mps_relative};
use crate::types::{Pgn, Timestamp};

/// Electronic Brake Controller 1
#[derive(Debug, Clone, PartialEq)]
pub struct Ebc1 {
    pub timestamp: Timestamp,
    pub asr_eng_ctrl_active: u8,
    pub asr_brk_ctrl_active: u8,
    pub antilock_brk_active: u8,
    pub ebs_brk_switch: u8,
    /// Brake pedal position, %
    pub brk_pedal_pos: f64,
    pub abs_offroad_switch: u8,
    pub asr_offroad_switch: u8,
    pub asr_hill_holder_switch: u8,
    pub trac_ctrl_override_switch: u8,
    pub accel_interlock_switch: u8,
    pub eng_derate_switch: u8,
    pub aux_eng_shutdown_switch: u8,
    pub remote_accel_enable_switch: u8,
    /// Engine retarder selection, %
    pub eng_retarder_selection: f64,
    pub abs_fully_operational: u8,
    pub ebs_red_warning: u8,
    pub abs_ebs_amber_warning: u8,
    pub atc_asr_info_signal: u8,
    pub src_address_ctrl: u8,
    pub trailer_abs_status: u8,
    pub tractor_trailer_abs_warning: u8,
}

impl J1939Message for Ebc1 {
    const PGN: Pgn = PGN_EBC1;
    const NAME: &'static str = "EBC1";
    const SCHEMAS: &'static [Schema] = &[Schema::current(21), Schema::legacy(19)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            asr_eng_ctrl_active: two_bits(data[0], 0),
            asr_brk_ctrl_active: two_bits(data[0], 2),
            antilock_brk_active: two_bits(data[0], 4),
            ebs_brk_switch: two_bits(data[0], 6),
            brk_pedal_pos: percent_0_to_100(data[1]),
            abs_offroad_switch: two_bits(data[2], 0),
            asr_offroad_switch: two_bits(data[2], 2),
            asr_hill_holder_switch: two_bits(data[2], 4),
            trac_ctrl_override_switch: two_bits(data[2], 6),
            accel_interlock_switch: two_bits(data[3], 0),
            eng_derate_switch: two_bits(data[3], 2),
            aux_eng_shutdown_switch: two_bits(data[3], 4),
            remote_accel_enable_switch: two_bits(data[3], 6),
            eng_retarder_selection: percent_0_to_100(data[4]),
            abs_fully_operational: two_bits(data[5], 0),
            ebs_red_warning: two_bits(data[5], 2),
            abs_ebs_amber_warning: two_bits(data[5], 4),
            atc_asr_info_signal: two_bits(data[5], 6),
            src_address_ctrl: data[6],
            trailer_abs_status: two_bits(data[7], 4),
            tractor_trailer_abs_warning: two_bits(data[7], 6),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("asr_eng_ctrl_active", "ASR engine control active", self.asr_eng_ctrl_active.into());
        v.int("asr_brk_ctrl_active", "ASR brake control active", self.asr_brk_ctrl_active.into());
        v.int("antilock_brk_active", "Anti-lock braking active", self.antilock_brk_active.into());
        v.int("ebs_brk_switch", "EBS brake switch", self.ebs_brk_switch.into());
        v.real("brk_pedal_pos", "Brake pedal position (%)", self.brk_pedal_pos, 2);
        v.int("abs_offroad_switch", "ABS off-road switch", self.abs_offroad_switch.into());
        v.int("asr_offroad_switch", "ASR off-road switch", self.asr_offroad_switch.into());
        v.int("asr_hill_holder_switch", "ASR hill holder switch", self.asr_hill_holder_switch.into());
        v.int("trac_ctrl_override_switch", "Traction control override switch", self.trac_ctrl_override_switch.into());
        v.int("accel_interlock_switch", "Accelerator interlock switch", self.accel_interlock_switch.into());
        v.int("eng_derate_switch", "Engine derate switch", self.eng_derate_switch.into());
        v.int("aux_eng_shutdown_switch", "Auxiliary engine shutdown switch", self.aux_eng_shutdown_switch.into());
        v.int("remote_accel_enable_switch", "Remote accelerator enable switch", self.remote_accel_enable_switch.into());
        v.real("eng_retarder_selection", "Engine retarder selection (%)", self.eng_retarder_selection, 2);
        v.int("abs_fully_operational", "ABS fully operational", self.abs_fully_operational.into());
        v.int("ebs_red_warning", "EBS red warning signal", self.ebs_red_warning.into());
        v.int("abs_ebs_amber_warning", "ABS/EBS amber warning signal", self.abs_ebs_amber_warning.into());
        v.int("atc_asr_info_signal", "ATC/ASR information signal", self.atc_asr_info_signal.into());
        v.int("src_address_ctrl", "Source address of controlling device", self.src_address_ctrl.into());
        v.int("trailer_abs_status", "Trailer ABS status", self.trailer_abs_status.into());
        v.int("tractor_trailer_abs_warning", "Tractor-mounted trailer ABS warning", self.tractor_trailer_abs_warning.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            asr_eng_ctrl_active: f.int()?,
            asr_brk_ctrl_active: f.int()?,
            antilock_brk_active: f.int()?,
            ebs_brk_switch: f.int()?,
            brk_pedal_pos: f.real()?,
            abs_offroad_switch: f.int()?,
            asr_offroad_switch: f.int()?,
            asr_hill_holder_switch: f.int()?,
            trac_ctrl_override_switch: f.int()?,
            accel_interlock_switch: f.int()?,
            eng_derate_switch: f.int()?,
            aux_eng_shutdown_switch: f.int()?,
            remote_accel_enable_switch: f.int()?,
            eng_retarder_selection: f.real()?,
            abs_fully_operational: f.int()?,
            ebs_red_warning: f.int()?,
            abs_ebs_amber_warning: f.int()?,
            atc_asr_info_signal: f.int()?,
            src_address_ctrl: f.int()?,
            trailer_abs_status: if current { f.int()? } else { STATE_NOT_AVAILABLE },
            tractor_trailer_abs_warning: if current { f.int()? } else { STATE_NOT_AVAILABLE },
        })
    }
}

/// Wheel Speed Information
#[derive(Debug, Clone, PartialEq)]
pub struct Ebc2 {
    pub timestamp: Timestamp,
    /// Front axle speed, m/s
    pub front_axle_spd: f64,
    /// Wheel speeds relative to the front axle, m/s
    pub rel_spd_front_left: f64,
    pub rel_spd_front_right: f64,
    pub rel_spd_rear1_left: f64,
    pub rel_spd_rear1_right: f64,
    pub rel_spd_rear2_left: f64,
    pub rel_spd_rear2_right: f64,
}

impl J1939Message for Ebc2 {
    const PGN: Pgn = PGN_EBC2;
    const NAME: &'static str = "EBC2";
    const SCHEMAS: &'static [Schema] = &[Schema::current(7), Schema::legacy(5)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            front_axle_spd: wheel_based_mps(word_le(data, 0)),
            rel_spd_front_left: wheel_based_mps_relative(data[2]),
            rel_spd_front_right: wheel_based_mps_relative(data[3]),
            rel_spd_rear1_left: wheel_based_mps_relative(data[4]),
            rel_spd_rear1_right: wheel_based_mps_relative(data[5]),
            rel_spd_rear2_left: wheel_based_mps_relative(data[6]),
            rel_spd_rear2_right: wheel_based_mps_relative(data[7]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("front_axle_spd", "Front axle speed (m/s)", self.front_axle_spd, 3);
        v.real("rel_spd_front_left", "Relative speed front axle left (m/s)", self.rel_spd_front_left, 3);
        v.real("rel_spd_front_right", "Relative speed front axle right (m/s)", self.rel_spd_front_right, 3);
        v.real("rel_spd_rear1_left", "Relative speed rear axle 1 left (m/s)", self.rel_spd_rear1_left, 3);
        v.real("rel_spd_rear1_right", "Relative speed rear axle 1 right (m/s)", self.rel_spd_rear1_right, 3);
        v.real("rel_spd_rear2_left", "Relative speed rear axle 2 left (m/s)", self.rel_spd_rear2_left, 3);
        v.real("rel_spd_rear2_right", "Relative speed rear axle 2 right (m/s)", self.rel_spd_rear2_right, 3);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            front_axle_spd: f.real()?,
            rel_spd_front_left: f.real()?,
            rel_spd_front_right: f.real()?,
            rel_spd_rear1_left: f.real()?,
            rel_spd_rear1_right: f.real()?,
            rel_spd_rear2_left: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            rel_spd_rear2_right: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::{line, pdu};
    use crate::network::{Interp, Interpreter, Message};

    #[test]
    fn ebc1_decodes_states_and_positions() {
        let raw = pdu(PGN_EBC1, &[0b00_01_10_11, 50, 0xFF, 0x00, 251, 0xFF, 0x0B, 0b10_01_1111]);
        let Message::Ebc1(ebc1) = Interp::<Ebc1>::new().convert(&[raw]).unwrap() else {
            panic!("expected EBC1");
        };
        assert_eq!(ebc1.asr_eng_ctrl_active, 3);
        assert_eq!(ebc1.asr_brk_ctrl_active, 2);
        assert_eq!(ebc1.antilock_brk_active, 1);
        assert_eq!(ebc1.ebs_brk_switch, 0);
        assert!((ebc1.brk_pedal_pos - 20.0).abs() < 1e-9);
        assert_eq!(ebc1.eng_retarder_selection, -251.0);
        assert_eq!(ebc1.src_address_ctrl, 0x0B);
        assert_eq!(ebc1.trailer_abs_status, 1);
        assert_eq!(ebc1.tractor_trailer_abs_warning, 2);
    }

    #[test]
    fn ebc1_is_not_claimed_by_neighbouring_pgns() {
        let interp = Interp::<Ebc1>::new();
        assert!(interp.is_type(&pdu(0xF001, &[0; 8])));
        assert!(!interp.is_type(&pdu(0xF000, &[0; 8])));
        assert!(!interp.is_type(&pdu(0xF101, &[0; 8])));
    }

    #[test]
    fn ebc1_legacy_fills_trailer_states() {
        let record = "EBC1 00:00:01.000 0 0 0 0 20.00 0 0 0 0 0 0 0 0 0.00 0 0 0 0 11";
        let tokens: Vec<&str> = record.split_whitespace().collect();
        let Message::Ebc1(ebc1) = Interp::<Ebc1>::new().import(&tokens).unwrap() else {
            panic!("expected EBC1");
        };
        assert_eq!(ebc1.src_address_ctrl, 11);
        assert_eq!(ebc1.trailer_abs_status, STATE_NOT_AVAILABLE);
        assert_eq!(ebc1.tractor_trailer_abs_warning, STATE_NOT_AVAILABLE);
    }

    #[test]
    fn ebc2_prints_speeds() {
        let raw = pdu(PGN_EBC2, &[0x00, 0x00, 125, 125, 125, 125, 0xFF, 0xFF]);
        let message = Interp::<Ebc2>::new().convert(&[raw]).unwrap();
        assert_eq!(
            line(&message),
            "EBC2 12:34:56.789 0.000 0.000 0.000 0.000 0.000 -255.000 -255.000"
        );
    }
}
