use super::{PGN_ETC1, PGN_ETC2, PGN_TF};
use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::bits::{two_bits, word_le};
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, CODE_NOT_AVAILABLE,
    NOT_AVAILABLE_REAL,
};
use crate::network::scaling::{
    gear_m125_to_p125, gear_ratio, percent_0_to_100, pressure_0_to_125kpa, pressure_0_to_4000kpa,
    speed_in_rpm_2byte, temp_m273_to_p1734,
};
use crate::types::{Pgn, Timestamp};

/// Two ASCII characters reading "not available"
const RANGE_NOT_AVAILABLE: u16 = 0xFFFF;

/// Electronic Transmission Controller 1
#[derive(Debug, Clone, PartialEq)]
pub struct Etc1 {
    pub timestamp: Timestamp,
    pub trans_driveline: u8,
    pub trq_conv_lockup: u8,
    pub trans_shift: u8,
    /// Output shaft speed, rpm
    pub trans_output_shaft_spd: f64,
    /// Percent clutch slip
    pub prcnt_clutch_slip: f64,
    pub eng_overspd_enable: u8,
    pub prog_shift_disable: u8,
    /// Input shaft speed, rpm
    pub trans_input_shaft_spd: f64,
    pub src_addr_ctrl: u8,
}

impl J1939Message for Etc1 {
    const PGN: Pgn = PGN_ETC1;
    const NAME: &'static str = "ETC1";
    const SCHEMAS: &'static [Schema] = &[Schema::current(9), Schema::legacy(8)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            trans_driveline: two_bits(data[0], 0),
            trq_conv_lockup: two_bits(data[0], 2),
            trans_shift: two_bits(data[0], 4),
            trans_output_shaft_spd: speed_in_rpm_2byte(word_le(data, 1)),
            prcnt_clutch_slip: percent_0_to_100(data[3]),
            eng_overspd_enable: two_bits(data[4], 0),
            prog_shift_disable: two_bits(data[4], 2),
            trans_input_shaft_spd: speed_in_rpm_2byte(word_le(data, 5)),
            src_addr_ctrl: data[7],
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("trans_driveline", "Driveline engaged", self.trans_driveline.into());
        v.int("trq_conv_lockup", "Torque converter lockup engaged", self.trq_conv_lockup.into());
        v.int("trans_shift", "Shift in process", self.trans_shift.into());
        v.real("trans_output_shaft_spd", "Output shaft speed (rpm)", self.trans_output_shaft_spd, 3);
        v.real("prcnt_clutch_slip", "Percent clutch slip (%)", self.prcnt_clutch_slip, 2);
        v.int("eng_overspd_enable", "Engine momentary overspeed enable", self.eng_overspd_enable.into());
        v.int("prog_shift_disable", "Progressive shift disable", self.prog_shift_disable.into());
        v.real("trans_input_shaft_spd", "Input shaft speed (rpm)", self.trans_input_shaft_spd, 3);
        v.int("src_addr_ctrl", "Source address of controlling device", self.src_addr_ctrl.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            trans_driveline: f.int()?,
            trq_conv_lockup: f.int()?,
            trans_shift: f.int()?,
            trans_output_shaft_spd: f.real()?,
            prcnt_clutch_slip: f.real()?,
            eng_overspd_enable: f.int()?,
            prog_shift_disable: f.int()?,
            trans_input_shaft_spd: f.real()?,
            src_addr_ctrl: if current { f.int()? } else { CODE_NOT_AVAILABLE },
        })
    }
}

/// Electronic Transmission Controller 2
#[derive(Debug, Clone, PartialEq)]
pub struct Etc2 {
    pub timestamp: Timestamp,
    /// Selected gear; negative values are reverse
    pub trans_selected_gear: i16,
    pub trans_act_gear_ratio: f64,
    pub trans_current_gear: i16,
    /// Range selected, two ASCII characters packed low byte first
    pub range_selected: u16,
    /// Range attained, two ASCII characters packed low byte first
    pub range_attained: u16,
}

impl J1939Message for Etc2 {
    const PGN: Pgn = PGN_ETC2;
    const NAME: &'static str = "ETC2";
    const SCHEMAS: &'static [Schema] = &[Schema::current(5), Schema::legacy(3)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            trans_selected_gear: gear_m125_to_p125(data[0]),
            trans_act_gear_ratio: gear_ratio(word_le(data, 1)),
            trans_current_gear: gear_m125_to_p125(data[3]),
            range_selected: word_le(data, 4),
            range_attained: word_le(data, 6),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("trans_selected_gear", "Selected gear", self.trans_selected_gear.into());
        v.real("trans_act_gear_ratio", "Actual gear ratio", self.trans_act_gear_ratio, 3);
        v.int("trans_current_gear", "Current gear", self.trans_current_gear.into());
        v.int("range_selected", "Transmission requested range", self.range_selected.into());
        v.int("range_attained", "Transmission current range", self.range_attained.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            trans_selected_gear: f.int()?,
            trans_act_gear_ratio: f.real()?,
            trans_current_gear: f.int()?,
            range_selected: if current { f.int()? } else { RANGE_NOT_AVAILABLE },
            range_attained: if current { f.int()? } else { RANGE_NOT_AVAILABLE },
        })
    }
}

/// Transmission Fluids
#[derive(Debug, Clone, PartialEq)]
pub struct Tf {
    pub timestamp: Timestamp,
    /// Clutch pressure, kPa
    pub clutch_pressure: f64,
    /// Oil level, %
    pub oil_level: f64,
    /// Filter differential pressure, kPa
    pub diff_pressure: f64,
    /// Oil pressure, kPa
    pub oil_pressure: f64,
    /// Oil temperature, °C
    pub oil_temp: f64,
}

impl J1939Message for Tf {
    const PGN: Pgn = PGN_TF;
    const NAME: &'static str = "TF";
    const SCHEMAS: &'static [Schema] = &[Schema::current(5), Schema::legacy(4)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            clutch_pressure: pressure_0_to_4000kpa(data[0]),
            oil_level: percent_0_to_100(data[1]),
            diff_pressure: pressure_0_to_125kpa(data[2]),
            oil_pressure: pressure_0_to_4000kpa(data[3]),
            oil_temp: temp_m273_to_p1734(word_le(data, 4)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("clutch_pressure", "Clutch pressure (kPa)", self.clutch_pressure, 2);
        v.real("oil_level", "Transmission oil level (%)", self.oil_level, 2);
        v.real("diff_pressure", "Filter differential pressure (kPa)", self.diff_pressure, 2);
        v.real("oil_pressure", "Transmission oil pressure (kPa)", self.oil_pressure, 2);
        v.real("oil_temp", "Transmission oil temperature (C)", self.oil_temp, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            clutch_pressure: f.real()?,
            oil_level: f.real()?,
            diff_pressure: f.real()?,
            oil_pressure: f.real()?,
            oil_temp: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}
