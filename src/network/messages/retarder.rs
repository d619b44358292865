use super::{PGN_ERC1, PGN_RCFG, PGN_RF};
use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::bits::{hi_nibble, lo_nibble, two_bits, word_le};
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, NOT_AVAILABLE_REAL,
};
use crate::network::scaling::{
    percent_0_to_100, percent_m125_to_p125, pressure_0_to_4000kpa, speed_in_rpm_2byte,
    temp_m40_to_p210, torque_in_nm,
};
use crate::types::{Pgn, Timestamp};

/// Speed/torque points in a retarder configuration map
pub const RCFG_MAP_POINTS: usize = 5;

/// Electronic Retarder Controller 1
#[derive(Debug, Clone, PartialEq)]
pub struct Erc1 {
    pub timestamp: Timestamp,
    pub trq_mode: u8,
    pub enable_brake_assist: u8,
    pub enable_shift_assist: u8,
    /// Actual retarder torque, %
    pub actual_ret_pcnt_trq: f64,
    /// Intended retarder torque, %
    pub intended_ret_pcnt_trq: f64,
    pub rq_brake_light: u8,
    pub src_address_ctrl: u8,
    /// Driver's demand retarder torque, %
    pub drvrs_demand_prcnt_torque: f64,
    /// Retarder selection, non-engine, %
    pub selection_nonengine: f64,
    /// Actual maximum available retarder torque, %
    pub max_available_ret_torque: f64,
}

impl J1939Message for Erc1 {
    const PGN: Pgn = PGN_ERC1;
    const NAME: &'static str = "ERC1";
    const SCHEMAS: &'static [Schema] = &[Schema::current(10), Schema::legacy(7)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            trq_mode: lo_nibble(data[0]),
            enable_brake_assist: two_bits(data[0], 4),
            enable_shift_assist: two_bits(data[0], 6),
            actual_ret_pcnt_trq: percent_m125_to_p125(data[1]),
            intended_ret_pcnt_trq: percent_m125_to_p125(data[2]),
            rq_brake_light: two_bits(data[3], 0),
            src_address_ctrl: data[4],
            drvrs_demand_prcnt_torque: percent_m125_to_p125(data[5]),
            selection_nonengine: percent_0_to_100(data[6]),
            max_available_ret_torque: percent_m125_to_p125(data[7]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("trq_mode", "Retarder torque mode", self.trq_mode.into());
        v.int("enable_brake_assist", "Enable brake assist switch", self.enable_brake_assist.into());
        v.int("enable_shift_assist", "Enable shift assist switch", self.enable_shift_assist.into());
        v.real("actual_ret_pcnt_trq", "Actual retarder torque (%)", self.actual_ret_pcnt_trq, 2);
        v.real("intended_ret_pcnt_trq", "Intended retarder torque (%)", self.intended_ret_pcnt_trq, 2);
        v.int("rq_brake_light", "Retarder requesting brake light", self.rq_brake_light.into());
        v.int("src_address_ctrl", "Source address of controlling device", self.src_address_ctrl.into());
        v.real("drvrs_demand_prcnt_torque", "Driver's demand retarder torque (%)", self.drvrs_demand_prcnt_torque, 2);
        v.real("selection_nonengine", "Retarder selection, non-engine (%)", self.selection_nonengine, 2);
        v.real("max_available_ret_torque", "Actual maximum available retarder torque (%)", self.max_available_ret_torque, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            trq_mode: f.int()?,
            enable_brake_assist: f.int()?,
            enable_shift_assist: f.int()?,
            actual_ret_pcnt_trq: f.real()?,
            intended_ret_pcnt_trq: f.real()?,
            rq_brake_light: f.int()?,
            src_address_ctrl: f.int()?,
            drvrs_demand_prcnt_torque: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            selection_nonengine: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            max_available_ret_torque: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Retarder Fluids
#[derive(Debug, Clone, PartialEq)]
pub struct Rf {
    pub timestamp: Timestamp,
    /// Hydraulic retarder pressure, kPa
    pub pressure: f64,
    /// Hydraulic retarder oil temperature, °C
    pub oil_temp: f64,
}

impl J1939Message for Rf {
    const PGN: Pgn = PGN_RF;
    const NAME: &'static str = "RF";
    const SCHEMAS: &'static [Schema] = &[Schema::current(2), Schema::legacy(1)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            pressure: pressure_0_to_4000kpa(data[0]),
            oil_temp: temp_m40_to_p210(data[1]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("pressure", "Hydraulic retarder pressure (kPa)", self.pressure, 2);
        v.real("oil_temp", "Hydraulic retarder oil temperature (C)", self.oil_temp, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            pressure: f.real()?,
            oil_temp: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Retarder Configuration, sent in three fragments.
///
/// The map holds five speed/torque points: idle, points 2 to 4, and the
/// maximum retarder speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Rcfg {
    pub timestamp: Timestamp,
    pub retarder_type: u8,
    pub retarder_loc: u8,
    pub retarder_ctrl_steps: u8,
    /// Retarder speed at each map point, rpm
    pub retarder_speed: [f64; RCFG_MAP_POINTS],
    /// Retarder torque at each map point, % of reference torque
    pub percent_torque: [f64; RCFG_MAP_POINTS],
    /// Reference retarder torque, Nm
    pub reference_retarder_trq: f64,
}

impl J1939Message for Rcfg {
    const PGN: Pgn = PGN_RCFG;
    const NAME: &'static str = "RCFG";
    const FRAGMENTS: usize = 3;
    const SCHEMAS: &'static [Schema] = &[Schema::current(14), Schema::legacy(13)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        let mut retarder_speed = [0.0; RCFG_MAP_POINTS];
        let mut percent_torque = [0.0; RCFG_MAP_POINTS];
        for point in 0..RCFG_MAP_POINTS {
            let offset = 2 + point * 3;
            retarder_speed[point] = speed_in_rpm_2byte(word_le(data, offset));
            percent_torque[point] = percent_m125_to_p125(data[offset + 2]);
        }
        Self {
            timestamp: pdu.timestamp,
            retarder_type: lo_nibble(data[0]),
            retarder_loc: hi_nibble(data[0]),
            retarder_ctrl_steps: data[1],
            retarder_speed,
            percent_torque,
            reference_retarder_trq: torque_in_nm(word_le(data, 17)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("retarder_type", "Retarder type", self.retarder_type.into());
        v.int("retarder_loc", "Retarder location", self.retarder_loc.into());
        v.int("retarder_ctrl_steps", "Retarder control method", self.retarder_ctrl_steps.into());
        v.reals("retarder_speed", "Retarder speed (rpm)", &self.retarder_speed, 3);
        v.reals("percent_torque", "Retarder torque (%)", &self.percent_torque, 2);
        v.real("reference_retarder_trq", "Reference retarder torque (Nm)", self.reference_retarder_trq, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            retarder_type: f.int()?,
            retarder_loc: f.int()?,
            retarder_ctrl_steps: f.int()?,
            retarder_speed: f.reals()?,
            percent_torque: f.reals()?,
            reference_retarder_trq: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::{line, ts};
    use crate::network::{Interp, Interpreter, Message};

    fn fragment(seq: u8, bytes: [u8; 7]) -> Pdu {
        let mut payload = [seq; 8];
        payload[1..].copy_from_slice(&bytes);
        Pdu::new(ts(), 6, 0xFE, 0xE1, 0x10, &payload).unwrap()
    }

    fn rcfg_fragments() -> [Pdu; 3] {
        // speed points 800, 1000, 1200, 1400, 1600 rpm; torque 0..-100 %
        [
            fragment(1, [0x21, 0x04, 0x00, 0x19, 125, 0x40, 0x1F]),
            fragment(2, [100, 0x80, 0x25, 75, 0xC0, 0x2B, 50]),
            fragment(3, [0x00, 0x32, 25, 0xE8, 0x03, 0xFF, 0xFF]),
        ]
    }

    #[test]
    fn rcfg_assembles_three_fragments() {
        let message = Interp::<Rcfg>::new().convert(&rcfg_fragments()).unwrap();
        let Message::Rcfg(rcfg) = &message else {
            panic!("expected RCFG");
        };
        assert_eq!(rcfg.retarder_type, 1);
        assert_eq!(rcfg.retarder_loc, 2);
        assert_eq!(rcfg.retarder_ctrl_steps, 4);
        assert_eq!(rcfg.retarder_speed, [800.0, 1000.0, 1200.0, 1400.0, 1600.0]);
        assert_eq!(rcfg.percent_torque, [0.0, -25.0, -50.0, -75.0, -100.0]);
        assert_eq!(rcfg.reference_retarder_trq, 1000.0);
        assert_eq!(
            line(&message),
            "RCFG 12:34:56.789 1 2 4 800.000 1000.000 1200.000 1400.000 1600.000 \
             0.00 -25.00 -50.00 -75.00 -100.00 1000.00"
        );
    }

    #[test]
    fn rcfg_is_order_sensitive() {
        let [a, b, c] = rcfg_fragments();
        assert!(Interp::<Rcfg>::new().convert(&[b, a, c]).is_err());
        assert!(Interp::<Rcfg>::new().convert(&[a, b]).is_err());
    }

    #[test]
    fn rcfg_legacy_record_lacks_reference_torque() {
        let record = "RCFG 12:34:56.789 1 2 4 800.000 1000.000 1200.000 1400.000 1600.000 \
                      0.00 -25.00 -50.00 -75.00 -100.00";
        let tokens: Vec<&str> = record.split_whitespace().collect();
        let Message::Rcfg(rcfg) = Interp::<Rcfg>::new().import(&tokens).unwrap() else {
            panic!("expected RCFG");
        };
        assert_eq!(rcfg.retarder_speed[4], 1600.0);
        assert_eq!(rcfg.reference_retarder_trq, NOT_AVAILABLE_REAL);
    }

    #[test]
    fn erc1_decodes_modes() {
        let raw = crate::network::messages::test_util::pdu(
            PGN_ERC1,
            &[0b01_00_0010, 100, 125, 0xFD, 0x10, 125, 0, 0],
        );
        let Message::Erc1(erc1) = Interp::<Erc1>::new().convert(&[raw]).unwrap() else {
            panic!("expected ERC1");
        };
        assert_eq!(erc1.trq_mode, 2);
        assert_eq!(erc1.enable_brake_assist, 0);
        assert_eq!(erc1.enable_shift_assist, 1);
        assert_eq!(erc1.actual_ret_pcnt_trq, -25.0);
        assert_eq!(erc1.rq_brake_light, 1);
        assert_eq!(erc1.src_address_ctrl, 0x10);
        assert_eq!(erc1.max_available_ret_torque, -125.0);
    }
}
