use super::PGN_ECFG;
use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::bits::word_le;
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, NOT_AVAILABLE_REAL,
};
use crate::network::scaling::{
    gain_kp, percent_m125_to_p125, speed_in_rpm_1byte, speed_in_rpm_2byte, time_0_to_25sec,
    torque_in_nm,
};
use crate::types::{Pgn, Timestamp};

/// Engine speed points: idle, points 2 to 5, high idle, and the maximum
/// momentary override speed
pub const ECFG_SPEED_POINTS: usize = 7;
/// Torque points, idle and points 2 to 5
pub const ECFG_TORQUE_POINTS: usize = 5;

/// Engine Configuration, sent in four fragments
#[derive(Debug, Clone, PartialEq)]
pub struct Ecfg {
    pub timestamp: Timestamp,
    /// rpm
    pub engine_spd: [f64; ECFG_SPEED_POINTS],
    /// % of reference torque
    pub percent_trq: [f64; ECFG_TORQUE_POINTS],
    /// Gain of the endspeed governor, %/rpm
    pub gain_endspeed_governor: f64,
    /// Reference engine torque, Nm
    pub reference_eng_trq: f64,
    /// Maximum momentary engine override time limit, s
    pub max_momentary_overide_time: f64,
    /// Requested speed control range limits, rpm
    pub spd_ctrl_lower_lim: f64,
    pub spd_ctrl_upper_lim: f64,
    /// Requested torque control range limits, %
    pub trq_ctrl_lower_lim: f64,
    pub trq_ctrl_upper_lim: f64,
}

impl J1939Message for Ecfg {
    const PGN: Pgn = PGN_ECFG;
    const NAME: &'static str = "ECFG";
    const FRAGMENTS: usize = 4;
    const SCHEMAS: &'static [Schema] = &[Schema::current(19), Schema::legacy(15)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        let mut engine_spd = [0.0; ECFG_SPEED_POINTS];
        let mut percent_trq = [0.0; ECFG_TORQUE_POINTS];
        for point in 0..ECFG_TORQUE_POINTS {
            engine_spd[point] = speed_in_rpm_2byte(word_le(data, point * 3));
            percent_trq[point] = percent_m125_to_p125(data[point * 3 + 2]);
        }
        engine_spd[5] = speed_in_rpm_2byte(word_le(data, 15));
        engine_spd[6] = speed_in_rpm_2byte(word_le(data, 21));

        Self {
            timestamp: pdu.timestamp,
            engine_spd,
            percent_trq,
            gain_endspeed_governor: gain_kp(word_le(data, 17)),
            reference_eng_trq: torque_in_nm(word_le(data, 19)),
            max_momentary_overide_time: time_0_to_25sec(data[23]),
            spd_ctrl_lower_lim: speed_in_rpm_1byte(data[24]),
            spd_ctrl_upper_lim: speed_in_rpm_1byte(data[25]),
            trq_ctrl_lower_lim: percent_m125_to_p125(data[26]),
            trq_ctrl_upper_lim: percent_m125_to_p125(data[27]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.reals("engine_spd", "Engine speed (rpm)", &self.engine_spd, 3);
        v.reals("percent_trq", "Engine torque (%)", &self.percent_trq, 2);
        v.real("gain_endspeed_governor", "Endspeed governor gain (%/rpm)", self.gain_endspeed_governor, 4);
        v.real("reference_eng_trq", "Reference engine torque (Nm)", self.reference_eng_trq, 2);
        v.real("max_momentary_overide_time", "Maximum momentary override time (s)", self.max_momentary_overide_time, 2);
        v.real("spd_ctrl_lower_lim", "Speed control lower limit (rpm)", self.spd_ctrl_lower_lim, 2);
        v.real("spd_ctrl_upper_lim", "Speed control upper limit (rpm)", self.spd_ctrl_upper_lim, 2);
        v.real("trq_ctrl_lower_lim", "Torque control lower limit (%)", self.trq_ctrl_lower_lim, 2);
        v.real("trq_ctrl_upper_lim", "Torque control upper limit (%)", self.trq_ctrl_upper_lim, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            engine_spd: f.reals()?,
            percent_trq: f.reals()?,
            gain_endspeed_governor: f.real()?,
            reference_eng_trq: f.real()?,
            max_momentary_overide_time: f.real()?,
            spd_ctrl_lower_lim: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            spd_ctrl_upper_lim: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            trq_ctrl_lower_lim: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            trq_ctrl_upper_lim: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::ts;
    use crate::network::{Interp, Interpreter, Message};

    fn ecfg_fragments() -> Vec<Pdu> {
        let mut data = [0u8; 28];
        let speeds: [u16; ECFG_SPEED_POINTS] = [6000, 8000, 10000, 12000, 14000, 16800, 20000];
        for point in 0..ECFG_TORQUE_POINTS {
            data[point * 3..point * 3 + 2].copy_from_slice(&speeds[point].to_le_bytes());
            data[point * 3 + 2] = 225 - 10 * point as u8;
        }
        data[15..17].copy_from_slice(&speeds[5].to_le_bytes());
        data[17..19].copy_from_slice(&1280u16.to_le_bytes());
        data[19..21].copy_from_slice(&2000u16.to_le_bytes());
        data[21..23].copy_from_slice(&speeds[6].to_le_bytes());
        data[23] = 50;
        data[24] = 60;
        data[25] = 220;
        data[26] = 125;
        data[27] = 250;

        data.chunks(7)
            .enumerate()
            .map(|(index, chunk)| {
                let mut payload = vec![index as u8 + 1];
                payload.extend_from_slice(chunk);
                Pdu::new(ts(), 6, 0xFE, 0xE3, 0x00, &payload).unwrap()
            })
            .collect()
    }

    #[test]
    fn ecfg_assembles_four_fragments() {
        let Message::Ecfg(ecfg) = Interp::<Ecfg>::new().convert(&ecfg_fragments()).unwrap() else {
            panic!("expected ECFG");
        };
        assert_eq!(
            ecfg.engine_spd,
            [750.0, 1000.0, 1250.0, 1500.0, 1750.0, 2100.0, 2500.0]
        );
        assert_eq!(ecfg.percent_trq, [100.0, 90.0, 80.0, 70.0, 60.0]);
        assert!((ecfg.gain_endspeed_governor - 1.000064).abs() < 1e-6);
        assert_eq!(ecfg.reference_eng_trq, 2000.0);
        assert!((ecfg.max_momentary_overide_time - 5.0).abs() < 1e-9);
        assert_eq!(ecfg.spd_ctrl_lower_lim, 600.0);
        assert_eq!(ecfg.spd_ctrl_upper_lim, 2200.0);
        assert_eq!(ecfg.trq_ctrl_lower_lim, 0.0);
        assert_eq!(ecfg.trq_ctrl_upper_lim, 125.0);
    }

    #[test]
    fn ecfg_rejects_three_fragments() {
        let fragments = ecfg_fragments();
        assert!(Interp::<Ecfg>::new().convert(&fragments[..3]).is_err());
    }

    #[test]
    fn ecfg_legacy_record_lacks_control_limits() {
        let record = "ECFG 00:00:00.000 750.000 1000.000 1250.000 1500.000 1750.000 2100.000 \
                      2500.000 100.00 90.00 80.00 70.00 60.00 1.0001 2000.00 5.00";
        let tokens: Vec<&str> = record.split_whitespace().collect();
        let Message::Ecfg(ecfg) = Interp::<Ecfg>::new().import(&tokens).unwrap() else {
            panic!("expected ECFG");
        };
        assert_eq!(ecfg.reference_eng_trq, 2000.0);
        assert_eq!(ecfg.spd_ctrl_lower_lim, NOT_AVAILABLE_REAL);
        assert_eq!(ecfg.trq_ctrl_upper_lim, NOT_AVAILABLE_REAL);
    }
}
