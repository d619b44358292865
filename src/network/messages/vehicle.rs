use super::{PGN_AMBC, PGN_CCVS, PGN_DD, PGN_HRVD, PGN_IEC, PGN_PTO, PGN_VD, PGN_VEP};
use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::bits::{bits, dword_le, two_bits, word_le};
use crate::network::interpreter::{
    FieldReader, FieldVisitor, J1939Message, Schema, SchemaVersion, NOT_AVAILABLE_REAL,
    STATE_NOT_AVAILABLE,
};
use crate::network::scaling::*;
use crate::types::{Pgn, Timestamp};

/// Cruise Control/Vehicle Speed
#[derive(Debug, Clone, PartialEq)]
pub struct Ccvs {
    pub timestamp: Timestamp,
    pub two_spd_axle_switch: u8,
    pub parking_brake: u8,
    pub cc_pause_switch: u8,
    /// Wheel-based vehicle speed, m/s
    pub wheel_based_vehicle_speed: f64,
    pub cc_active: u8,
    pub cc_enable_switch: u8,
    pub brake_switch: u8,
    pub clutch_switch: u8,
    pub cc_set_switch: u8,
    pub cc_coast_switch: u8,
    pub cc_resume_switch: u8,
    pub cc_accelerate_switch: u8,
    /// Cruise control set speed, m/s
    pub cc_set_speed: f64,
    /// 5-bit PTO state
    pub pto_state: u8,
    /// 3-bit cruise control state
    pub cc_state: u8,
    pub eng_idle_incr_switch: u8,
    pub eng_idle_decr_switch: u8,
    pub eng_test_mode_switch: u8,
    pub eng_shutdown_override: u8,
}

impl J1939Message for Ccvs {
    const PGN: Pgn = PGN_CCVS;
    const NAME: &'static str = "CCVS";
    const SCHEMAS: &'static [Schema] = &[Schema::current(19), Schema::legacy(15)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            two_spd_axle_switch: two_bits(data[0], 0),
            parking_brake: two_bits(data[0], 2),
            cc_pause_switch: two_bits(data[0], 4),
            wheel_based_vehicle_speed: wheel_based_mps(word_le(data, 1)),
            cc_active: two_bits(data[3], 0),
            cc_enable_switch: two_bits(data[3], 2),
            brake_switch: two_bits(data[3], 4),
            clutch_switch: two_bits(data[3], 6),
            cc_set_switch: two_bits(data[4], 0),
            cc_coast_switch: two_bits(data[4], 2),
            cc_resume_switch: two_bits(data[4], 4),
            cc_accelerate_switch: two_bits(data[4], 6),
            cc_set_speed: cruise_set_mps(data[5]),
            pto_state: bits(data[6], 0, 5),
            cc_state: bits(data[6], 5, 3),
            eng_idle_incr_switch: two_bits(data[7], 0),
            eng_idle_decr_switch: two_bits(data[7], 2),
            eng_test_mode_switch: two_bits(data[7], 4),
            eng_shutdown_override: two_bits(data[7], 6),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.int("two_spd_axle_switch", "Two speed axle switch", self.two_spd_axle_switch.into());
        v.int("parking_brake", "Parking brake switch", self.parking_brake.into());
        v.int("cc_pause_switch", "Cruise control pause switch", self.cc_pause_switch.into());
        v.real("wheel_based_vehicle_speed", "Wheel-based vehicle speed (m/s)", self.wheel_based_vehicle_speed, 3);
        v.int("cc_active", "Cruise control active", self.cc_active.into());
        v.int("cc_enable_switch", "Cruise control enable switch", self.cc_enable_switch.into());
        v.int("brake_switch", "Brake switch", self.brake_switch.into());
        v.int("clutch_switch", "Clutch switch", self.clutch_switch.into());
        v.int("cc_set_switch", "Cruise control set switch", self.cc_set_switch.into());
        v.int("cc_coast_switch", "Cruise control coast switch", self.cc_coast_switch.into());
        v.int("cc_resume_switch", "Cruise control resume switch", self.cc_resume_switch.into());
        v.int("cc_accelerate_switch", "Cruise control accelerate switch", self.cc_accelerate_switch.into());
        v.real("cc_set_speed", "Cruise control set speed (m/s)", self.cc_set_speed, 3);
        v.int("pto_state", "PTO state", self.pto_state.into());
        v.int("cc_state", "Cruise control state", self.cc_state.into());
        v.int("eng_idle_incr_switch", "Engine idle increment switch", self.eng_idle_incr_switch.into());
        v.int("eng_idle_decr_switch", "Engine idle decrement switch", self.eng_idle_decr_switch.into());
        v.int("eng_test_mode_switch", "Engine test mode switch", self.eng_test_mode_switch.into());
        v.int("eng_shutdown_override", "Engine shutdown override switch", self.eng_shutdown_override.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            two_spd_axle_switch: f.int()?,
            parking_brake: f.int()?,
            cc_pause_switch: f.int()?,
            wheel_based_vehicle_speed: f.real()?,
            cc_active: f.int()?,
            cc_enable_switch: f.int()?,
            brake_switch: f.int()?,
            clutch_switch: f.int()?,
            cc_set_switch: f.int()?,
            cc_coast_switch: f.int()?,
            cc_resume_switch: f.int()?,
            cc_accelerate_switch: f.int()?,
            cc_set_speed: f.real()?,
            pto_state: f.int()?,
            cc_state: f.int()?,
            eng_idle_incr_switch: if current { f.int()? } else { STATE_NOT_AVAILABLE },
            eng_idle_decr_switch: if current { f.int()? } else { STATE_NOT_AVAILABLE },
            eng_test_mode_switch: if current { f.int()? } else { STATE_NOT_AVAILABLE },
            eng_shutdown_override: if current { f.int()? } else { STATE_NOT_AVAILABLE },
        })
    }
}

/// Vehicle Distance
#[derive(Debug, Clone, PartialEq)]
pub struct Vd {
    pub timestamp: Timestamp,
    /// km
    pub trip_dist: f64,
    /// km
    pub tot_vehicle_dist: f64,
}

impl J1939Message for Vd {
    const PGN: Pgn = PGN_VD;
    const NAME: &'static str = "VD";
    const SCHEMAS: &'static [Schema] = &[Schema::current(2), Schema::legacy(1)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            trip_dist: distance_in_km(dword_le(data, 0)),
            tot_vehicle_dist: distance_in_km(dword_le(data, 4)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("trip_dist", "Trip distance (km)", self.trip_dist, 3);
        v.real("tot_vehicle_dist", "Total vehicle distance (km)", self.tot_vehicle_dist, 3);
    }

    // Older records carry the odometer only
    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let trip_dist = match version {
            SchemaVersion::Current => f.real()?,
            SchemaVersion::Legacy => NOT_AVAILABLE_REAL,
        };
        Ok(Self {
            timestamp,
            trip_dist,
            tot_vehicle_dist: f.real()?,
        })
    }
}

/// High Resolution Vehicle Distance
#[derive(Debug, Clone, PartialEq)]
pub struct Hrvd {
    pub timestamp: Timestamp,
    /// km
    pub vehicle_distance: f64,
    /// km
    pub trip_distance: f64,
}

impl J1939Message for Hrvd {
    const PGN: Pgn = PGN_HRVD;
    const NAME: &'static str = "HRVD";
    const SCHEMAS: &'static [Schema] = &[Schema::current(2), Schema::legacy(1)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            vehicle_distance: high_res_distance_in_km(dword_le(data, 0)),
            trip_distance: high_res_distance_in_km(dword_le(data, 4)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("vehicle_distance", "Total vehicle distance (km)", self.vehicle_distance, 3);
        v.real("trip_distance", "Trip distance (km)", self.trip_distance, 3);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            vehicle_distance: f.real()?,
            trip_distance: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Power Takeoff Information
#[derive(Debug, Clone, PartialEq)]
pub struct Pto {
    pub timestamp: Timestamp,
    /// PTO oil temperature, °C
    pub pto_oil_temp: f64,
    /// rpm
    pub pto_speed: f64,
    /// rpm
    pub pto_set_speed: f64,
    pub pto_enable_switch: u8,
    pub remote_preprogrammed_spd_switch: u8,
    pub remote_variable_spd_switch: u8,
    pub pto_set_switch: u8,
    pub pto_coast_switch: u8,
    pub pto_resume_switch: u8,
    pub pto_accelerate_switch: u8,
}

impl J1939Message for Pto {
    const PGN: Pgn = PGN_PTO;
    const NAME: &'static str = "PTO";
    const SCHEMAS: &'static [Schema] = &[Schema::current(10), Schema::legacy(3)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            pto_oil_temp: temp_m40_to_p210(data[0]),
            pto_speed: speed_in_rpm_2byte(word_le(data, 1)),
            pto_set_speed: speed_in_rpm_2byte(word_le(data, 3)),
            pto_enable_switch: two_bits(data[5], 0),
            remote_preprogrammed_spd_switch: two_bits(data[5], 2),
            remote_variable_spd_switch: two_bits(data[5], 4),
            pto_set_switch: two_bits(data[6], 0),
            pto_coast_switch: two_bits(data[6], 2),
            pto_resume_switch: two_bits(data[6], 4),
            pto_accelerate_switch: two_bits(data[6], 6),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("pto_oil_temp", "PTO oil temperature (C)", self.pto_oil_temp, 2);
        v.real("pto_speed", "PTO speed (rpm)", self.pto_speed, 3);
        v.real("pto_set_speed", "PTO set speed (rpm)", self.pto_set_speed, 3);
        v.int("pto_enable_switch", "PTO enable switch", self.pto_enable_switch.into());
        v.int("remote_preprogrammed_spd_switch", "Remote PTO preprogrammed speed switch", self.remote_preprogrammed_spd_switch.into());
        v.int("remote_variable_spd_switch", "Remote PTO variable speed switch", self.remote_variable_spd_switch.into());
        v.int("pto_set_switch", "PTO set switch", self.pto_set_switch.into());
        v.int("pto_coast_switch", "PTO coast/decelerate switch", self.pto_coast_switch.into());
        v.int("pto_resume_switch", "PTO resume switch", self.pto_resume_switch.into());
        v.int("pto_accelerate_switch", "PTO accelerate switch", self.pto_accelerate_switch.into());
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let pto_oil_temp = f.real()?;
        let pto_speed = f.real()?;
        let pto_set_speed = f.real()?;
        let mut switches = [STATE_NOT_AVAILABLE; 7];
        if version == SchemaVersion::Current {
            for switch in switches.iter_mut() {
                *switch = f.int()?;
            }
        }
        let [pto_enable_switch, remote_preprogrammed_spd_switch, remote_variable_spd_switch, pto_set_switch, pto_coast_switch, pto_resume_switch, pto_accelerate_switch] =
            switches;
        Ok(Self {
            timestamp,
            pto_oil_temp,
            pto_speed,
            pto_set_speed,
            pto_enable_switch,
            remote_preprogrammed_spd_switch,
            remote_variable_spd_switch,
            pto_set_switch,
            pto_coast_switch,
            pto_resume_switch,
            pto_accelerate_switch,
        })
    }
}

/// Ambient Conditions
#[derive(Debug, Clone, PartialEq)]
pub struct Ambc {
    pub timestamp: Timestamp,
    /// Barometric pressure, kPa
    pub baro_pressure: f64,
    /// Temperatures in °C
    pub cab_interior_temp: f64,
    pub ambient_air_temp: f64,
    pub air_inlet_temp: f64,
    pub road_surface_temp: f64,
}

impl J1939Message for Ambc {
    const PGN: Pgn = PGN_AMBC;
    const NAME: &'static str = "AMBC";
    const SCHEMAS: &'static [Schema] = &[Schema::current(5), Schema::legacy(4)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            baro_pressure: pressure_0_to_125kpa(data[0]),
            cab_interior_temp: temp_m273_to_p1734(word_le(data, 1)),
            ambient_air_temp: temp_m273_to_p1734(word_le(data, 3)),
            air_inlet_temp: temp_m40_to_p210(data[5]),
            road_surface_temp: temp_m273_to_p1734(word_le(data, 6)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("baro_pressure", "Barometric pressure (kPa)", self.baro_pressure, 2);
        v.real("cab_interior_temp", "Cab interior temperature (C)", self.cab_interior_temp, 2);
        v.real("ambient_air_temp", "Ambient air temperature (C)", self.ambient_air_temp, 2);
        v.real("air_inlet_temp", "Air inlet temperature (C)", self.air_inlet_temp, 2);
        v.real("road_surface_temp", "Road surface temperature (C)", self.road_surface_temp, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            baro_pressure: f.real()?,
            cab_interior_temp: f.real()?,
            ambient_air_temp: f.real()?,
            air_inlet_temp: f.real()?,
            road_surface_temp: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Inlet/Exhaust Conditions
#[derive(Debug, Clone, PartialEq)]
pub struct Iec {
    pub timestamp: Timestamp,
    /// Pressures in kPa, temperatures in °C
    pub particulate_inlet_pressure: f64,
    pub boost_pressure: f64,
    pub intake_manifold_temp: f64,
    pub air_inlet_pressure: f64,
    pub air_filter_diff_pressure: f64,
    pub exhaust_gas_temp: f64,
    pub coolant_filter_diff_pressure: f64,
}

impl J1939Message for Iec {
    const PGN: Pgn = PGN_IEC;
    const NAME: &'static str = "IEC";
    const SCHEMAS: &'static [Schema] = &[Schema::current(7), Schema::legacy(6)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            particulate_inlet_pressure: pressure_0_to_125kpa(data[0]),
            boost_pressure: pressure_0_to_500kpa(data[1]),
            intake_manifold_temp: temp_m40_to_p210(data[2]),
            air_inlet_pressure: pressure_0_to_500kpa(data[3]),
            air_filter_diff_pressure: pressure_0_to_12kpa(data[4]),
            exhaust_gas_temp: temp_m273_to_p1734(word_le(data, 5)),
            coolant_filter_diff_pressure: pressure_0_to_125kpa(data[7]),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("particulate_inlet_pressure", "Particulate trap inlet pressure (kPa)", self.particulate_inlet_pressure, 2);
        v.real("boost_pressure", "Boost pressure (kPa)", self.boost_pressure, 2);
        v.real("intake_manifold_temp", "Intake manifold temperature (C)", self.intake_manifold_temp, 2);
        v.real("air_inlet_pressure", "Air inlet pressure (kPa)", self.air_inlet_pressure, 2);
        v.real("air_filter_diff_pressure", "Air filter differential pressure (kPa)", self.air_filter_diff_pressure, 2);
        v.real("exhaust_gas_temp", "Exhaust gas temperature (C)", self.exhaust_gas_temp, 2);
        v.real("coolant_filter_diff_pressure", "Coolant filter differential pressure (kPa)", self.coolant_filter_diff_pressure, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            particulate_inlet_pressure: f.real()?,
            boost_pressure: f.real()?,
            intake_manifold_temp: f.real()?,
            air_inlet_pressure: f.real()?,
            air_filter_diff_pressure: f.real()?,
            exhaust_gas_temp: f.real()?,
            coolant_filter_diff_pressure: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Vehicle Electrical Power
#[derive(Debug, Clone, PartialEq)]
pub struct Vep {
    pub timestamp: Timestamp,
    /// Currents in A, potentials in V
    pub net_battery_current: f64,
    pub alternator_current: f64,
    pub alternator_potential: f64,
    pub electrical_potential: f64,
    pub battery_potential: f64,
}

impl J1939Message for Vep {
    const PGN: Pgn = PGN_VEP;
    const NAME: &'static str = "VEP";
    const SCHEMAS: &'static [Schema] = &[Schema::current(5), Schema::legacy(4)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            net_battery_current: current_m125_to_p125amp(data[0]),
            alternator_current: current_0_to_250amp(data[1]),
            alternator_potential: voltage_0_to_3212v(word_le(data, 2)),
            electrical_potential: voltage_0_to_3212v(word_le(data, 4)),
            battery_potential: voltage_0_to_3212v(word_le(data, 6)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("net_battery_current", "Net battery current (A)", self.net_battery_current, 2);
        v.real("alternator_current", "Alternator current (A)", self.alternator_current, 2);
        v.real("alternator_potential", "Alternator potential (V)", self.alternator_potential, 2);
        v.real("electrical_potential", "Electrical potential (V)", self.electrical_potential, 2);
        v.real("battery_potential", "Battery potential (V)", self.battery_potential, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            net_battery_current: f.real()?,
            alternator_current: f.real()?,
            alternator_potential: f.real()?,
            electrical_potential: f.real()?,
            battery_potential: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

/// Dash Display
#[derive(Debug, Clone, PartialEq)]
pub struct Dd {
    pub timestamp: Timestamp,
    /// Levels in %
    pub washer_fluid_level: f64,
    pub fuel_level: f64,
    /// Differential pressures in kPa
    pub fuel_filter_diff_pressure: f64,
    pub oil_filter_diff_pressure: f64,
    /// Cargo ambient temperature, °C
    pub cargo_ambient_temp: f64,
}

impl J1939Message for Dd {
    const PGN: Pgn = PGN_DD;
    const NAME: &'static str = "DD";
    const SCHEMAS: &'static [Schema] = &[Schema::current(5), Schema::legacy(2)];

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn decode(pdu: &Pdu, data: &[u8]) -> Self {
        Self {
            timestamp: pdu.timestamp,
            washer_fluid_level: percent_0_to_100(data[0]),
            fuel_level: percent_0_to_100(data[1]),
            fuel_filter_diff_pressure: pressure_0_to_500kpa(data[2]),
            oil_filter_diff_pressure: pressure_0_to_125kpa(data[3]),
            cargo_ambient_temp: temp_m273_to_p1734(word_le(data, 4)),
        }
    }

    fn visit(&self, v: &mut dyn FieldVisitor) {
        v.real("washer_fluid_level", "Washer fluid level (%)", self.washer_fluid_level, 2);
        v.real("fuel_level", "Fuel level (%)", self.fuel_level, 2);
        v.real("fuel_filter_diff_pressure", "Fuel filter differential pressure (kPa)", self.fuel_filter_diff_pressure, 2);
        v.real("oil_filter_diff_pressure", "Oil filter differential pressure (kPa)", self.oil_filter_diff_pressure, 2);
        v.real("cargo_ambient_temp", "Cargo ambient temperature (C)", self.cargo_ambient_temp, 2);
    }

    fn read(timestamp: Timestamp, version: SchemaVersion, f: &mut FieldReader<'_>) -> Result<Self> {
        let current = version == SchemaVersion::Current;
        Ok(Self {
            timestamp,
            washer_fluid_level: f.real()?,
            fuel_level: f.real()?,
            fuel_filter_diff_pressure: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            oil_filter_diff_pressure: if current { f.real()? } else { NOT_AVAILABLE_REAL },
            cargo_ambient_temp: if current { f.real()? } else { NOT_AVAILABLE_REAL },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::{line, pdu};
    use crate::network::{Interp, Interpreter, Message};

    #[test]
    fn ccvs_splits_state_byte() {
        // 90 km/h = 0x5A00
        let raw = pdu(PGN_CCVS, &[0xC4, 0x00, 0x5A, 0x01, 0xFF, 90, 0b101_00011, 0x00]);
        let Message::Ccvs(ccvs) = Interp::<Ccvs>::new().convert(&[raw]).unwrap() else {
            panic!("expected CCVS");
        };
        assert_eq!(ccvs.parking_brake, 1);
        assert!((ccvs.wheel_based_vehicle_speed - 25.0).abs() < 1e-9);
        assert_eq!(ccvs.cc_active, 1);
        assert_eq!(ccvs.cc_accelerate_switch, 3);
        assert!((ccvs.cc_set_speed - 25.0).abs() < 1e-9);
        assert_eq!(ccvs.pto_state, 3);
        assert_eq!(ccvs.cc_state, 5);
        assert_eq!(ccvs.eng_shutdown_override, 0);
    }

    #[test]
    fn vd_legacy_record_is_odometer_only() {
        let tokens = ["VD", "08:00:00.000", "123456.125"];
        let Message::Vd(vd) = Interp::<Vd>::new().import(&tokens).unwrap() else {
            panic!("expected VD");
        };
        assert_eq!(vd.trip_dist, NOT_AVAILABLE_REAL);
        assert_eq!(vd.tot_vehicle_dist, 123456.125);
    }

    #[test]
    fn distances_decode_little_endian() {
        let raw = pdu(PGN_VD, &[0x08, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        let message = Interp::<Vd>::new().convert(&[raw]).unwrap();
        assert_eq!(line(&message), "VD 12:34:56.789 1.000 -255.000");

        let raw = pdu(PGN_HRVD, &[200, 0, 0, 0, 0, 0, 0, 0]);
        let message = Interp::<Hrvd>::new().convert(&[raw]).unwrap();
        assert_eq!(line(&message), "HRVD 12:34:56.789 1.000 0.000");
    }

    #[test]
    fn pto_legacy_switches_are_not_available() {
        let tokens = ["PTO", "08:00:00.000", "40.00", "1000.000", "1100.000"];
        let Message::Pto(pto) = Interp::<Pto>::new().import(&tokens).unwrap() else {
            panic!("expected PTO");
        };
        assert_eq!(pto.pto_set_speed, 1100.0);
        assert_eq!(pto.pto_enable_switch, STATE_NOT_AVAILABLE);
        assert_eq!(pto.pto_accelerate_switch, STATE_NOT_AVAILABLE);
    }

    #[test]
    fn vep_decodes_potentials() {
        // 28.0 V = 560 counts
        let raw = pdu(PGN_VEP, &[115, 40, 0x30, 0x02, 0x30, 0x02, 0x30, 0x02]);
        let Message::Vep(vep) = Interp::<Vep>::new().convert(&[raw]).unwrap() else {
            panic!("expected VEP");
        };
        assert_eq!(vep.net_battery_current, -10.0);
        assert_eq!(vep.alternator_current, 40.0);
        assert!((vep.battery_potential - 28.0).abs() < 1e-9);
    }
}
