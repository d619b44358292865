//! Raw parameter to engineering unit conversions (J1939-71 scaling).
//!
//! Every decoder maps the valid raw range onto its physical range. Raw bytes
//! above 250, or multi-byte values whose most significant byte is above 250,
//! are error or "not available" indicators: the decoders return them negated
//! so a caller can tell them apart from a reading and still recover the code.

use super::bits::{hi_byte, lo_byte, top_byte};

/// Largest raw byte (or most significant byte) that carries a valid reading
pub const MAX_VALID_BYTE: u8 = 250;

/// Decoded value of a 0xFF "not available" byte
pub const NOT_AVAILABLE: f64 = -255.0;

#[inline]
fn scale_byte(raw: u8, resolution: f64, offset: f64) -> f64 {
    if raw > MAX_VALID_BYTE {
        -f64::from(raw)
    } else {
        f64::from(raw) * resolution + offset
    }
}

#[inline]
fn scale_word(raw: u16, resolution: f64, offset: f64) -> f64 {
    let hi = hi_byte(raw);
    if hi > MAX_VALID_BYTE {
        -f64::from(hi)
    } else {
        f64::from(raw) * resolution + offset
    }
}

#[inline]
fn scale_dword(raw: u32, resolution: f64, offset: f64) -> f64 {
    let top = top_byte(raw);
    if top > MAX_VALID_BYTE {
        -f64::from(top)
    } else {
        f64::from(raw) * resolution + offset
    }
}

const KPH_TO_MPS: f64 = 1000.0 / 3600.0;

/// 0.4 %/bit, 0 to 100 %
pub fn percent_0_to_100(raw: u8) -> f64 {
    scale_byte(raw, 0.4, 0.0)
}

/// 1 %/bit, 0 to 250 %
pub fn percent_0_to_250(raw: u8) -> f64 {
    scale_byte(raw, 1.0, 0.0)
}

/// 1 %/bit, -125 % offset
pub fn percent_m125_to_p125(raw: u8) -> f64 {
    scale_byte(raw, 1.0, -125.0)
}

/// Gear position, -125 offset; negative values are reverse gears
pub fn gear_m125_to_p125(raw: u8) -> i16 {
    if raw > MAX_VALID_BYTE {
        -i16::from(raw)
    } else {
        i16::from(raw) - 125
    }
}

/// Unscaled count, 0 to 250
pub fn count_0_to_250(raw: u8) -> i16 {
    if raw > MAX_VALID_BYTE {
        -i16::from(raw)
    } else {
        i16::from(raw)
    }
}

/// 10 rpm/bit, 0 to 2500 rpm
pub fn speed_in_rpm_1byte(raw: u8) -> f64 {
    scale_byte(raw, 10.0, 0.0)
}

/// 0.125 rpm/bit, 0 to 8031.875 rpm
pub fn speed_in_rpm_2byte(raw: u16) -> f64 {
    scale_word(raw, 0.125, 0.0)
}

/// 4 rpm/bit, 0 to 257,020 rpm
pub fn rotor_speed_in_rpm(raw: u16) -> f64 {
    scale_word(raw, 4.0, 0.0)
}

/// Wheel-based speed in m/s.
///
/// The high byte is whole km/h and the low byte 1/256 km/h.
pub fn wheel_based_mps(raw: u16) -> f64 {
    let hi = hi_byte(raw);
    if hi > MAX_VALID_BYTE {
        return -f64::from(hi);
    }
    let kph = f64::from(hi) + f64::from(lo_byte(raw)) / 256.0;
    kph * KPH_TO_MPS
}

/// Wheel speed relative to the front axle in m/s, 1/16 km/h per bit, -7.8125 km/h offset
pub fn wheel_based_mps_relative(raw: u8) -> f64 {
    if raw > MAX_VALID_BYTE {
        return -f64::from(raw);
    }
    (f64::from(raw) / 16.0 - 7.8125) * KPH_TO_MPS
}

/// Cruise control set speed in m/s, 1 km/h per bit
pub fn cruise_set_mps(raw: u8) -> f64 {
    scale_byte(raw, KPH_TO_MPS, 0.0)
}

/// 1 °C/bit, -40 °C offset
pub fn temp_m40_to_p210(raw: u8) -> f64 {
    scale_byte(raw, 1.0, -40.0)
}

/// 0.03125 °C/bit, -273 °C offset
pub fn temp_m273_to_p1734(raw: u16) -> f64 {
    scale_word(raw, 0.03125, -273.0)
}

/// 0.05 kPa/bit
pub fn pressure_0_to_12kpa(raw: u8) -> f64 {
    scale_byte(raw, 0.05, 0.0)
}

/// 0.5 kPa/bit
pub fn pressure_0_to_125kpa(raw: u8) -> f64 {
    scale_byte(raw, 0.5, 0.0)
}

/// 2 kPa/bit
pub fn pressure_0_to_500kpa(raw: u8) -> f64 {
    scale_byte(raw, 2.0, 0.0)
}

/// 4 kPa/bit
pub fn pressure_0_to_1000kpa(raw: u8) -> f64 {
    scale_byte(raw, 4.0, 0.0)
}

/// 16 kPa/bit
pub fn pressure_0_to_4000kpa(raw: u8) -> f64 {
    scale_byte(raw, 16.0, 0.0)
}

/// 1/128 kPa/bit, -250 kPa offset
pub fn pressure_m250_to_p252kpa(raw: u16) -> f64 {
    scale_word(raw, 1.0 / 128.0, -250.0)
}

/// 1 A/bit, -125 A offset
pub fn current_m125_to_p125amp(raw: u8) -> f64 {
    scale_byte(raw, 1.0, -125.0)
}

/// 1 A/bit
pub fn current_0_to_250amp(raw: u8) -> f64 {
    scale_byte(raw, 1.0, 0.0)
}

/// 0.05 V/bit
pub fn voltage_0_to_3212v(raw: u16) -> f64 {
    scale_word(raw, 0.05, 0.0)
}

/// 0.125 km/bit
pub fn distance_in_km(raw: u32) -> f64 {
    scale_dword(raw, 0.125, 0.0)
}

/// 5 m/bit, reported in km
pub fn high_res_distance_in_km(raw: u32) -> f64 {
    scale_dword(raw, 0.005, 0.0)
}

/// 0.05 L/h per bit
pub fn fuel_rate_lph(raw: u16) -> f64 {
    scale_word(raw, 0.05, 0.0)
}

/// 1/512 km/L per bit
pub fn fuel_economy_kmpl(raw: u16) -> f64 {
    scale_word(raw, 1.0 / 512.0, 0.0)
}

/// 0.1 m³/h per bit
pub fn gas_flow_m3ph(raw: u16) -> f64 {
    scale_word(raw, 0.1, 0.0)
}

/// 0.05 kg/h per bit
pub fn mass_flow_kgph(raw: u16) -> f64 {
    scale_word(raw, 0.05, 0.0)
}

/// 0.5 kW/bit
pub fn power_kw(raw: u16) -> f64 {
    scale_word(raw, 0.5, 0.0)
}

/// 0.001/bit
pub fn gear_ratio(raw: u16) -> f64 {
    scale_word(raw, 0.001, 0.0)
}

/// 1 Nm/bit
pub fn torque_in_nm(raw: u16) -> f64 {
    scale_word(raw, 1.0, 0.0)
}

/// Governor gain, 0.0007813 %/rpm per bit
pub fn gain_kp(raw: u16) -> f64 {
    scale_word(raw, 0.0007813, 0.0)
}

/// 0.1 s/bit
pub fn time_0_to_25sec(raw: u8) -> f64 {
    scale_byte(raw, 0.1, 0.0)
}

/// Acceleration demand, 1/2048 m/s² per bit, -15.687 m/s² offset
pub fn deceleration(raw: u16) -> f64 {
    scale_word(raw, 1.0 / 2048.0, -15.687)
}

/// Encodes a torque percentage, clamped to -125..=125 %
pub fn code_percent_m125_to_p125(percent: f64) -> u8 {
    (percent.clamp(-125.0, 125.0) + 125.0).round() as u8
}

/// Encodes an engine speed at 0.125 rpm/bit, clamped to 0..=8031.875 rpm
pub fn code_engine_speed(rpm: f64) -> u16 {
    (rpm.clamp(0.0, 8031.875) / 0.125).round() as u16
}

/// Encodes an acceleration demand, clamped to -15.687..=15.687 m/s²
pub fn deceleration_to_short(accel: f64) -> u16 {
    ((accel.clamp(-15.687, 15.687) + 15.687) * 2048.0).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    const BYTE_DECODERS: &[(&str, fn(u8) -> f64)] = &[
        ("percent_0_to_100", percent_0_to_100),
        ("percent_0_to_250", percent_0_to_250),
        ("percent_m125_to_p125", percent_m125_to_p125),
        ("speed_in_rpm_1byte", speed_in_rpm_1byte),
        ("wheel_based_mps_relative", wheel_based_mps_relative),
        ("cruise_set_mps", cruise_set_mps),
        ("temp_m40_to_p210", temp_m40_to_p210),
        ("pressure_0_to_12kpa", pressure_0_to_12kpa),
        ("pressure_0_to_125kpa", pressure_0_to_125kpa),
        ("pressure_0_to_500kpa", pressure_0_to_500kpa),
        ("pressure_0_to_1000kpa", pressure_0_to_1000kpa),
        ("pressure_0_to_4000kpa", pressure_0_to_4000kpa),
        ("current_m125_to_p125amp", current_m125_to_p125amp),
        ("current_0_to_250amp", current_0_to_250amp),
        ("time_0_to_25sec", time_0_to_25sec),
    ];

    const WORD_DECODERS: &[(&str, fn(u16) -> f64)] = &[
        ("speed_in_rpm_2byte", speed_in_rpm_2byte),
        ("rotor_speed_in_rpm", rotor_speed_in_rpm),
        ("wheel_based_mps", wheel_based_mps),
        ("temp_m273_to_p1734", temp_m273_to_p1734),
        ("pressure_m250_to_p252kpa", pressure_m250_to_p252kpa),
        ("voltage_0_to_3212v", voltage_0_to_3212v),
        ("fuel_rate_lph", fuel_rate_lph),
        ("fuel_economy_kmpl", fuel_economy_kmpl),
        ("gas_flow_m3ph", gas_flow_m3ph),
        ("mass_flow_kgph", mass_flow_kgph),
        ("power_kw", power_kw),
        ("gear_ratio", gear_ratio),
        ("torque_in_nm", torque_in_nm),
        ("gain_kp", gain_kp),
        ("deceleration", deceleration),
    ];

    #[test]
    fn percent_scales_by_four_tenths() {
        assert!(close(percent_0_to_100(0x32), 20.0));
        assert!(close(percent_0_to_100(250), 100.0));
        assert_eq!(percent_0_to_100(251), -251.0);
        assert_eq!(percent_0_to_100(0xFF), NOT_AVAILABLE);
    }

    #[test]
    fn offset_scales() {
        assert!(close(percent_m125_to_p125(0), -125.0));
        assert!(close(percent_m125_to_p125(125), 0.0));
        assert!(close(temp_m40_to_p210(0), -40.0));
        assert!(close(temp_m40_to_p210(250), 210.0));
        assert!(close(temp_m273_to_p1734(0x2220), 0.0));
        assert!(close(pressure_m250_to_p252kpa(250 * 128), 0.0));
        assert_eq!(gear_m125_to_p125(124), -1);
        assert_eq!(gear_m125_to_p125(0xFB), -251);
    }

    #[test]
    fn wheel_speed_combines_whole_and_fractional_kph() {
        assert_eq!(wheel_based_mps(0x0000), 0.0);
        assert!((wheel_based_mps(0xFA00) - 69.444).abs() < 1e-3);
        assert!(close(wheel_based_mps(0x0A80), 10.5 * 1000.0 / 3600.0));
        assert_eq!(wheel_based_mps(0xFB00), -251.0);
    }

    #[test]
    fn relative_wheel_speed_is_centered() {
        assert!(close(wheel_based_mps_relative(125), 0.0));
        assert!(close(wheel_based_mps_relative(0), -7.8125 * 1000.0 / 3600.0));
    }

    #[test]
    fn distances_use_top_byte_sentinel() {
        assert!(close(distance_in_km(8), 1.0));
        assert!(close(high_res_distance_in_km(200), 1.0));
        assert_eq!(distance_in_km(0xFFFF_FFFF), -255.0);
        assert_eq!(high_res_distance_in_km(0xFB00_0000), -251.0);
    }

    #[test]
    fn encoders_invert_decoders() {
        assert_eq!(code_percent_m125_to_p125(4.0), 129);
        assert!(close(percent_m125_to_p125(code_percent_m125_to_p125(-30.0)), -30.0));
        assert_eq!(code_engine_speed(3.0), 24);
        assert!(close(speed_in_rpm_2byte(code_engine_speed(1200.5)), 1200.5));
        let raw = deceleration_to_short(-2.0);
        assert!((deceleration(raw) - -2.0).abs() < 1.0 / 2048.0);
    }

    #[test]
    fn encoders_clamp() {
        assert_eq!(code_percent_m125_to_p125(500.0), 250);
        assert_eq!(code_percent_m125_to_p125(-500.0), 0);
        assert_eq!(code_engine_speed(-1.0), 0);
        assert_eq!(code_engine_speed(10_000.0), 64_255);
        assert!(hi_byte(deceleration_to_short(100.0)) <= MAX_VALID_BYTE);
    }

    proptest! {
        #[test]
        fn byte_sentinels_negate_raw(raw in 251u8..=255) {
            for (name, decode) in BYTE_DECODERS {
                prop_assert_eq!(decode(raw), -f64::from(raw), "{}", name);
            }
            prop_assert_eq!(gear_m125_to_p125(raw), -i16::from(raw));
            prop_assert_eq!(count_0_to_250(raw), -i16::from(raw));
        }

        #[test]
        fn byte_readings_are_not_sentinels(raw in 0u8..=250) {
            prop_assert!(percent_0_to_100(raw) >= 0.0);
            prop_assert!(percent_m125_to_p125(raw) >= -125.0);
            prop_assert!(temp_m40_to_p210(raw) >= -40.0);
        }

        #[test]
        fn word_sentinels_negate_high_byte(hi in 251u8..=255, lo in any::<u8>()) {
            let raw = (u16::from(hi) << 8) | u16::from(lo);
            for (name, decode) in WORD_DECODERS {
                prop_assert_eq!(decode(raw), -f64::from(hi), "{}", name);
            }
        }

        #[test]
        fn dword_sentinels_negate_top_byte(top in 251u8..=255, rest in 0u32..0x0100_0000) {
            let raw = (u32::from(top) << 24) | rest;
            prop_assert_eq!(distance_in_km(raw), -f64::from(top));
            prop_assert_eq!(high_res_distance_in_km(raw), -f64::from(top));
        }
    }
}
