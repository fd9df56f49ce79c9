//! Calibration and actuator settings stored on the controller.
//!
//! Settings are readable and notify like telemetry, and can be written back
//! using the same layout.

use crate::record::define_record;

define_record! {
    /// Linear calibration for a single ADC input: `value = (raw - offset) * calibration_factor`.
    pub struct AdcCalibration {
        pub offset: f32,
        pub calibration_factor: f32,
    }
}

define_record! {
    /// Calibration for every ADC input, as five consecutive offset/factor pairs.
    pub struct AdcCalibrationSettings {
        pub battery: AdcCalibration,
        pub solar: AdcCalibration,
        pub water_pressure: AdcCalibration,
        pub solar_shunt: AdcCalibration,
        pub booster_shunt: AdcCalibration,
    }
}

define_record! {
    /// Servo end positions for the kitchen drawer lock and the wall cupboard.
    ///
    /// Positions are servo pulse values; `max_time_kitchen` is in milliseconds.
    pub struct ServoPositionSettings {
        pub open_pos_max_kitchen: i32,
        pub open_pos_hold_kitchen: i32,
        pub closed_pos_max_kitchen: i32,
        pub closed_pos_hold_kitchen: i32,
        pub max_time_kitchen: i32,
        pub open_pos_wall_cupboard: i32,
        pub closed_pos_wall_cupboard: i32,
    }
}

define_record! {
    /// Pulse-to-litre factors for the two flow meters.
    pub struct FlowCalibrationSettings {
        pub warm_water_flow_calibration_factor: f32,
        pub filter_water_flow_calibration_factor: f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decode::{DecodeErrorKind, decode_record},
        encode::encode_record,
        record::Record,
    };

    #[test]
    fn nested_pairs_are_flattened() {
        assert_eq!(AdcCalibration::FIELD_COUNT, 2);
        assert_eq!(AdcCalibrationSettings::FIELD_COUNT, 10);
        assert_eq!(AdcCalibrationSettings::SIZE, 40);
        assert_eq!(AdcCalibrationSettings::FIELDS.len(), 5);
    }

    #[test]
    fn adc_settings_pair_order() {
        let settings = AdcCalibrationSettings {
            battery: AdcCalibration {
                offset: 0.25,
                calibration_factor: 1.0,
            },
            booster_shunt: AdcCalibration {
                offset: -0.5,
                calibration_factor: 2.0,
            },
            ..Default::default()
        };

        let bytes = encode_record(&settings);
        assert_eq!(bytes.len(), 40);
        assert_eq!(bytes[0..4], 0.25f32.to_le_bytes());
        assert_eq!(bytes[4..8], 1.0f32.to_le_bytes());
        assert_eq!(bytes[32..36], (-0.5f32).to_le_bytes());
        assert_eq!(bytes[36..40], 2.0f32.to_le_bytes());
        assert_eq!(decode_record::<AdcCalibrationSettings>(&bytes).unwrap(), settings);
    }

    #[test]
    fn servo_settings_are_signed() {
        let mut bytes = alloc::vec::Vec::new();
        for value in [1200, 1100, 1800, 1700, 800, -1, 0] {
            bytes.extend_from_slice(&i32::to_le_bytes(value));
        }

        let servo = decode_record::<ServoPositionSettings>(&bytes).unwrap();
        assert_eq!(servo.open_pos_max_kitchen, 1200);
        assert_eq!(servo.max_time_kitchen, 800);
        assert_eq!(servo.open_pos_wall_cupboard, -1);
        assert_eq!(servo.closed_pos_wall_cupboard, 0);
    }

    #[test]
    fn short_settings_are_rejected() {
        let err = decode_record::<ServoPositionSettings>(&[0; 27]).unwrap_err();
        assert_eq!(
            err.kind(),
            DecodeErrorKind::ShortBuffer {
                expected: 28,
                found: 27
            }
        );

        let err = decode_record::<FlowCalibrationSettings>(&[]).unwrap_err();
        assert_eq!(
            err.kind(),
            DecodeErrorKind::ShortBuffer {
                expected: 8,
                found: 0
            }
        );
    }
}
