//! Property tests for the record codec.

use proptest::prelude::*;
use pumba_protocol::{
    DecodeErrorKind, Record, decode_record, encode_record,
    settings::{
        AdcCalibration, AdcCalibrationSettings, FlowCalibrationSettings, ServoPositionSettings,
    },
    telemetry::{Acceleration, PowerMeasurement, SolarChargerSummary, WaterFlow},
};

fn adc_calibration() -> impl Strategy<Value = AdcCalibration> {
    (any::<f32>(), any::<f32>()).prop_map(|(offset, calibration_factor)| AdcCalibration {
        offset,
        calibration_factor,
    })
}

/// Encoding, decoding and re-encoding must reproduce the original bytes.
/// Comparing bytes rather than values keeps NaN fields equal to themselves.
fn assert_stable<R: Record + core::fmt::Debug>(value: &R) -> Result<(), TestCaseError> {
    let bytes = encode_record(value);
    prop_assert_eq!(bytes.len(), R::SIZE);

    let decoded: R = decode_record(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(encode_record(&decoded), bytes);
    Ok(())
}

/// Shortening by one byte fails, lengthening by any amount succeeds.
fn assert_length_sensitive<R: Record + PartialEq + core::fmt::Debug>(
    value: &R,
    extra: &[u8],
) -> Result<(), TestCaseError> {
    let bytes = encode_record(value);

    let err = decode_record::<R>(&bytes[..R::SIZE - 1]).unwrap_err();
    prop_assert_eq!(
        err.kind(),
        DecodeErrorKind::ShortBuffer {
            expected: R::SIZE,
            found: R::SIZE - 1
        }
    );

    let mut longer = bytes.clone();
    longer.extend_from_slice(extra);
    let decoded: R = decode_record(&longer).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(encode_record(&decoded), bytes);
    Ok(())
}

proptest! {
    #[test]
    fn acceleration_round_trip(ax in any::<f32>(), ay in any::<f32>(), az in any::<f32>()) {
        assert_stable(&Acceleration { ax, ay, az })?;
    }

    #[test]
    fn water_flow_round_trip(values in prop::array::uniform4(any::<f32>())) {
        let [warm_flow, warm_total, filter_flow, filter_total] = values;
        assert_stable(&WaterFlow { warm_flow, warm_total, filter_flow, filter_total })?;
    }

    #[test]
    fn finite_records_compare_equal(values in prop::array::uniform4(-1.0e6f32..1.0e6)) {
        let flow = WaterFlow {
            warm_flow: values[0],
            warm_total: values[1],
            filter_flow: values[2],
            filter_total: values[3],
        };
        prop_assert_eq!(decode_record::<WaterFlow>(&encode_record(&flow)).unwrap(), flow);
    }

    #[test]
    fn power_measurement_round_trip(values in prop::collection::vec(any::<f32>(), 14)) {
        let mut bytes = Vec::new();
        for value in &values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let power: PowerMeasurement = decode_record(&bytes).unwrap();
        prop_assert_eq!(encode_record(&power), bytes);
    }

    #[test]
    fn adc_settings_round_trip(
        battery in adc_calibration(),
        solar in adc_calibration(),
        water_pressure in adc_calibration(),
        solar_shunt in adc_calibration(),
        booster_shunt in adc_calibration(),
    ) {
        assert_stable(&AdcCalibrationSettings { battery, solar, water_pressure, solar_shunt, booster_shunt })?;
    }

    #[test]
    fn servo_settings_round_trip(values in prop::array::uniform7(any::<i32>())) {
        let servo = ServoPositionSettings {
            open_pos_max_kitchen: values[0],
            open_pos_hold_kitchen: values[1],
            closed_pos_max_kitchen: values[2],
            closed_pos_hold_kitchen: values[3],
            max_time_kitchen: values[4],
            open_pos_wall_cupboard: values[5],
            closed_pos_wall_cupboard: values[6],
        };
        prop_assert_eq!(decode_record::<ServoPositionSettings>(&encode_record(&servo)).unwrap(), servo);
    }

    #[test]
    fn length_sensitivity(
        soc in any::<f32>(),
        power in any::<f32>(),
        warm in any::<f32>(),
        filter in any::<f32>(),
        extra in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        assert_length_sensitive(&SolarChargerSummary { soc, power }, &extra)?;
        assert_length_sensitive(
            &FlowCalibrationSettings {
                warm_water_flow_calibration_factor: warm,
                filter_water_flow_calibration_factor: filter,
            },
            &extra,
        )?;
        assert_length_sensitive(&AdcCalibrationSettings::default(), &extra)?;
    }

    #[test]
    fn telemetry_length_sensitivity(
        floats in prop::collection::vec(any::<f32>(), 14),
        extra in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        assert_length_sensitive(
            &Acceleration { ax: floats[0], ay: floats[1], az: floats[2] },
            &extra,
        )?;
        assert_length_sensitive(
            &WaterFlow {
                warm_flow: floats[0],
                warm_total: floats[1],
                filter_flow: floats[2],
                filter_total: floats[3],
            },
            &extra,
        )?;

        let bytes: Vec<u8> = floats.iter().flat_map(|v| v.to_le_bytes()).collect();
        let power: PowerMeasurement = decode_record(&bytes).unwrap();
        assert_length_sensitive(&power, &extra)?;
    }

    #[test]
    fn servo_settings_length_sensitivity(
        values in prop::array::uniform7(any::<i32>()),
        extra in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        let servo = ServoPositionSettings {
            open_pos_max_kitchen: values[0],
            open_pos_hold_kitchen: values[1],
            closed_pos_max_kitchen: values[2],
            closed_pos_hold_kitchen: values[3],
            max_time_kitchen: values[4],
            open_pos_wall_cupboard: values[5],
            closed_pos_wall_cupboard: values[6],
        };
        assert_length_sensitive(&servo, &extra)?;
    }
}
