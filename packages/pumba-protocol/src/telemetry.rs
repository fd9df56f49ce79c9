//! Periodic telemetry records published by the controller.

use crate::record::define_record;

define_record! {
    /// Readings from the on-board accelerometer, in g.
    pub struct Acceleration {
        pub ax: f32,
        pub ay: f32,
        pub az: f32,
    }
}

define_record! {
    /// Flow meter readings for the warm water line and the drinking water filter.
    pub struct WaterFlow {
        /// Litres per minute.
        pub warm_flow: f32,
        /// Litres since the counter was last reset.
        pub warm_total: f32,
        /// Litres per minute.
        pub filter_flow: f32,
        /// Litres since the counter was last reset.
        pub filter_total: f32,
    }
}

define_record! {
    /// ADC channel readings and the integrated energy counters derived from them.
    ///
    /// The booster is the DC-DC charger fed from the vehicle alternator.
    pub struct PowerMeasurement {
        pub battery_v: f32,
        pub solar_v: f32,
        pub sewage_v: f32,
        /// Raw pressure sensor output. See [`PowerMeasurement::water_pressure_bar`].
        pub water_pressure_v: f32,
        pub booster_a: f32,
        pub booster_ah: f32,
        pub booster_w: f32,
        pub booster_wh: f32,
        pub booster_total_wh: f32,
        pub solar_a: f32,
        pub solar_ah: f32,
        pub solar_w: f32,
        pub solar_wh: f32,
        pub solar_total_wh: f32,
    }
}

impl PowerMeasurement {
    /// Supply line pressure in bar.
    ///
    /// The sensor is ratiometric: 0.5 V at 0 bar up to 5.0 V at 10 bar.
    pub fn water_pressure_bar(&self) -> f32 {
        (self.water_pressure_v - 0.5) * 10.0 / 4.5
    }
}

define_record! {
    /// Summary reported by the solar charge controller over VE.Direct.
    pub struct SolarChargerSummary {
        /// Battery state of charge in percent.
        pub soc: f32,
        /// Watts.
        pub power: f32,
    }
}
