//! In-memory model of the controller.

use pumba_protocol::{
    Channel, ChannelValue,
    settings::{AdcCalibrationSettings, FlowCalibrationSettings, ServoPositionSettings},
    telemetry::{Acceleration, PowerMeasurement, SolarChargerSummary, WaterFlow},
};

/// Relay or valve that is switched with a single flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    /// 230 V inverter.
    Inverter,
    WaterPump,
    /// Heating pad under the grey water tank.
    TankHeater,
    /// Grey water drain valve.
    SewageValve,
}

impl Actuator {
    pub const ALL: [Actuator; 4] = [
        Actuator::Inverter,
        Actuator::WaterPump,
        Actuator::TankHeater,
        Actuator::SewageValve,
    ];

    pub const fn channel(self) -> Channel {
        match self {
            Actuator::Inverter => Channel::Inverter,
            Actuator::WaterPump => Channel::WaterPump,
            Actuator::TankHeater => Channel::TankHeater,
            Actuator::SewageValve => Channel::SewageValve,
        }
    }
}

/// Latest known value of every channel.
///
/// A fresh state is all zeroes and `false`. Values are overwritten as updates
/// arrive; there is no history.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DeviceState {
    /// Degrees Celsius.
    pub sewage_temperature: f32,
    pub water_flow: WaterFlow,
    pub acceleration: Acceleration,
    pub power: PowerMeasurement,
    pub solar_charger: SolarChargerSummary,
    pub adc_settings: AdcCalibrationSettings,
    pub servo_settings: ServoPositionSettings,
    pub flow_settings: FlowCalibrationSettings,

    pub inverter_on: bool,
    pub water_pump_on: bool,
    pub tank_heater_on: bool,
    pub sewage_valve_open: bool,
    pub locked: bool,

    /// Set once the first payload has been decoded. Never cleared.
    pub data_ready: bool,
    /// Whether the owning session is still live.
    pub connected: bool,
}

impl DeviceState {
    /// Writes `value` into its slot. Readiness is left alone.
    pub fn set(&mut self, value: ChannelValue) {
        match value {
            ChannelValue::SewageTemperature(v) => self.sewage_temperature = v,
            ChannelValue::WaterPump(v) => self.water_pump_on = v,
            ChannelValue::Inverter(v) => self.inverter_on = v,
            ChannelValue::TankHeater(v) => self.tank_heater_on = v,
            ChannelValue::SewageValve(v) => self.sewage_valve_open = v,
            ChannelValue::Locked(v) => self.locked = v,
            ChannelValue::WaterFlow(v) => self.water_flow = v,
            ChannelValue::Power(v) => self.power = v,
            ChannelValue::Acceleration(v) => self.acceleration = v,
            ChannelValue::SolarCharger(v) => self.solar_charger = v,
            ChannelValue::AdcSettings(v) => self.adc_settings = v,
            ChannelValue::ServoSettings(v) => self.servo_settings = v,
            ChannelValue::FlowSettings(v) => self.flow_settings = v,
        }
    }

    /// Stores a value decoded from the device and marks the state as ready.
    pub fn apply(&mut self, value: ChannelValue) {
        self.set(value);
        self.data_ready = true;
    }

    pub fn actuator(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Inverter => self.inverter_on,
            Actuator::WaterPump => self.water_pump_on,
            Actuator::TankHeater => self.tank_heater_on,
            Actuator::SewageValve => self.sewage_valve_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zeroed() {
        let state = DeviceState::default();
        assert!(!state.data_ready);
        assert!(!state.connected);
        assert_eq!(state.water_flow, WaterFlow::default());
        assert_eq!(state.servo_settings.max_time_kitchen, 0);
        assert!(Actuator::ALL.iter().all(|a| !state.actuator(*a)));
    }

    #[test]
    fn apply_sets_slot_and_ready() {
        let mut state = DeviceState::default();
        state.apply(ChannelValue::TankHeater(true));

        assert!(state.tank_heater_on);
        assert!(state.actuator(Actuator::TankHeater));
        assert!(!state.inverter_on);
        assert!(state.data_ready);
    }

    #[test]
    fn set_leaves_readiness_alone() {
        let mut state = DeviceState::default();
        state.set(ChannelValue::Locked(true));

        assert!(state.locked);
        assert!(!state.data_ready);
    }

    #[test]
    fn newest_value_wins() {
        let mut state = DeviceState::default();
        state.apply(ChannelValue::SewageTemperature(12.0));
        state.apply(ChannelValue::SewageTemperature(9.5));

        assert_eq!(state.sewage_temperature, 9.5);
    }
}
