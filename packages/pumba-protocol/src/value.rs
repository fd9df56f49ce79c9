use crate::{
    channel::Channel,
    settings::{AdcCalibrationSettings, FlowCalibrationSettings, ServoPositionSettings},
    telemetry::{Acceleration, PowerMeasurement, SolarChargerSummary, WaterFlow},
};

/// A decoded payload, tagged with the slot it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelValue {
    /// Degrees Celsius.
    SewageTemperature(f32),
    WaterPump(bool),
    Inverter(bool),
    TankHeater(bool),
    SewageValve(bool),
    Locked(bool),
    WaterFlow(WaterFlow),
    Power(PowerMeasurement),
    Acceleration(Acceleration),
    SolarCharger(SolarChargerSummary),
    AdcSettings(AdcCalibrationSettings),
    ServoSettings(ServoPositionSettings),
    FlowSettings(FlowCalibrationSettings),
}

impl ChannelValue {
    /// The channel this value is carried on.
    pub const fn channel(&self) -> Channel {
        match self {
            ChannelValue::SewageTemperature(_) => Channel::SewageTemperature,
            ChannelValue::WaterPump(_) => Channel::WaterPump,
            ChannelValue::Inverter(_) => Channel::Inverter,
            ChannelValue::TankHeater(_) => Channel::TankHeater,
            ChannelValue::SewageValve(_) => Channel::SewageValve,
            ChannelValue::Locked(_) => Channel::IsLocked,
            ChannelValue::WaterFlow(_) => Channel::WaterFlow,
            ChannelValue::Power(_) => Channel::Adc,
            ChannelValue::Acceleration(_) => Channel::Acceleration,
            ChannelValue::SolarCharger(_) => Channel::VeDirect,
            ChannelValue::AdcSettings(_) => Channel::AdcSettings,
            ChannelValue::ServoSettings(_) => Channel::ServoSettings,
            ChannelValue::FlowSettings(_) => Channel::FlowSettings,
        }
    }
}
