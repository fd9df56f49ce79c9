//! Actuator commands.
//!
//! A [`Command`] only describes what to write; [`Session::execute`] performs
//! the writes. Keeping the encoding pure makes the byte codes easy to audit
//! against the firmware.
//!
//! [`Session::execute`]: crate::session::Session::execute

use std::time::Duration;

use pumba_protocol::{
    Channel, ChannelValue, Encode, encode_u8,
    settings::{AdcCalibrationSettings, FlowCalibrationSettings, ServoPositionSettings},
};

use crate::{state::Actuator, transport::WriteKind};

/// First byte of the lock sequence when locking. Drives the servo into the latch.
pub const LOCK_HOLD: u8 = b'S';
/// First byte of the lock sequence when unlocking.
pub const UNLOCK_HOLD: u8 = b'#';
/// Second byte of the lock sequence after locking. Releases servo tension.
pub const LOCK_SETTLE: u8 = b'N';
/// Second byte of the lock sequence after unlocking.
pub const UNLOCK_SETTLE: u8 = b'B';

/// Time the lock servo needs to reach its end position before it can be released.
pub const LOCK_SETTLE_DELAY: Duration = Duration::from_millis(250);

/// A single characteristic write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub channel: Channel,
    pub payload: Vec<u8>,
    pub kind: WriteKind,
}

impl Write {
    /// An acknowledged write.
    pub fn acked(channel: Channel, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            channel,
            payload: payload.into(),
            kind: WriteKind::WithResponse,
        }
    }
}

/// A write that fires after `delay`, provided the session is still live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred {
    pub delay: Duration,
    pub write: Write,
}

/// Everything a command needs the session to do.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub immediate: Write,
    pub deferred: Option<Deferred>,
    /// Value to store locally once the immediate write has been acknowledged.
    pub optimistic: Option<ChannelValue>,
}

impl Plan {
    pub fn single(write: Write) -> Self {
        Self {
            immediate: write,
            deferred: None,
            optimistic: None,
        }
    }
}

pub trait Command {
    fn plan(&self) -> Plan;
}

/// Switches a relay or valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetActuator {
    pub actuator: Actuator,
    pub on: bool,
}

impl Command for SetActuator {
    fn plan(&self) -> Plan {
        Plan::single(Write::acked(
            self.actuator.channel(),
            encode_u8(u8::from(self.on)),
        ))
    }
}

/// Moves the kitchen drawer servo to a raw position.
///
/// The usable range is 0 to 120. The position is not validated; it is
/// truncated to a byte, so fractions are dropped and values outside 0..=255
/// saturate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetServoPosition {
    pub position: f64,
}

impl Command for SetServoPosition {
    fn plan(&self) -> Plan {
        Plan::single(Write::acked(
            Channel::KitchenServo,
            encode_u8(self.position as u8),
        ))
    }
}

/// Locks or unlocks the cupboard.
///
/// This is two independent writes to [`Channel::KitchenServo`]: a hold code
/// that moves the servo, then after [`LOCK_SETTLE_DELAY`] a settle code that
/// releases it. If the session ends in between, the settle code is never sent
/// and the servo keeps holding until the command is issued again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetLock {
    pub locked: bool,
}

impl Command for SetLock {
    fn plan(&self) -> Plan {
        let (hold, settle) = if self.locked {
            (LOCK_HOLD, LOCK_SETTLE)
        } else {
            (UNLOCK_HOLD, UNLOCK_SETTLE)
        };

        Plan {
            immediate: Write::acked(Channel::KitchenServo, encode_u8(hold)),
            deferred: Some(Deferred {
                delay: LOCK_SETTLE_DELAY,
                write: Write::acked(Channel::KitchenServo, encode_u8(settle)),
            }),
            optimistic: None,
        }
    }
}

/// Any settings record the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settings {
    Adc(AdcCalibrationSettings),
    Servo(ServoPositionSettings),
    Flow(FlowCalibrationSettings),
}

impl Settings {
    pub const fn channel(&self) -> Channel {
        match self {
            Settings::Adc(_) => Channel::AdcSettings,
            Settings::Servo(_) => Channel::ServoSettings,
            Settings::Flow(_) => Channel::FlowSettings,
        }
    }

    /// Packed wire form of the record.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Settings::Adc(settings) => settings.to_vec(),
            Settings::Servo(settings) => settings.to_vec(),
            Settings::Flow(settings) => settings.to_vec(),
        }
    }

    pub const fn value(&self) -> ChannelValue {
        match *self {
            Settings::Adc(settings) => ChannelValue::AdcSettings(settings),
            Settings::Servo(settings) => ChannelValue::ServoSettings(settings),
            Settings::Flow(settings) => ChannelValue::FlowSettings(settings),
        }
    }
}

impl From<AdcCalibrationSettings> for Settings {
    fn from(settings: AdcCalibrationSettings) -> Self {
        Settings::Adc(settings)
    }
}
impl From<ServoPositionSettings> for Settings {
    fn from(settings: ServoPositionSettings) -> Self {
        Settings::Servo(settings)
    }
}
impl From<FlowCalibrationSettings> for Settings {
    fn from(settings: FlowCalibrationSettings) -> Self {
        Settings::Flow(settings)
    }
}

/// Stores a settings record on the controller.
///
/// Once acknowledged, the record is also applied to the local state so
/// observers see it before the controller echoes it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteSettings(pub Settings);

impl Command for WriteSettings {
    fn plan(&self) -> Plan {
        Plan {
            immediate: Write::acked(self.0.channel(), self.0.encode()),
            deferred: None,
            optimistic: Some(self.0.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pumba_protocol::settings::AdcCalibration;

    use super::*;

    #[test]
    fn actuator_flag_bytes() {
        let on = SetActuator {
            actuator: Actuator::Inverter,
            on: true,
        }
        .plan();
        assert_eq!(on.immediate, Write::acked(Channel::Inverter, [1]));
        assert_eq!(on.deferred, None);

        let off = SetActuator {
            actuator: Actuator::SewageValve,
            on: false,
        }
        .plan();
        assert_eq!(off.immediate, Write::acked(Channel::SewageValve, [0]));
    }

    #[test]
    fn servo_position_truncates() {
        let plan = SetServoPosition { position: 70.0 }.plan();
        assert_eq!(plan.immediate, Write::acked(Channel::KitchenServo, [0x46]));

        for (position, byte) in [(70.9, 70), (120.0, 120), (255.0, 255), (300.0, 255), (-4.0, 0), (f64::NAN, 0)] {
            assert_eq!(
                SetServoPosition { position }.plan().immediate.payload,
                [byte],
                "{position}"
            );
        }
    }

    #[test]
    fn lock_sequence_codes() {
        let lock = SetLock { locked: true }.plan();
        assert_eq!(lock.immediate, Write::acked(Channel::KitchenServo, [0x53]));
        assert_eq!(
            lock.deferred,
            Some(Deferred {
                delay: Duration::from_millis(250),
                write: Write::acked(Channel::KitchenServo, [0x4E]),
            })
        );

        let unlock = SetLock { locked: false }.plan();
        assert_eq!(unlock.immediate.payload, [0x23]);
        assert_eq!(unlock.deferred.map(|d| d.write.payload), Some(vec![0x42]));
    }

    #[test]
    fn settings_go_to_their_channel() {
        let flow = FlowCalibrationSettings {
            warm_water_flow_calibration_factor: 1.25,
            filter_water_flow_calibration_factor: 0.5,
        };
        let plan = WriteSettings(flow.into()).plan();

        let mut expected = 1.25f32.to_le_bytes().to_vec();
        expected.extend_from_slice(&0.5f32.to_le_bytes());
        assert_eq!(plan.immediate, Write::acked(Channel::FlowSettings, expected));
        assert_eq!(plan.optimistic, Some(ChannelValue::FlowSettings(flow)));

        let adc = AdcCalibrationSettings {
            solar: AdcCalibration {
                offset: 0.1,
                calibration_factor: 3.0,
            },
            ..Default::default()
        };
        let plan = WriteSettings(Settings::Adc(adc)).plan();
        assert_eq!(plan.immediate.channel, Channel::AdcSettings);
        assert_eq!(plan.immediate.payload.len(), 40);

        let plan = WriteSettings(ServoPositionSettings::default().into()).plan();
        assert_eq!(plan.immediate.channel, Channel::ServoSettings);
        assert_eq!(plan.immediate.payload, [0; 28]);
    }
}
