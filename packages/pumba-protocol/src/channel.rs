//! GATT characteristics exposed by the controller.

use core::{fmt, str::FromStr};

use uuid::Uuid;

/// Payload shape carried by a [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// One byte, `0x01` meaning on.
    Flag,
    /// One little-endian `f32`.
    Scalar,
    /// A fixed-layout [`Record`](crate::record::Record).
    Record,
    /// Write-only single-byte command.
    Command,
}

/// Every channel known to the controller firmware.
///
/// The set is closed: a characteristic whose UUID is not listed here is not
/// part of the contract and is ignored by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    SewageTemperature,
    WaterPump,
    Inverter,
    TankHeater,
    SewageValve,
    KitchenServo,
    IsLocked,
    WaterFlow,
    Adc,
    Acceleration,
    VeDirect,
    AdcSettings,
    ServoSettings,
    FlowSettings,
}

pub const SEWAGE_TEMPERATURE: Uuid = Uuid::from_u128(0x119bf4d9_e770_484a_9463_13cfe9ef3ad8);
pub const WATER_PUMP: Uuid = Uuid::from_u128(0x0dd6e1fb_02d9_4234_927c_e899dad9ca6c);
pub const INVERTER: Uuid = Uuid::from_u128(0xc80700a3_501a_4bd2_86ab_f5b4369e484d);
pub const TANK_HEATER: Uuid = Uuid::from_u128(0x9a73a3d2_da71_49dc_8e07_07197fa882f1);
pub const SEWAGE_VALVE: Uuid = Uuid::from_u128(0x5ed84000_5fd9_4de4_82f9_2f8df7e76ed2);
pub const KITCHEN_SERVO: Uuid = Uuid::from_u128(0x8ae37aea_e595_47ee_9c4c_414186599d94);
pub const IS_LOCKED: Uuid = Uuid::from_u128(0x992df6a6_51d7_4649_b832_838b5f7bc363);
pub const WATER_FLOW: Uuid = Uuid::from_u128(0x44470e73_8b8b_43a5_94b2_d219d7572c05);
pub const ADC: Uuid = Uuid::from_u128(0x4e083890_2230_4cba_9d77_6cc1edc8ab66);
pub const ACCELERATION: Uuid = Uuid::from_u128(0x2c5e085f_681b_45ca_bf1e_b71e76c9f655);
pub const VE_DIRECT: Uuid = Uuid::from_u128(0xc89668a4_09a4_4fd7_8d71_2b08f0538b94);
pub const ADC_SETTINGS: Uuid = Uuid::from_u128(0xb865a004_557c_417a_a92c_78d0788b185a);
pub const SERVO_SETTINGS: Uuid = Uuid::from_u128(0xc65528e2_98d7_49ef_92aa_f6f2d432abd0);
pub const FLOW_SETTINGS: Uuid = Uuid::from_u128(0x407690f1_008a_4f58_9808_22e4bb98d1e4);

impl Channel {
    pub const ALL: [Channel; 14] = [
        Channel::SewageTemperature,
        Channel::WaterPump,
        Channel::Inverter,
        Channel::TankHeater,
        Channel::SewageValve,
        Channel::KitchenServo,
        Channel::IsLocked,
        Channel::WaterFlow,
        Channel::Adc,
        Channel::Acceleration,
        Channel::VeDirect,
        Channel::AdcSettings,
        Channel::ServoSettings,
        Channel::FlowSettings,
    ];

    pub const fn uuid(self) -> Uuid {
        match self {
            Channel::SewageTemperature => SEWAGE_TEMPERATURE,
            Channel::WaterPump => WATER_PUMP,
            Channel::Inverter => INVERTER,
            Channel::TankHeater => TANK_HEATER,
            Channel::SewageValve => SEWAGE_VALVE,
            Channel::KitchenServo => KITCHEN_SERVO,
            Channel::IsLocked => IS_LOCKED,
            Channel::WaterFlow => WATER_FLOW,
            Channel::Adc => ADC,
            Channel::Acceleration => ACCELERATION,
            Channel::VeDirect => VE_DIRECT,
            Channel::AdcSettings => ADC_SETTINGS,
            Channel::ServoSettings => SERVO_SETTINGS,
            Channel::FlowSettings => FLOW_SETTINGS,
        }
    }

    /// Maps a characteristic UUID back to its channel, if it is part of the contract.
    pub fn from_uuid(uuid: &Uuid) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.uuid() == *uuid)
    }

    pub const fn kind(self) -> ChannelKind {
        match self {
            Channel::SewageTemperature => ChannelKind::Scalar,
            Channel::WaterPump
            | Channel::Inverter
            | Channel::TankHeater
            | Channel::SewageValve
            | Channel::IsLocked => ChannelKind::Flag,
            Channel::KitchenServo => ChannelKind::Command,
            Channel::WaterFlow
            | Channel::Adc
            | Channel::Acceleration
            | Channel::VeDirect
            | Channel::AdcSettings
            | Channel::ServoSettings
            | Channel::FlowSettings => ChannelKind::Record,
        }
    }
}

impl From<Channel> for Uuid {
    fn from(channel: Channel) -> Self {
        channel.uuid()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.uuid())
    }
}

/// Returned when a string is not the UUID of a known [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseChannelError {
    #[error("not a valid UUID")]
    InvalidUuid,
    #[error("UUID {0} is not a known channel")]
    UnknownChannel(Uuid),
}

/// Parses the hyphenated or simple UUID form, ignoring case.
impl FromStr for Channel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::try_parse(s).map_err(|_| ParseChannelError::InvalidUuid)?;
        Self::from_uuid(&uuid).ok_or(ParseChannelError::UnknownChannel(uuid))
    }
}
