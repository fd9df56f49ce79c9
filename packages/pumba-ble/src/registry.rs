//! Channel dispatch: maps an inbound characteristic value to a [`DeviceState`] slot.

use log::{debug, trace, warn};
use pumba_protocol::{
    Channel, ChannelValue, DecodeError, decode_bool, decode_f32, decode_record,
};
use uuid::Uuid;

use crate::state::DeviceState;

type DecodeFn = fn(&[u8]) -> Result<ChannelValue, DecodeError>;

/// Decode rule for one channel.
pub struct Entry {
    pub channel: Channel,
    decode: DecodeFn,
}

impl Entry {
    pub fn decode(&self, data: &[u8]) -> Result<ChannelValue, DecodeError> {
        (self.decode)(data)
    }
}

/// Every channel that carries inbound data. [`Channel::KitchenServo`] is
/// write-only and deliberately absent.
static REGISTRY: [Entry; 13] = [
    Entry {
        channel: Channel::SewageTemperature,
        decode: |data| decode_f32(data).map(ChannelValue::SewageTemperature),
    },
    Entry {
        channel: Channel::WaterPump,
        decode: |data| decode_bool(data).map(ChannelValue::WaterPump),
    },
    Entry {
        channel: Channel::Inverter,
        decode: |data| decode_bool(data).map(ChannelValue::Inverter),
    },
    Entry {
        channel: Channel::TankHeater,
        decode: |data| decode_bool(data).map(ChannelValue::TankHeater),
    },
    Entry {
        channel: Channel::SewageValve,
        decode: |data| decode_bool(data).map(ChannelValue::SewageValve),
    },
    Entry {
        channel: Channel::IsLocked,
        decode: |data| decode_bool(data).map(ChannelValue::Locked),
    },
    Entry {
        channel: Channel::WaterFlow,
        decode: |data| decode_record(data).map(ChannelValue::WaterFlow),
    },
    Entry {
        channel: Channel::Adc,
        decode: |data| decode_record(data).map(ChannelValue::Power),
    },
    Entry {
        channel: Channel::Acceleration,
        decode: |data| decode_record(data).map(ChannelValue::Acceleration),
    },
    Entry {
        channel: Channel::VeDirect,
        decode: |data| decode_record(data).map(ChannelValue::SolarCharger),
    },
    Entry {
        channel: Channel::AdcSettings,
        decode: |data| decode_record(data).map(ChannelValue::AdcSettings),
    },
    Entry {
        channel: Channel::ServoSettings,
        decode: |data| decode_record(data).map(ChannelValue::ServoSettings),
    },
    Entry {
        channel: Channel::FlowSettings,
        decode: |data| decode_record(data).map(ChannelValue::FlowSettings),
    },
];

/// Returns the decode rule for `channel`, if it carries inbound data.
pub fn entry(channel: Channel) -> Option<&'static Entry> {
    REGISTRY.iter().find(|entry| entry.channel == channel)
}

/// Returns the decode rule registered for a raw characteristic UUID.
pub fn lookup(uuid: &Uuid) -> Option<&'static Entry> {
    Channel::from_uuid(uuid).and_then(entry)
}

/// Outcome of [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// The payload was decoded and written to the state.
    Applied(ChannelValue),
    /// No decode rule is registered for the identifier.
    Ignored,
    /// The payload did not match the channel layout. The state was left untouched.
    Rejected(Channel, DecodeError),
}

/// Decodes `data` according to the rule registered for `uuid` and stores the
/// result in `state`.
///
/// Unknown identifiers and malformed payloads leave `state` exactly as it was.
pub fn dispatch(state: &mut DeviceState, uuid: &Uuid, data: &[u8]) -> Dispatch {
    let Some(entry) = lookup(uuid) else {
        trace!("Ignoring {} byte update on unregistered channel {}", data.len(), uuid);
        return Dispatch::Ignored;
    };

    match entry.decode(data) {
        Ok(value) => {
            debug!("{:?} <- {:?}", entry.channel, value);
            state.apply(value);
            Dispatch::Applied(value)
        }
        Err(e) => {
            warn!(
                "Discarding update on {:?}, keeping last value: {} (payload: {:x?})",
                entry.channel, e, data
            );
            Dispatch::Rejected(entry.channel, e)
        }
    }
}
