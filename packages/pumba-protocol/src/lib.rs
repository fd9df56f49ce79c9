//! Wire contract of the Pumba van controller.
//!
//! The controller exposes its sensors and actuators as a fixed set of GATT
//! characteristics ([`Channel`]s). Each channel carries either a single flag
//! byte, a little-endian `f32`, or a packed [`Record`] of 4-byte fields. This
//! crate contains the channel identifiers and the codec for every payload; it
//! performs no I/O.
//!
//! Payloads are decoded through the [`Decode`] trait, which validates the
//! input length against the declared layout before producing a value, and
//! encoded through [`Encode`].

#![no_std]

extern crate alloc;

pub mod channel;
pub mod settings;
pub mod telemetry;

mod decode;
mod encode;
mod record;
mod value;

pub use channel::{Channel, ChannelKind, ParseChannelError};
pub use decode::{
    Decode, DecodeError, DecodeErrorKind, FIELD_WIDTH, decode_bool, decode_f32, decode_record,
};
pub use encode::{Encode, FieldWriter, encode_record, encode_u8};
pub use record::{Field, Record};
pub use value::ChannelValue;
