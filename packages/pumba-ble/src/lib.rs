//! Host side of the Pumba van controller link.
//!
//! A [`Session`] owns the [`DeviceState`] for one connection. Inbound
//! characteristic values are routed through the [`registry`], which decodes
//! them and updates the matching state slot. Actuators are driven with
//! [`commands`], which the session writes through any [`Transport`]; the
//! `bluetooth` feature provides one backed by `btleplug`.

pub use pumba_protocol as protocol;

pub mod commands;
pub mod registry;
pub mod session;
pub mod state;
pub mod transport;

#[cfg(feature = "bluetooth")]
pub mod bluetooth;

pub use commands::{
    Command, LOCK_SETTLE_DELAY, SetActuator, SetLock, SetServoPosition, Settings, WriteSettings,
};
pub use registry::Dispatch;
pub use session::{CommandError, DeferredOutcome, Receipt, Session};
pub use state::{Actuator, DeviceState};
pub use transport::{ChannelUpdate, Transport, WriteKind};
