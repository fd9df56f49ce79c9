use std::future::Future;

use pumba_protocol::Channel;
use uuid::Uuid;

/// Whether a write waits for the peripheral to acknowledge it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteKind {
    #[default]
    WithResponse,
    WithoutResponse,
}

/// A raw characteristic value received from the peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub uuid: Uuid,
    pub value: Vec<u8>,
}

impl ChannelUpdate {
    pub fn new(uuid: impl Into<Uuid>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            uuid: uuid.into(),
            value: value.into(),
        }
    }
}

/// Outbound half of a link to the controller.
///
/// Implementors own connection management and service discovery. Inbound
/// values are delivered separately as a stream of [`ChannelUpdate`]s.
pub trait Transport: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns whether `channel` was discovered on the connected peripheral.
    fn is_channel_available(&self, channel: Channel) -> bool;

    /// Writes `payload` to `channel`.
    ///
    /// With [`WriteKind::WithResponse`] the future resolves once the
    /// peripheral has acknowledged the write.
    fn write(
        &self,
        channel: Channel,
        payload: &[u8],
        kind: WriteKind,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
