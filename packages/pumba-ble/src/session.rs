//! A live link to the controller and the state observed through it.

use std::sync::{
    Arc, Weak,
    atomic::{AtomicBool, Ordering},
};

use futures::{Stream, StreamExt};
use log::{debug, info, trace, warn};
use pumba_protocol::Channel;
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

use crate::{
    commands::{Command, Deferred, SetActuator, Write},
    registry::{self, Dispatch},
    state::{Actuator, DeviceState},
    transport::{ChannelUpdate, Transport},
};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} has not been discovered on the connected device")]
    ChannelUnavailable(Channel),
    #[error("Write was not acknowledged: {0}")]
    TransportFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("The session has been closed")]
    SessionClosed,
}

/// What became of a deferred write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredOutcome {
    Sent,
    /// The session ended before the write was due.
    Dropped,
    /// The transport rejected the write.
    Failed,
}

/// Returned by [`Session::execute`] once the immediate write has completed.
#[derive(Debug)]
pub struct Receipt {
    deferred: Option<JoinHandle<DeferredOutcome>>,
}

impl Receipt {
    /// Whether a deferred write is still scheduled or in flight.
    pub fn has_pending(&self) -> bool {
        self.deferred
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the deferred write, if the command had one.
    pub async fn settled(self) -> Option<DeferredOutcome> {
        let handle = self.deferred?;
        Some(handle.await.unwrap_or(DeferredOutcome::Dropped))
    }
}

struct Link<T> {
    transport: T,
    live: AtomicBool,
}

impl<T: Transport> Link<T> {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    async fn write(&self, write: &Write) -> Result<(), T::Error> {
        debug!("Writing {:x?} to {:?}", write.payload, write.channel);
        self.transport
            .write(write.channel, &write.payload, write.kind)
            .await
    }
}

/// Owns the [`DeviceState`] of one connection and issues commands over it.
///
/// Observers read snapshots through [`Session::state`] or follow changes
/// through [`Session::subscribe`]. Only inbound updates and acknowledged
/// settings writes modify the state.
pub struct Session<T: Transport> {
    link: Arc<Link<T>>,
    state: watch::Sender<DeviceState>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(DeviceState {
            connected: true,
            ..Default::default()
        });

        Self {
            link: Arc::new(Link {
                transport,
                live: AtomicBool::new(true),
            }),
            state,
        }
    }

    pub fn transport(&self) -> &T {
        &self.link.transport
    }

    pub fn is_live(&self) -> bool {
        self.link.is_live()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DeviceState {
        *self.state.borrow()
    }

    /// Receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.state.subscribe()
    }

    /// Applies one inbound characteristic value.
    ///
    /// Once the session is closed every update is [`Dispatch::Ignored`].
    pub fn handle_update(&self, uuid: &Uuid, data: &[u8]) -> Dispatch {
        if !self.is_live() {
            trace!("Session closed, ignoring update on {}", uuid);
            return Dispatch::Ignored;
        }

        let mut outcome = Dispatch::Ignored;
        self.state.send_if_modified(|state| {
            outcome = registry::dispatch(state, uuid, data);
            matches!(outcome, Dispatch::Applied(_))
        });
        outcome
    }

    /// Applies updates until the stream ends, then closes the session.
    pub async fn run<S>(&self, updates: S)
    where
        S: Stream<Item = ChannelUpdate>,
    {
        let mut updates = std::pin::pin!(updates);

        while let Some(update) = updates.next().await {
            if !self.is_live() {
                break;
            }
            self.handle_update(&update.uuid, &update.value);
        }

        info!("Update stream ended");
        self.close();
    }

    /// Performs `command`.
    ///
    /// Resolves once the immediate write has completed. A deferred write is
    /// scheduled on the runtime and can be awaited through the returned
    /// [`Receipt`]; it only fires if the session is still live when it is due.
    ///
    /// # Errors
    ///
    /// - [`CommandError::SessionClosed`] if [`Session::close`] has been called.
    /// - [`CommandError::ChannelUnavailable`] if the target channel was not discovered.
    /// - [`CommandError::TransportFailure`] if the immediate write failed.
    ///   Nothing is retried.
    pub async fn execute(&self, command: impl Command) -> Result<Receipt, CommandError> {
        if !self.is_live() {
            return Err(CommandError::SessionClosed);
        }

        let plan = command.plan();
        let channel = plan.immediate.channel;
        if !self.link.transport.is_channel_available(channel) {
            warn!("Not writing to {:?}: channel unavailable", channel);
            return Err(CommandError::ChannelUnavailable(channel));
        }

        self.link
            .write(&plan.immediate)
            .await
            .map_err(|e| CommandError::TransportFailure(Box::new(e)))?;

        if let Some(value) = plan.optimistic {
            self.state.send_modify(|state| state.set(value));
        }

        Ok(Receipt {
            deferred: plan
                .deferred
                .map(|deferred| schedule(Arc::downgrade(&self.link), deferred)),
        })
    }

    /// Flips an actuator relative to the last state reported by the device.
    pub async fn toggle(&self, actuator: Actuator) -> Result<Receipt, CommandError> {
        let on = !self.state.borrow().actuator(actuator);
        self.execute(SetActuator { actuator, on }).await
    }

    /// Ends the session. Pending deferred writes become no-ops.
    pub fn close(&self) {
        if self.link.live.swap(false, Ordering::AcqRel) {
            debug!("Closing session");
            self.state.send_modify(|state| state.connected = false);
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.link.live.store(false, Ordering::Release);
    }
}

/// Spawns the deferred half of a command. The task only holds a weak
/// reference to the link and re-checks liveness once the delay has elapsed.
fn schedule<T: Transport>(link: Weak<Link<T>>, deferred: Deferred) -> JoinHandle<DeferredOutcome> {
    tokio::spawn(async move {
        tokio::time::sleep(deferred.delay).await;

        let Some(link) = link.upgrade().filter(|link| link.is_live()) else {
            warn!(
                "Session ended before deferred write to {:?}, dropping {:x?}",
                deferred.write.channel, deferred.write.payload
            );
            return DeferredOutcome::Dropped;
        };

        match link.write(&deferred.write).await {
            Ok(()) => DeferredOutcome::Sent,
            Err(e) => {
                warn!(
                    "Deferred write to {:?} failed: {}",
                    deferred.write.channel, e
                );
                DeferredOutcome::Failed
            }
        }
    })
}
