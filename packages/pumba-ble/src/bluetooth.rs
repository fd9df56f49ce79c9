//! Discovering and connecting to the controller over Bluetooth LE.

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    time::{Duration, Instant},
};

use btleplug::api::{
    Central, CentralEvent, CharPropFlags, Characteristic, Manager as _, Peripheral as _,
    ScanFilter, WriteType,
};
use btleplug::platform::{Manager, Peripheral};
use futures::stream::BoxStream;
use log::{debug, info, trace, warn};
use pumba_protocol::Channel;
use thiserror::Error;
use tokio_stream::StreamExt;

use crate::transport::{ChannelUpdate, Transport, WriteKind};

/// Parameters for [`find_devices`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Upper bound on how long to scan.
    pub scan_time: Duration,
    /// Stop as soon as this many matching devices have been found.
    pub max_device_count: Option<usize>,
    /// Only keep peripherals advertising exactly this local name.
    pub name_filter: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scan_time: Duration::from_secs(10),
            max_device_count: None,
            name_filter: None,
        }
    }
}

/// Discover nearby peripherals.
///
/// The controller does not advertise a service UUID, so every peripheral is a
/// candidate unless [`ScanOptions::name_filter`] is set. [`BluetoothDevice::connect`]
/// rejects peripherals that expose none of the controller's channels.
pub async fn find_devices(options: &ScanOptions) -> Result<Vec<BluetoothDevice>, BluetoothError> {
    let manager = Manager::new().await?;

    // Use the first adapter we can find.
    let Some(adapter) = manager.adapters().await?.into_iter().next() else {
        return Err(BluetoothError::NoBluetoothAdapter);
    };

    let mut events = adapter.events().await?;

    let scan_start_time = Instant::now();
    adapter.start_scan(ScanFilter::default()).await?;

    let scan = async {
        let mut devices = Vec::<BluetoothDevice>::new();
        let mut seen = HashSet::new();

        loop {
            let remaining = options.scan_time.saturating_sub(scan_start_time.elapsed());
            let Ok(Some(event)) = tokio::time::timeout(remaining, events.next()).await else {
                break;
            };

            let (CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id)) = event else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }

            let peripheral = adapter.peripheral(&id).await?;
            let Some(properties) = peripheral.properties().await? else {
                continue;
            };

            if let Some(name) = &options.name_filter {
                if properties.local_name.as_ref() != Some(name) {
                    trace!("Skipping {:?} at {}", properties.local_name, properties.address);
                    continue;
                }
            }

            debug!(
                "Found {} at {}",
                properties.local_name.as_deref().unwrap_or("unnamed device"),
                properties.address
            );
            seen.insert(id);
            devices.push(BluetoothDevice(peripheral));

            if options
                .max_device_count
                .is_some_and(|count| devices.len() >= count)
            {
                break;
            }
        }

        Ok::<_, BluetoothError>(devices)
    };

    let devices = finish_scan(scan, adapter.stop_scan()).await?;

    info!(
        "Found {} devices in {:?}",
        devices.len(),
        scan_start_time.elapsed()
    );

    Ok(devices)
}

/// Runs `scan` to completion, then `stop` regardless of how the scan ended.
///
/// An error from the scan takes precedence over an error from stopping it.
async fn finish_scan<T, E>(
    scan: impl Future<Output = Result<T, BluetoothError>>,
    stop: impl Future<Output = Result<(), E>>,
) -> Result<T, BluetoothError>
where
    BluetoothError: From<E>,
{
    let scanned = scan.await;
    let stopped = stop.await;
    let value = scanned?;
    stopped?;
    Ok(value)
}

/// A peripheral found by [`find_devices`].
#[derive(Debug, Clone)]
pub struct BluetoothDevice(pub Peripheral);

impl BluetoothDevice {
    /// Advertised local name, if any.
    pub async fn name(&self) -> Result<Option<String>, BluetoothError> {
        Ok(self
            .0
            .properties()
            .await?
            .and_then(|properties| properties.local_name))
    }

    pub async fn connect(&self) -> Result<BluetoothGateway, BluetoothError> {
        BluetoothGateway::open(self.0.clone()).await
    }
}

/// An open connection to the controller.
pub struct BluetoothGateway {
    peripheral: Peripheral,
    characteristics: HashMap<Channel, Characteristic>,
}

impl BluetoothGateway {
    /// Connects to `peripheral`, discovers its characteristics and subscribes
    /// to every known channel that notifies.
    pub async fn open(peripheral: Peripheral) -> Result<Self, BluetoothError> {
        if !peripheral.is_connected().await? {
            peripheral.connect().await?;
        } else {
            warn!("Peripheral already connected?");
        }

        peripheral.discover_services().await?;

        let mut characteristics = HashMap::new();
        for characteristic in peripheral.characteristics() {
            match Channel::from_uuid(&characteristic.uuid) {
                Some(channel) => {
                    trace!("{:?} supports {:?}", channel, characteristic.properties);
                    characteristics.insert(channel, characteristic);
                }
                None => trace!("Ignoring unknown characteristic {}", characteristic.uuid),
            }
        }

        if characteristics.is_empty() {
            return Err(BluetoothError::NoKnownChannels);
        }

        for (channel, characteristic) in &characteristics {
            if characteristic.properties.contains(CharPropFlags::NOTIFY) {
                if let Err(e) = peripheral.subscribe(characteristic).await {
                    warn!("Could not subscribe to {:?}: {}", channel, e);
                }
            }
        }

        info!(
            "Connected to {} with {} of {} channels",
            peripheral.address(),
            characteristics.len(),
            Channel::ALL.len()
        );

        Ok(Self {
            peripheral,
            characteristics,
        })
    }

    pub fn peripheral(&self) -> &Peripheral {
        &self.peripheral
    }

    /// Reads the current value of every readable channel once.
    ///
    /// Channels that fail to read are skipped; their values arrive with the
    /// next notification instead.
    pub async fn read_all(&self) -> Vec<ChannelUpdate> {
        let mut updates = Vec::with_capacity(self.characteristics.len());

        for (channel, characteristic) in &self.characteristics {
            if !characteristic.properties.contains(CharPropFlags::READ) {
                continue;
            }

            match self.peripheral.read(characteristic).await {
                Ok(value) => updates.push(ChannelUpdate::new(*channel, value)),
                Err(e) => warn!("Initial read of {:?} failed: {}", channel, e),
            }
        }

        updates
    }

    /// Stream of notifications from every subscribed channel.
    pub async fn updates(&self) -> Result<BoxStream<'static, ChannelUpdate>, BluetoothError> {
        let notifications = self.peripheral.notifications().await?;
        Ok(Box::pin(notifications.map(|notification| ChannelUpdate {
            uuid: notification.uuid,
            value: notification.value,
        })))
    }

    pub async fn disconnect(&self) -> Result<(), BluetoothError> {
        self.peripheral.disconnect().await?;
        Ok(())
    }
}

impl Transport for BluetoothGateway {
    type Error = BluetoothError;

    fn is_channel_available(&self, channel: Channel) -> bool {
        self.characteristics.contains_key(&channel)
    }

    async fn write(
        &self,
        channel: Channel,
        payload: &[u8],
        kind: WriteKind,
    ) -> Result<(), BluetoothError> {
        let characteristic = self
            .characteristics
            .get(&channel)
            .ok_or(BluetoothError::MissingCharacteristic(channel))?;

        trace!("Writing {:x?} to {}", payload, characteristic.uuid);

        let write_type = match kind {
            WriteKind::WithResponse => WriteType::WithResponse,
            WriteKind::WithoutResponse => WriteType::WithoutResponse,
        };
        self.peripheral
            .write(characteristic, payload, write_type)
            .await?;

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum BluetoothError {
    #[error("Bluetooth error: {0}")]
    Btleplug(#[from] btleplug::Error),
    #[error("No Bluetooth adapters found")]
    NoBluetoothAdapter,
    #[error("The peripheral exposes none of the controller's characteristics")]
    NoKnownChannels,
    #[error("{0} was not discovered on this peripheral")]
    MissingCharacteristic(Channel),
}
