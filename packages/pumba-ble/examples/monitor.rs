use std::time::Duration;

use log::info;
use pumba_ble::{
    Session, SetServoPosition,
    bluetooth::{self, BluetoothError, ScanOptions},
};

#[tokio::main]
async fn main() -> Result<(), BluetoothError> {
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    // Scan for 10 seconds, or until we find the controller.
    let devices = bluetooth::find_devices(&ScanOptions {
        scan_time: Duration::from_secs(10),
        max_device_count: Some(1),
        name_filter: std::env::args().nth(1),
    })
    .await?;

    let Some(device) = devices.first() else {
        info!("No devices found");
        return Ok(());
    };

    let gateway = device.connect().await?;
    let initial = gateway.read_all().await;
    let updates = gateway.updates().await?;

    let session = Session::new(gateway);
    for update in initial {
        session.handle_update(&update.uuid, &update.value);
    }

    let mut state = session.subscribe();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let state = *state.borrow_and_update();
            info!(
                "battery {:.2}V, solar {:.2}W, soc {:.1}%, pressure {:.2}bar, sewage {:.1}°C, locked {}",
                state.power.battery_v,
                state.power.solar_w,
                state.solar_charger.soc,
                state.power.water_pressure_bar(),
                state.sewage_temperature,
                state.locked,
            );
        }
    });

    // Park the kitchen drawer servo in its middle position.
    if let Err(e) = session.execute(SetServoPosition { position: 70.0 }).await {
        info!("Could not move servo: {}", e);
    }

    session.run(updates).await;
    session.transport().disconnect().await?;

    Ok(())
}
