//! Demo: run the coordinator against the simulated stack. A TRÅDFRI
//! bulb and a third-party bulb join; only the former raises the alert.

use std::time::Duration;

use log::info;
use tokio::sync::mpsc;
use tokio::time::timeout;

use zigbee_sentinel::{
    stack::sim::{tradfri_bulb, SimDevice, SimEndpoint, SimStack},
    zdo::{ExtendedIdentity, MacCapability, NetworkAddress},
    AlertActuators, Coordinator, CoordinatorConfig, Event,
};

/// Actuators backed by nothing but the log.
struct LogActuators;

impl AlertActuators for LogActuators {
    fn set_indicator_color(&mut self, r: u8, g: u8, b: u8) {
        info!("indicator -> ({r}, {g}, {b})");
    }

    fn set_sound_level(&mut self, duty: u8) {
        info!("buzzer -> duty {duty}");
    }
}

fn third_party_bulb(addr: u16, ieee: u64) -> SimDevice {
    SimDevice {
        addr: NetworkAddress(addr),
        ieee: ExtendedIdentity(ieee),
        capability: MacCapability::RX_ON_WHEN_IDLE,
        endpoints: vec![SimEndpoint {
            endpoint: 11,
            profile_id: 0x0104,
            device_id: 0x010D,
            manufacturer: "Signify Netherlands B.V.".into(),
            model: "LCA001".into(),
        }],
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let (tx, mut rx) = mpsc::channel::<Event>(32);
    let mut stack = SimStack::new(tx.clone());

    let bulb = tradfri_bulb(0x1234, 0x000B_57FF_FE12_3456);
    let hue = third_party_bulb(0xAB90, 0x0017_88FF_FE01_0203);
    let announcements = vec![
        (Duration::from_millis(500), bulb.announce()),
        (Duration::from_millis(900), hue.announce()),
    ];
    stack.add_device(bulb);
    stack.add_device(hue);

    let config = CoordinatorConfig {
        scan_enabled: true,
        ..CoordinatorConfig::default()
    };
    let mut coordinator = Coordinator::new(config, stack, LogActuators);

    tokio::spawn(async move {
        tx.send(Event::StackReady).await.ok();
        for (at, announce) in announcements {
            tokio::time::sleep(at).await;
            tx.send(announce).await.ok();
        }
    });

    // The loop runs indefinitely in a real deployment; bound the demo.
    let _ = timeout(Duration::from_secs(3), coordinator.run(&mut rx)).await;

    info!(
        "demo finished: {} device(s) alerted, {} interview(s) in flight",
        coordinator.alerted().len(),
        coordinator.interviews_in_flight()
    );
}
