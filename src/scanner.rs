//! Periodic active scan of nearby networks for diagnostic logging.
//! Independent of commissioning and interviews; once kicked it
//! reschedules itself indefinitely.

use log::{info, warn};

use crate::{
    constants::SCAN_RESCHEDULE_DELAY,
    stack::{TimerEvent, ZigbeeStack},
    zdo::{NetworkDescriptor, ZdoStatus},
};

pub struct DiscoveryScanner {
    channel_mask: u32,
    duration_exp: u8,
    running: bool,
}

impl DiscoveryScanner {
    pub fn new(channel_mask: u32, duration_exp: u8) -> Self {
        Self {
            channel_mask,
            duration_exp,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start<S: ZigbeeStack>(&mut self, stack: &mut S) {
        info!(
            "starting active scan: mask=0x{:08X} duration={}",
            self.channel_mask, self.duration_exp
        );
        self.running = true;
        stack.start_active_scan(self.channel_mask, self.duration_exp);
    }

    pub fn on_scan_complete<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        status: ZdoStatus,
        networks: &[NetworkDescriptor],
    ) {
        info!(
            "scan complete: status={status:?}, networks found={}",
            networks.len()
        );
        for (i, network) in networks.iter().enumerate() {
            info!(
                "[{i}] channel={} pan=0x{:04X} epan={} permit_joining={} router_capacity={} end_device_capacity={}",
                network.channel,
                network.pan_id,
                hex::encode(network.extended_pan_id.to_be_bytes()),
                network.permit_joining,
                network.router_capacity,
                network.end_device_capacity
            );
        }
        if networks.is_empty() {
            warn!("no networks found");
        }
        stack.schedule(SCAN_RESCHEDULE_DELAY, TimerEvent::StartScan);
    }
}
