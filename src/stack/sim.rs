//! An in-process stand-in for the radio stack: requests are answered
//! from a table of scripted devices, with a small delivery latency, and
//! the scheduler primitive is a sleep-then-send task. Used by the demo
//! binary and the end-to-end tests.

use std::time::Duration;

use bytes::{BufMut, BytesMut};
use log::debug;
use num::FromPrimitive;
use rand::Rng;
use tokio::sync::mpsc::Sender;

use crate::{
    cluster::basic_information::Attributes,
    zcl::{AttributeRecord, AttributeValue, ReadAttributesCommand, ReadAttributesResponse, ZclStatus},
    zdo::{
        DeviceAnnounce, ExtendedIdentity, MacCapability, NetworkAddress, NetworkDescriptor,
        SimpleDescriptor, ZdoStatus,
    },
};

use super::{Event, StackError, TimerEvent, ZigbeeStack};

#[derive(Debug, Clone)]
pub struct SimEndpoint {
    pub endpoint: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub manufacturer: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct SimDevice {
    pub addr: NetworkAddress,
    pub ieee: ExtendedIdentity,
    pub capability: MacCapability,
    pub endpoints: Vec<SimEndpoint>,
}

impl SimDevice {
    /// The announce event this device would emit after joining.
    pub fn announce(&self) -> Event {
        Event::DeviceAnnounce(Some(DeviceAnnounce {
            addr: self.addr,
            ieee: self.ieee,
            capability: self.capability,
        }))
    }
}

pub struct SimStack {
    events: Sender<Event>,
    devices: Vec<SimDevice>,
    channel: u8,
    pan_id: u16,
    extended_pan_id: u64,
    next_tsn: u8,
    latency: Duration,
}

impl SimStack {
    pub fn new(events: Sender<Event>) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            events,
            devices: Vec::new(),
            channel: rng.gen_range(11..=26),
            pan_id: rng.gen(),
            extended_pan_id: rng.gen(),
            next_tsn: 0,
            latency: Duration::from_millis(10),
        }
    }

    pub fn add_device(&mut self, device: SimDevice) {
        self.devices.push(device);
    }

    fn emit(&self, after: Duration, event: Event) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // The loop shutting down first is fine.
            let _ = events.send(event).await;
        });
    }

    fn device(&self, addr: NetworkAddress) -> Option<&SimDevice> {
        self.devices.iter().find(|device| device.addr == addr)
    }

    fn string_value(text: &str) -> AttributeValue {
        let mut raw = BytesMut::with_capacity(text.len() + 1);
        raw.put_u8(text.len().min(255) as u8);
        raw.put_slice(&text.as_bytes()[..text.len().min(255)]);
        AttributeValue::CharString(raw.freeze())
    }
}

impl ZigbeeStack for SimStack {
    fn form_network(&mut self) -> Result<(), StackError> {
        self.emit(self.latency, Event::FormationComplete(Ok(())));
        Ok(())
    }

    fn open_network(&mut self) -> Result<(), StackError> {
        self.emit(self.latency, Event::SteeringComplete(Ok(())));
        Ok(())
    }

    fn current_channel(&self) -> u8 {
        self.channel
    }

    fn request_active_endpoints(&mut self, addr: NetworkAddress) {
        let result = match self.device(addr) {
            Some(device) => Ok(device.endpoints.iter().map(|e| e.endpoint).collect()),
            None => Err(ZdoStatus::DeviceNotFound),
        };
        self.emit(self.latency, Event::ActiveEndpoints { addr, result });
    }

    fn request_simple_descriptor(&mut self, addr: NetworkAddress, endpoint: u8) {
        let result = match self
            .device(addr)
            .and_then(|device| device.endpoints.iter().find(|e| e.endpoint == endpoint))
        {
            Some(ep) => Ok(SimpleDescriptor {
                endpoint: ep.endpoint,
                profile_id: ep.profile_id,
                device_id: ep.device_id,
            }),
            None => Err(ZdoStatus::InvalidEndpoint),
        };
        self.emit(
            self.latency,
            Event::SimpleDescriptorResult {
                addr,
                endpoint,
                result,
            },
        );
    }

    fn read_attributes(&mut self, command: ReadAttributesCommand) -> u8 {
        let tsn = self.next_tsn;
        self.next_tsn = self.next_tsn.wrapping_add(1);
        let Some(ep) = self.device(command.dst).and_then(|device| {
            device
                .endpoints
                .iter()
                .find(|e| e.endpoint == command.dst_endpoint)
                .cloned()
        }) else {
            debug!("read to unknown target {}; dropping", command.dst);
            return tsn;
        };
        let records = command
            .attributes
            .iter()
            .map(|&id| match Attributes::from_u16(id) {
                Some(Attributes::ManufacturerName) => AttributeRecord {
                    id,
                    status: ZclStatus::Success,
                    value: Self::string_value(&ep.manufacturer),
                },
                Some(Attributes::ModelIdentifier) => AttributeRecord {
                    id,
                    status: ZclStatus::Success,
                    value: Self::string_value(&ep.model),
                },
                _ => AttributeRecord {
                    id,
                    status: ZclStatus::UnsupportedAttribute,
                    value: AttributeValue::Other { data_type: 0x00 },
                },
            })
            .collect();
        self.emit(
            self.latency,
            Event::ReadAttributesResult(ReadAttributesResponse {
                src: command.dst,
                src_endpoint: command.dst_endpoint,
                cluster_id: command.cluster_id,
                tsn,
                records,
            }),
        );
        tsn
    }

    fn start_active_scan(&mut self, _channel_mask: u32, _duration_exp: u8) {
        let own = NetworkDescriptor {
            channel: self.channel,
            pan_id: self.pan_id,
            extended_pan_id: self.extended_pan_id,
            permit_joining: true,
            router_capacity: true,
            end_device_capacity: true,
        };
        self.emit(
            self.latency,
            Event::ScanComplete {
                status: ZdoStatus::Success,
                networks: vec![own],
            },
        );
    }

    fn schedule(&mut self, after: Duration, timer: TimerEvent) {
        self.emit(after, Event::Timer(timer));
    }
}

/// A TRÅDFRI-style device: one HA endpoint plus the Green Power
/// endpoint.
pub fn tradfri_bulb(addr: u16, ieee: u64) -> SimDevice {
    SimDevice {
        addr: NetworkAddress(addr),
        ieee: ExtendedIdentity(ieee),
        capability: MacCapability::RX_ON_WHEN_IDLE | MacCapability::MAINS_POWERED,
        endpoints: vec![
            SimEndpoint {
                endpoint: 1,
                profile_id: 0x0104,
                device_id: 0x0100,
                manufacturer: "IKEA of Sweden".into(),
                model: "TRADFRI bulb E27 WS opal 980lm".into(),
            },
            SimEndpoint {
                endpoint: 242,
                profile_id: 0xA1E0,
                device_id: 0x0061,
                manufacturer: String::new(),
                model: String::new(),
            },
        ],
    }
}
