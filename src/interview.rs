//! Interview of a newly announced device: enumerate its endpoints, fetch
//! each endpoint's simple descriptor, and read the Basic cluster
//! identity attributes of every Home Automation endpoint. Stages fan
//! out per endpoint and fail independently; a dead branch never aborts
//! its siblings or later announcements from the same address.

use std::collections::HashMap;

use log::{debug, info, warn};
use num::FromPrimitive;

use crate::{
    cluster::basic_information::{self, Attributes},
    constants::HA_PROFILE_ID,
    denylist::DenyList,
    stack::ZigbeeStack,
    zcl::{AttributeValue, ReadAttributesResponse, ZclStatus},
    zdo::{DeviceAnnounce, NetworkAddress, SimpleDescriptor, ZdoStatus},
};

/// Match evidence accumulated from one read response.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Evidence {
    pub manufacturer: bool,
    pub model: bool,
}

impl Evidence {
    /// Either attribute matching on its own classifies the device.
    pub fn matched(&self) -> bool {
        self.manufacturer || self.model
    }
}

/// Per-device interrogation state. Created on announce, dropped when
/// every branch has reached a terminal outcome.
#[derive(Debug)]
struct InterviewContext {
    addr: NetworkAddress,
    /// False until the endpoint list has arrived; an interview with no
    /// branches yet is waiting, not finished.
    endpoints_enumerated: bool,
    /// Endpoints still awaiting a simple descriptor.
    pending_endpoints: Vec<u8>,
    /// TSNs of identity reads still in flight.
    reads_in_flight: heapless::Vec<u8, 8>,
    evidence: Evidence,
}

impl InterviewContext {
    fn new(addr: NetworkAddress) -> Self {
        Self {
            addr,
            endpoints_enumerated: false,
            pending_endpoints: Vec::new(),
            reads_in_flight: heapless::Vec::new(),
            evidence: Evidence::default(),
        }
    }

    fn is_settled(&self) -> bool {
        self.endpoints_enumerated
            && self.pending_endpoints.is_empty()
            && self.reads_in_flight.is_empty()
    }
}

/// All interviews currently in flight, keyed by short address. Multiple
/// devices interview concurrently; ordering is only guaranteed within
/// one device's stages.
pub struct InterviewManager {
    interviews: HashMap<NetworkAddress, InterviewContext>,
}

impl InterviewManager {
    pub fn new() -> Self {
        Self {
            interviews: HashMap::with_capacity(16),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.interviews.len()
    }

    /// Stage 1: a device announced itself; ask for its endpoint list. A
    /// re-announcement replaces any interview still in flight for that
    /// address.
    pub fn on_device_announce<S: ZigbeeStack>(&mut self, stack: &mut S, announce: &DeviceAnnounce) {
        info!(
            "device announce: short={} ieee={} capability={:?}",
            announce.addr, announce.ieee, announce.capability
        );
        if self
            .interviews
            .insert(announce.addr, InterviewContext::new(announce.addr))
            .is_some()
        {
            debug!("replacing in-flight interview for {}", announce.addr);
        }
        stack.request_active_endpoints(announce.addr);
    }

    /// Stage 2 fan-out: one simple-descriptor request per endpoint.
    pub fn on_active_endpoints<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        addr: NetworkAddress,
        result: Result<Vec<u8>, ZdoStatus>,
    ) {
        if !self.interviews.contains_key(&addr) {
            warn!("endpoint list for {addr} without an interview in flight; ignoring");
            return;
        }
        match result {
            Ok(endpoints) if !endpoints.is_empty() => {
                info!("active endpoints of {addr}: {endpoints:?}");
                if let Some(context) = self.interviews.get_mut(&addr) {
                    context.endpoints_enumerated = true;
                    context.pending_endpoints = endpoints.clone();
                }
                for endpoint in endpoints {
                    stack.request_simple_descriptor(addr, endpoint);
                }
            }
            Ok(_) => {
                warn!("{addr} reported no active endpoints; abandoning interview");
                self.interviews.remove(&addr);
            }
            Err(status) => {
                warn!("active endpoint request for {addr} failed ({status:?}); abandoning interview");
                self.interviews.remove(&addr);
            }
        }
    }

    /// Stage 3: read identity attributes, but only from Home Automation
    /// endpoints. The Green Power endpoint and anything else outside the
    /// HA profile is skipped without a read.
    pub fn on_simple_descriptor<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        addr: NetworkAddress,
        endpoint: u8,
        result: Result<SimpleDescriptor, ZdoStatus>,
    ) {
        let Some(context) = self.interviews.get_mut(&addr) else {
            debug!("simple descriptor for {addr} without an interview in flight; ignoring");
            return;
        };
        context.pending_endpoints.retain(|&e| e != endpoint);
        match result {
            Ok(descriptor) => {
                info!(
                    "simple descriptor of {addr}: endpoint={} profile=0x{:04X} device=0x{:04X}",
                    descriptor.endpoint, descriptor.profile_id, descriptor.device_id
                );
                if descriptor.profile_id == HA_PROFILE_ID {
                    let command = basic_information::read_identity_command(addr, descriptor.endpoint);
                    let tsn = stack.read_attributes(command);
                    info!(
                        "reading identity attributes of {addr} endpoint {} (tsn {tsn})",
                        descriptor.endpoint
                    );
                    if let Some(context) = self.interviews.get_mut(&addr) {
                        if context.reads_in_flight.push(tsn).is_err() {
                            warn!(
                                "too many reads in flight for {addr}; response tsn {tsn} will be untracked"
                            );
                        }
                    }
                } else {
                    info!(
                        "non-HA profile 0x{:04X} on {addr} endpoint {}: skipping identity read",
                        descriptor.profile_id, descriptor.endpoint
                    );
                }
            }
            Err(status) => {
                warn!("simple descriptor for {addr} endpoint {endpoint} failed ({status:?})");
            }
        }
        self.settle(addr);
    }

    /// Stage 4/5 bookkeeping: account for a read response. Returns true
    /// when the response belongs to a tracked read; a stale response is
    /// still classified by the caller, idempotently against the cache,
    /// but must neither contaminate the evidence of a live interview
    /// nor settle one that is still waiting on its endpoint list.
    pub fn note_read_response(
        &mut self,
        addr: NetworkAddress,
        tsn: u8,
        evidence: Evidence,
    ) -> bool {
        let Some(context) = self.interviews.get_mut(&addr) else {
            return false;
        };
        let Some(position) = context.reads_in_flight.iter().position(|&t| t == tsn) else {
            return false;
        };
        context.reads_in_flight.swap_remove(position);
        context.evidence.manufacturer |= evidence.manufacturer;
        context.evidence.model |= evidence.model;
        self.settle(addr);
        true
    }

    fn settle(&mut self, addr: NetworkAddress) {
        if self
            .interviews
            .get(&addr)
            .is_some_and(|context| context.is_settled())
        {
            if let Some(context) = self.interviews.remove(&addr) {
                debug!(
                    "interview of {} complete (evidence: {:?})",
                    context.addr, context.evidence
                );
            }
        }
    }
}

impl Default for InterviewManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage 4: extract match evidence from a read response. Only successful
/// string-typed records count; the text is bounded-copied before the
/// case-insensitive token test.
pub fn classify(response: &ReadAttributesResponse, denylist: &DenyList) -> Evidence {
    let mut evidence = Evidence::default();
    if response.cluster_id != basic_information::CLUSTER_ID {
        return evidence;
    }
    for record in &response.records {
        if record.status != ZclStatus::Success {
            continue;
        }
        let raw = match &record.value {
            AttributeValue::CharString(raw) | AttributeValue::LongCharString(raw) => raw,
            AttributeValue::Other { .. } => continue,
        };
        let text = basic_information::decode_string(raw);
        info!(
            "basic attribute 0x{:04X}='{}' (src {} endpoint {})",
            record.id,
            String::from_utf8_lossy(&text),
            response.src,
            response.src_endpoint
        );
        match Attributes::from_u16(record.id) {
            Some(Attributes::ManufacturerName) if denylist.matches_manufacturer(&text) => {
                evidence.manufacturer = true;
            }
            Some(Attributes::ModelIdentifier) if denylist.matches_model(&text) => {
                evidence.model = true;
            }
            _ => {}
        }
    }
    evidence
}
