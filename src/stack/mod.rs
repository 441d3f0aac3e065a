//! The boundary to the external collaborators: the mesh network stack
//! (requests, signals, query completions, the scheduler primitive) and
//! the physical alert actuators. Everything the stack delivers arrives
//! as an [`Event`] on a single serialized channel; no two events are
//! ever processed concurrently.

use std::time::Duration;

use thiserror::Error;

use crate::{
    zcl::{ReadAttributesCommand, ReadAttributesResponse},
    zdo::{DeviceAnnounce, NetworkAddress, NetworkDescriptor, SimpleDescriptor, ZdoStatus},
};

pub mod sim;

/// Failure reported by the stack, either synchronously when a request is
/// issued or inside a completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("request rejected by the stack (code {0})")]
    Rejected(i32),
    #[error("radio busy")]
    Busy,
    #[error("stack not running")]
    NotRunning,
}

/// Everything delivered into the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The stack finished booting and is ready for commissioning.
    StackReady,
    FormationComplete(Result<(), StackError>),
    SteeringComplete(Result<(), StackError>),
    /// `None` models an announce signal with missing parameters.
    DeviceAnnounce(Option<DeviceAnnounce>),
    ActiveEndpoints {
        addr: NetworkAddress,
        result: Result<Vec<u8>, ZdoStatus>,
    },
    SimpleDescriptorResult {
        addr: NetworkAddress,
        endpoint: u8,
        result: Result<SimpleDescriptor, ZdoStatus>,
    },
    ReadAttributesResult(ReadAttributesResponse),
    ScanComplete {
        status: ZdoStatus,
        networks: Vec<NetworkDescriptor>,
    },
    Timer(TimerEvent),
}

/// Scheduled future work. Alarm timers carry the generation they were
/// scheduled under so a restart invalidates anything still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    RetryFormation,
    ReopenSteering,
    StartScan,
    AlarmToggle { generation: u32 },
    AlarmClear { generation: u32 },
}

/// Fire-and-forget interface to the network stack. Results of the
/// request methods arrive later as [`Event`]s; only `form_network` and
/// `open_network` can also fail synchronously.
pub trait ZigbeeStack {
    fn form_network(&mut self) -> Result<(), StackError>;
    /// Open the network for joining (steering).
    fn open_network(&mut self) -> Result<(), StackError>;
    fn current_channel(&self) -> u8;
    fn request_active_endpoints(&mut self, addr: NetworkAddress);
    fn request_simple_descriptor(&mut self, addr: NetworkAddress, endpoint: u8);
    /// Issue a read; returns the transaction sequence number used to
    /// correlate the response.
    fn read_attributes(&mut self, command: ReadAttributesCommand) -> u8;
    fn start_active_scan(&mut self, channel_mask: u32, duration_exp: u8);
    /// One-shot: deliver `Event::Timer(timer)` after the delay.
    fn schedule(&mut self, after: Duration, timer: TimerEvent);
}

/// The physical alert outputs: an RGB indicator and an audible actuator
/// driven by a PWM-style duty level.
pub trait AlertActuators {
    fn set_indicator_color(&mut self, r: u8, g: u8, b: u8);
    fn set_sound_level(&mut self, duty: u8);
}
