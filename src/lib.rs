//! A Zigbee coordinator that forms a network, keeps it open for
//! joining, and interviews every device that joins. When a joiner's
//! manufacturer name or model identifier matches a denylisted pattern,
//! a light-and-sound alert is raised once per device.

#[macro_use]
extern crate num_derive;

pub mod alarm;
pub mod alerted;
pub mod cluster;
pub mod commissioning;
pub mod constants;
pub mod coordinator;
pub mod denylist;
pub mod interview;
pub mod scanner;
pub mod stack;
pub mod zcl;
pub mod zdo;

pub use coordinator::{Coordinator, CoordinatorConfig};
pub use stack::{AlertActuators, Event, StackError, TimerEvent, ZigbeeStack};
