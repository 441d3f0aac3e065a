//! Protocol identifiers and timing constants used by the coordinator.

use std::time::Duration;

/// Channels 11..26.
pub const SCAN_CHANNEL_MASK: u32 = 0x07FF_F800;
/// Scan duration exponent: time per channel = ((1 << d) + 1) * 15.36 ms.
pub const SCAN_DURATION_EXP: u8 = 4;

/// Home Automation application profile.
pub const HA_PROFILE_ID: u16 = 0x0104;
/// Reserved Green Power endpoint; its profile is never HA.
pub const GREEN_POWER_ENDPOINT: u8 = 242;
/// Source endpoint for outgoing ZCL commands.
pub const LOCAL_ENDPOINT: u8 = 1;

pub const FORMATION_RETRY_DELAY: Duration = Duration::from_secs(3);
pub const STEERING_REOPEN_PERIOD: Duration = Duration::from_secs(60);
pub const STEERING_RETRY_DELAY: Duration = Duration::from_secs(10);
pub const STEERING_REISSUE_RETRY_DELAY: Duration = Duration::from_secs(15);
pub const SCAN_RESCHEDULE_DELAY: Duration = Duration::from_secs(1);

/// Devices remembered by the alert deduplication cache.
pub const ALERTED_CAPACITY: usize = 16;
/// Longest attribute text kept for matching; longer payloads are truncated.
pub const ATTR_TEXT_CAPACITY: usize = 63;
