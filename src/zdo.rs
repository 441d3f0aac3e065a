//! Device-discovery (ZDO) level types: addresses, announce parameters,
//! descriptors and scan results as delivered by the network stack.

use core::fmt;

/// 16-bit short address, unique per network session. Reassigned on rejoin,
/// so it is only meaningful for the device's current membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkAddress(pub u16);

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// 64-bit IEEE address, stable across rejoins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtendedIdentity(pub u64);

impl fmt::Display for ExtendedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// MAC capability byte carried in a device announcement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MacCapability: u8 {
        const ALTERNATE_PAN_COORDINATOR = 0x01;
        const FULL_FUNCTION_DEVICE = 0x02;
        const MAINS_POWERED = 0x04;
        const RX_ON_WHEN_IDLE = 0x08;
        const SECURITY_CAPABLE = 0x40;
        const ALLOCATE_ADDRESS = 0x80;
    }
}

/// Parameters of a device-announce signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAnnounce {
    pub addr: NetworkAddress,
    pub ieee: ExtendedIdentity,
    pub capability: MacCapability,
}

/// Per-endpoint application metadata from a simple-descriptor response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleDescriptor {
    pub endpoint: u8,
    pub profile_id: u16,
    pub device_id: u16,
}

/// One network found by an active scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub channel: u8,
    pub pan_id: u16,
    pub extended_pan_id: u64,
    pub permit_joining: bool,
    pub router_capacity: bool,
    pub end_device_capacity: bool,
}

/// ZDP status codes (2.4.5 of the ZDP specification, subset).
#[repr(u8)]
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZdoStatus {
    Success = 0x00,
    InvalidRequestType = 0x80,
    DeviceNotFound = 0x81,
    InvalidEndpoint = 0x82,
    NotActive = 0x83,
    NotSupported = 0x84,
    Timeout = 0x85,
    NoDescriptor = 0x89,
    InsufficientSpace = 0x8A,
    NotPermitted = 0x8B,
    TableFull = 0x8C,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_formats_as_hex() {
        assert_eq!(NetworkAddress(0x1234).to_string(), "0x1234");
        assert_eq!(NetworkAddress(0x000A).to_string(), "0x000A");
    }

    #[test]
    fn extended_identity_formats_most_significant_first() {
        let ieee = ExtendedIdentity(0x00_0B_57_FF_FE_12_34_56);
        assert_eq!(ieee.to_string(), "00:0B:57:FF:FE:12:34:56");
    }

    #[test]
    fn capability_bits_decode() {
        let cap = MacCapability::from_bits_truncate(0x8E);
        assert!(cap.contains(MacCapability::FULL_FUNCTION_DEVICE));
        assert!(cap.contains(MacCapability::MAINS_POWERED));
        assert!(cap.contains(MacCapability::RX_ON_WHEN_IDLE));
        assert!(!cap.contains(MacCapability::SECURITY_CAPABLE));
    }
}
