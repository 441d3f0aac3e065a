use crate::{
    constants::{ATTR_TEXT_CAPACITY, LOCAL_ENDPOINT},
    zcl::{AddressMode, ReadAttributesCommand},
    zdo::NetworkAddress,
};

/// Basic cluster (ZCL 3.1).
pub const CLUSTER_ID: u16 = 0x0000;

#[repr(u16)]
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attributes {
    ZclVersion = 0x0000,
    ApplicationVersion = 0x0001,
    StackVersion = 0x0002,
    HwVersion = 0x0003,
    ManufacturerName = 0x0004,
    ModelIdentifier = 0x0005,
    DateCode = 0x0006,
    PowerSource = 0x0007,
}

/// Build the identity read for one endpoint: manufacturer name and model
/// identifier in a single command, default response suppressed.
pub fn read_identity_command(dst: NetworkAddress, dst_endpoint: u8) -> ReadAttributesCommand {
    ReadAttributesCommand {
        dst,
        dst_endpoint,
        src_endpoint: LOCAL_ENDPOINT,
        address_mode: AddressMode::ShortWithEndpoint,
        cluster_id: CLUSTER_ID,
        manufacturer_specific: false,
        disable_default_response: true,
        attributes: vec![
            Attributes::ManufacturerName as u16,
            Attributes::ModelIdentifier as u16,
        ],
    }
}

/// Copy a length-prefixed ZCL string into a bounded buffer. The first
/// byte is the declared length; it is clamped to both the remaining
/// payload and the buffer capacity, so truncated or lying payloads
/// cannot overrun.
pub fn decode_string(raw: &[u8]) -> heapless::Vec<u8, ATTR_TEXT_CAPACITY> {
    let mut text = heapless::Vec::new();
    let Some((&declared, rest)) = raw.split_first() else {
        return text;
    };
    let len = usize::from(declared).min(rest.len()).min(ATTR_TEXT_CAPACITY);
    text.extend_from_slice(&rest[..len]).ok();
    text
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn decodes_length_prefixed_string() {
        // "IKEA of Sweden"
        let raw = hex!("0e 494b4541206f662053776564656e");
        assert_eq!(decode_string(&raw).as_slice(), b"IKEA of Sweden");
    }

    #[test]
    fn empty_payload_decodes_to_empty() {
        assert!(decode_string(&[]).is_empty());
        assert!(decode_string(&[0x00]).is_empty());
    }

    #[test]
    fn lying_length_prefix_is_clamped_to_payload() {
        // Prefix claims 200 bytes, only 3 follow.
        let raw = [200u8, b'a', b'b', b'c'];
        assert_eq!(decode_string(&raw).as_slice(), b"abc");
    }

    #[test]
    fn oversized_string_is_truncated_to_capacity() {
        let mut raw = vec![255u8];
        raw.extend(std::iter::repeat(b'x').take(255));
        let text = decode_string(&raw);
        assert_eq!(text.len(), ATTR_TEXT_CAPACITY);
        assert!(text.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn identity_read_targets_basic_cluster() {
        let cmd = read_identity_command(NetworkAddress(0x1234), 1);
        assert_eq!(cmd.cluster_id, CLUSTER_ID);
        assert_eq!(cmd.src_endpoint, LOCAL_ENDPOINT);
        assert_eq!(cmd.address_mode, AddressMode::ShortWithEndpoint);
        assert!(cmd.disable_default_response);
        assert!(!cmd.manufacturer_specific);
        assert_eq!(cmd.attributes, vec![0x0004, 0x0005]);
    }
}
