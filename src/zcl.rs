//! ZCL-level types shared by the interview pipeline and the stack
//! boundary: statuses, typed attribute values and the read-attributes
//! command/response pair.

use bytes::Bytes;

use crate::zdo::NetworkAddress;

/// ZCL command status codes (subset).
#[repr(u8)]
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZclStatus {
    Success = 0x00,
    Failure = 0x01,
    MalformedCommand = 0x80,
    UnsupportedCommand = 0x81,
    UnsupportedAttribute = 0x86,
    InvalidValue = 0x87,
    ReadOnly = 0x88,
    InvalidDataType = 0x8D,
    Timeout = 0x94,
}

/// APS destination addressing mode for outgoing commands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    None = 0x00,
    Group = 0x01,
    ShortWithEndpoint = 0x02,
    ExtendedWithEndpoint = 0x03,
}

/// A typed attribute value from a read response. String payloads stay
/// raw (length-prefixed) until the parse stage bounds and copies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    CharString(Bytes),
    LongCharString(Bytes),
    Other { data_type: u8 },
}

/// One entry of a read-attributes response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    pub id: u16,
    pub status: ZclStatus,
    pub value: AttributeValue,
}

/// An outgoing read-attributes command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAttributesCommand {
    pub dst: NetworkAddress,
    pub dst_endpoint: u8,
    pub src_endpoint: u8,
    pub address_mode: AddressMode,
    pub cluster_id: u16,
    pub manufacturer_specific: bool,
    pub disable_default_response: bool,
    pub attributes: Vec<u16>,
}

/// The matching asynchronous response, correlated by the transaction
/// sequence number the stack returned when the command was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAttributesResponse {
    pub src: NetworkAddress,
    pub src_endpoint: u8,
    pub cluster_id: u16,
    pub tsn: u8,
    pub records: Vec<AttributeRecord>,
}
