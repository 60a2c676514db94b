//! DNS Types
//!
//! Header fields, record types and response codes shared by the wire codec
//! and the resolution engine.

use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

/// DNS packet constants
pub const DNS_HEADER_SIZE: usize = 12;
pub const DNS_PORT: u16 = 53;
pub const MAX_UDP_SIZE: usize = 512;
pub const MAX_TCP_SIZE: usize = 65535;

/// Resource record types interpreted by the resolver
pub const TYPE_A: u16 = 1;
pub const TYPE_NS: u16 = 2;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_AAAA: u16 = 28;

/// Internet class
pub const CLASS_IN: u16 = 1;

/// DNS flags
pub const FLAG_QR: u16 = 0x8000; // Query/Response
pub const FLAG_TC: u16 = 0x0200; // Truncated
pub const RCODE_MASK: u16 = 0x000F;

/// Record type a caller may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    /// Numeric QTYPE on the wire
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => TYPE_A,
            RecordType::Aaaa => TYPE_AAAA,
        }
    }

    /// RDATA length an answer of this type must carry
    pub fn rdata_len(self) -> usize {
        match self {
            RecordType::A => 4,
            RecordType::Aaaa => 16,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::Aaaa => f.write_str("AAAA"),
        }
    }
}

/// Rejected record type names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordTypeError {
    #[error("DNSSEC not supported.")]
    Dnssec,

    #[error("Unsupported record type: {0}")]
    Unsupported(String),
}

impl FromStr for RecordType {
    type Err = RecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "DNSSEC" => Err(RecordTypeError::Dnssec),
            other => Err(RecordTypeError::Unsupported(other.to_string())),
        }
    }
}

/// Response code carried in the low four flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl From<u16> for ResponseCode {
    fn from(flags: u16) -> Self {
        match (flags & RCODE_MASK) as u8 {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            n => ResponseCode::Other(n),
        }
    }
}

/// Fixed 12 byte message header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    /// Parse the header at the start of a message
    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        if data.len() < DNS_HEADER_SIZE {
            return Err(WireError::ShortHeader);
        }

        let field = |i: usize| u16::from_be_bytes([data[i], data[i + 1]]);

        Ok(Self {
            id: field(0),
            flags: field(2),
            qdcount: field(4),
            ancount: field(6),
            nscount: field(8),
            arcount: field(10),
        })
    }

    /// Serialize in network byte order
    pub fn to_bytes(&self) -> [u8; DNS_HEADER_SIZE] {
        let mut out = [0u8; DNS_HEADER_SIZE];
        out[0..2].copy_from_slice(&self.id.to_be_bytes());
        out[2..4].copy_from_slice(&self.flags.to_be_bytes());
        out[4..6].copy_from_slice(&self.qdcount.to_be_bytes());
        out[6..8].copy_from_slice(&self.ancount.to_be_bytes());
        out[8..10].copy_from_slice(&self.nscount.to_be_bytes());
        out[10..12].copy_from_slice(&self.arcount.to_be_bytes());
        out
    }

    pub fn rcode(&self) -> ResponseCode {
        ResponseCode::from(self.flags)
    }
}

/// A resource record borrowed from a received message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord<'a> {
    /// Owner name, dot separated
    pub name: String,
    pub rtype: u16,
    pub rdata: &'a [u8],
    /// Offset of `rdata` in the message, needed to decode names inside it
    pub rdata_offset: usize,
}
