//! Query building and response parsing
//!
//! Only the parts of a response that drive an iterative walk are extracted:
//! answer addresses, a CNAME target, referred nameserver names and glue.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::name::{decode_name, encode_name};
use crate::error::WireError;
use crate::types::{
    Header, RecordType, ResourceRecord, ResponseCode, CLASS_IN, DNS_HEADER_SIZE, FLAG_TC,
    TYPE_A, TYPE_AAAA, TYPE_CNAME, TYPE_NS,
};

/// Type, class, TTL and RDLENGTH following an owner name
const RR_FIXED_SIZE: usize = 10;

/// Everything the resolver needs from one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub header: Header,

    /// ANSWER records of the requested type
    pub answers: Vec<IpAddr>,

    /// Target of the last ANSWER CNAME record
    pub cname: Option<String>,

    /// NS names from the AUTHORITY section
    pub next_ns: Vec<String>,

    /// ADDITIONAL A records, keyed by lower-cased owner name
    pub glue: HashMap<String, Ipv4Addr>,
}

impl ParsedResponse {
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode()
    }

    /// Glue address for a referred nameserver, if the response carried one
    pub fn glue_for(&self, ns_name: &str) -> Option<Ipv4Addr> {
        self.glue.get(&ns_name.to_ascii_lowercase()).copied()
    }
}

/// Build an iterative (RD=0) query for a single question
pub fn build_query(id: u16, qname: &str, qtype: RecordType) -> Result<Vec<u8>, WireError> {
    let encoded = encode_name(qname)?;

    let header = Header {
        id,
        flags: 0,
        qdcount: 1,
        ..Header::default()
    };

    let mut query = Vec::with_capacity(DNS_HEADER_SIZE + encoded.len() + 4);
    query.extend_from_slice(&header.to_bytes());
    query.extend_from_slice(&encoded);
    query.extend_from_slice(&qtype.code().to_be_bytes());
    query.extend_from_slice(&CLASS_IN.to_be_bytes());

    Ok(query)
}

/// True if the TC flag is set
pub fn is_truncated(data: &[u8]) -> bool {
    data.len() >= 4 && u16::from_be_bytes([data[2], data[3]]) & FLAG_TC != 0
}

/// Transaction id of a message, if it has one
pub fn message_id(data: &[u8]) -> Option<u16> {
    (data.len() >= 2).then(|| u16::from_be_bytes([data[0], data[1]]))
}

/// Parse a response for answers of `expected` type.
///
/// Fails only if the header is missing. A record that does not fit in the
/// buffer ends parsing; whatever was collected before it is returned.
pub fn parse_response(data: &[u8], expected: RecordType) -> Result<ParsedResponse, WireError> {
    let header = Header::parse(data)?;
    let mut parsed = ParsedResponse {
        header,
        ..ParsedResponse::default()
    };

    let mut pos = DNS_HEADER_SIZE;
    for _ in 0..header.qdcount {
        match decode_name(data, pos) {
            Ok((_, consumed)) if consumed > 0 && pos + consumed + 4 <= data.len() => {
                pos += consumed + 4;
            }
            _ => return Ok(parsed),
        }
    }

    for _ in 0..header.ancount {
        let Some(record) = read_record(data, &mut pos) else {
            return Ok(parsed);
        };

        if record.rtype == TYPE_CNAME {
            if let Some(target) = rdata_name(data, &record) {
                parsed.cname = Some(target);
            }
        } else if record.rtype == expected.code() && record.rdata.len() == expected.rdata_len() {
            if let Some(addr) = rdata_addr(&record) {
                parsed.answers.push(addr);
            }
        }
    }

    for _ in 0..header.nscount {
        let Some(record) = read_record(data, &mut pos) else {
            return Ok(parsed);
        };

        if record.rtype == TYPE_NS {
            if let Some(ns) = rdata_name(data, &record) {
                parsed.next_ns.push(ns);
            }
        }
    }

    for _ in 0..header.arcount {
        let Some(record) = read_record(data, &mut pos) else {
            return Ok(parsed);
        };

        if record.rtype == TYPE_A {
            if let Ok(octets) = <[u8; 4]>::try_from(record.rdata) {
                parsed
                    .glue
                    .insert(record.name.to_ascii_lowercase(), Ipv4Addr::from(octets));
            }
        }
    }

    Ok(parsed)
}

/// Read one resource record at `pos`, advancing past it
fn read_record<'a>(data: &'a [u8], pos: &mut usize) -> Option<ResourceRecord<'a>> {
    let (name, consumed) = decode_name(data, *pos).ok()?;
    if consumed == 0 {
        return None;
    }

    let fixed = *pos + consumed;
    if fixed + RR_FIXED_SIZE > data.len() {
        return None;
    }

    let field = |i: usize| u16::from_be_bytes([data[fixed + i], data[fixed + i + 1]]);
    // Class and TTL are skipped: there is no cache
    let rtype = field(0);
    let rdlength = usize::from(field(8));

    let rdata_offset = fixed + RR_FIXED_SIZE;
    if rdata_offset + rdlength > data.len() {
        return None;
    }

    *pos = rdata_offset + rdlength;

    Some(ResourceRecord {
        name,
        rtype,
        rdata: &data[rdata_offset..rdata_offset + rdlength],
        rdata_offset,
    })
}

/// Decode a name held in RDATA (NS, CNAME); pointers may reach anywhere in the message
fn rdata_name(data: &[u8], record: &ResourceRecord<'_>) -> Option<String> {
    if record.rdata.is_empty() {
        return None;
    }

    match decode_name(data, record.rdata_offset) {
        Ok((name, _)) if !name.is_empty() => Some(name),
        _ => None,
    }
}

fn rdata_addr(record: &ResourceRecord<'_>) -> Option<IpAddr> {
    match record.rtype {
        TYPE_A => <[u8; 4]>::try_from(record.rdata)
            .ok()
            .map(|o| IpAddr::V4(Ipv4Addr::from(o))),
        TYPE_AAAA => <[u8; 16]>::try_from(record.rdata)
            .ok()
            .map(|o| IpAddr::V6(Ipv6Addr::from(o))),
        _ => None,
    }
}
