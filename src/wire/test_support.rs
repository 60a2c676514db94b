//! Hand-built responses for tests

use super::name::encode_name;
use crate::types::{
    Header, RecordType, CLASS_IN, DNS_HEADER_SIZE, FLAG_QR, FLAG_TC, TYPE_A, TYPE_AAAA,
    TYPE_CNAME, TYPE_NS,
};

/// Builds response messages section by section.
///
/// Names are written uncompressed unless [`ResponseBuilder::compressed`] is
/// set, in which case any name ending in the question name points back at
/// the question (offset 12), the way real servers pack referrals.
pub struct ResponseBuilder {
    header: Header,
    qname: String,
    compress: bool,
    question: Vec<u8>,
    answers: Vec<u8>,
    authority: Vec<u8>,
    additional: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(id: u16, qname: &str, qtype: RecordType) -> Self {
        let mut question = encode_name(qname).unwrap();
        question.extend_from_slice(&qtype.code().to_be_bytes());
        question.extend_from_slice(&CLASS_IN.to_be_bytes());

        Self {
            header: Header {
                id,
                flags: FLAG_QR,
                qdcount: 1,
                ..Header::default()
            },
            qname: qname.trim_end_matches('.').to_ascii_lowercase(),
            compress: false,
            question,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    pub fn rcode(mut self, rcode: u16) -> Self {
        self.header.flags = (self.header.flags & !0x000F) | (rcode & 0x000F);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.header.flags |= FLAG_TC;
        self
    }

    /// Compress names added after this call against the question name
    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    pub fn answer_a(mut self, owner: &str, octets: [u8; 4]) -> Self {
        let owner = self.name(owner);
        push_record(&mut self.answers, &owner, TYPE_A, &octets);
        self.header.ancount += 1;
        self
    }

    pub fn answer_aaaa(mut self, owner: &str, octets: [u8; 16]) -> Self {
        let owner = self.name(owner);
        push_record(&mut self.answers, &owner, TYPE_AAAA, &octets);
        self.header.ancount += 1;
        self
    }

    pub fn answer_cname(mut self, owner: &str, target: &str) -> Self {
        let (owner, target) = (self.name(owner), self.name(target));
        push_record(&mut self.answers, &owner, TYPE_CNAME, &target);
        self.header.ancount += 1;
        self
    }

    pub fn authority_ns(mut self, zone: &str, ns: &str) -> Self {
        let (zone, ns) = (self.name(zone), self.name(ns));
        push_record(&mut self.authority, &zone, TYPE_NS, &ns);
        self.header.nscount += 1;
        self
    }

    pub fn additional_a(mut self, owner: &str, octets: [u8; 4]) -> Self {
        let owner = self.name(owner);
        push_record(&mut self.additional, &owner, TYPE_A, &octets);
        self.header.arcount += 1;
        self
    }

    fn name(&self, name: &str) -> Vec<u8> {
        let name = name.trim_end_matches('.').to_ascii_lowercase();
        if !self.compress || self.qname.is_empty() {
            return encode_name(&name).unwrap();
        }

        let prefix = if name == self.qname {
            ""
        } else {
            match name.strip_suffix(&format!(".{}", self.qname)) {
                Some(prefix) => prefix,
                None => return encode_name(&name).unwrap(),
            }
        };

        let mut out = encode_name(prefix).unwrap();
        out.pop();
        out.extend_from_slice(&[0xC0, DNS_HEADER_SIZE as u8]);
        out
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.header.to_bytes().to_vec();
        out.extend_from_slice(&self.question);
        out.extend_from_slice(&self.answers);
        out.extend_from_slice(&self.authority);
        out.extend_from_slice(&self.additional);
        out
    }
}

fn push_record(section: &mut Vec<u8>, owner: &[u8], rtype: u16, rdata: &[u8]) {
    section.extend_from_slice(owner);
    section.extend_from_slice(&rtype.to_be_bytes());
    section.extend_from_slice(&CLASS_IN.to_be_bytes());
    section.extend_from_slice(&3600u32.to_be_bytes());
    section.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    section.extend_from_slice(rdata);
}
