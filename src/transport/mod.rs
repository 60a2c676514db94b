//! Transport Module
//!
//! One query/response exchange per call, over UDP or over TCP with a 2 byte
//! length prefix. There is no retry here: when an exchange fails the
//! resolution engine moves on to its next candidate server.
//!
//! Also holds the stub-resolver seam used to turn a nameserver name into an
//! address when a referral carries no glue.

mod lookup;
mod net;

pub use lookup::SystemLookup;
pub use net::NetTransport;

use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::error::TransportError;

/// Sends a query to a server and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Single datagram exchange
    async fn udp_exchange(&self, server: Ipv4Addr, query: &[u8]) -> Result<Vec<u8>, TransportError>;

    /// Length-prefixed stream exchange, used after a truncated UDP response
    async fn tcp_exchange(&self, server: Ipv4Addr, query: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// Resolves a hostname to one IPv4 address outside the iterative walk
#[async_trait]
pub trait NameserverLookup: Send + Sync {
    async fn lookup_ipv4(&self, host: &str) -> Result<Ipv4Addr, TransportError>;
}
