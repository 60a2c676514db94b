//! System stub resolver lookup

use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};

use super::NameserverLookup;
use crate::error::TransportError;
use crate::types::DNS_PORT;

/// Asks the operating system's resolver for a nameserver's address
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

#[async_trait]
impl NameserverLookup for SystemLookup {
    async fn lookup_ipv4(&self, host: &str) -> Result<Ipv4Addr, TransportError> {
        let addrs = tokio::net::lookup_host((host, DNS_PORT)).await?;

        let found = addrs.into_iter().find_map(|addr| match addr.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        });

        found.ok_or_else(|| TransportError::Lookup(format!("no IPv4 address for {}", host)))
    }
}
