//! Resolver Configuration
//!
//! Timeouts, guard limits and root hints for the iterative walk.
//! Defaults reproduce the classic behaviour: 5s UDP, 10s TCP, 15 iterations,
//! referral recursion capped at depth 5, the 13 IANA root servers.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use crate::resolver::ROOT_HINTS;
use crate::types::{DNS_HEADER_SIZE, DNS_PORT, MAX_UDP_SIZE};

/// Main configuration for the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    // === Transport ===

    /// Receive timeout for a UDP exchange (seconds)
    pub udp_timeout_secs: u64,

    /// Connect/send/receive timeout for a TCP exchange (seconds)
    pub tcp_timeout_secs: u64,

    /// Destination port for both transports
    pub port: u16,

    /// Largest UDP datagram accepted
    pub max_udp_size: usize,

    // === Guard limits ===

    /// Servers queried per resolution before giving up
    pub max_iterations: usize,

    /// Nested resolutions of glue-less nameservers
    pub max_referral_depth: usize,

    /// Ask the system resolver for nameservers the walk could not resolve
    pub system_lookup_fallback: bool,

    // === Seeding ===

    /// Servers the walk starts from
    pub root_hints: Vec<Ipv4Addr>,

    // === Diagnostics ===

    /// Emit a step-by-step trace of each resolution
    pub trace: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            udp_timeout_secs: 5,
            tcp_timeout_secs: 10,
            port: DNS_PORT,
            max_udp_size: MAX_UDP_SIZE,

            max_iterations: 15,
            max_referral_depth: 5,
            system_lookup_fallback: true,

            root_hints: ROOT_HINTS.to_vec(),

            trace: false,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn udp_timeout(&self) -> Duration {
        Duration::from_secs(self.udp_timeout_secs)
    }

    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout_secs)
    }

    // Builder-style methods for CLI overrides

    pub fn with_udp_timeout(mut self, secs: u64) -> Self {
        self.udp_timeout_secs = secs;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_root_hints(mut self, hints: Vec<Ipv4Addr>) -> Self {
        self.root_hints = hints;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.udp_timeout_secs == 0 || self.tcp_timeout_secs == 0 {
            anyhow::bail!("udp_timeout_secs and tcp_timeout_secs must be non-zero");
        }

        if self.max_iterations == 0 {
            anyhow::bail!("max_iterations must be at least 1");
        }

        if self.root_hints.is_empty() {
            anyhow::bail!("root_hints must name at least one server");
        }

        if self.port == 0 {
            anyhow::bail!("port must be non-zero");
        }

        if self.max_udp_size < DNS_HEADER_SIZE {
            anyhow::bail!(
                "max_udp_size ({}) must hold at least a {} byte header",
                self.max_udp_size,
                DNS_HEADER_SIZE
            );
        }

        Ok(())
    }
}
