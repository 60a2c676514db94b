//! Iterative resolution engine

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::pin::Pin;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, debug_span, warn, Instrument};

use crate::config::ResolverConfig;
use crate::transport::{NameserverLookup, NetTransport, SystemLookup, Transport};
use crate::types::{RecordType, ResponseCode, DNS_HEADER_SIZE};
use crate::wire::{build_query, is_truncated, message_id, parse_response, ParsedResponse};

/// Per-resolver trace events, silent unless `config.trace` is set
macro_rules! step {
    ($resolver:expr, $($arg:tt)+) => {
        if $resolver.config.trace {
            debug!($($arg)+);
        }
    };
}

/// Why a walk ended without answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    NxDomain,
    ServersExhausted,
    IterationLimit,
    NoReferral,
    UnresolvableReferral,
    Unencodable,
}

type BoxedWalk<'a> = Pin<Box<dyn Future<Output = Vec<IpAddr>> + Send + 'a>>;

/// Transaction ids seeded from wall clock and process id, then counted up
/// so consecutive queries differ. Predictable; not a spoofing defence.
#[derive(Debug)]
struct QueryIds {
    seed: u16,
    counter: AtomicU16,
}

impl QueryIds {
    fn new() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let seed = (now.as_secs() as u32) ^ now.subsec_nanos() ^ std::process::id();

        Self {
            seed: seed as u16,
            counter: AtomicU16::new(0),
        }
    }

    fn next(&self) -> u16 {
        self.seed.wrapping_add(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

/// Iterative DNS resolver
///
/// Each call to [`Resolver::resolve`] owns its candidate servers, query name
/// and iteration counter, so one resolver may serve concurrent lookups.
pub struct Resolver<T = NetTransport, L = SystemLookup> {
    config: ResolverConfig,
    transport: T,
    lookup: L,
    query_ids: QueryIds,
}

impl Resolver {
    /// Resolver over real sockets and the system stub resolver
    pub fn new(config: ResolverConfig) -> Self {
        let transport = NetTransport::new(&config);
        Self::with_collaborators(config, transport, SystemLookup)
    }
}

impl<T: Transport, L: NameserverLookup> Resolver<T, L> {
    pub fn with_collaborators(config: ResolverConfig, transport: T, lookup: L) -> Self {
        Self {
            config,
            transport,
            lookup,
            query_ids: QueryIds::new(),
        }
    }

    /// Resolve `domain` to addresses of type `rtype`.
    ///
    /// An empty result means the name could not be resolved, whatever the
    /// reason (NXDOMAIN, no reachable server, guard limits).
    pub async fn resolve(&self, domain: &str, rtype: RecordType) -> Vec<IpAddr> {
        self.resolve_at_depth(domain, rtype, 0).await
    }

    fn resolve_at_depth<'a>(&'a self, domain: &'a str, rtype: RecordType, depth: usize) -> BoxedWalk<'a> {
        let span = debug_span!("resolve", qname = %domain, %rtype, depth);
        Box::pin(self.walk(domain, rtype, depth).instrument(span))
    }

    async fn walk(&self, domain: &str, rtype: RecordType, depth: usize) -> Vec<IpAddr> {
        let mut servers = self.config.root_hints.clone();
        let mut qname = domain.to_string();
        let mut iterations = 0;

        let termination = loop {
            if iterations >= self.config.max_iterations {
                break Termination::IterationLimit;
            }
            let Some(server) = servers.pop() else {
                break Termination::ServersExhausted;
            };
            iterations += 1;

            step!(self, "Querying {} for {} {}", server, qname, rtype);

            let id = self.query_ids.next();
            let query = match build_query(id, &qname, rtype) {
                Ok(query) => query,
                Err(e) => {
                    warn!("Cannot encode query for {}: {}", qname, e);
                    break Termination::Unencodable;
                }
            };

            let Some(response) = self.exchange(server, id, &query).await else {
                continue;
            };

            let parsed = match parse_response(&response, rtype) {
                Ok(parsed) => parsed,
                Err(e) => {
                    step!(self, "Unparsable response from {}: {}", server, e);
                    continue;
                }
            };

            if !parsed.answers.is_empty() {
                step!(self, "{} answered with {} records", server, parsed.answers.len());
                return parsed.answers;
            }

            if let Some(target) = parsed.cname {
                step!(self, "CNAME {} -> {}", qname, target);
                qname = target;
                // Ask the same candidate set, starting with the server that sent the alias
                servers.push(server);
                continue;
            }

            if parsed.rcode() == ResponseCode::NxDomain {
                break Termination::NxDomain;
            }

            if parsed.next_ns.is_empty() {
                break Termination::NoReferral;
            }

            // Old candidates are dropped, never merged with the referral
            servers = self.referral_targets(&parsed, depth).await;
            if servers.is_empty() {
                break Termination::UnresolvableReferral;
            }

            step!(self, "Referred to {:?}", servers);
        };

        match termination {
            Termination::IterationLimit => {
                step!(self, "Too many iterations ({}), aborting", iterations)
            }
            Termination::NxDomain => step!(self, "{} does not exist (NXDOMAIN)", qname),
            Termination::UnresolvableReferral => step!(self, "Could not resolve any referred nameserver"),
            other => step!(self, "Failed to resolve {}: {:?}", domain, other),
        }

        Vec::new()
    }

    /// One exchange with `server`: UDP first, TCP if the reply was truncated.
    ///
    /// `None` for anything unusable: transport failure, short or mismatched
    /// reply, or a failed TCP retry (the truncated UDP payload is dropped).
    async fn exchange(&self, server: Ipv4Addr, id: u16, query: &[u8]) -> Option<Vec<u8>> {
        let response = match self.transport.udp_exchange(server, query).await {
            Ok(response) => {
                step!(self, "UDP {} bytes from {}", response.len(), server);
                response
            }
            Err(e) => {
                step!(self, "UDP exchange with {} failed: {}", server, e);
                return None;
            }
        };

        if !self.matches(server, id, &response) {
            return None;
        }

        if !is_truncated(&response) {
            return Some(response);
        }

        step!(self, "Truncated reply from {}, retrying over TCP", server);

        match self.transport.tcp_exchange(server, query).await {
            Ok(response) if self.matches(server, id, &response) => {
                step!(self, "TCP {} bytes from {}", response.len(), server);
                Some(response)
            }
            Ok(_) => None,
            Err(e) => {
                step!(self, "TCP exchange with {} failed: {}", server, e);
                None
            }
        }
    }

    fn matches(&self, server: Ipv4Addr, id: u16, response: &[u8]) -> bool {
        if response.len() < DNS_HEADER_SIZE {
            step!(self, "Short reply from {}: {}", server, hex::encode(response));
            return false;
        }

        if message_id(response) != Some(id) {
            step!(
                self,
                "Discarding reply from {} with id {:?}, expected {}",
                server,
                message_id(response),
                id
            );
            return false;
        }

        true
    }

    /// Addresses for every referred nameserver that can be located
    async fn referral_targets(&self, parsed: &ParsedResponse, depth: usize) -> Vec<Ipv4Addr> {
        let mut targets = Vec::with_capacity(parsed.next_ns.len());

        for ns in &parsed.next_ns {
            if let Some(addr) = parsed.glue_for(ns) {
                step!(self, "Glue {} -> {}", ns, addr);
                targets.push(addr);
                continue;
            }

            match self.resolve_nameserver(ns, depth).await {
                Some(addr) => targets.push(addr),
                None => step!(self, "Skipping unresolvable nameserver {}", ns),
            }
        }

        targets
    }

    /// Locate a nameserver referred without glue
    async fn resolve_nameserver(&self, ns: &str, depth: usize) -> Option<Ipv4Addr> {
        if depth + 1 < self.config.max_referral_depth {
            let addrs = self.resolve_at_depth(ns, RecordType::A, depth + 1).await;
            let found = addrs.into_iter().find_map(|addr| match addr {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            });
            if found.is_some() {
                return found;
            }
        } else {
            step!(self, "Referral depth {} reached for {}", depth + 1, ns);
        }

        if !self.config.system_lookup_fallback {
            return None;
        }

        match self.lookup.lookup_ipv4(ns).await {
            Ok(addr) => {
                step!(self, "System lookup {} -> {}", ns, addr);
                Some(addr)
            }
            Err(e) => {
                step!(self, "System lookup of {} failed: {}", ns, e);
                None
            }
        }
    }
}
