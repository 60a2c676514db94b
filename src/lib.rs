//! Iterative DNS Resolver
//!
//! Resolves A and AAAA records by walking the delegation tree from the root
//! servers, without relying on a recursive resolver.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ITERATIVE RESOLVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Resolver (resolver)    ←── candidate servers, CNAME, NS   │
//! │  Wire codec (wire)      ←── names, queries, responses      │
//! │  Transport (transport)  ←── UDP, TCP on truncation         │
//! │  Root hints             ←── 13 root server addresses       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - A walk queries at most `max_iterations` servers
//! - Glue-less nameservers are resolved at most `max_referral_depth` deep
//! - Name decoding follows at most 16 compression pointers
//! - Replies whose id differs from the query are dropped

pub mod config;
pub mod error;
pub mod resolver;
pub mod transport;
pub mod types;
pub mod wire;

pub use config::ResolverConfig;
pub use error::{TransportError, WireError};
pub use resolver::{Resolver, ROOT_HINTS};
pub use types::RecordType;
