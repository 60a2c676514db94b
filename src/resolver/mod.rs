//! Resolution Module
//!
//! Walks the delegation tree from the root servers down to an answer.
//!
//! ## Walk
//!
//! ```text
//! candidates = root hints
//! loop (bounded by max_iterations):
//!     pop server ──► UDP query ──► TC? ──► TCP retry
//!                                   │
//!          answers ◄────────────────┤ return
//!          CNAME   ◄────────────────┤ re-ask same candidates for target
//!          NXDOMAIN ◄───────────────┤ stop
//!          NS (+glue) ◄─────────────┘ candidates = referral targets
//! ```
//!
//! Nameservers referred without glue are resolved by a nested walk, capped
//! at `max_referral_depth`.

mod engine;
mod root_hints;

pub use engine::Resolver;
pub use root_hints::ROOT_HINTS;
