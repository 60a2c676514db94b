//! Resolver Errors
//!
//! Errors raised by the wire codec and the transports. None of these escape
//! the resolution engine: a failed exchange or an unparsable response only
//! moves the walk on to the next candidate server.

/// Errors produced while encoding or decoding DNS wire data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("label exceeds 63 bytes: {0}")]
    LabelTooLong(String),

    #[error("encoded name exceeds 255 bytes")]
    NameTooLong,

    #[error("empty label in name")]
    EmptyLabel,

    #[error("too many compression pointers (limit {0})")]
    PointerLimit(usize),

    #[error("message shorter than the 12 byte header")]
    ShortHeader,
}

/// Errors produced by a single query/response exchange
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("exchange timed out")]
    Timeout,

    #[error("short write: sent {sent} of {expected} bytes")]
    ShortWrite { sent: usize, expected: usize },

    #[error("message too large: {0} bytes")]
    MessageTooLarge(usize),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl From<tokio::time::error::Elapsed> for TransportError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        TransportError::Timeout
    }
}
