//! DNS Wire Codec
//!
//! Encodes queries and decodes responses in the RFC 1035 message format.
//!
//! ## Layout
//!
//! ```text
//! +--------+----------+--------+-----------+------------+
//! | Header | Question | Answer | Authority | Additional |
//! +--------+----------+--------+-----------+------------+
//!   12 B     name+4B    RRs      NS RRs      glue RRs
//! ```

mod message;
mod name;

pub use message::{build_query, is_truncated, message_id, parse_response, ParsedResponse};
pub use name::{decode_name, encode_name, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POINTER_HOPS};

#[cfg(test)]
pub(crate) mod test_support;
