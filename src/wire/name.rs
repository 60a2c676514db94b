//! Domain name encoding
//!
//! Names go out as uncompressed length-prefixed labels. Incoming names may
//! use compression pointers, which are followed iteratively up to
//! [`MAX_POINTER_HOPS`] times so a crafted pointer cycle cannot hang the
//! decoder.

use crate::error::WireError;

/// Longest single label
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded name, including length bytes and the root label
pub const MAX_NAME_LEN: usize = 255;

/// Compression pointers followed before a name is rejected
pub const MAX_POINTER_HOPS: usize = 16;

const POINTER_MASK: u8 = 0xC0;

/// Encode a dot separated name into wire labels.
///
/// Labels are lower-cased. A single trailing dot is accepted, and `""` or
/// `"."` encode to the root name.
pub fn encode_name(name: &str) -> Result<Vec<u8>, WireError> {
    let name = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::with_capacity(name.len() + 2);

    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() {
                return Err(WireError::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(WireError::LabelTooLong(label.to_string()));
            }

            out.push(label.len() as u8);
            out.extend(label.bytes().map(|b| b.to_ascii_lowercase()));
        }
    }
    out.push(0);

    if out.len() > MAX_NAME_LEN {
        return Err(WireError::NameTooLong);
    }

    Ok(out)
}

/// Decode the name starting at `offset`.
///
/// Returns the dot separated name and the number of bytes the name occupies
/// at `offset`. Once a pointer is followed the consumed count is fixed at
/// the pointer's two bytes, however long the pointee is.
///
/// A label or pointer running past the end of `data` stops decoding and
/// yields whatever was read so far.
pub fn decode_name(data: &[u8], offset: usize) -> Result<(String, usize), WireError> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos = offset;
    let mut consumed = None;
    let mut hops = 0;

    while let Some(&len) = data.get(pos) {
        if len == 0 {
            let consumed = consumed.unwrap_or_else(|| pos + 1 - offset);
            return Ok((labels.join("."), consumed));
        }

        if len & POINTER_MASK == POINTER_MASK {
            if pos + 2 > data.len() {
                break;
            }

            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(WireError::PointerLimit(MAX_POINTER_HOPS));
            }

            if consumed.is_none() {
                consumed = Some(pos + 2 - offset);
            }
            pos = (usize::from(len & !POINTER_MASK) << 8) | usize::from(data[pos + 1]);
            continue;
        }

        // 0x40 and 0x80 label types are obsolete
        if len & POINTER_MASK != 0 {
            break;
        }

        let len = usize::from(len);
        if pos + 1 + len > data.len() {
            break;
        }

        labels.push(String::from_utf8_lossy(&data[pos + 1..pos + 1 + len]).into_owned());
        pos += 1 + len;
    }

    let consumed = consumed.unwrap_or_else(|| pos.saturating_sub(offset));
    Ok((labels.join("."), consumed))
}
