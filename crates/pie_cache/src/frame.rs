//! Length-prefixed framing shared by every header implementation.
//!
//! A frame is the ASCII decimal length of its payload, a single `\n`, then
//! the payload bytes. Whatever follows the payload is left untouched, so
//! frames concatenate with each other and with an artifact body.

/// Byte separating the length field from the payload.
pub const DELIMITER: u8 = b'\n';

/// Longest length field accepted before the delimiter.
const MAX_LENGTH_DIGITS: usize = 20;

/// A byte stream that does not start with a valid frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// No `\n` was found within the length field.
    #[error("missing length delimiter")]
    MissingDelimiter,

    /// The length field is empty, not decimal, or does not fit in `usize`.
    #[error("invalid length field {0:?}")]
    InvalidLength(String),

    /// Fewer payload bytes follow the delimiter than the length declares.
    #[error("truncated frame: declared {declared} bytes, found {available}")]
    Truncated {
        /// Payload length from the length field.
        declared: usize,
        /// Bytes actually present after the delimiter.
        available: usize,
    },
}

/// Prepends a frame holding `payload` to `body`.
pub fn encode(payload: &[u8], body: &[u8]) -> Vec<u8> {
    let len = payload.len().to_string();
    let mut out = Vec::with_capacity(len.len() + 1 + payload.len() + body.len());
    out.extend_from_slice(len.as_bytes());
    out.push(DELIMITER);
    out.extend_from_slice(payload);
    out.extend_from_slice(body);
    out
}

/// Splits a leading frame off `bytes`, returning `(payload, rest)`.
///
/// Only the length field is scanned, so the cost does not grow with the size
/// of whatever follows the frame.
pub fn decode(bytes: &[u8]) -> Result<(&[u8], &[u8]), FrameError> {
    let window = &bytes[..bytes.len().min(MAX_LENGTH_DIGITS + 1)];
    let Some(split) = window.iter().position(|&b| b == DELIMITER) else {
        if window.len() <= MAX_LENGTH_DIGITS {
            return Err(FrameError::MissingDelimiter);
        }
        return Err(FrameError::InvalidLength(lossy(window)));
    };

    let field = &bytes[..split];
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::InvalidLength(lossy(field)));
    }
    let declared: usize = std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FrameError::InvalidLength(lossy(field)))?;

    let rest = &bytes[split + 1..];
    if rest.len() < declared {
        return Err(FrameError::Truncated {
            declared,
            available: rest.len(),
        });
    }
    Ok(rest.split_at(declared))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
