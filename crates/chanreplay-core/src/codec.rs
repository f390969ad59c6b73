//! Wire framing for protocol messages.
//!
//! A framed message is:
//!
//! ```text
//! version (u8) || body_len (u32, big endian) || body (CBOR-encoded Pkt)
//! ```
//!
//! The length prefix lets a reader reject truncated or padded files before
//! handing the body to the CBOR decoder.

use crate::crypto::MessageId;
use crate::error::{CoreError, Result};
use crate::message::Pkt;

/// The current wire version.
pub const WIRE_VERSION: u8 = 1;

/// Size of the frame header in bytes.
pub const HEADER_LEN: usize = 5;

/// Upper bound on a single message body.
pub const MAX_BODY_LEN: usize = 64 * 1024;

/// Encode a message into a framed byte buffer.
pub fn encode_pkt(pkt: &Pkt) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    ciborium::into_writer(pkt, &mut body).map_err(|e| CoreError::EncodingError(e.to_string()))?;

    if body.len() > MAX_BODY_LEN {
        return Err(CoreError::EncodingError(format!(
            "body of {} bytes exceeds limit of {MAX_BODY_LEN}",
            body.len()
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.push(WIRE_VERSION);
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decode a framed message.
pub fn decode_pkt(bytes: &[u8]) -> Result<Pkt> {
    if bytes.len() < HEADER_LEN {
        return Err(CoreError::Truncated {
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }

    if bytes[0] != WIRE_VERSION {
        return Err(CoreError::UnsupportedVersion(bytes[0]));
    }

    let declared = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
    let body = &bytes[HEADER_LEN..];

    if declared > MAX_BODY_LEN {
        return Err(CoreError::DecodingError(format!(
            "declared body of {declared} bytes exceeds limit of {MAX_BODY_LEN}"
        )));
    }
    if body.len() < declared {
        return Err(CoreError::Truncated {
            needed: HEADER_LEN + declared,
            available: bytes.len(),
        });
    }
    if body.len() != declared {
        return Err(CoreError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    ciborium::from_reader(body).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Decode a framed message and compute its content address.
pub fn decode_pkt_with_id(bytes: &[u8]) -> Result<(MessageId, Pkt)> {
    let pkt = decode_pkt(bytes)?;
    Ok((MessageId::of(bytes), pkt))
}
