//! Counted bulk copy between byte buffers.
//!
//! The source starts with a little-endian `u32` payload length. The payload
//! is moved as whole 4-byte units followed by at most one residual 2-byte
//! unit; a trailing odd byte is not part of any unit and is left behind.

use crate::error::CopyError;

const HEADER_LEN: usize = 4;

/// Read the payload length from a counted buffer.
pub fn payload_len(src: &[u8]) -> Result<usize, CopyError> {
    let header: [u8; HEADER_LEN] = src
        .get(..HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or(CopyError::MissingHeader { len: src.len() })?;
    Ok(u32::from_le_bytes(header) as usize)
}

/// Copy the counted payload of `src` into the front of `dst`.
///
/// Returns the number of bytes written. A zero count writes nothing.
pub fn bulk_copy(src: &[u8], dst: &mut [u8]) -> Result<usize, CopyError> {
    let len = payload_len(src)?;
    if len == 0 {
        return Ok(0);
    }

    let words = len >> 2;
    let residual = len & 2;
    let needed = (words << 2) + residual;

    let payload = &src[HEADER_LEN..];
    if payload.len() < needed {
        return Err(CopyError::SourceTruncated {
            expected: needed,
            actual: payload.len(),
        });
    }
    if dst.len() < needed {
        return Err(CopyError::DestinationTooSmall {
            needed,
            capacity: dst.len(),
        });
    }

    for (to, from) in dst
        .chunks_exact_mut(4)
        .zip(payload.chunks_exact(4))
        .take(words)
    {
        to.copy_from_slice(from);
    }
    if residual != 0 {
        let at = words << 2;
        dst[at..at + 2].copy_from_slice(&payload[at..at + 2]);
    }
    Ok(needed)
}

/// Build a counted buffer around `payload`.
pub fn counted(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}
