//! # Sized Payloads
//!
//! A sized payload is a chunk of bytes preceded by its length:
//!
//! ```text
//! +----------------+------------------+
//! | Length (u32 LE)| Data (N bytes)   |
//! +----------------+------------------+
//! ```
//!
//! Schema files are flat sequences of sized payloads; [`read_all`] walks
//! such a sequence to exhaustion. A truncated prefix or a declared length
//! that overruns the remaining input fails as corrupted data, never panics.
//!
//! The prefix width is a fixed 4 bytes regardless of the host architecture,
//! so files are portable between 32-bit and 64-bit systems.

use eyre::{bail, ensure, Result};

/// Width of the length prefix in front of every sized payload.
pub const SIZE_PREFIX_LEN: usize = 4;

/// Wraps `data` into a sized payload.
pub fn sized(data: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(SIZE_PREFIX_LEN + data.len());
    res.extend((data.len() as u32).to_le_bytes());
    res.extend(data);
    res
}

/// Reads one sized payload from the front of `payload`.
///
/// Returns the chunk and the total number of bytes consumed (prefix
/// included) so callers can advance through a sequence.
pub fn read(payload: &[u8]) -> Result<(&[u8], usize)> {
    ensure!(
        payload.len() >= SIZE_PREFIX_LEN,
        "corrupted payload: no size prefix in {} bytes",
        payload.len()
    );

    let size = u32::from_le_bytes(payload[..SIZE_PREFIX_LEN].try_into()?) as usize;
    let total = SIZE_PREFIX_LEN + size;
    ensure!(
        payload.len() >= total,
        "corrupted payload: declared size [size={}] exceeds remaining bytes [remaining={}]",
        size,
        payload.len() - SIZE_PREFIX_LEN
    );

    Ok((&payload[SIZE_PREFIX_LEN..total], total))
}

/// Reads every sized payload in `payload`, in order.
///
/// An empty input yields an empty vec; trailing garbage that does not form
/// a complete sized payload fails the whole call.
pub fn read_all(payload: &[u8]) -> Result<Vec<&[u8]>> {
    let mut res = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let (chunk, consumed) = read(rest)?;
        res.push(chunk);
        rest = &rest[consumed..];
    }
    Ok(res)
}

/// Decodes a u32 stored as exactly 4 little-endian bytes.
pub fn read_u32(bytes: &[u8]) -> Result<u32> {
    ensure!(
        bytes.len() == 4,
        "corrupted payload: expected 4 bytes for u32, got {}",
        bytes.len()
    );
    Ok(u32::from_le_bytes(bytes.try_into()?))
}

/// Decodes a u64 stored as exactly 8 little-endian bytes.
pub fn read_u64(bytes: &[u8]) -> Result<u64> {
    ensure!(
        bytes.len() == 8,
        "corrupted payload: expected 8 bytes for u64, got {}",
        bytes.len()
    );
    Ok(u64::from_le_bytes(bytes.try_into()?))
}

/// Decodes a bool stored as exactly one `0x00`/`0x01` byte.
pub fn read_bool(bytes: &[u8]) -> Result<bool> {
    ensure!(
        bytes.len() == 1,
        "corrupted payload: expected 1 byte for bool, got {}",
        bytes.len()
    );
    match bytes[0] {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => bail!("corrupted payload: invalid bool byte [byte={:#04x}]", other),
    }
}
