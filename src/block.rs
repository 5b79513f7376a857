//! IEEE-488.2 definite-length arbitrary block codec.
//!
//! Bulk transfers (waveform samples, sequence tables, mass-storage files) travel
//! inside SCPI messages wrapped as
//!
//! ```text
//! #<ndigits><length><payload>
//! ```
//!
//! where `ndigits` is a single ASCII digit giving the width of the decimal
//! `length` field, and `length` is the exact number of payload bytes that follow.
//!
//! # Example
//! ```
//! use awg_scpi::block;
//!
//! let encoded = block::encode(b"hello").unwrap();
//! assert_eq!(encoded, b"#15hello");
//! assert_eq!(block::decode(&encoded).unwrap(), b"hello");
//! ```

use crate::error::BlockError;
use crate::types::ByteOrder;

/// Largest payload whose length still fits a single-digit `ndigits` field.
pub const MAX_BLOCK_LEN: usize = 999_999_999;

/// Parsed block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Width of the decimal length field.
    pub digits: usize,
    /// Declared payload length in bytes.
    pub length: usize,
}

impl BlockHeader {
    /// Offset of the first payload byte.
    pub fn data_start(&self) -> usize {
        2 + self.digits
    }

    /// Offset one past the last payload byte.
    pub fn data_end(&self) -> usize {
        self.data_start() + self.length
    }
}

/// Build the `#<ndigits><length>` header for a payload of `length` bytes.
pub fn header(length: usize) -> Result<String, BlockError> {
    if length > MAX_BLOCK_LEN {
        return Err(BlockError::Encoding { length });
    }
    let length_str = length.to_string();
    Ok(format!("#{}{}", length_str.len(), length_str))
}

/// Wrap `payload` as a definite-length block.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, BlockError> {
    encode_with_prefix(&[], payload)
}

/// Wrap `payload` as a block and place it after a command prefix, e.g.
/// `:MMEM:DATA "C:\file.bin",`.
pub fn encode_with_prefix(prefix: &[u8], payload: &[u8]) -> Result<Vec<u8>, BlockError> {
    let header = header(payload.len())?;
    let mut out = Vec::with_capacity(prefix.len() + header.len() + payload.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Parse the header at the start of `raw`.
///
/// Only the header bytes need to be present; the payload is not inspected.
pub fn parse_header(raw: &[u8]) -> Result<BlockHeader, BlockError> {
    match raw.first() {
        None => return Err(BlockError::Malformed("empty block".into())),
        Some(b'#') => {}
        Some(other) => {
            return Err(BlockError::Malformed(format!(
                "expected '#' at start of block, found 0x{other:02x}"
            )))
        }
    }

    let digits = match raw.get(1) {
        Some(d) if d.is_ascii_digit() => usize::from(d - b'0'),
        Some(other) => {
            return Err(BlockError::Malformed(format!(
                "invalid digit-count byte 0x{other:02x}"
            )))
        }
        None => return Err(BlockError::Malformed("missing digit-count byte".into())),
    };
    if digits == 0 {
        return Err(BlockError::Malformed(
            "indefinite-length blocks (#0) are not supported".into(),
        ));
    }

    let field = raw.get(2..2 + digits).ok_or(BlockError::Truncated {
        expected: 2 + digits,
        available: raw.len(),
    })?;
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(BlockError::Malformed(format!(
            "non-digit byte in length field {:?}",
            String::from_utf8_lossy(field)
        )));
    }
    let length = field
        .iter()
        .fold(0usize, |acc, d| acc * 10 + usize::from(d - b'0'));

    Ok(BlockHeader { digits, length })
}

/// Extract the payload of the block at the start of `raw`.
///
/// Bytes after the declared payload (typically a line terminator) are ignored.
pub fn decode(raw: &[u8]) -> Result<&[u8], BlockError> {
    let header = parse_header(raw)?;
    raw.get(header.data_start()..header.data_end())
        .ok_or(BlockError::Truncated {
            expected: header.data_end(),
            available: raw.len(),
        })
}

/// Serialize 32-bit float samples for a block upload.
pub fn f32_to_bytes(samples: &[f32], order: ByteOrder) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| match order {
            ByteOrder::Normal => s.to_be_bytes(),
            ByteOrder::Swapped => s.to_le_bytes(),
        })
        .collect()
}

/// Interpret a block payload as 32-bit float samples.
pub fn bytes_to_f32(payload: &[u8], order: ByteOrder) -> Result<Vec<f32>, BlockError> {
    words(payload, order).map(|w| w.into_iter().map(f32::from_bits).collect())
}

/// Interpret a block payload as 32-bit unsigned words (sequence table data).
pub fn bytes_to_u32(payload: &[u8], order: ByteOrder) -> Result<Vec<u32>, BlockError> {
    words(payload, order)
}

fn words(payload: &[u8], order: ByteOrder) -> Result<Vec<u32>, BlockError> {
    if payload.len() % 4 != 0 {
        return Err(BlockError::Malformed(format!(
            "payload of {} bytes is not a whole number of 32-bit words",
            payload.len()
        )));
    }
    Ok(payload
        .chunks_exact(4)
        .map(|c| {
            let bytes = [c[0], c[1], c[2], c[3]];
            match order {
                ByteOrder::Normal => u32::from_be_bytes(bytes),
                ByteOrder::Swapped => u32::from_le_bytes(bytes),
            }
        })
        .collect())
}
