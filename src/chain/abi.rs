//! Minimal ABI codec for the handful of read calls this service makes.
//!
//! Every contract function we call takes no arguments, so encoding is just
//! the 4-byte Keccak selector. Decoding covers the three return shapes we
//! see: a single `uint256` word, a single `address` word, and a dynamic
//! `string`.

use sha3::{Digest, Keccak256};
use thiserror::Error;

const WORD: usize = 32;

/// Decode failure: the payload does not match the expected ABI shape.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("invalid hex in return data: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("return data truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("uint value does not fit the target width")]
    ValueTooWide,
    #[error("dynamic string offset out of range")]
    BadOffset,
    #[error("unknown auction type code {0}")]
    UnknownAuctionType(u8),
    #[error("string payload is not valid UTF-8")]
    BadUtf8,
}

fn keccak(input: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// 4-byte function selector for a canonical signature like `"name()"`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak(signature);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// `topics[0]` filter value for an event signature, as 0x-prefixed hex.
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak(signature)))
}

/// Calldata for a zero-argument call, as 0x-prefixed hex.
pub fn call_data(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

fn strip_0x(data: &str) -> &str {
    data.strip_prefix("0x").unwrap_or(data)
}

/// Decode 0x-prefixed hex return data into raw bytes.
pub fn decode_bytes(data: &str) -> Result<Vec<u8>, AbiError> {
    Ok(hex::decode(strip_0x(data))?)
}

fn word_at(bytes: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    if bytes.len() < end {
        return Err(AbiError::Truncated {
            expected: end,
            actual: bytes.len(),
        });
    }
    Ok(&bytes[start..end])
}

/// Interpret a 32-byte word as a `u128`, rejecting wider values.
pub fn word_to_u128(word: &[u8]) -> Result<u128, AbiError> {
    if word.len() != WORD {
        return Err(AbiError::Truncated {
            expected: WORD,
            actual: word.len(),
        });
    }
    if word[..16].iter().any(|b| *b != 0) {
        return Err(AbiError::ValueTooWide);
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(buf))
}

/// Interpret a 32-byte word as a `u64`, rejecting wider values.
pub fn word_to_u64(word: &[u8]) -> Result<u64, AbiError> {
    let value = word_to_u128(word)?;
    u64::try_from(value).map_err(|_| AbiError::ValueTooWide)
}

/// Interpret a 32-byte word as an address (low 20 bytes, lowercase hex).
pub fn word_to_address(word: &[u8]) -> Result<String, AbiError> {
    if word.len() != WORD {
        return Err(AbiError::Truncated {
            expected: WORD,
            actual: word.len(),
        });
    }
    Ok(format!("0x{}", hex::encode(&word[12..])))
}

/// Decode a single-`uint256` return into a `u128`.
pub fn decode_uint(data: &str) -> Result<u128, AbiError> {
    let bytes = decode_bytes(data)?;
    word_to_u128(word_at(&bytes, 0)?)
}

/// Decode a single-`address` return.
pub fn decode_address(data: &str) -> Result<String, AbiError> {
    let bytes = decode_bytes(data)?;
    word_to_address(word_at(&bytes, 0)?)
}

/// Decode a single dynamic-`string` return.
pub fn decode_string(data: &str) -> Result<String, AbiError> {
    let bytes = decode_bytes(data)?;
    let offset = usize::try_from(word_to_u128(word_at(&bytes, 0)?)?)
        .map_err(|_| AbiError::BadOffset)?;
    // The offset and length words come straight off the wire; checked
    // arithmetic keeps a hostile endpoint from overflowing the bounds math.
    let start = offset.checked_add(WORD).ok_or(AbiError::BadOffset)?;
    if start > bytes.len() {
        return Err(AbiError::BadOffset);
    }
    let len = usize::try_from(word_to_u128(&bytes[offset..start])?)
        .map_err(|_| AbiError::BadOffset)?;
    let end = start.checked_add(len).ok_or(AbiError::BadOffset)?;
    if end > bytes.len() {
        return Err(AbiError::Truncated {
            expected: end,
            actual: bytes.len(),
        });
    }
    String::from_utf8(bytes[start..end].to_vec()).map_err(|_| AbiError::BadUtf8)
}

/// Split non-indexed event data into its fixed 32-byte words.
pub fn event_words(data: &str, expected: usize) -> Result<Vec<[u8; 32]>, AbiError> {
    let bytes = decode_bytes(data)?;
    if bytes.len() < expected * WORD {
        return Err(AbiError::Truncated {
            expected: expected * WORD,
            actual: bytes.len(),
        });
    }
    let mut words = Vec::with_capacity(expected);
    for i in 0..expected {
        let mut word = [0u8; 32];
        word.copy_from_slice(word_at(&bytes, i)?);
        words.push(word);
    }
    Ok(words)
}
