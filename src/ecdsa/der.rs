//! BER/DER-style encoding of a signature: `SEQUENCE { INTEGER r, INTEGER s }`.
//!
//! The parser checks the structural minimum (tags, nonzero lengths, enough bytes present,
//! and the sequence length matching the two integers), but tolerates trailing bytes
//! after the second integer, and does not require the integers to be minimally encoded.

use crate::{
    curve::{Scalar, FIELD_BYTES},
    error::Error,
};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Two tag bytes and two length bytes for the integers, plus the sequence header.
const OVERHEAD: usize = 6;

/// The maximum length of an encoded signature
/// (both integers taking 33 bytes because of the sign byte).
pub const MAX_DER_LEN: usize = OVERHEAD + 2 * (FIELD_BYTES + 1);

static_assertions::const_assert_eq!(MAX_DER_LEN, 72);

pub(crate) fn parse(sig: &[u8]) -> Result<(Scalar, Scalar), Error> {
    let byte = |idx: usize| sig.get(idx).copied().ok_or(Error::MalformedEncoding);

    if byte(0)? != SEQUENCE_TAG {
        return Err(Error::MalformedEncoding);
    }
    let len_r = usize::from(byte(3)?);
    // There must be room for the tag and the length of `s` after `r`.
    if 5 + len_r >= sig.len() {
        return Err(Error::MalformedEncoding);
    }
    let len_s = usize::from(byte(len_r + 5)?);
    if usize::from(byte(1)?) != len_r + len_s + 4 {
        return Err(Error::MalformedEncoding);
    }
    if len_r + len_s + OVERHEAD > sig.len() {
        return Err(Error::MalformedEncoding);
    }
    if byte(2)? != INTEGER_TAG || len_r == 0 {
        return Err(Error::MalformedEncoding);
    }
    if byte(len_r + 4)? != INTEGER_TAG || len_s == 0 {
        return Err(Error::MalformedEncoding);
    }

    let r = sig.get(4..4 + len_r).ok_or(Error::MalformedEncoding)?;
    let s = sig.get(OVERHEAD + len_r..OVERHEAD + len_r + len_s).ok_or(Error::MalformedEncoding)?;

    let r = strip_leading_zeros(r)?;
    let s = strip_leading_zeros(s)?;
    Ok((integer_to_scalar(r)?, integer_to_scalar(s)?))
}

fn strip_leading_zeros(integer: &[u8]) -> Result<&[u8], Error> {
    let zeros = integer.iter().take_while(|byte| **byte == 0).count();
    let (_, significant) = integer.split_at(zeros);
    if significant.len() > FIELD_BYTES {
        return Err(Error::MalformedEncoding);
    }
    Ok(significant)
}

fn integer_to_scalar(significant: &[u8]) -> Result<Scalar, Error> {
    let mut buffer = [0u8; FIELD_BYTES];
    let (_, tail) = buffer.split_at_mut(FIELD_BYTES - significant.len());
    tail.copy_from_slice(significant);
    Scalar::try_from_be_bytes(&buffer).ok_or(Error::ScalarOverflow)
}

/// A big-endian integer with a guard zero byte in front,
/// trimmed to the shortest form that still reads as non-negative.
struct MinimalInteger {
    buffer: [u8; FIELD_BYTES + 1],
    start: usize,
}

impl MinimalInteger {
    fn new(scalar: &Scalar) -> Self {
        let mut buffer = [0u8; FIELD_BYTES + 1];
        let (_, value) = buffer.split_at_mut(1);
        value.copy_from_slice(&scalar.to_be_bytes());
        // A zero byte can be dropped only if the next one does not have its top bit set.
        let start = buffer
            .windows(2)
            .take_while(|pair| matches!(pair, [0, next] if *next < 0x80))
            .count();
        Self { buffer, start }
    }

    fn as_bytes(&self) -> &[u8] {
        let (_, bytes) = self.buffer.split_at(self.start);
        bytes
    }
}

pub(crate) fn encoded_len(r: &Scalar, s: &Scalar) -> usize {
    OVERHEAD + MinimalInteger::new(r).as_bytes().len() + MinimalInteger::new(s).as_bytes().len()
}

/// Writes the encoding into `out` and returns the number of bytes written.
/// If `out` is too short, nothing is written and the required length is returned in the error.
pub(crate) fn serialize(r: &Scalar, s: &Scalar, out: &mut [u8]) -> Result<usize, Error> {
    let r = MinimalInteger::new(r);
    let s = MinimalInteger::new(s);
    let r = r.as_bytes();
    let s = s.as_bytes();

    let required = OVERHEAD + r.len() + s.len();
    if out.len() < required {
        return Err(Error::BufferTooSmall { required });
    }

    // All the lengths are bounded by `MAX_DER_LEN`, so they fit in a byte.
    let header = [SEQUENCE_TAG, (required - 2) as u8, INTEGER_TAG, r.len() as u8];
    let middle = [INTEGER_TAG, s.len() as u8];
    let encoding = header.iter().chain(r).chain(middle.iter()).chain(s);
    for (dst, src) in out.iter_mut().zip(encoding) {
        *dst = *src;
    }

    Ok(required)
}
