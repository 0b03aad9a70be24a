use alloc::{vec, vec::Vec};

use k256::Secp256k1;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};

use super::der;
use crate::{
    curve::{Scalar, FIELD_BYTES},
    error::Error,
};

const COMPACT_LEN: usize = 2 * FIELD_BYTES;
const RECOVERABLE_LEN: usize = COMPACT_LEN + 1;

fn split_compact(bytes: &[u8; COMPACT_LEN]) -> ([u8; FIELD_BYTES], [u8; FIELD_BYTES]) {
    let mut r = [0u8; FIELD_BYTES];
    let mut s = [0u8; FIELD_BYTES];
    let (r_bytes, s_bytes) = bytes.split_at(FIELD_BYTES);
    r.copy_from_slice(r_bytes);
    s.copy_from_slice(s_bytes);
    (r, s)
}

/// An ECDSA signature `(r, s)`.
///
/// The components are not required to be non-zero here;
/// such signatures are rejected by verification and recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Creates a signature from its components.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Self {
        Self { r, s }
    }

    /// The `r` component.
    pub fn r(&self) -> Scalar {
        self.r
    }

    /// The `s` component.
    pub fn s(&self) -> Scalar {
        self.s
    }

    /// Parses a DER-encoded signature.
    ///
    /// The parser follows the structure `0x30 len 0x02 len(r) r 0x02 len(s) s`,
    /// accepts non-minimal integer encodings and ignores any bytes after the second integer.
    /// Integers not smaller than the group order are rejected with [`Error::ScalarOverflow`].
    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let (r, s) = der::parse(bytes).inspect_err(|error| {
            tracing::debug!(%error, len = bytes.len(), "Rejected a DER signature");
        })?;
        Ok(Self { r, s })
    }

    /// Returns the length of the DER encoding of this signature.
    pub fn der_len(&self) -> usize {
        der::encoded_len(&self.r, &self.s)
    }

    /// Writes the minimal DER encoding into `out` and returns the number of bytes written.
    ///
    /// If `out` is too short, nothing is written,
    /// and [`Error::BufferTooSmall`] carries the required length.
    pub fn write_der(&self, out: &mut [u8]) -> Result<usize, Error> {
        der::serialize(&self.r, &self.s, out)
    }

    /// Returns the minimal DER encoding of this signature.
    pub fn to_der(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.der_len()];
        // The buffer has the exact required length.
        let written = self.write_der(&mut out).unwrap_or_default();
        out.truncate(written);
        out
    }

    /// Parses the 64-byte `r || s` encoding.
    pub fn from_compact(bytes: &[u8; COMPACT_LEN]) -> Result<Self, Error> {
        let (r, s) = split_compact(bytes);
        let r = Scalar::try_from_be_bytes(&r).ok_or(Error::ScalarOverflow)?;
        let s = Scalar::try_from_be_bytes(&s).ok_or(Error::ScalarOverflow)?;
        Ok(Self { r, s })
    }

    /// Returns the 64-byte `r || s` encoding.
    pub fn to_compact(&self) -> [u8; COMPACT_LEN] {
        let mut bytes = [0u8; COMPACT_LEN];
        let (r, s) = bytes.split_at_mut(FIELD_BYTES);
        r.copy_from_slice(&self.r.to_be_bytes());
        s.copy_from_slice(&self.s.to_be_bytes());
        bytes
    }

    /// Returns `true` if `s <= n / 2`.
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Returns the signature with `s` replaced by `n - s` if `s > n / 2`.
    ///
    /// Note that the recovery ID of the normalized signature has the opposite parity
    /// if a replacement happened (see [`RecoveryId::flip_parity`]).
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            Self { r: self.r, s: -self.s }
        }
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = ::signature::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: &[u8; COMPACT_LEN] = bytes.try_into().map_err(|_| ::signature::Error::new())?;
        Ok(Self::from_compact(bytes)?)
    }
}

impl From<Signature> for [u8; COMPACT_LEN] {
    fn from(signature: Signature) -> Self {
        signature.to_compact()
    }
}

impl ::signature::SignatureEncoding for Signature {
    type Repr = [u8; COMPACT_LEN];
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.to_compact(), serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SliceLike::<Hex>::deserialize(deserializer)
    }
}

impl TryFrom<Signature> for ::ecdsa::Signature<Secp256k1> {
    type Error = Error;

    fn try_from(signature: Signature) -> Result<Self, Self::Error> {
        Self::from_scalars(signature.r.to_backend(), signature.s.to_backend()).map_err(|_| Error::ZeroComponent)
    }
}

impl From<::ecdsa::Signature<Secp256k1>> for Signature {
    fn from(signature: ::ecdsa::Signature<Secp256k1>) -> Self {
        let (r, s) = signature.split_scalars();
        Self {
            r: Scalar::from_backend(*r.as_ref()),
            s: Scalar::from_backend(*s.as_ref()),
        }
    }
}

/// The recovery ID: which of the (up to four) candidate ephemeral points produced `r`.
///
/// Encoded in a byte as `bit 0 = y is odd`, `bit 1 = x was reduced modulo n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoveryId {
    y_is_odd: bool,
    x_is_reduced: bool,
}

impl RecoveryId {
    /// The largest valid byte value.
    pub const MAX: u8 = 3;

    /// Creates a recovery ID from the parity of the ephemeral point's `y` coordinate
    /// and the flag telling whether its `x` coordinate was not smaller than the group order.
    pub const fn new(y_is_odd: bool, x_is_reduced: bool) -> Self {
        Self { y_is_odd, x_is_reduced }
    }

    /// Returns `true` if the `y` coordinate of the ephemeral point is odd.
    pub const fn is_y_odd(&self) -> bool {
        self.y_is_odd
    }

    /// Returns `true` if the `x` coordinate of the ephemeral point was reduced modulo the group order.
    pub const fn is_x_reduced(&self) -> bool {
        self.x_is_reduced
    }

    /// Decodes a recovery ID from its byte form (`0..=3`).
    pub const fn from_byte(byte: u8) -> Result<Self, Error> {
        if byte > Self::MAX {
            return Err(Error::InvalidRecoveryId(byte));
        }
        Ok(Self::new(byte & 1 != 0, byte & 2 != 0))
    }

    /// Returns the byte form of the recovery ID.
    pub const fn to_byte(&self) -> u8 {
        (self.y_is_odd as u8) | ((self.x_is_reduced as u8) << 1)
    }

    /// Returns the recovery ID corresponding to the signature with a negated `s`.
    pub const fn flip_parity(&self) -> Self {
        Self::new(!self.y_is_odd, self.x_is_reduced)
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}

impl From<RecoveryId> for u8 {
    fn from(recovery_id: RecoveryId) -> Self {
        recovery_id.to_byte()
    }
}

impl From<RecoveryId> for ::ecdsa::RecoveryId {
    fn from(recovery_id: RecoveryId) -> Self {
        Self::new(recovery_id.y_is_odd, recovery_id.x_is_reduced)
    }
}

impl From<::ecdsa::RecoveryId> for RecoveryId {
    fn from(recovery_id: ::ecdsa::RecoveryId) -> Self {
        Self::new(recovery_id.is_y_odd(), recovery_id.is_x_reduced())
    }
}

/// A signature bundled with the recovery ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Bundles a signature with a recovery ID.
    pub fn new(signature: Signature, recovery_id: RecoveryId) -> Self {
        Self { signature, recovery_id }
    }

    /// The signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The recovery ID.
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Parses the 65-byte `r || s || v` encoding, where `v` is the recovery ID byte.
    pub fn from_bytes(bytes: &[u8; RECOVERABLE_LEN]) -> Result<Self, Error> {
        let (compact, v) = bytes.split_at(COMPACT_LEN);
        let compact: &[u8; COMPACT_LEN] = compact.try_into().map_err(|_| Error::MalformedEncoding)?;
        let v = v.first().copied().ok_or(Error::MalformedEncoding)?;
        let recovery_id = RecoveryId::from_byte(v)?;
        Ok(Self::new(Signature::from_compact(compact)?, recovery_id))
    }

    /// Returns the 65-byte `r || s || v` encoding.
    pub fn to_bytes(&self) -> [u8; RECOVERABLE_LEN] {
        let mut bytes = [0u8; RECOVERABLE_LEN];
        let (compact, v) = bytes.split_at_mut(COMPACT_LEN);
        compact.copy_from_slice(&self.signature.to_compact());
        v.fill(self.recovery_id.to_byte());
        bytes
    }

    /// Converts into the types of the [`ecdsa`](::ecdsa) crate.
    pub fn to_backend(&self) -> Result<(::ecdsa::Signature<Secp256k1>, ::ecdsa::RecoveryId), Error> {
        Ok((self.signature.try_into()?, self.recovery_id.into()))
    }
}

impl From<RecoverableSignature> for Signature {
    fn from(signature: RecoverableSignature) -> Self {
        signature.signature
    }
}

impl TryFrom<&[u8]> for RecoverableSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: &[u8; RECOVERABLE_LEN] = bytes.try_into().map_err(|_| Error::MalformedEncoding)?;
        Self::from_bytes(bytes)
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SliceLike::<Hex>::deserialize(deserializer)
    }
}

/// Checks the signature values of an Ethereum transaction.
///
/// `r` and `s` are big-endian integers which must be in `[1, n)`,
/// `v` must be 27 or 28, and if `low_s_only` is set (the rule since Homestead), `s` must not exceed `n / 2`.
pub fn validate_signature_values(v: u8, r: &[u8; FIELD_BYTES], s: &[u8; FIELD_BYTES], low_s_only: bool) -> bool {
    if v != 27 && v != 28 {
        return false;
    }

    let (Some(r), Some(s)) = (Scalar::try_from_be_bytes(r), Scalar::try_from_be_bytes(s)) else {
        return false;
    };
    if r.is_zero() || s.is_zero() {
        return false;
    }

    !low_s_only || !bool::from(s.is_high())
}
