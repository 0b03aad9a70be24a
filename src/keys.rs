use alloc::boxed::Box;
use core::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};
use signature::hazmat::PrehashVerifier;

use crate::{
    curve::{AffinePoint, GeneratorMultiplication, Point, Scalar, VerificationContext, FIELD_BYTES},
    ecdsa::{self, Signature},
    error::Error,
    tools::Secret,
};

const COMPRESSED_LEN: usize = 33;
const UNCOMPRESSED_LEN: usize = 65;

fn secret_scalar_from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Secret<Scalar>, Error> {
    Secret::try_init_with(|| {
        let (scalar, overflow) = Scalar::from_be_bytes_overflowing(bytes);
        if bool::from(overflow) || scalar.is_zero() {
            return Err(Error::InvalidSecretKey);
        }
        Ok(scalar)
    })
}

/// A secret key: a scalar in `[1, n)`.
#[derive(Clone)]
pub struct SecretKey(Secret<Scalar>);

impl SecretKey {
    /// Parses a big-endian secret key.
    /// Zero and values not smaller than the group order are rejected.
    pub fn from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Self, Error> {
        secret_scalar_from_bytes(bytes).map(Self)
    }

    /// Derives the corresponding public key.
    pub fn public_key(&self, ctx: &impl GeneratorMultiplication) -> PublicKey {
        PublicKey::from_secret_key(ctx, self)
    }

    pub(crate) fn as_secret(&self) -> &Secret<Scalar> {
        &self.0
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SecretKey(...)")
    }
}

/// A per-signature ephemeral secret, supplied by the caller.
///
/// Must never be reused with the same secret key for a different message.
#[derive(Clone)]
pub struct Nonce(Secret<Scalar>);

impl Nonce {
    /// Parses a big-endian nonce.
    /// Zero and values not smaller than the group order are rejected.
    pub fn from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Self, Error> {
        secret_scalar_from_bytes(bytes).map(Self)
    }

    pub(crate) fn as_secret(&self) -> &Secret<Scalar> {
        &self.0
    }
}

impl Debug for Nonce {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Nonce(...)")
    }
}

/// A public key: a curve point other than the point at infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(AffinePoint);

impl PublicKey {
    /// Returns `d·G` for the secret key `d`.
    pub fn from_secret_key(ctx: &impl GeneratorMultiplication, secret_key: &SecretKey) -> Self {
        // A secret key is in `[1, n)`, so the product is never the point at infinity.
        Self(secret_key.as_secret().mul_by_generator(ctx).expose_secret().to_affine())
    }

    /// Wraps a curve point. Fails with [`Error::InvalidPublicKey`] for the point at infinity.
    pub fn try_from_affine(point: AffinePoint) -> Result<Self, Error> {
        if point.is_identity() {
            return Err(Error::InvalidPublicKey);
        }
        Ok(Self(point))
    }

    /// Parses a SEC1 encoding: 33-byte compressed (`0x02`/`0x03` prefix)
    /// or 65-byte uncompressed (`0x04` prefix).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let valid_prefix = match bytes.first() {
            Some(0x02 | 0x03) => bytes.len() == COMPRESSED_LEN,
            Some(0x04) => bytes.len() == UNCOMPRESSED_LEN,
            _ => false,
        };
        if !valid_prefix {
            return Err(Error::InvalidPublicKey);
        }
        let point = AffinePoint::from_sec1_bytes(bytes).ok_or(Error::InvalidPublicKey)?;
        Self::try_from_affine(point)
    }

    /// Returns the SEC1 encoding, compressed or uncompressed.
    pub fn to_sec1_bytes(&self, compress: bool) -> Box<[u8]> {
        self.0.to_encoded_point(compress).as_bytes().into()
    }

    /// Returns the 33-byte compressed SEC1 encoding.
    pub fn to_compressed_bytes(&self) -> [u8; COMPRESSED_LEN] {
        let mut bytes = [0u8; COMPRESSED_LEN];
        bytes.copy_from_slice(self.0.to_encoded_point(true).as_bytes());
        bytes
    }

    /// Returns the 65-byte uncompressed SEC1 encoding.
    pub fn to_uncompressed_bytes(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut bytes = [0u8; UNCOMPRESSED_LEN];
        bytes.copy_from_slice(self.0.to_encoded_point(false).as_bytes());
        bytes
    }

    /// Returns the underlying affine point.
    pub fn to_affine(&self) -> AffinePoint {
        self.0
    }

    /// Returns the underlying point in projective form.
    pub fn to_point(&self) -> Point {
        Point::from(self.0)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_sec1_bytes(bytes)
    }
}

impl TryFrom<PublicKey> for k256::PublicKey {
    type Error = Error;

    fn try_from(public_key: PublicKey) -> Result<Self, Self::Error> {
        Self::from_affine(public_key.0.to_backend()).map_err(|_| Error::InvalidPublicKey)
    }
}

impl From<k256::PublicKey> for PublicKey {
    fn from(public_key: k256::PublicKey) -> Self {
        Self(AffinePoint::from_backend(*public_key.as_affine()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.to_compressed_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SliceLike::<Hex>::deserialize(deserializer)
    }
}

impl PrehashVerifier<Signature> for PublicKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<(), signature::Error> {
        let prehash: &[u8; FIELD_BYTES] = prehash.try_into().map_err(|_| signature::Error::new())?;
        let message = Scalar::from_reduced_bytes(prehash);
        if ecdsa::verify(&VerificationContext::new(), signature, self, &message) {
            Ok(())
        } else {
            Err(Error::SignatureMismatch.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use serde::{Deserialize, Serialize};
    use serde_assert::{Deserializer, Serializer};
    use serde_encoded_bytes::{Hex, SliceLike};

    use super::{Nonce, PublicKey, SecretKey};
    use crate::{
        curve::{AffinePoint, Scalar, SigningContext},
        error::Error,
    };

    fn hex32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    const ORDER: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
    const ORDER_MINUS_ONE: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";

    #[test]
    fn secret_scalar_range() {
        for bytes in [[0u8; 32], hex32(ORDER), [0xff; 32]] {
            assert_eq!(SecretKey::from_bytes(&bytes).unwrap_err(), Error::InvalidSecretKey);
            assert_eq!(Nonce::from_bytes(&bytes).unwrap_err(), Error::InvalidSecretKey);
        }

        let max = SecretKey::from_bytes(&hex32(ORDER_MINUS_ONE)).unwrap();
        assert_eq!(*max.as_secret().expose_secret(), -Scalar::ONE);
        assert!(Nonce::from_bytes(&hex32(ORDER_MINUS_ONE)).is_ok());
    }

    #[test]
    fn secrets_are_not_printed() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x42;
        let sk = SecretKey::from_bytes(&bytes).unwrap();
        let nonce = Nonce::from_bytes(&bytes).unwrap();
        assert_eq!(format!("{sk:?}"), "SecretKey(...)");
        assert_eq!(format!("{nonce:?}"), "Nonce(...)");
    }

    #[test]
    fn generator_public_key() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let sk = SecretKey::from_bytes(&bytes).unwrap();
        let pk = sk.public_key(&SigningContext::new());
        assert_eq!(pk.to_affine(), AffinePoint::GENERATOR);

        let compressed = pk.to_compressed_bytes();
        assert_eq!(
            hex::encode(compressed),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        let uncompressed = pk.to_uncompressed_bytes();
        assert_eq!(
            hex::encode(uncompressed),
            concat!(
                "04",
                "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
                "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
            )
        );
        assert_eq!(&*pk.to_sec1_bytes(true), compressed.as_slice());
        assert_eq!(&*pk.to_sec1_bytes(false), uncompressed.as_slice());

        assert_eq!(PublicKey::from_sec1_bytes(&compressed), Ok(pk));
        assert_eq!(PublicKey::from_sec1_bytes(&uncompressed), Ok(pk));
    }

    #[test]
    fn invalid_public_keys() {
        assert_eq!(PublicKey::try_from_affine(AffinePoint::IDENTITY), Err(Error::InvalidPublicKey));
        // SEC1 encoding of the identity.
        assert_eq!(PublicKey::from_sec1_bytes(&[0x00]), Err(Error::InvalidPublicKey));
        assert_eq!(PublicKey::from_sec1_bytes(&[]), Err(Error::InvalidPublicKey));

        // `x = 5` is not on the curve.
        let mut compressed = [0u8; 33];
        compressed[0] = 0x02;
        compressed[32] = 5;
        assert_eq!(PublicKey::from_sec1_bytes(&compressed), Err(Error::InvalidPublicKey));

        // The SEC1 compact form (`0x05 || x`) is not accepted, even for a valid `x`.
        let mut bytes = [0u8; 33];
        bytes[0] = 0x05;
        bytes[32] = 1;
        assert_eq!(PublicKey::from_sec1_bytes(&bytes), Err(Error::InvalidPublicKey));
        assert_eq!(PublicKey::try_from(bytes.as_slice()), Err(Error::InvalidPublicKey));

        // Prefixes must match the length.
        let pk = PublicKey::try_from_affine(AffinePoint::GENERATOR).unwrap();
        let mut compressed = pk.to_compressed_bytes();
        compressed[0] = 0x04;
        assert_eq!(PublicKey::from_sec1_bytes(&compressed), Err(Error::InvalidPublicKey));
        let mut uncompressed = pk.to_uncompressed_bytes();
        uncompressed[0] = 0x02;
        assert_eq!(PublicKey::from_sec1_bytes(&uncompressed), Err(Error::InvalidPublicKey));
    }

    #[test]
    fn compact_form_is_rejected_by_deserialization() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x05;
        bytes[32] = 1;

        for human_readable in [true, false] {
            let serializer = Serializer::builder().is_human_readable(human_readable).build();
            let tokens = SliceLike::<Hex>::serialize(&bytes, &serializer).unwrap();
            let mut deserializer = Deserializer::builder(tokens)
                .is_human_readable(human_readable)
                .build();
            assert!(PublicKey::deserialize(&mut deserializer).is_err());
        }
    }

    #[test]
    fn backend_conversion() {
        let pk = PublicKey::try_from_affine(AffinePoint::GENERATOR).unwrap();
        let backend = k256::PublicKey::try_from(pk).unwrap();
        assert_eq!(backend.as_affine(), &k256::AffinePoint::GENERATOR);
        assert_eq!(PublicKey::from(backend), pk);
    }

    #[test]
    fn serialization_round_trip() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x77;
        let pk = SecretKey::from_bytes(&bytes).unwrap().public_key(&SigningContext::new());

        for human_readable in [true, false] {
            let serializer = Serializer::builder().is_human_readable(human_readable).build();
            let tokens = pk.serialize(&serializer).unwrap();
            let mut deserializer = Deserializer::builder(tokens)
                .is_human_readable(human_readable)
                .build();
            assert_eq!(PublicKey::deserialize(&mut deserializer).unwrap(), pk);
        }
    }
}
