use core::{
    cmp::Ordering,
    ops::{Add, Mul, Neg, Sub},
};

use crypto_bigint::{Encoding, U256};
use digest::Digest;
use elliptic_curve::{
    bigint::U256 as BackendUint, // Note that this is the `crypto-bigint` version `k256` depends on
    group::Group,
    ops::{Invert, Reduce},
    point::{AffineCoordinates, DecompressPoint},
    scalar::IsHigh,
    sec1::{FromEncodedPoint, ToEncodedPoint},
    subtle::{Choice, ConditionallySelectable, CtOption},
    FieldBytesSize, PrimeField,
};
use k256::{EncodedPoint, FieldBytes, Secp256k1};
use zeroize::DefaultIsZeroes;

pub(crate) type BackendScalar = k256::Scalar;
pub(crate) type BackendPoint = k256::ProjectivePoint;
pub(crate) type BackendAffinePoint = k256::AffinePoint;

/// The length of a serialized scalar or field element.
pub(crate) const FIELD_BYTES: usize = 32;

// The group order `n`, as an integer.
const ORDER: U256 = U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

// The field prime `p`.
const MODULUS: U256 = U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

// `p - n`. Since `n < p < 2n`, an `x` coordinate reduces to `r` modulo `n`
// either as `r` itself or as `r + n`, and the latter only exists when `r < p - n`.
const MODULUS_MINUS_ORDER: U256 = U256::from_be_hex("000000000000000000000000000000014551231950B75FC4402DA1722FC9BAEE");

fn field_bytes_to_array(bytes: &FieldBytes) -> [u8; FIELD_BYTES] {
    (*bytes).into()
}

/// An integer modulo the group order `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Scalar(BackendScalar);

impl Scalar {
    /// The scalar `0`.
    pub const ZERO: Self = Self(BackendScalar::ZERO);
    /// The scalar `1`.
    pub const ONE: Self = Self(BackendScalar::ONE);

    /// Interprets 32 big-endian bytes as a scalar, reducing it modulo `n`.
    ///
    /// The returned [`Choice`] is set if the integer was not smaller than `n`
    /// (that is, the reduction wrapped).
    pub fn from_be_bytes_overflowing(bytes: &[u8; FIELD_BYTES]) -> (Self, Choice) {
        let repr = FieldBytes::from(*bytes);
        let overflow = !BackendScalar::from_repr(repr).is_some();
        let reduced = <BackendScalar as Reduce<BackendUint>>::reduce_bytes(&repr);
        (Self(reduced), overflow)
    }

    /// Interprets 32 big-endian bytes as a scalar.
    /// Returns `None` if the integer is not smaller than `n`.
    pub fn try_from_be_bytes(bytes: &[u8; FIELD_BYTES]) -> Option<Self> {
        Option::from(BackendScalar::from_repr(FieldBytes::from(*bytes)).map(Self))
    }

    /// Convert a 32-byte hash digest into a scalar as per SEC1:
    /// <https://www.secg.org/sec1-v2.pdf> Section 4.1.3 steps 5-6 page 45
    ///
    /// SEC1 specifies to subtract the secp256k1 modulus when the byte array
    /// is larger than the modulus.
    pub fn from_reduced_bytes(bytes: &[u8; FIELD_BYTES]) -> Self {
        Self::from_be_bytes_overflowing(bytes).0
    }

    /// Finalizes the digest and converts the result into a scalar (see [`Self::from_reduced_bytes`]).
    pub fn from_digest(d: impl Digest<OutputSize = FieldBytesSize<Secp256k1>>) -> Self {
        // There's currently no way to make the required digest output size
        // depend on the target scalar size, so we are hardcoding it to 256 bit
        // (that is, equal to the scalar size).
        Self(<BackendScalar as Reduce<BackendUint>>::reduce_bytes(&d.finalize()))
    }

    /// Returns the big-endian representation of the scalar.
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        field_bytes_to_array(&self.0.to_bytes())
    }

    /// Returns `true` if the scalar is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero().into()
    }

    /// Returns a truthy [`Choice`] if the scalar is greater than `n / 2`.
    pub fn is_high(&self) -> Choice {
        IsHigh::is_high(&self.0)
    }

    /// Constant-time inversion. The result is none if the scalar is zero.
    pub fn invert(&self) -> CtOption<Self> {
        self.0.invert().map(Self)
    }

    /// Variable-time inversion, only to be used on public values.
    /// Returns `None` if the scalar is zero.
    pub fn invert_vartime(&self) -> Option<Self> {
        Option::from(Invert::invert_vartime(&self.0).map(Self))
    }

    pub(crate) fn from_backend(scalar: BackendScalar) -> Self {
        Self(scalar)
    }

    pub(crate) fn to_backend(self) -> BackendScalar {
        self.0
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(BackendScalar::conditional_select(&a.0, &b.0, choice))
    }
}

impl DefaultIsZeroes for Scalar {}

impl From<u64> for Scalar {
    fn from(val: u64) -> Self {
        Self(BackendScalar::from(val))
    }
}

impl Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar(self.0.sub(&(other.0)))
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar(self.0.mul(&(other.0)))
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(self.0.mul(&(other.0)))
    }
}

/// An integer modulo the field prime `p`, always kept in the canonical range `[0, p)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FieldElement(U256);

impl FieldElement {
    /// The group order `n` as a field element.
    pub const ORDER: Self = Self(ORDER);

    /// `p - n` as a field element.
    pub const MODULUS_MINUS_ORDER: Self = Self(MODULUS_MINUS_ORDER);

    /// Interprets 32 big-endian bytes as a field element.
    /// Returns `None` if the integer is not smaller than `p`.
    pub fn from_be_bytes(bytes: &[u8; FIELD_BYTES]) -> Option<Self> {
        let value = U256::from_be_bytes(*bytes);
        (value < MODULUS).then_some(Self(value))
    }

    /// Lifts a scalar into the field. Always succeeds since `n < p`.
    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self(U256::from_be_bytes(scalar.to_be_bytes()))
    }

    /// Returns the big-endian representation of the element.
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        self.0.to_be_bytes()
    }

    /// Returns `true` if the canonical representative is odd.
    pub fn is_odd(&self) -> bool {
        self.to_be_bytes().last().is_some_and(|byte| byte & 1 == 1)
    }

    /// Addition modulo `p`. Variable-time, only to be used on public values.
    pub fn add_vartime(&self, rhs: &Self) -> Self {
        Self(self.0.add_mod(&rhs.0, &MODULUS))
    }

    /// Compares the canonical representatives. Variable-time, only to be used on public values.
    pub fn cmp_vartime(&self, rhs: &Self) -> Ordering {
        self.0.cmp(&rhs.0)
    }

    fn from_field_bytes(bytes: &FieldBytes) -> Self {
        Self(U256::from_be_bytes(field_bytes_to_array(bytes)))
    }

    fn to_field_bytes(self) -> FieldBytes {
        FieldBytes::from(self.to_be_bytes())
    }
}

impl DefaultIsZeroes for FieldElement {}

/// A curve point in projective coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(BackendPoint);

impl Point {
    /// The generator `G`.
    pub const GENERATOR: Self = Self(BackendPoint::GENERATOR);

    /// The point at infinity.
    pub const IDENTITY: Self = Self(BackendPoint::IDENTITY);

    /// Returns `true` if this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        Group::is_identity(&self.0).into()
    }

    /// Converts the point into affine coordinates.
    pub fn to_affine(&self) -> AffinePoint {
        AffinePoint(self.0.to_affine())
    }

    /// Returns `true` if the affine `x` coordinate of this point equals `x`.
    /// Always `false` for the point at infinity.
    pub fn has_affine_x(&self, x: &FieldElement) -> bool {
        if self.is_identity() {
            return false;
        }
        self.0.to_affine().x() == x.to_field_bytes()
    }

    pub(crate) fn from_backend(point: BackendPoint) -> Self {
        Self(point)
    }

    pub(crate) fn to_backend(self) -> BackendPoint {
        self.0
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::IDENTITY
    }
}

impl DefaultIsZeroes for Point {}

impl From<AffinePoint> for Point {
    fn from(point: AffinePoint) -> Self {
        Self(point.0.into())
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0.add(&(other.0)))
    }
}

impl Mul<&Scalar> for Point {
    type Output = Point;

    fn mul(self, other: &Scalar) -> Point {
        Point(self.0.mul(&(other.0)))
    }
}

impl Mul<&Scalar> for &Point {
    type Output = Point;

    fn mul(self, other: &Scalar) -> Point {
        Point(self.0.mul(&(other.0)))
    }
}

/// A curve point in affine coordinates, or the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AffinePoint(BackendAffinePoint);

impl AffinePoint {
    /// The generator `G`.
    pub const GENERATOR: Self = Self(BackendAffinePoint::GENERATOR);

    /// The point at infinity.
    pub const IDENTITY: Self = Self(BackendAffinePoint::IDENTITY);

    /// Reconstructs the point with the given `x` coordinate
    /// and the `y` coordinate of the given parity.
    /// Returns `None` if `x` is not the abscissa of a curve point.
    pub fn from_x_and_parity(x: &FieldElement, y_is_odd: bool) -> Option<Self> {
        Option::from(
            <BackendAffinePoint as DecompressPoint<Secp256k1>>::decompress(
                &x.to_field_bytes(),
                Choice::from(u8::from(y_is_odd)),
            )
            .map(Self),
        )
    }

    /// Returns `true` if this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.0 == BackendAffinePoint::IDENTITY
    }

    /// The `x` coordinate (zero for the point at infinity).
    pub fn x(&self) -> FieldElement {
        FieldElement::from_field_bytes(&self.0.x())
    }

    /// The `y` coordinate (zero for the point at infinity).
    pub fn y(&self) -> FieldElement {
        self.0
            .to_encoded_point(false)
            .y()
            .map(FieldElement::from_field_bytes)
            .unwrap_or_default()
    }

    /// Returns `true` if the `y` coordinate is odd.
    pub fn y_is_odd(&self) -> bool {
        self.0.y_is_odd().into()
    }

    /// Decodes a SEC1 point (compressed, uncompressed, or the identity).
    pub(crate) fn from_sec1_bytes(bytes: &[u8]) -> Option<Self> {
        let encoded = EncodedPoint::from_bytes(bytes).ok()?;
        Option::from(BackendAffinePoint::from_encoded_point(&encoded).map(Self))
    }

    pub(crate) fn to_encoded_point(self, compress: bool) -> EncodedPoint {
        self.0.to_encoded_point(compress)
    }

    pub(crate) fn from_backend(point: BackendAffinePoint) -> Self {
        Self(point)
    }

    pub(crate) fn to_backend(self) -> BackendAffinePoint {
        self.0
    }
}

impl DefaultIsZeroes for AffinePoint {}

impl From<Point> for AffinePoint {
    fn from(point: Point) -> Self {
        point.to_affine()
    }
}
