use elliptic_curve::ops::{LinearCombination, MulByGenerator};

use super::arithmetic::{BackendPoint, Point, Scalar};

/// Fixed-base multiplication `k·G`.
///
/// Implementations must run in constant time, since the scalar is typically a nonce or a secret key.
pub trait GeneratorMultiplication {
    /// Returns `scalar · G`.
    fn mul_generator(&self, scalar: &Scalar) -> Point;
}

/// Double-scalar multiplication `a·A + b·G`.
///
/// Implementations may run in variable time; only public values must be passed here.
pub trait DoubleScalarMultiplication {
    /// Returns `point_scalar · point + generator_scalar · G`.
    fn mul_add_generator(&self, point: &Point, point_scalar: &Scalar, generator_scalar: &Scalar) -> Point;
}

/// A context for operations involving secret scalars.
///
/// Uses the backend's precomputed generator tables (with the `precomputed-tables` feature),
/// which are immutable, so the context can be shared between threads freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningContext {
    _private: (),
}

impl SigningContext {
    /// Creates a new signing context.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl GeneratorMultiplication for SigningContext {
    fn mul_generator(&self, scalar: &Scalar) -> Point {
        Point::from_backend(<BackendPoint as MulByGenerator>::mul_by_generator(&scalar.to_backend()))
    }
}

/// A context for verification and public key recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationContext {
    _private: (),
}

impl VerificationContext {
    /// Creates a new verification context.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl DoubleScalarMultiplication for VerificationContext {
    fn mul_add_generator(&self, point: &Point, point_scalar: &Scalar, generator_scalar: &Scalar) -> Point {
        Point::from_backend(<BackendPoint as LinearCombination>::lincomb(
            &point.to_backend(),
            &point_scalar.to_backend(),
            &BackendPoint::GENERATOR,
            &generator_scalar.to_backend(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{DoubleScalarMultiplication, GeneratorMultiplication, SigningContext, VerificationContext};
    use crate::curve::{Point, Scalar};

    #[test]
    fn generator_multiplication_matches_generic_multiplication() {
        let ctx = SigningContext::new();
        let k = Scalar::from(0x1234_5678_9abc_def0u64);
        assert_eq!(ctx.mul_generator(&k), Point::GENERATOR * &k);
        assert!(ctx.mul_generator(&Scalar::ZERO).is_identity());
    }

    #[test]
    fn double_scalar_multiplication() {
        let ctx = VerificationContext::new();
        let a = Point::GENERATOR * &Scalar::from(11u64);
        let result = ctx.mul_add_generator(&a, &Scalar::from(3u64), &Scalar::from(5u64));
        assert_eq!(result, Point::GENERATOR * &Scalar::from(38u64));

        // `2·A - 22·G` cancels out.
        let result = ctx.mul_add_generator(&a, &Scalar::from(2u64), &-Scalar::from(22u64));
        assert!(result.is_identity());
    }
}
