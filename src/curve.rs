//! Adapter to the curve backend.
//!
//! Scalar, field and group arithmetic, as well as the multiplication tables,
//! are provided by [`k256`] through the `elliptic-curve` traits.
//! The ECDSA logic only talks to the wrappers defined here.

mod arithmetic;
mod context;

pub use arithmetic::{AffinePoint, FieldElement, Point, Scalar};
pub use context::{DoubleScalarMultiplication, GeneratorMultiplication, SigningContext, VerificationContext};

pub(crate) use arithmetic::FIELD_BYTES;
