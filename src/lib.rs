#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::indexing_slicing))]

/*!
## Features

`precomputed-tables` (default): use the precomputed generator tables of [`k256`](`::k256`)
for the fixed-base multiplication in signing.
*/

extern crate alloc;

mod context;
mod curve;
mod ecdsa;
mod error;
mod keys;
mod tools;

// Some re-exports to avoid the need for version-matching
pub use k256;
pub use signature;

pub use context::Context;
pub use curve::{
    AffinePoint, DoubleScalarMultiplication, FieldElement, GeneratorMultiplication, Point, Scalar, SigningContext,
    VerificationContext,
};
pub use ecdsa::{
    recover, sign, validate_signature_values, verify, RecoverableSignature, RecoveryId, Signature,
    MAX_DER_LEN,
};
pub use error::Error;
pub use keys::{Nonce, PublicKey, SecretKey};
