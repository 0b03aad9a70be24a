//! The ECDSA core: signature encoding, signing, verification and public key recovery.

mod der;
mod primitives;
mod signature;

pub use der::MAX_DER_LEN;
pub use primitives::{recover, sign, verify};
pub use signature::{validate_signature_values, RecoverableSignature, RecoveryId, Signature};
