//! Byte-level entry points on top of the multiplication contexts.

use crate::{
    curve::{
        DoubleScalarMultiplication, GeneratorMultiplication, Point, Scalar, SigningContext, VerificationContext,
        FIELD_BYTES,
    },
    ecdsa::{self, RecoverableSignature, Signature},
    error::Error,
    keys::{Nonce, PublicKey, SecretKey},
};

impl SigningContext {
    /// Signs a 32-byte message digest.
    ///
    /// The digest is reduced modulo the group order.
    /// See [`sign`](crate::sign) for the failure conditions.
    pub fn sign_prehash(
        &self,
        secret_key: &SecretKey,
        prehash: &[u8; FIELD_BYTES],
        nonce: &Nonce,
    ) -> Result<RecoverableSignature, Error> {
        ecdsa::sign(self, nonce, &Scalar::from_reduced_bytes(prehash), secret_key)
    }

    /// Derives the public key of a secret key.
    pub fn public_key(&self, secret_key: &SecretKey) -> PublicKey {
        PublicKey::from_secret_key(self, secret_key)
    }
}

impl VerificationContext {
    /// Verifies a signature of a 32-byte message digest.
    pub fn verify_prehash(&self, public_key: &PublicKey, prehash: &[u8; FIELD_BYTES], signature: &Signature) -> bool {
        ecdsa::verify(self, signature, public_key, &Scalar::from_reduced_bytes(prehash))
    }

    /// Recovers the public key from a recoverable signature of a 32-byte message digest.
    pub fn recover_from_prehash(
        &self,
        prehash: &[u8; FIELD_BYTES],
        signature: &RecoverableSignature,
    ) -> Result<PublicKey, Error> {
        ecdsa::recover(
            self,
            signature.signature(),
            signature.recovery_id(),
            &Scalar::from_reduced_bytes(prehash),
        )
    }
}

/// Both multiplication contexts bundled together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// The context for operations on secret values.
    pub signing: SigningContext,
    /// The context for verification and recovery.
    pub verification: VerificationContext,
}

impl Context {
    /// Creates a new context.
    pub const fn new() -> Self {
        Self {
            signing: SigningContext::new(),
            verification: VerificationContext::new(),
        }
    }

    /// See [`SigningContext::sign_prehash`].
    pub fn sign_prehash(
        &self,
        secret_key: &SecretKey,
        prehash: &[u8; FIELD_BYTES],
        nonce: &Nonce,
    ) -> Result<RecoverableSignature, Error> {
        self.signing.sign_prehash(secret_key, prehash, nonce)
    }

    /// See [`SigningContext::public_key`].
    pub fn public_key(&self, secret_key: &SecretKey) -> PublicKey {
        self.signing.public_key(secret_key)
    }

    /// See [`VerificationContext::verify_prehash`].
    pub fn verify_prehash(&self, public_key: &PublicKey, prehash: &[u8; FIELD_BYTES], signature: &Signature) -> bool {
        self.verification.verify_prehash(public_key, prehash, signature)
    }

    /// See [`VerificationContext::recover_from_prehash`].
    pub fn recover_from_prehash(
        &self,
        prehash: &[u8; FIELD_BYTES],
        signature: &RecoverableSignature,
    ) -> Result<PublicKey, Error> {
        self.verification.recover_from_prehash(prehash, signature)
    }
}

impl GeneratorMultiplication for Context {
    fn mul_generator(&self, scalar: &Scalar) -> Point {
        self.signing.mul_generator(scalar)
    }
}

impl DoubleScalarMultiplication for Context {
    fn mul_add_generator(&self, point: &Point, point_scalar: &Scalar, generator_scalar: &Scalar) -> Point {
        self.verification.mul_add_generator(point, point_scalar, generator_scalar)
    }
}

#[cfg(test)]
mod tests {
    use sha3::{Digest, Keccak256};

    use super::Context;
    use crate::{
        curve::Scalar,
        ecdsa::{self, RecoveryId},
        keys::{Nonce, SecretKey},
    };

    fn prehash(message: &[u8]) -> [u8; 32] {
        Keccak256::digest(message).into()
    }

    #[test_log::test]
    fn prehash_round_trip() {
        let ctx = Context::new();
        let sk = SecretKey::from_bytes(&prehash(b"secret key")).unwrap();
        let nonce = Nonce::from_bytes(&prehash(b"nonce")).unwrap();
        let digest = prehash(b"message");

        let pk = ctx.public_key(&sk);
        let sig = ctx.sign_prehash(&sk, &digest, &nonce).unwrap();
        assert!(ctx.verify_prehash(&pk, &digest, sig.signature()));
        assert_eq!(ctx.recover_from_prehash(&digest, &sig), Ok(pk));

        let other = prehash(b"another message");
        assert!(!ctx.verify_prehash(&pk, &other, sig.signature()));
        assert_ne!(ctx.recover_from_prehash(&other, &sig), Ok(pk));
    }

    #[test]
    fn context_is_a_multiplication_context() {
        let ctx = Context::new();
        let sk = SecretKey::from_bytes(&prehash(b"secret key")).unwrap();
        let nonce = Nonce::from_bytes(&prehash(b"nonce")).unwrap();
        let m = Scalar::from_reduced_bytes(&prehash(b"message"));

        let sig = ecdsa::sign(&ctx, &nonce, &m, &sk).unwrap();
        let pk = ctx.public_key(&sk);
        assert!(ecdsa::verify(&ctx, sig.signature(), &pk, &m));

        let flipped = RecoveryId::from_byte(sig.recovery_id().to_byte() ^ 1).unwrap();
        assert_ne!(ecdsa::recover(&ctx, sig.signature(), flipped, &m), Ok(pk));
    }

    #[test]
    fn digests_are_reduced() {
        // The all-ones digest exceeds the group order and is reduced rather than rejected.
        let ctx = Context::new();
        let sk = SecretKey::from_bytes(&prehash(b"secret key")).unwrap();
        let nonce = Nonce::from_bytes(&prehash(b"nonce")).unwrap();
        let digest = [0xffu8; 32];
        let sig = ctx.sign_prehash(&sk, &digest, &nonce).unwrap();

        let reduced = Scalar::from_reduced_bytes(&digest).to_be_bytes();
        assert!(ctx.verify_prehash(&ctx.public_key(&sk), &reduced, sig.signature()));
    }
}
