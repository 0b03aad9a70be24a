use core::cmp::Ordering;

use super::signature::{RecoverableSignature, RecoveryId, Signature};
use crate::{
    curve::{AffinePoint, DoubleScalarMultiplication, FieldElement, GeneratorMultiplication, Point, Scalar},
    error::Error,
    keys::{Nonce, PublicKey, SecretKey},
    tools::Secret,
};

/// Signs a message digest (already converted to a scalar) with the given secret key and nonce.
///
/// The returned signature is always in the low-`s` form,
/// and its recovery ID matches the emitted `s`.
///
/// Fails with [`Error::NonceFailure`] if the nonce produces `r = 0` or `s = 0`;
/// the caller must pick a different nonce in that case.
pub fn sign(
    ctx: &impl GeneratorMultiplication,
    nonce: &Nonce,
    message: &Scalar,
    secret_key: &SecretKey,
) -> Result<RecoverableSignature, Error> {
    let k = nonce.as_secret();

    // `R = k G`; its coordinates reveal information about the nonce until `r` is published,
    // so the point is kept in a zeroizing container.
    let big_r = Secret::init_with(|| k.mul_by_generator(ctx).expose_secret().to_affine());

    let (r, x_is_reduced) = Scalar::from_be_bytes_overflowing(&big_r.expose_secret().x().to_be_bytes());
    if r.is_zero() {
        tracing::debug!("Signing failed: the nonce produced r = 0");
        return Err(Error::NonceFailure);
    }

    // Computed before the low-`s` normalization below.
    let recovery_id = RecoveryId::new(big_r.expose_secret().y_is_odd(), x_is_reduced.into());
    drop(big_r);

    // `n = r d + m`
    let combination = &r * secret_key.as_secret() + message;

    let k_inv = k.invert().ok_or_else(|| {
        tracing::debug!("Signing failed: the nonce is not invertible");
        Error::NonceFailure
    })?;

    let s = *(&k_inv * &combination).expose_secret();
    drop(combination);
    drop(k_inv);

    if s.is_zero() {
        tracing::debug!("Signing failed: the nonce produced s = 0");
        return Err(Error::NonceFailure);
    }

    let signature = Signature::from_scalars(r, s);
    Ok(if bool::from(s.is_high()) {
        RecoverableSignature::new(signature.normalize_s(), recovery_id.flip_parity())
    } else {
        RecoverableSignature::new(signature, recovery_id)
    })
}

fn verify_checked(
    ctx: &impl DoubleScalarMultiplication,
    signature: &Signature,
    public_key: &PublicKey,
    message: &Scalar,
) -> Result<(), Error> {
    let r = signature.r();
    let s = signature.s();

    let s_inv = s.invert_vartime().ok_or(Error::ZeroComponent)?;
    if r.is_zero() {
        return Err(Error::ZeroComponent);
    }

    let u1 = &s_inv * message;
    let u2 = &s_inv * &r;
    let big_r = ctx.mul_add_generator(&public_key.to_point(), &u2, &u1);
    if big_r.is_identity() {
        return Err(Error::InfinityResult);
    }

    // `n < p < 2n`, so the `x` coordinate of `R` is either `r` itself or `r + n`,
    // and the latter is only possible if `r + n < p`.
    let big_r_x = big_r.to_affine().x();
    let x = FieldElement::from_scalar(&r);
    if big_r_x == x {
        return Ok(());
    }
    if x.cmp_vartime(&FieldElement::MODULUS_MINUS_ORDER) != Ordering::Less {
        return Err(Error::SignatureMismatch);
    }
    if big_r_x == x.add_vartime(&FieldElement::ORDER) {
        return Ok(());
    }

    Err(Error::SignatureMismatch)
}

/// Verifies a signature of a message digest (already converted to a scalar).
///
/// All the inputs are public, so variable-time arithmetic is used.
pub fn verify(
    ctx: &impl DoubleScalarMultiplication,
    signature: &Signature,
    public_key: &PublicKey,
    message: &Scalar,
) -> bool {
    match verify_checked(ctx, signature, public_key, message) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "Signature verification failed");
            false
        }
    }
}

fn recover_checked(
    ctx: &impl DoubleScalarMultiplication,
    signature: &Signature,
    recovery_id: RecoveryId,
    message: &Scalar,
) -> Result<PublicKey, Error> {
    let r = signature.r();
    let s = signature.s();

    let r_inv = r.invert_vartime().ok_or(Error::ZeroComponent)?;
    if s.is_zero() {
        return Err(Error::ZeroComponent);
    }

    let mut x = FieldElement::from_scalar(&r);
    if recovery_id.is_x_reduced() {
        if x.cmp_vartime(&FieldElement::MODULUS_MINUS_ORDER) != Ordering::Less {
            return Err(Error::NoCurvePoint);
        }
        x = x.add_vartime(&FieldElement::ORDER);
    }

    let big_r = AffinePoint::from_x_and_parity(&x, recovery_id.is_y_odd()).ok_or(Error::NoCurvePoint)?;

    // `Q = r^(-1) (s R - m G)`
    let u1 = -(&r_inv * message);
    let u2 = &r_inv * &s;
    let q = ctx.mul_add_generator(&Point::from(big_r), &u2, &u1);
    if q.is_identity() {
        return Err(Error::InfinityResult);
    }

    PublicKey::try_from_affine(q.to_affine())
}

/// Recovers the public key that produced the signature of a message digest
/// (already converted to a scalar), given the recovery ID.
pub fn recover(
    ctx: &impl DoubleScalarMultiplication,
    signature: &Signature,
    recovery_id: RecoveryId,
    message: &Scalar,
) -> Result<PublicKey, Error> {
    recover_checked(ctx, signature, recovery_id, message).inspect_err(|error| {
        tracing::debug!(%error, recovery_id = recovery_id.to_byte(), "Public key recovery failed");
    })
}
