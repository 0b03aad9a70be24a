use core::{
    fmt::Debug,
    ops::{Add, Mul},
};

use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox};
use zeroize::Zeroize;

use crate::curve::{GeneratorMultiplication, Point, Scalar};

/// A helper wrapper for managing secret values.
///
/// The wrapped value is zeroized when the wrapper is dropped,
/// so every exit path of a function holding it (including `?` propagation) wipes it.
///
/// On top of `secrecy::SecretBox` functionality, it provides:
/// - Safe `Clone` implementation (without needing to impl `CloneableSecret`)
/// - Safe `Debug` implementation
pub(crate) struct Secret<T: Zeroize>(SecretBox<T>);

impl<T> Secret<T>
where
    T: Zeroize,
{
    pub fn expose_secret(&self) -> &T {
        self.0.expose_secret()
    }

    pub fn expose_secret_mut(&mut self) -> &mut T {
        self.0.expose_secret_mut()
    }
}

impl<T> Secret<T>
where
    T: Zeroize + Clone,
{
    pub fn init_with(ctr: impl FnOnce() -> T) -> Self {
        Self(SecretBox::init_with(ctr))
    }

    pub fn try_init_with<E>(ctr: impl FnOnce() -> Result<T, E>) -> Result<Self, E> {
        Ok(Self(SecretBox::try_init_with(ctr)?))
    }
}

impl<T> Clone for Secret<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Self::init_with(|| self.0.expose_secret().clone())
    }
}

impl<T> Debug for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Secret<{}>(...)", core::any::type_name::<T>())
    }
}

// Scalar-specific impls

impl Secret<Scalar> {
    /// Constant-time inversion. Returns `None` if the scalar is zero.
    pub fn invert(&self) -> Option<Self> {
        Self::try_init_with(|| Option::<Scalar>::from(self.expose_secret().invert()).ok_or(())).ok()
    }

    pub fn mul_by_generator(&self, ctx: &impl GeneratorMultiplication) -> Secret<Point> {
        Secret::init_with(|| ctx.mul_generator(self.expose_secret()))
    }
}

impl Add<&Scalar> for Secret<Scalar> {
    type Output = Secret<Scalar>;
    fn add(self, rhs: &Scalar) -> Self::Output {
        let mut result = self;
        let sum = *result.expose_secret() + *rhs;
        *result.expose_secret_mut() = sum;
        result
    }
}

impl Mul<&Secret<Scalar>> for &Scalar {
    type Output = Secret<Scalar>;
    fn mul(self, rhs: &Secret<Scalar>) -> Self::Output {
        Secret::init_with(|| self * rhs.expose_secret())
    }
}

impl Mul<&Secret<Scalar>> for &Secret<Scalar> {
    type Output = Secret<Scalar>;
    fn mul(self, rhs: &Secret<Scalar>) -> Self::Output {
        Secret::init_with(|| self.expose_secret() * rhs.expose_secret())
    }
}
