/// Errors returned by signature encoding, signing, verification and recovery.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The signature encoding violates the tag/length structure.
    MalformedEncoding,
    /// A decoded integer is not smaller than the group order.
    ScalarOverflow,
    /// The output buffer is too small: {required} bytes are required.
    BufferTooSmall {
        /// The number of bytes needed to hold the encoding.
        required: usize,
    },
    /// One of the signature components is zero.
    ZeroComponent,
    /// No curve point corresponds to the reconstructed `x` coordinate.
    NoCurvePoint,
    /// The computation produced the point at infinity.
    InfinityResult,
    /// The nonce produced a degenerate signature; retry with a different nonce.
    NonceFailure,
    /// The signature does not match the public key and the message.
    SignatureMismatch,
    /// Invalid recovery ID: {0}.
    InvalidRecoveryId(u8),
    /// The secret scalar is zero or not smaller than the group order.
    InvalidSecretKey,
    /// The public key encoding is invalid or encodes the point at infinity.
    InvalidPublicKey,
}

impl From<Error> for signature::Error {
    fn from(_error: Error) -> Self {
        signature::Error::new()
    }
}

impl core::error::Error for Error {}
