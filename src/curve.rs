//! Elliptic Curve abstraction
//!
//! Every protocol in this crate is generic over a prime-order group exposed
//! through [`CurveTrait`] and its associated [`ScalarTrait`]. Protocols are
//! instantiated monomorphically per curve, so values from different curves
//! can never meet at runtime.
use crate::errors::Result;
use rand::{CryptoRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::Debug,
    ops::{Add, Sub},
};
use zeroize::Zeroize;

/// Generic elliptic curve point.
///
/// Implementations wrap a projective point type from the underlying curve
/// crate and expose the curve's canonical compressed affine encoding.
pub trait CurveTrait:
    'static
    + Clone
    + Copy
    + Debug
    + Send
    + Sync
    + Eq
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Serialize
    + DeserializeOwned
{
    /// Identifier of the underlying curve, used in diagnostics.
    const CURVE_NAME: &'static str;

    /// Byte length of a canonically encoded scalar.
    const SCALAR_LENGTH: usize;

    /// Byte length of a compressed affine point encoding.
    const POINT_LENGTH: usize;

    /// The type of scalars.
    type Scalar: ScalarTrait;

    /// The group generator.
    fn generator() -> Self;

    /// The identity point, used to initialize the aggregation of commitment
    /// vectors.
    fn identity() -> Self;

    /// Multiply `self` by a scalar.
    fn mul(&self, scalar: &Self::Scalar) -> Self;

    /// Multiply the generator by a scalar.
    fn scale_generator(scalar: &Self::Scalar) -> Self {
        Self::generator().mul(scalar)
    }

    /// Serialize the point in compressed affine form.
    fn to_bytes(&self) -> Vec<u8>;

    /// Deserialize a point from its compressed affine form.
    fn try_from_bytes(bytes: &[u8]) -> Result<Self>;

    /// A uniformly random point.
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;

    /// Reduce a 64-byte wide value into the scalar field. Used for
    /// deterministic challenge derivation.
    fn scalar_from_wide_bytes(bytes: &[u8; 64]) -> Self::Scalar;
}

/// Scalar trait.
pub trait ScalarTrait:
    'static
    + Clone
    + Copy
    + Debug
    + Send
    + Sync
    + Eq
    + PartialEq
    + Serialize
    + DeserializeOwned
    + Zeroize
{
    /// Return the zero scalar.
    fn zero() -> Self;

    /// Return the one scalar.
    fn one() -> Self;

    /// Convert a small integer to a scalar. Participant identifiers become
    /// polynomial evaluation points through this conversion.
    fn from_u32(x: u32) -> Self;

    /// A uniformly random scalar.
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;

    /// Add two scalars.
    fn add(&self, other: &Self) -> Self;

    /// Subtract two scalars.
    fn sub(&self, other: &Self) -> Self;

    /// Multiply two scalars.
    fn mul(&self, other: &Self) -> Self;

    /// Negate.
    fn negate(&self) -> Self;

    /// Invert the scalar, or `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// True if and only if this is the zero scalar.
    fn is_zero(&self) -> bool;

    /// Canonical fixed-length encoding.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decode a canonical encoding, or `None` if the bytes are not a
    /// canonical scalar of the expected length.
    fn from_bytes(bytes: &[u8]) -> Option<Self>;
}
