//! Ed25519 instantiation of the curve abstraction.
//!
//! Points live in the prime-order subgroup of the curve; decoding rejects
//! any encoding outside of it, so every [`Ed25519`] value the protocols see
//! is a multiple of the basepoint.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    errors::{Error, Result},
};
use curve25519_dalek::{
    constants::ED25519_BASEPOINT_POINT, edwards::CompressedEdwardsY, traits::Identity,
    EdwardsPoint, Scalar as Ed25519Scalar,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;
use zeroize::Zeroize;

/// Wrapper around [`curve25519_dalek::EdwardsPoint`] restricted to the
/// prime-order subgroup.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Zeroize)]
pub struct Ed25519(EdwardsPoint);

impl Ed25519 {
    pub(crate) fn to_bytes(self) -> Vec<u8> {
        self.0.compress().to_bytes().to_vec()
    }

    pub(crate) fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let compressed = CompressedEdwardsY::from_slice(bytes).map_err(|_| {
            error!("Failed to decode bytes as an ed25519 point: wrong length");
            Error::InvalidShare("compressed point has the wrong length")
        })?;
        let point = compressed.decompress().ok_or_else(|| {
            error!("Failed to decode bytes as an ed25519 point");
            Error::InvalidShare("bytes are not a curve point")
        })?;
        if !point.is_torsion_free() {
            error!("Decoded ed25519 point lies outside the prime-order subgroup");
            return Err(Error::InvalidShare("point is not in the prime-order subgroup"));
        }
        Ok(Self(point))
    }
}

impl std::ops::Add for Ed25519 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Ed25519 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl From<EdwardsPoint> for Ed25519 {
    fn from(p: EdwardsPoint) -> Self {
        Self(p)
    }
}

impl Serialize for Ed25519 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.compress().to_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ed25519 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <[u8; 32]>::deserialize(deserializer)?;
        Ed25519::try_from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl CurveTrait for Ed25519 {
    const CURVE_NAME: &'static str = "ed25519";
    const SCALAR_LENGTH: usize = 32;
    const POINT_LENGTH: usize = 32;
    type Scalar = Ed25519Scalar;

    fn generator() -> Self {
        Self(ED25519_BASEPOINT_POINT)
    }

    fn identity() -> Self {
        Self(EdwardsPoint::identity())
    }

    fn mul(&self, scalar: &Self::Scalar) -> Self {
        Self(self.0 * scalar)
    }

    fn scale_generator(scalar: &Self::Scalar) -> Self {
        Self(EdwardsPoint::mul_base(scalar))
    }

    fn to_bytes(&self) -> Vec<u8> {
        Ed25519::to_bytes(*self)
    }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        Ed25519::try_from_bytes(bytes)
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::scale_generator(&<Ed25519Scalar as ScalarTrait>::random(rng))
    }

    fn scalar_from_wide_bytes(bytes: &[u8; 64]) -> Self::Scalar {
        Ed25519Scalar::from_bytes_mod_order_wide(bytes)
    }
}

impl ScalarTrait for Ed25519Scalar {
    fn zero() -> Self {
        Ed25519Scalar::ZERO
    }

    fn one() -> Self {
        Ed25519Scalar::ONE
    }

    fn from_u32(x: u32) -> Self {
        Ed25519Scalar::from(x)
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Ed25519Scalar::random(rng)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn invert(&self) -> Option<Self> {
        if <Self as ScalarTrait>::is_zero(self) {
            None
        } else {
            Some(Ed25519Scalar::invert(self))
        }
    }

    fn is_zero(&self) -> bool {
        self == &Ed25519Scalar::ZERO
    }

    fn to_bytes(&self) -> Vec<u8> {
        Ed25519Scalar::to_bytes(self).to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let fixed: [u8; 32] = bytes.try_into().ok()?;
        Option::from(Ed25519Scalar::from_canonical_bytes(fixed))
    }
}

#[cfg(test)]
mod curve_point_tests {
    use super::*;
    use crate::utils::testing::init_testing;

    #[test]
    fn curve_point_byte_conversion_works() {
        let rng = &mut init_testing();
        let point = Ed25519::random(rng);
        let bytes = CurveTrait::to_bytes(&point);
        assert_eq!(bytes.len(), Ed25519::POINT_LENGTH);
        let reconstructed = Ed25519::try_from_bytes(&bytes).unwrap();
        assert_eq!(point, reconstructed);
    }

    #[test]
    fn scalar_byte_conversion_works() {
        let rng = &mut init_testing();
        let scalar = <Ed25519Scalar as ScalarTrait>::random(rng);
        let bytes = ScalarTrait::to_bytes(&scalar);
        let reconstructed = <Ed25519Scalar as ScalarTrait>::from_bytes(&bytes).unwrap();
        assert_eq!(scalar, reconstructed);
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        // ℓ itself is not a canonical encoding.
        let ell: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        assert!(<Ed25519Scalar as ScalarTrait>::from_bytes(&ell).is_none());
    }
}
