//! secp256k1 instantiation of the curve abstraction.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    errors::{Error, Result},
};
use generic_array::GenericArray;
use k256::{
    elliptic_curve::{
        bigint::U256, group::GroupEncoding, ops::Reduce, sec1::ToEncodedPoint, Field, Group,
        PrimeField,
    },
    AffinePoint, ProjectivePoint, Scalar as K256Scalar,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;
use zeroize::Zeroize;

/// Wrapper around [`k256::ProjectivePoint`] so that we can define our own
/// serialization/deserialization for it.
///
/// Note that this type derives [`Debug`]; if a [`Secp256k1`] is used in a
/// private type, `Debug` should be manually implemented with the field of
/// this type explicitly redacted!
#[derive(Eq, PartialEq, Debug, Clone, Copy, Zeroize)]
pub struct Secp256k1(ProjectivePoint);

impl Secp256k1 {
    pub(crate) const GENERATOR: Self = Secp256k1(ProjectivePoint::GENERATOR);
    pub(crate) const IDENTITY: Self = Secp256k1(ProjectivePoint::IDENTITY);

    /// Serialize the point as a compressed SEC1 byte array.
    pub(crate) fn to_bytes(self) -> Vec<u8> {
        AffinePoint::from(self.0).to_bytes().to_vec()
    }

    pub(crate) fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let fixed_len_bytes: [u8; 33] = bytes.try_into().map_err(|_| {
            error!("Failed to decode bytes as a secp256k1 point: wrong length");
            Error::InvalidShare("compressed point has the wrong length")
        })?;

        let point: Option<AffinePoint> = AffinePoint::from_bytes(&fixed_len_bytes.into()).into();
        match point {
            Some(point) => Ok(Self(point.into())),
            None => {
                error!("Failed to decode bytes as a secp256k1 point");
                Err(Error::InvalidShare("bytes are not a curve point"))
            }
        }
    }
}

impl std::ops::Add for Secp256k1 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Secp256k1 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl From<ProjectivePoint> for Secp256k1 {
    fn from(p: ProjectivePoint) -> Self {
        Self(p)
    }
}

// Points serialize through their affine form, so the compressed encoding
// survives a round-trip even though the working representation is projective.
impl Serialize for Secp256k1 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        AffinePoint::from(self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Secp256k1 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let p = AffinePoint::deserialize(deserializer)?;
        Ok(Self(p.into()))
    }
}

impl From<Secp256k1> for k256::EncodedPoint {
    fn from(value: Secp256k1) -> k256::EncodedPoint {
        value.0.to_affine().to_encoded_point(true)
    }
}

impl CurveTrait for Secp256k1 {
    const CURVE_NAME: &'static str = "secp256k1";
    const SCALAR_LENGTH: usize = 32;
    const POINT_LENGTH: usize = 33;
    type Scalar = K256Scalar;

    fn generator() -> Self {
        Self::GENERATOR
    }

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn mul(&self, scalar: &Self::Scalar) -> Self {
        Self(self.0 * scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256k1::to_bytes(*self)
    }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        Secp256k1::try_from_bytes(bytes)
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(ProjectivePoint::random(rng))
    }

    fn scalar_from_wide_bytes(bytes: &[u8; 64]) -> Self::Scalar {
        // Interpret the input as a 512-bit big-endian integer hi·2^256 + lo
        // and reduce it mod the group order. 2^256 mod q is recovered as
        // (2^256 − 1 mod q) + 1, so no bespoke constant is needed.
        let hi = <K256Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&bytes[..32]));
        let lo = <K256Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&bytes[32..]));
        let shift = <K256Scalar as Reduce<U256>>::reduce(U256::MAX) + K256Scalar::ONE;
        hi * shift + lo
    }
}

impl ScalarTrait for K256Scalar {
    fn zero() -> Self {
        K256Scalar::ZERO
    }

    fn one() -> Self {
        K256Scalar::ONE
    }

    fn from_u32(x: u32) -> Self {
        K256Scalar::from(u64::from(x))
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        <K256Scalar as Field>::random(rng)
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
        K256Scalar::invert(self).into()
    }

    fn is_zero(&self) -> bool {
        <K256Scalar as Field>::is_zero(self).into()
    }

    fn to_bytes(&self) -> Vec<u8> {
        K256Scalar::to_bytes(self).to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != <Secp256k1 as CurveTrait>::SCALAR_LENGTH {
            return None;
        }
        <K256Scalar as PrimeField>::from_repr(GenericArray::clone_from_slice(bytes)).into()
    }
}

#[cfg(test)]
mod curve_point_tests {
    use super::*;
    use crate::utils::testing::init_testing;

    #[test]
    fn curve_point_byte_conversion_works() {
        let rng = &mut init_testing();
        let point = Secp256k1::random(rng);
        let bytes = CurveTrait::to_bytes(&point);
        assert_eq!(bytes.len(), Secp256k1::POINT_LENGTH);
        let reconstructed = Secp256k1::try_from_bytes(&bytes).unwrap();
        assert_eq!(point, reconstructed);
    }

    #[test]
    fn scalar_byte_conversion_works() {
        let rng = &mut init_testing();
        let scalar = <K256Scalar as ScalarTrait>::random(rng);
        let bytes = ScalarTrait::to_bytes(&scalar);
        assert_eq!(bytes.len(), Secp256k1::SCALAR_LENGTH);
        let reconstructed = <K256Scalar as ScalarTrait>::from_bytes(&bytes).unwrap();
        assert_eq!(scalar, reconstructed);
    }

    #[test]
    fn wide_reduction_matches_narrow_reduction() {
        // A wide value below the order must reduce to itself.
        let mut wide = [0u8; 64];
        wide[63] = 7;
        let scalar = Secp256k1::scalar_from_wide_bytes(&wide);
        assert_eq!(scalar, <K256Scalar as ScalarTrait>::from_u32(7));
    }
}
