use elliptic_curve::group::GroupEncoding;
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::Group;

use crate::error::{FieldCategory, OwlError};

use super::{Curve, Scalar};

/// An element of the prime-order subgroup of whichever curve produced it,
/// never the identity in any protocol position.
///
/// P256/P384/P521 have cofactor 1, so any point that decodes on-curve is
/// automatically in the prime-order subgroup; the Ristretto encoding used
/// for the FourQ backend eliminates cofactor entirely by construction. The
/// only validation step this module still owns explicitly is the
/// non-identity check, since both encodings can represent the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Point {
    P256(p256::ProjectivePoint),
    P384(p384::ProjectivePoint),
    P521(p521::ProjectivePoint),
    FourQ(curve25519_dalek::ristretto::RistrettoPoint),
}

impl Point {
    pub fn generator(curve: Curve) -> Point {
        match curve {
            Curve::P256 => Point::P256(p256::ProjectivePoint::GENERATOR),
            Curve::P384 => Point::P384(p384::ProjectivePoint::GENERATOR),
            Curve::P521 => Point::P521(p521::ProjectivePoint::GENERATOR),
            Curve::FourQ => Point::FourQ(curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT),
        }
    }

    pub fn identity(curve: Curve) -> Point {
        match curve {
            Curve::P256 => Point::P256(p256::ProjectivePoint::IDENTITY),
            Curve::P384 => Point::P384(p384::ProjectivePoint::IDENTITY),
            Curve::P521 => Point::P521(p521::ProjectivePoint::IDENTITY),
            Curve::FourQ => Point::FourQ(curve25519_dalek::ristretto::RistrettoPoint::default()),
        }
    }

    pub(crate) fn curve(&self) -> Curve {
        match self {
            Point::P256(_) => Curve::P256,
            Point::P384(_) => Curve::P384,
            Point::P521(_) => Curve::P521,
            Point::FourQ(_) => Curve::FourQ,
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Point::P256(p) => bool::from(p.is_identity()),
            Point::P384(p) => bool::from(p.is_identity()),
            Point::P521(p) => bool::from(p.is_identity()),
            Point::FourQ(p) => *p == curve25519_dalek::ristretto::RistrettoPoint::default(),
        }
    }

    pub fn add(&self, other: &Point) -> Point {
        match (self, other) {
            (Point::P256(a), Point::P256(b)) => Point::P256(a + b),
            (Point::P384(a), Point::P384(b)) => Point::P384(a + b),
            (Point::P521(a), Point::P521(b)) => Point::P521(a + b),
            (Point::FourQ(a), Point::FourQ(b)) => Point::FourQ(a + b),
            _ => panic!("point curve mismatch"),
        }
    }

    /// Additive inverse, used to compute the group-division steps in the
    /// shared-secret formulas (`beta / X4^(x2·pi)` is `beta + (-X4^(x2·pi))`).
    pub fn neg(&self) -> Point {
        match self {
            Point::P256(p) => Point::P256(-p),
            Point::P384(p) => Point::P384(-p),
            Point::P521(p) => Point::P521(-p),
            Point::FourQ(p) => Point::FourQ(-p),
        }
    }

    /// Scalar multiplication, used both for `base^x` and for combining
    /// proof responses during verification.
    pub fn mul(&self, scalar: &Scalar) -> Point {
        match (self, scalar) {
            (Point::P256(p), Scalar::P256(s)) => Point::P256(p * s),
            (Point::P384(p), Scalar::P384(s)) => Point::P384(p * s),
            (Point::P521(p), Scalar::P521(s)) => Point::P521(p * s),
            (Point::FourQ(p), Scalar::FourQ(s)) => Point::FourQ(p * s),
            _ => panic!("point/scalar curve mismatch"),
        }
    }

    /// Canonical compressed encoding for the curve.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Point::P256(p) => p.to_encoded_point(true).as_bytes().to_vec(),
            Point::P384(p) => p.to_encoded_point(true).as_bytes().to_vec(),
            Point::P521(p) => p.to_encoded_point(true).as_bytes().to_vec(),
            Point::FourQ(p) => p.compress().to_bytes().to_vec(),
        }
    }

    /// Parses a compressed point and validates it lies on the curve; the
    /// identity check is the caller's responsibility since some protocol
    /// positions (none, currently) would tolerate it.
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Point, OwlError> {
        let err = || OwlError::Deserialization {
            field_category: FieldCategory::Point,
        };
        match curve {
            Curve::P256 => {
                let ep = p256::EncodedPoint::from_bytes(bytes).map_err(|_| err())?;
                Option::from(p256::ProjectivePoint::from_encoded_point(&ep))
                    .map(Point::P256)
                    .ok_or_else(err)
            }
            Curve::P384 => {
                let ep = p384::EncodedPoint::from_bytes(bytes).map_err(|_| err())?;
                Option::from(p384::ProjectivePoint::from_encoded_point(&ep))
                    .map(Point::P384)
                    .ok_or_else(err)
            }
            Curve::P521 => {
                let ep = p521::EncodedPoint::from_bytes(bytes).map_err(|_| err())?;
                Option::from(p521::ProjectivePoint::from_encoded_point(&ep))
                    .map(Point::P521)
                    .ok_or_else(err)
            }
            Curve::FourQ => {
                let repr: [u8; 32] = bytes.try_into().map_err(|_| err())?;
                curve25519_dalek::ristretto::CompressedRistretto(repr)
                    .decompress()
                    .map(Point::FourQ)
                    .ok_or_else(err)
            }
        }
    }

    /// Parses and rejects the identity point in one step; every wire
    /// position for a `Point` in the protocol disallows the identity.
    pub fn from_bytes_non_identity(curve: Curve, bytes: &[u8]) -> Result<Point, OwlError> {
        let point = Point::from_bytes(curve, bytes)?;
        if point.is_identity() {
            return Err(OwlError::Deserialization {
                field_category: FieldCategory::Point,
            });
        }
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_round_trips_through_bytes() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let g = Point::generator(curve);
            let bytes = g.to_bytes();
            let parsed = Point::from_bytes_non_identity(curve, &bytes).unwrap();
            assert_eq!(parsed.to_bytes(), g.to_bytes());
        }
    }

    #[test]
    fn identity_is_rejected_by_non_identity_parse() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let id = Point::identity(curve);
            let bytes = id.to_bytes();
            assert!(Point::from_bytes_non_identity(curve, &bytes).is_err());
        }
    }

    #[test]
    fn scalar_mult_by_difference_of_equal_scalars_gives_identity() {
        use crate::curve::Scalar;
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let g = Point::generator(curve);
            let a = Scalar::random(curve).unwrap();
            let zero = a.sub(&a);
            assert!(zero.is_zero());
            assert!(g.mul(&zero).is_identity());
        }
    }
}
