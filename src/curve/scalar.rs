use elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use elliptic_curve::{Field, PrimeField};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroize;

use crate::error::{FieldCategory, OwlError};

use super::Curve;

/// A scalar mod the group order of whichever curve produced it.
///
/// Every arithmetic method matches on the operand's own variant; mixing
/// scalars from two different curves is a programmer error and panics. The
/// public API never constructs scalars from two curves in the same call —
/// a `Config` fixes the curve for an entire session.
#[derive(Clone)]
pub enum Scalar {
    P256(p256::Scalar),
    P384(p384::Scalar),
    P521(p521::Scalar),
    FourQ(curve25519_dalek::scalar::Scalar),
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        match self {
            Scalar::P256(s) => s.zeroize(),
            Scalar::P384(s) => s.zeroize(),
            Scalar::P521(s) => s.zeroize(),
            Scalar::FourQ(s) => s.zeroize(),
        }
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Domain tag for reducing raw OS entropy into a uniform scalar. Distinct
/// from every tag in `crate::hash`: this isn't a transcript-hashing step,
/// just the mechanism [`Scalar::random`] uses to turn entropy bytes into a
/// field element via the same wide-reduction path as `hash_to_scalar`.
const DOMAIN_RNG: &[u8] = b"owl-rng-v1";

/// Entropy pulled per draw. Oversized relative to any curve's order so the
/// wide-reduction step introduces negligible bias.
const RNG_ENTROPY_BYTES: usize = 64;

impl Scalar {
    /// Uniformly random scalar, per §5's RNG requirement.
    ///
    /// Draws raw entropy via `OsRng::try_fill_bytes` rather than the
    /// infallible `Field::random(OsRng)` the underlying curve crates expose:
    /// per §5, an OS entropy failure must surface as `OwlError::Rng`, not
    /// panic somewhere inside `getrandom`. The entropy is then squashed into
    /// a field element through the same domain-separated wide-reduction
    /// `hash_to_scalar` already uses for `H_scalar`.
    pub fn random(curve: Curve) -> Result<Self, OwlError> {
        let mut entropy = [0u8; RNG_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|_| OwlError::Rng)?;
        Ok(Self::hash_to_scalar(curve, DOMAIN_RNG, &entropy))
    }

    pub(crate) fn curve(&self) -> Curve {
        match self {
            Scalar::P256(_) => Curve::P256,
            Scalar::P384(_) => Curve::P384,
            Scalar::P521(_) => Curve::P521,
            Scalar::FourQ(_) => Curve::FourQ,
        }
    }

    /// `H_scalar(domain, data) → Scalar`, the domain-separated hash-to-scalar
    /// primitive behind `pi`, `t`, and every ZKP challenge.
    pub fn hash_to_scalar(curve: Curve, domain: &'static [u8], data: &[u8]) -> Self {
        match curve {
            Curve::P256 => Scalar::P256(
                p256::NistP256::hash_to_scalar::<ExpandMsgXmd<sha2::Sha256>>(&[data], &[domain])
                    .expect("expand_message with a bounded domain tag never fails"),
            ),
            Curve::P384 => Scalar::P384(
                p384::NistP384::hash_to_scalar::<ExpandMsgXmd<sha2::Sha384>>(&[data], &[domain])
                    .expect("expand_message with a bounded domain tag never fails"),
            ),
            Curve::P521 => Scalar::P521(
                p521::NistP521::hash_to_scalar::<ExpandMsgXmd<sha2::Sha512>>(&[data], &[domain])
                    .expect("expand_message with a bounded domain tag never fails"),
            ),
            Curve::FourQ => {
                use sha2::{Digest, Sha512};
                let mut hasher = Sha512::new();
                hasher.update(domain);
                hasher.update(data);
                let digest = hasher.finalize();
                let mut wide = [0u8; 64];
                wide.copy_from_slice(&digest);
                Scalar::FourQ(curve25519_dalek::scalar::Scalar::from_bytes_mod_order_wide(&wide))
            }
        }
    }

    /// Whether this scalar is the additive identity (must be rejected in
    /// every protocol position that forbids it).
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::P256(s) => bool::from(s.is_zero()),
            Scalar::P384(s) => bool::from(s.is_zero()),
            Scalar::P521(s) => bool::from(s.is_zero()),
            Scalar::FourQ(s) => *s == curve25519_dalek::scalar::Scalar::ZERO,
        }
    }

    pub fn add(&self, other: &Scalar) -> Scalar {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Scalar::P256(a + b),
            (Scalar::P384(a), Scalar::P384(b)) => Scalar::P384(a + b),
            (Scalar::P521(a), Scalar::P521(b)) => Scalar::P521(a + b),
            (Scalar::FourQ(a), Scalar::FourQ(b)) => Scalar::FourQ(a + b),
            _ => panic!("scalar curve mismatch"),
        }
    }

    pub fn sub(&self, other: &Scalar) -> Scalar {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Scalar::P256(a - b),
            (Scalar::P384(a), Scalar::P384(b)) => Scalar::P384(a - b),
            (Scalar::P521(a), Scalar::P521(b)) => Scalar::P521(a - b),
            (Scalar::FourQ(a), Scalar::FourQ(b)) => Scalar::FourQ(a - b),
            _ => panic!("scalar curve mismatch"),
        }
    }

    pub fn mul(&self, other: &Scalar) -> Scalar {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Scalar::P256(a * b),
            (Scalar::P384(a), Scalar::P384(b)) => Scalar::P384(a * b),
            (Scalar::P521(a), Scalar::P521(b)) => Scalar::P521(a * b),
            (Scalar::FourQ(a), Scalar::FourQ(b)) => Scalar::FourQ(a * b),
            _ => panic!("scalar curve mismatch"),
        }
    }

    pub fn invert(&self) -> Scalar {
        match self {
            Scalar::P256(s) => Scalar::P256(s.invert().expect("nonzero scalar")),
            Scalar::P384(s) => Scalar::P384(s.invert().expect("nonzero scalar")),
            Scalar::P521(s) => Scalar::P521(s.invert().expect("nonzero scalar")),
            Scalar::FourQ(s) => Scalar::FourQ(s.invert()),
        }
    }

    /// Fixed-width big-endian encoding for the NIST curves; canonical
    /// little-endian scalar bytes for the Ristretto/FourQ backend.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Scalar::P256(s) => s.to_bytes().to_vec(),
            Scalar::P384(s) => s.to_bytes().to_vec(),
            Scalar::P521(s) => s.to_bytes().to_vec(),
            Scalar::FourQ(s) => s.to_bytes().to_vec(),
        }
    }

    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Scalar, OwlError> {
        let err = || OwlError::Deserialization {
            field_category: FieldCategory::Scalar,
        };
        match curve {
            Curve::P256 => {
                let repr: p256::FieldBytes = bytes.try_into().map_err(|_| err())?;
                Option::from(p256::Scalar::from_repr(repr))
                    .map(Scalar::P256)
                    .ok_or_else(err)
            }
            Curve::P384 => {
                let repr: p384::FieldBytes = bytes.try_into().map_err(|_| err())?;
                Option::from(p384::Scalar::from_repr(repr))
                    .map(Scalar::P384)
                    .ok_or_else(err)
            }
            Curve::P521 => {
                let repr: p521::FieldBytes = bytes.try_into().map_err(|_| err())?;
                Option::from(p521::Scalar::from_repr(repr))
                    .map(Scalar::P521)
                    .ok_or_else(err)
            }
            Curve::FourQ => {
                let repr: [u8; 32] = bytes.try_into().map_err(|_| err())?;
                Option::from(curve25519_dalek::scalar::Scalar::from_canonical_bytes(repr))
                    .map(Scalar::FourQ)
                    .ok_or_else(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_scalar_round_trips_through_bytes() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let s = Scalar::random(curve).unwrap();
            let bytes = s.to_bytes();
            let parsed = Scalar::from_bytes(curve, &bytes).unwrap();
            assert_eq!(parsed.to_bytes(), s.to_bytes());
        }
    }

    #[test]
    fn hash_to_scalar_is_deterministic_and_domain_separated() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let a = Scalar::hash_to_scalar(curve, b"owl-pi-v1", b"alice");
            let b = Scalar::hash_to_scalar(curve, b"owl-pi-v1", b"alice");
            assert_eq!(a.to_bytes(), b.to_bytes());
            let c = Scalar::hash_to_scalar(curve, b"owl-t-v1", b"alice");
            assert_ne!(a.to_bytes(), c.to_bytes());
        }
    }

    #[test]
    fn invert_is_multiplicative_inverse() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let s = Scalar::random(curve).unwrap();
            let one = s.mul(&s.invert());
            assert!(!one.is_zero());
        }
    }

    #[test]
    fn random_draws_are_distinct() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let a = Scalar::random(curve).unwrap();
            let b = Scalar::random(curve).unwrap();
            assert_ne!(a.to_bytes(), b.to_bytes());
        }
    }
}
