//! Schnorr zero-knowledge proofs of knowledge of a discrete logarithm, with
//! support for an alternate base (used by `PIbeta`/`PIalpha`).

use merlin::Transcript;

use crate::curve::{Curve, Point, Scalar};
use crate::error::OwlError;
use crate::hash::DOMAIN_ZKP;

/// A Schnorr proof `(h, r, b)`: `h` the scalar challenge, `r` the scalar
/// response, `b` the public point `base^x` for the witnessed `x`.
#[derive(Clone)]
pub struct ZkpProof {
    pub h: Scalar,
    pub r: Scalar,
    pub b: Point,
}

fn challenge(curve: Curve, base: &Point, commitment: &Point, b: &Point, prover_id: &str) -> Scalar {
    let mut transcript = Transcript::new(b"owl-zkp-v1");
    transcript.append_message(b"base", &base.to_bytes());
    transcript.append_message(b"commitment", &commitment.to_bytes());
    transcript.append_message(b"b", &b.to_bytes());
    transcript.append_message(b"prover_id", prover_id.as_bytes());
    let mut challenge_bytes = [0u8; 64];
    transcript.challenge_bytes(b"challenge", &mut challenge_bytes);
    Scalar::hash_to_scalar(curve, DOMAIN_ZKP, &challenge_bytes)
}

/// `Generate(x, base, prover_id) → (h, r, b)`.
///
/// Samples a fresh nonce `v`, which is zeroized as soon as it goes out of
/// scope at the end of this call. Fails with `OwlError::Rng` if the OS
/// entropy source backing `v`'s sampling fails.
pub fn generate(curve: Curve, x: &Scalar, base: &Point, prover_id: &str) -> Result<ZkpProof, OwlError> {
    let v = Scalar::random(curve)?;
    let commitment = base.mul(&v);
    let b = base.mul(x);
    let h = challenge(curve, base, &commitment, &b, prover_id);
    let r = v.sub(&h.mul(x));
    Ok(ZkpProof { h, r, b })
}

/// `Verify(proof, base, prover_id) → bool`.
///
/// Rejects proofs over the identity point outright; otherwise recomputes
/// the commitment from `r` and `h` and checks the challenge matches.
pub fn verify(curve: Curve, proof: &ZkpProof, base: &Point, prover_id: &str) -> bool {
    if proof.b.is_identity() {
        return false;
    }
    let v_prime = base.mul(&proof.r).add(&proof.b.mul(&proof.h));
    let h_prime = challenge(curve, base, &v_prime, &proof.b, prover_id);
    h_prime.to_bytes() == proof.h.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honest_proof_verifies() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let base = Point::generator(curve);
            let x = Scalar::random(curve).unwrap();
            let proof = generate(curve, &x, &base, "alice").unwrap();
            assert!(verify(curve, &proof, &base, "alice"));
        }
    }

    #[test]
    fn tampered_response_is_rejected() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let base = Point::generator(curve);
            let x = Scalar::random(curve).unwrap();
            let mut proof = generate(curve, &x, &base, "alice").unwrap();
            proof.r = proof.r.add(&Scalar::random(curve).unwrap());
            assert!(!verify(curve, &proof, &base, "alice"));
        }
    }

    #[test]
    fn tampered_challenge_is_rejected() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let base = Point::generator(curve);
            let x = Scalar::random(curve).unwrap();
            let mut proof = generate(curve, &x, &base, "alice").unwrap();
            proof.h = proof.h.add(&Scalar::random(curve).unwrap());
            assert!(!verify(curve, &proof, &base, "alice"));
        }
    }

    #[test]
    fn wrong_prover_id_is_rejected() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let base = Point::generator(curve);
            let x = Scalar::random(curve).unwrap();
            let proof = generate(curve, &x, &base, "alice").unwrap();
            assert!(!verify(curve, &proof, &base, "mallory"));
        }
    }

    #[test]
    fn alternate_base_proof_verifies() {
        for curve in [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ] {
            let alt_base = Point::generator(curve).mul(&Scalar::random(curve).unwrap());
            let x = Scalar::random(curve).unwrap();
            let proof = generate(curve, &x, &alt_base, "server.example.com").unwrap();
            assert!(verify(curve, &proof, &alt_base, "server.example.com"));
        }
    }
}
