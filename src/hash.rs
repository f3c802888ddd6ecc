//! Domain-separated transcript hashing, point-to-scalar squashing, and final
//! key derivation.

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::curve::{Curve, Point, Scalar};

/// Fixed, distinct domain-separation tags. Each is used for exactly one
/// purpose so that a challenge computed for one can never be replayed as a
/// challenge for another.
pub const DOMAIN_PI: &[u8] = b"owl-pi-v1";
pub const DOMAIN_T: &[u8] = b"owl-t-v1";
pub const DOMAIN_ZKP: &[u8] = b"owl-zkp-v1";
pub const DOMAIN_HPW: &[u8] = b"owl-hpw-v1";
pub const DOMAIN_KDF: &[u8] = b"owl-kdf-v1";
pub const ROLE_CLIENT: &[u8] = b"KC_1_U";
pub const ROLE_SERVER: &[u8] = b"KC_1_V";

/// `H_scalar(domain, items…) → Scalar`.
///
/// Callers assemble `items` as the concatenation of each item's canonical
/// encoding (points compressed, scalars fixed-width, strings length-prefixed
/// via [`encode_str`]) before calling this function; keeping the encoding
/// step external lets every call site state exactly what it is binding into
/// the hash.
pub fn hash_to_scalar(curve: Curve, domain: &'static [u8], items: &[u8]) -> Scalar {
    Scalar::hash_to_scalar(curve, domain, items)
}

/// Length-prefixes a UTF-8 string for inclusion in a hash input, so that
/// `encode_str("ab") || encode_str("c")` cannot collide with
/// `encode_str("a") || encode_str("bc")`.
pub fn encode_str(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(8 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

fn digest_for(curve: Curve) -> DigestChoice {
    match curve {
        Curve::P256 | Curve::FourQ => DigestChoice::Sha256,
        Curve::P384 => DigestChoice::Sha384,
        Curve::P521 => DigestChoice::Sha512,
    }
}

enum DigestChoice {
    Sha256,
    Sha384,
    Sha512,
}

/// `KDF(shared_secret_point, transcript) → key`.
///
/// HKDF over the compressed shared point as input keying material, with the
/// transcript bytes as the `info` parameter; output length equals the
/// curve's chosen digest length.
pub fn kdf(curve: Curve, shared_point_bytes: &[u8], transcript: &[u8]) -> Vec<u8> {
    match digest_for(curve) {
        DigestChoice::Sha256 => {
            let hk = Hkdf::<Sha256>::new(None, shared_point_bytes);
            let mut okm = [0u8; 32];
            hk.expand_multi_info(&[DOMAIN_KDF, transcript], &mut okm)
                .expect("32 bytes is within HKDF-SHA256's output range");
            okm.to_vec()
        }
        DigestChoice::Sha384 => {
            let hk = Hkdf::<Sha384>::new(None, shared_point_bytes);
            let mut okm = [0u8; 48];
            hk.expand_multi_info(&[DOMAIN_KDF, transcript], &mut okm)
                .expect("48 bytes is within HKDF-SHA384's output range");
            okm.to_vec()
        }
        DigestChoice::Sha512 => {
            let hk = Hkdf::<Sha512>::new(None, shared_point_bytes);
            let mut okm = [0u8; 64];
            hk.expand_multi_info(&[DOMAIN_KDF, transcript], &mut okm)
                .expect("64 bytes is within HKDF-SHA512's output range");
            okm.to_vec()
        }
    }
}

/// `KC(key, role_tag, transcript) → bytes`.
///
/// HMAC keyed by the session key, over `role_tag || transcript`. The two
/// role tags (`ROLE_CLIENT`, `ROLE_SERVER`) keep the client's and server's
/// confirmation tags from being swappable.
pub fn kc(curve: Curve, key: &[u8], role_tag: &[u8], transcript: &[u8]) -> Vec<u8> {
    match digest_for(curve) {
        DigestChoice::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
            mac.update(role_tag);
            mac.update(transcript);
            mac.finalize().into_bytes().to_vec()
        }
        DigestChoice::Sha384 => {
            let mut mac =
                Hmac::<Sha384>::new_from_slice(key).expect("HMAC accepts keys of any length");
            mac.update(role_tag);
            mac.update(transcript);
            mac.finalize().into_bytes().to_vec()
        }
        DigestChoice::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts keys of any length");
            mac.update(role_tag);
            mac.update(transcript);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Builds the `username || serverId || X1 || X2 || X3 || X4 || beta || alpha`
/// transcript both sides feed into [`kdf`] and [`kc`].
pub fn transcript(
    username: &str,
    server_id: &str,
    x1: &Point,
    x2: &Point,
    x3: &Point,
    x4: &Point,
    beta: &Point,
    alpha: &Point,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(encode_str(username));
    out.extend(encode_str(server_id));
    for p in [x1, x2, x3, x4, beta, alpha] {
        out.extend(p.to_bytes());
    }
    out
}

/// Constant-time comparison of a received confirmation tag against the
/// locally computed expectation. Mandatory per §5/§7; never use `==` on tag
/// bytes anywhere else in this crate.
pub fn verify_kc(received: &[u8], expected: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    received.ct_eq(expected).into()
}
