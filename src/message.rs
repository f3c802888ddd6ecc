//! Typed message records with a canonical, deterministic wire encoding:
//! textual JSON with hex-encoded binary fields. Every record rejects unknown
//! fields and re-validates all cryptographic material on the way back in.

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, Point, Scalar};
use crate::error::{FieldCategory, OwlError};
use crate::zkp::ZkpProof;

fn structural() -> OwlError {
    OwlError::Deserialization {
        field_category: FieldCategory::Structural,
    }
}

fn scalar_err() -> OwlError {
    OwlError::Deserialization {
        field_category: FieldCategory::Scalar,
    }
}

fn encode_scalar(s: &Scalar) -> String {
    hex::encode(s.to_bytes())
}

fn decode_scalar(curve: Curve, s: &str) -> Result<Scalar, OwlError> {
    let bytes = hex::decode(s).map_err(|_| structural())?;
    let scalar = Scalar::from_bytes(curve, &bytes)?;
    if scalar.is_zero() {
        return Err(scalar_err());
    }
    Ok(scalar)
}

fn encode_point(p: &Point) -> String {
    hex::encode(p.to_bytes())
}

fn decode_point(curve: Curve, s: &str) -> Result<Point, OwlError> {
    let bytes = hex::decode(s).map_err(|_| structural())?;
    Point::from_bytes_non_identity(curve, &bytes)
}

fn encode_bytes(b: &[u8]) -> String {
    hex::encode(b)
}

fn decode_bytes(s: &str) -> Result<Vec<u8>, OwlError> {
    hex::decode(s).map_err(|_| structural())
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ZkpProofWire {
    h: String,
    r: String,
    b: String,
}

fn encode_proof(p: &ZkpProof) -> ZkpProofWire {
    ZkpProofWire {
        h: encode_scalar(&p.h),
        r: encode_scalar(&p.r),
        b: encode_point(&p.b),
    }
}

fn decode_proof(curve: Curve, w: ZkpProofWire) -> Result<ZkpProof, OwlError> {
    Ok(ZkpProof {
        h: decode_scalar(curve, &w.h)?,
        r: decode_scalar(curve, &w.r)?,
        b: decode_point(curve, &w.b)?,
    })
}

/// `{ username, pi, T }` sent by the client during registration.
pub struct RegistrationRequest {
    pub username: String,
    pub pi: Scalar,
    pub t: Point,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistrationRequestWire {
    username: String,
    pi: String,
    t: String,
}

impl RegistrationRequest {
    pub fn to_json(&self) -> String {
        let wire = RegistrationRequestWire {
            username: self.username.clone(),
            pi: encode_scalar(&self.pi),
            t: encode_point(&self.t),
        };
        serde_json::to_string(&wire).expect("wire struct always serializes")
    }

    pub fn from_json(curve: Curve, json: &str) -> Result<Self, OwlError> {
        let wire: RegistrationRequestWire = serde_json::from_str(json).map_err(|_| structural())?;
        Ok(Self {
            pi: decode_scalar(curve, &wire.pi)?,
            t: decode_point(curve, &wire.t)?,
            username: wire.username,
        })
    }
}

/// `{ X3, pi, T }`, persisted server-side, never mutated once written.
pub struct UserCredentials {
    pub x3: Point,
    pub pi: Scalar,
    pub t: Point,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserCredentialsWire {
    x3: String,
    pi: String,
    t: String,
}

impl UserCredentials {
    pub fn to_json(&self) -> String {
        let wire = UserCredentialsWire {
            x3: encode_point(&self.x3),
            pi: encode_scalar(&self.pi),
            t: encode_point(&self.t),
        };
        serde_json::to_string(&wire).expect("wire struct always serializes")
    }

    pub fn from_json(curve: Curve, json: &str) -> Result<Self, OwlError> {
        let wire: UserCredentialsWire = serde_json::from_str(json).map_err(|_| structural())?;
        Ok(Self {
            x3: decode_point(curve, &wire.x3)?,
            pi: decode_scalar(curve, &wire.pi)?,
            t: decode_point(curve, &wire.t)?,
        })
    }
}

/// Flow 1, client → server: `{ X1, X2, PI1, PI2 }`.
pub struct AuthInitRequest {
    pub x1: Point,
    pub x2: Point,
    pub pi1: ZkpProof,
    pub pi2: ZkpProof,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthInitRequestWire {
    x1: String,
    x2: String,
    pi1: ZkpProofWire,
    pi2: ZkpProofWire,
}

impl AuthInitRequest {
    pub fn to_json(&self) -> String {
        let wire = AuthInitRequestWire {
            x1: encode_point(&self.x1),
            x2: encode_point(&self.x2),
            pi1: encode_proof(&self.pi1),
            pi2: encode_proof(&self.pi2),
        };
        serde_json::to_string(&wire).expect("wire struct always serializes")
    }

    pub fn from_json(curve: Curve, json: &str) -> Result<Self, OwlError> {
        let wire: AuthInitRequestWire = serde_json::from_str(json).map_err(|_| structural())?;
        Ok(Self {
            x1: decode_point(curve, &wire.x1)?,
            x2: decode_point(curve, &wire.x2)?,
            pi1: decode_proof(curve, wire.pi1)?,
            pi2: decode_proof(curve, wire.pi2)?,
        })
    }
}

/// Flow 2, server → client: `{ X3, X4, beta, PI3, PI4, PIbeta }`.
pub struct AuthInitResponse {
    pub x3: Point,
    pub x4: Point,
    pub beta: Point,
    pub pi3: ZkpProof,
    pub pi4: ZkpProof,
    pub pi_beta: ZkpProof,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthInitResponseWire {
    x3: String,
    x4: String,
    beta: String,
    pi3: ZkpProofWire,
    pi4: ZkpProofWire,
    pi_beta: ZkpProofWire,
}

impl AuthInitResponse {
    pub fn to_json(&self) -> String {
        let wire = AuthInitResponseWire {
            x3: encode_point(&self.x3),
            x4: encode_point(&self.x4),
            beta: encode_point(&self.beta),
            pi3: encode_proof(&self.pi3),
            pi4: encode_proof(&self.pi4),
            pi_beta: encode_proof(&self.pi_beta),
        };
        serde_json::to_string(&wire).expect("wire struct always serializes")
    }

    pub fn from_json(curve: Curve, json: &str) -> Result<Self, OwlError> {
        let wire: AuthInitResponseWire = serde_json::from_str(json).map_err(|_| structural())?;
        Ok(Self {
            x3: decode_point(curve, &wire.x3)?,
            x4: decode_point(curve, &wire.x4)?,
            beta: decode_point(curve, &wire.beta)?,
            pi3: decode_proof(curve, wire.pi3)?,
            pi4: decode_proof(curve, wire.pi4)?,
            pi_beta: decode_proof(curve, wire.pi_beta)?,
        })
    }
}

/// Server-side per-session state: `{ beta, X1, X2, X3, X4, pi, x4 }`.
/// Created at server `authInit`, consumed exactly once at server
/// `authFinish`; the caller is responsible for storing it keyed by session
/// and not handing it out twice.
pub struct AuthInitialValues {
    pub beta: Point,
    pub x1: Point,
    pub x2: Point,
    pub x3: Point,
    pub x4: Point,
    pub pi: Scalar,
    pub x4_secret: Scalar,
}

/// Flow 3, client → server: `{ alpha, PIalpha, r, kc }`.
pub struct AuthFinishRequest {
    pub alpha: Point,
    pub pi_alpha: ZkpProof,
    pub r: Scalar,
    pub kc: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthFinishRequestWire {
    alpha: String,
    pi_alpha: ZkpProofWire,
    r: String,
    kc: String,
}

impl AuthFinishRequest {
    pub fn to_json(&self) -> String {
        let wire = AuthFinishRequestWire {
            alpha: encode_point(&self.alpha),
            pi_alpha: encode_proof(&self.pi_alpha),
            r: encode_scalar(&self.r),
            kc: encode_bytes(&self.kc),
        };
        serde_json::to_string(&wire).expect("wire struct always serializes")
    }

    pub fn from_json(curve: Curve, json: &str) -> Result<Self, OwlError> {
        let wire: AuthFinishRequestWire = serde_json::from_str(json).map_err(|_| structural())?;
        Ok(Self {
            alpha: decode_point(curve, &wire.alpha)?,
            pi_alpha: decode_proof(curve, wire.pi_alpha)?,
            r: {
                // r is the password-recovery scalar and, unlike pi/t, is
                // permitted to be zero (an all-zero response is merely
                // improbable, not structurally invalid).
                let bytes = decode_bytes(&wire.r)?;
                Scalar::from_bytes(curve, &bytes)?
            },
            kc: decode_bytes(&wire.kc)?,
        })
    }
}

/// `{ key, kc, kcTest }` returned by both `authFinish` calls.
pub struct SessionOutput {
    pub key: Vec<u8>,
    pub kc: Vec<u8>,
    pub kc_test: Vec<u8>,
}
