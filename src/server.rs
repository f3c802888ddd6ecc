//! Server-side state machine: `register`, `authInit`, `authFinish`.
//!
//! The server is stateless between requests except via the caller-provided
//! persistence for [`crate::message::UserCredentials`] (durable) and
//! [`crate::message::AuthInitialValues`] (per-session, readable at most once;
//! see §6 of the specification this crate implements).

use crate::config::Config;
use crate::curve::{Point, Scalar};
use crate::error::OwlError;
use crate::hash::{self, ROLE_CLIENT, ROLE_SERVER};
use crate::message::{
    AuthFinishRequest, AuthInitRequest, AuthInitResponse, AuthInitialValues, RegistrationRequest,
    SessionOutput, UserCredentials,
};
use crate::zkp;

/// Stateless registration and authentication entry points.
pub struct Server;

impl Server {
    /// **register(req) → UserCredentials**
    ///
    /// `RegistrationRequest::from_json` already range-checked `pi` and
    /// validated `T` on-curve/non-identity on the way in, so this step only
    /// samples the server's per-session static secret and persists the
    /// result; the caller is responsible for writing it keyed by username.
    pub fn register(config: &Config, req: RegistrationRequest) -> Result<UserCredentials, OwlError> {
        let curve = config.curve;
        let x3 = Scalar::random(curve)?;
        let x3_pub = Point::generator(curve).mul(&x3);
        Ok(UserCredentials {
            x3: x3_pub,
            pi: req.pi,
            t: req.t,
        })
    }

    /// **authInit(username, req, creds) → (AuthInitResponse, AuthInitialValues)**
    ///
    /// §9's open question is resolved as per-session resampling: `x3`/`X3`
    /// are redrawn here rather than recovered from `creds.x3`, so the
    /// response carries a fresh `X3` every call even for the same user.
    pub fn auth_init(
        config: &Config,
        username: &str,
        req: &AuthInitRequest,
        creds: &UserCredentials,
    ) -> Result<(AuthInitResponse, AuthInitialValues), OwlError> {
        let curve = config.curve;
        let g = Point::generator(curve);

        if !zkp::verify(curve, &req.pi1, &g, username) {
            return Err(OwlError::ZkpVerification { flow: "authInit" });
        }
        if !zkp::verify(curve, &req.pi2, &g, username) {
            return Err(OwlError::ZkpVerification { flow: "authInit" });
        }
        let x1x2 = req.x1.add(&req.x2);
        if x1x2.is_identity() {
            return Err(OwlError::ZkpVerification { flow: "authInit" });
        }

        let x3 = Scalar::random(curve)?;
        let x3_pub = g.mul(&x3);
        let x4 = Scalar::random(curve)?;
        let x4_pub = g.mul(&x4);

        let base_beta = x1x2.add(&x3_pub);
        let x4_pi = x4.mul(&creds.pi);
        let beta = base_beta.mul(&x4_pi);

        let pi3 = zkp::generate(curve, &x3, &g, &config.server_id)?;
        let pi4 = zkp::generate(curve, &x4, &g, &config.server_id)?;
        let pi_beta = zkp::generate(curve, &x4_pi, &base_beta, &config.server_id)?;

        let response = AuthInitResponse {
            x3: x3_pub,
            x4: x4_pub,
            beta,
            pi3,
            pi4,
            pi_beta,
        };
        let initial = AuthInitialValues {
            beta,
            x1: req.x1,
            x2: req.x2,
            x3: x3_pub,
            x4: x4_pub,
            pi: creds.pi.clone(),
            x4_secret: x4,
        };
        Ok((response, initial))
    }

    /// **authFinish(username, req, initial) → SessionOutput**
    ///
    /// `initial` is consumed by value: the caller's persistence layer must
    /// hand it out at most once per session (§3's `AuthInitialValues`
    /// lifecycle), and this signature makes a second use a move error at
    /// the call site rather than a runtime check here.
    pub fn auth_finish(
        config: &Config,
        username: &str,
        req: &AuthFinishRequest,
        initial: AuthInitialValues,
    ) -> Result<SessionOutput, OwlError> {
        let curve = config.curve;

        let base_alpha = initial.x1.add(&initial.x3).add(&initial.x4);
        if !zkp::verify(curve, &req.pi_alpha, &base_alpha, username) {
            return Err(OwlError::ZkpVerification { flow: "authFinish" });
        }

        // K = (alpha / X2^(x4*pi))^x4, the server-side mirror of the
        // client's K = (beta / X4^(x2*pi))^x2 — both resolve to the same
        // group element when pi and the Schnorr witnesses agree.
        let x4_pi = initial.x4_secret.mul(&initial.pi);
        let x2_x4pi = initial.x2.mul(&x4_pi);
        let k_point = req.alpha.add(&x2_x4pi.neg()).mul(&initial.x4_secret);

        let transcript = hash::transcript(
            username,
            &config.server_id,
            &initial.x1,
            &initial.x2,
            &initial.x3,
            &initial.x4,
            &initial.beta,
            &req.alpha,
        );
        let session_key = hash::kdf(curve, &k_point.to_bytes(), &transcript);
        let kc = hash::kc(curve, &session_key, ROLE_SERVER, &transcript);
        let kc_test = hash::kc(curve, &session_key, ROLE_CLIENT, &transcript);

        if !hash::verify_kc(&req.kc, &kc_test) {
            return Err(OwlError::AuthenticationFailure);
        }

        Ok(SessionOutput {
            key: session_key,
            kc,
            kc_test,
        })
    }
}
