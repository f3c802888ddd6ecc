//! Client-side state machine: `register`, `authInit`, `authFinish`.
//!
//! The per-attempt session state between `authInit` and `authFinish` is
//! modeled as an explicit owned value, [`ClientSession`], rather than hidden
//! mutable state on a long-lived object — the caller threads it from one
//! call into the other, which makes single-use enforcement and
//! zeroization-on-drop explicit instead of implicit.

use zeroize::Zeroize;

use crate::config::Config;
use crate::curve::{Curve, Point, Scalar};
use crate::error::OwlError;
use crate::hash::{self, DOMAIN_HPW, DOMAIN_PI, DOMAIN_T, ROLE_CLIENT, ROLE_SERVER};
use crate::message::{
    AuthFinishRequest, AuthInitRequest, AuthInitResponse, RegistrationRequest, SessionOutput,
};
use crate::zkp;

fn pi_input(username: &str, server_id: &str, password: &str) -> Vec<u8> {
    let mut out = hash::encode_str(username);
    out.extend(hash::encode_str(server_id));
    out.extend(hash::encode_str(password));
    out
}

fn t_input(password: &str, username: &str) -> Vec<u8> {
    let mut out = hash::encode_str(password);
    out.extend(hash::encode_str(username));
    out
}

/// Stateless registration and authInit entry points.
pub struct Client;

impl Client {
    /// **register(username, password) → RegistrationRequest**
    pub fn register(config: &Config, username: &str, password: &str) -> RegistrationRequest {
        let curve = config.curve;
        let t = Scalar::hash_to_scalar(curve, DOMAIN_T, &t_input(password, username));
        let pi = Scalar::hash_to_scalar(curve, DOMAIN_PI, &pi_input(username, &config.server_id, password));
        let t_point = Point::generator(curve).mul(&t);
        RegistrationRequest {
            username: username.to_string(),
            pi,
            t: t_point,
        }
    }

    /// **authInit(username, password) → (AuthInitRequest, ClientSession)**
    ///
    /// Fails with `OwlError::Rng` if sampling `x1`/`x2` or generating either
    /// ZKP hits an OS entropy failure (see [`crate::curve::Scalar::random`]).
    pub fn auth_init(
        config: &Config,
        username: &str,
        password: &str,
    ) -> Result<(AuthInitRequest, ClientSession), OwlError> {
        let curve = config.curve;
        let pi = Scalar::hash_to_scalar(curve, DOMAIN_PI, &pi_input(username, &config.server_id, password));
        let x1 = Scalar::random(curve)?;
        let x2 = Scalar::random(curve)?;
        let g = Point::generator(curve);
        let x1_pub = g.mul(&x1);
        let x2_pub = g.mul(&x2);
        let pi1 = zkp::generate(curve, &x1, &g, username)?;
        let pi2 = zkp::generate(curve, &x2, &g, username)?;

        let session = ClientSession {
            curve,
            username: username.to_string(),
            server_id: config.server_id.clone(),
            password: password.to_string(),
            pi,
            x1,
            x2,
            x1_pub,
            x2_pub,
        };
        Ok((
            AuthInitRequest {
                x1: x1_pub,
                x2: x2_pub,
                pi1,
                pi2,
            },
            session,
        ))
    }
}

/// Stateful wrapper around [`ClientSession`] for callers who want
/// object-style state instead of threading the session value by hand.
///
/// Starts empty (`Fresh`); `auth_init` fills the slot, `auth_finish` takes
/// it. A second `auth_finish`, or one called before any `auth_init`, finds
/// the slot empty and returns [`OwlError::UninitialisedClient`] without
/// looking at the response at all.
#[derive(Default)]
pub struct ClientHandle {
    session: Option<ClientSession>,
}

impl ClientHandle {
    /// A fresh handle with no session in flight.
    pub fn new() -> Self {
        Self { session: None }
    }

    /// **authInit(username, password) → AuthInitRequest**, storing the
    /// resulting session in this handle for the matching `auth_finish`.
    pub fn auth_init(
        &mut self,
        config: &Config,
        username: &str,
        password: &str,
    ) -> Result<AuthInitRequest, OwlError> {
        let (request, session) = Client::auth_init(config, username, password)?;
        self.session = Some(session);
        Ok(request)
    }

    /// **authFinish(response) → (AuthFinishRequest, SessionOutput)**
    ///
    /// Returns `OwlError::UninitialisedClient` if this handle never saw a
    /// successful `auth_init`, or already consumed its session in a prior
    /// `auth_finish` call.
    pub fn auth_finish(
        &mut self,
        response: &AuthInitResponse,
    ) -> Result<(AuthFinishRequest, SessionOutput), OwlError> {
        let session = self.session.take().ok_or(OwlError::UninitialisedClient)?;
        session.auth_finish(response)
    }
}

/// Per-attempt client session state, held by the caller between `authInit`
/// and `authFinish`. Every secret field is zeroized on drop, whether
/// `authFinish` is ever called or the session is simply discarded.
pub struct ClientSession {
    curve: Curve,
    username: String,
    server_id: String,
    password: String,
    pi: Scalar,
    x1: Scalar,
    x2: Scalar,
    x1_pub: Point,
    x2_pub: Point,
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

impl ClientSession {
    /// **authFinish(response) → (AuthFinishRequest, SessionOutput)**
    ///
    /// Consumes the session regardless of outcome: a failed verification
    /// still drops (and zeroizes) all of its secret fields.
    pub fn auth_finish(
        self,
        response: &AuthInitResponse,
    ) -> Result<(AuthFinishRequest, SessionOutput), OwlError> {
        let curve = self.curve;
        let g = Point::generator(curve);

        if response.x3.is_identity() || response.x4.is_identity() {
            return Err(OwlError::ZkpVerification { flow: "authFinish" });
        }
        if !zkp::verify(curve, &response.pi3, &g, &self.server_id) {
            return Err(OwlError::ZkpVerification { flow: "authFinish" });
        }
        if !zkp::verify(curve, &response.pi4, &g, &self.server_id) {
            return Err(OwlError::ZkpVerification { flow: "authFinish" });
        }
        let base_beta = self.x1_pub.add(&self.x2_pub).add(&response.x3);
        if !zkp::verify(curve, &response.pi_beta, &base_beta, &self.server_id) {
            return Err(OwlError::ZkpVerification { flow: "authFinish" });
        }

        let x2_pi = self.x2.mul(&self.pi);
        let base_alpha = self.x1_pub.add(&response.x3).add(&response.x4);
        let alpha = base_alpha.mul(&x2_pi);
        let pi_alpha = zkp::generate(curve, &x2_pi, &base_alpha, &self.username)?;

        let h_pw = Scalar::hash_to_scalar(curve, DOMAIN_HPW, &hash::encode_str(&self.password));
        let r = self.x1.sub(&self.pi.mul(&h_pw));

        // K = (beta / X4^(x2*pi))^x2
        let x4_x2pi = response.x4.mul(&x2_pi);
        let k_point = response.beta.add(&x4_x2pi.neg()).mul(&self.x2);

        let transcript = hash::transcript(
            &self.username,
            &self.server_id,
            &self.x1_pub,
            &self.x2_pub,
            &response.x3,
            &response.x4,
            &response.beta,
            &alpha,
        );
        let session_key = hash::kdf(curve, &k_point.to_bytes(), &transcript);
        let kc = hash::kc(curve, &session_key, ROLE_CLIENT, &transcript);
        let kc_test = hash::kc(curve, &session_key, ROLE_SERVER, &transcript);

        Ok((
            AuthFinishRequest {
                alpha,
                pi_alpha,
                r,
                kc: kc.clone(),
            },
            SessionOutput {
                key: session_key,
                kc,
                kc_test,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    #[test]
    fn register_is_deterministic_in_pi_for_same_inputs() {
        let config = Config::new(Curve::P256, "server.example.com").unwrap();
        let a = Client::register(&config, "alice", "hunter2");
        let b = Client::register(&config, "alice", "hunter2");
        assert_eq!(a.pi.to_bytes(), b.pi.to_bytes());
    }

    #[test]
    fn auth_init_produces_fresh_ephemerals_each_call() {
        let config = Config::new(Curve::P256, "server.example.com").unwrap();
        let (req_a, _session_a) = Client::auth_init(&config, "alice", "hunter2").unwrap();
        let (req_b, _session_b) = Client::auth_init(&config, "alice", "hunter2").unwrap();
        assert_ne!(req_a.x1.to_bytes(), req_b.x1.to_bytes());
    }

    #[test]
    fn handle_auth_finish_before_auth_init_is_uninitialised() {
        let config = Config::new(Curve::P256, "server.example.com").unwrap();
        let username = "alice";
        let password = "hunter2";

        // A real AuthInitResponse, just to prove auth_finish never looks at
        // it before checking whether a session is actually in flight.
        let creds = crate::server::Server::register(&config, Client::register(&config, username, password)).unwrap();
        let (init_req, _unused_session) = Client::auth_init(&config, username, password).unwrap();
        let (response, _initial) =
            crate::server::Server::auth_init(&config, username, &init_req, &creds).unwrap();

        let mut handle = ClientHandle::new();
        let result = handle.auth_finish(&response);
        assert!(matches!(result, Err(OwlError::UninitialisedClient)));

        // The slot stays empty after the failed call: a second attempt with
        // no intervening auth_init fails the same way.
        let result = handle.auth_finish(&response);
        assert!(matches!(result, Err(OwlError::UninitialisedClient)));
    }

    #[test]
    fn handle_rejects_second_auth_finish_after_consuming_its_session() {
        let config = Config::new(Curve::P256, "server.example.com").unwrap();
        let username = "alice";
        let password = "hunter2";
        let creds = crate::server::Server::register(&config, Client::register(&config, username, password)).unwrap();

        let mut handle = ClientHandle::new();
        let init_req = handle.auth_init(&config, username, password).unwrap();
        let (response, initial) =
            crate::server::Server::auth_init(&config, username, &init_req, &creds).unwrap();

        let (finish_req, _client_out) = handle.auth_finish(&response).unwrap();
        let _server_out =
            crate::server::Server::auth_finish(&config, username, &finish_req, initial).unwrap();

        let result = handle.auth_finish(&response);
        assert!(matches!(result, Err(OwlError::UninitialisedClient)));
    }
}
