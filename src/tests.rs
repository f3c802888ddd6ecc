//! End-to-end register/authInit/authFinish scenarios across all four
//! supported curves.

use crate::client::Client;
use crate::config::Config;
use crate::curve::Curve;
use crate::error::OwlError;
use crate::hash::verify_kc;
use crate::message::{AuthFinishRequest, RegistrationRequest, UserCredentials};
use crate::server::Server;

const CURVES: [Curve; 4] = [Curve::P256, Curve::P384, Curve::P521, Curve::FourQ];

fn full_flow(
    curve: Curve,
    username: &str,
    register_password: &str,
    login_password: &str,
) -> Result<(crate::message::SessionOutput, crate::message::SessionOutput), OwlError> {
    let config = Config::new(curve, "server.example.com").unwrap();

    let reg_req = Client::register(&config, username, register_password);
    let creds = Server::register(&config, reg_req)?;

    let (init_req, session) = Client::auth_init(&config, username, login_password)?;
    let (init_resp, initial) = Server::auth_init(&config, username, &init_req, &creds)?;

    let (finish_req, client_out) = session.auth_finish(&init_resp)?;
    let server_out = Server::auth_finish(&config, username, &finish_req, initial)?;

    Ok((client_out, server_out))
}

#[test]
fn correct_password_matches_keys_and_confirmation_tags() {
    for curve in CURVES {
        let (client_out, server_out) =
            full_flow(curve, "alice", "hunter2", "hunter2").expect("honest flow must succeed");

        assert_eq!(client_out.key, server_out.key);
        assert!(verify_kc(&client_out.kc_test, &server_out.kc));
        assert!(verify_kc(&server_out.kc_test, &client_out.kc));
    }
}

#[test]
fn wrong_password_never_yields_matching_keys() {
    for curve in CURVES {
        match full_flow(curve, "bob", "correct-horse", "wrong-horse") {
            Err(OwlError::AuthenticationFailure) | Err(OwlError::ZkpVerification { .. }) => {}
            Err(other) => panic!("unexpected error variant: {other}"),
            Ok((client_out, server_out)) => {
                assert_ne!(
                    client_out.key, server_out.key,
                    "a wrong password must never derive the server's key"
                );
            }
        }
    }
}

#[test]
fn credentials_round_trip_through_canonical_json() {
    for curve in CURVES {
        let config = Config::new(curve, "server.example.com").unwrap();
        let reg_req = Client::register(&config, "carol", "s3cr3t");
        let creds = Server::register(&config, reg_req).unwrap();

        let json = creds.to_json();
        let parsed = UserCredentials::from_json(curve, &json).unwrap();
        assert_eq!(parsed.pi.to_bytes(), creds.pi.to_bytes());
        assert_eq!(parsed.t.to_bytes(), creds.t.to_bytes());
        assert_eq!(parsed.x3.to_bytes(), creds.x3.to_bytes());

        let (init_req, session) = Client::auth_init(&config, "carol", "s3cr3t").unwrap();
        let (init_resp, initial) = Server::auth_init(&config, "carol", &init_req, &parsed).unwrap();
        let (finish_req, client_out) = session.auth_finish(&init_resp).unwrap();
        let server_out = Server::auth_finish(&config, "carol", &finish_req, initial).unwrap();
        assert_eq!(client_out.key, server_out.key);
    }
}

#[test]
fn registration_request_round_trips_through_canonical_json() {
    for curve in CURVES {
        let config = Config::new(curve, "server.example.com").unwrap();
        let req = Client::register(&config, "dave", "correcthorsebatterystaple");
        let json = req.to_json();
        let parsed = RegistrationRequest::from_json(curve, &json).unwrap();
        assert_eq!(parsed.username, req.username);
        assert_eq!(parsed.pi.to_bytes(), req.pi.to_bytes());
        assert_eq!(parsed.t.to_bytes(), req.t.to_bytes());
    }
}

#[test]
fn tampered_alpha_is_rejected_by_server() {
    for curve in CURVES {
        let config = Config::new(curve, "server.example.com").unwrap();
        let username = "erin";
        let password = "tamper-me-not";

        let creds = Server::register(&config, Client::register(&config, username, password)).unwrap();
        let (init_req, session) = Client::auth_init(&config, username, password).unwrap();
        let (init_resp, initial) = Server::auth_init(&config, username, &init_req, &creds).unwrap();
        let (finish_req, _client_out) = session.auth_finish(&init_resp).unwrap();

        let tampered = AuthFinishRequest {
            alpha: finish_req.alpha.add(&crate::curve::Point::generator(curve)),
            pi_alpha: finish_req.pi_alpha.clone(),
            r: finish_req.r.clone(),
            kc: finish_req.kc.clone(),
        };

        let result = Server::auth_finish(&config, username, &tampered, initial);
        assert!(matches!(result, Err(OwlError::ZkpVerification { .. })));
    }
}

#[test]
fn parallel_sessions_for_same_user_derive_independent_keys() {
    for curve in CURVES {
        let config = Config::new(curve, "server.example.com").unwrap();
        let username = "frank";
        let password = "two-at-once";
        let creds = Server::register(&config, Client::register(&config, username, password)).unwrap();

        let (init_req_a, session_a) = Client::auth_init(&config, username, password).unwrap();
        let (init_req_b, session_b) = Client::auth_init(&config, username, password).unwrap();
        assert_ne!(init_req_a.x1.to_bytes(), init_req_b.x1.to_bytes());

        let (resp_a, initial_a) = Server::auth_init(&config, username, &init_req_a, &creds).unwrap();
        let (resp_b, initial_b) = Server::auth_init(&config, username, &init_req_b, &creds).unwrap();

        let (finish_a, client_out_a) = session_a.auth_finish(&resp_a).unwrap();
        let (finish_b, client_out_b) = session_b.auth_finish(&resp_b).unwrap();

        let server_out_a = Server::auth_finish(&config, username, &finish_a, initial_a).unwrap();
        let server_out_b = Server::auth_finish(&config, username, &finish_b, initial_b).unwrap();

        assert_eq!(client_out_a.key, server_out_a.key);
        assert_eq!(client_out_b.key, server_out_b.key);
        assert_ne!(client_out_a.key, client_out_b.key);
    }
}

#[test]
fn replaying_an_auth_init_response_to_a_fresh_client_fails() {
    for curve in CURVES {
        let config = Config::new(curve, "server.example.com").unwrap();
        let username = "grace";
        let password = "replay-resistant";
        let creds = Server::register(&config, Client::register(&config, username, password)).unwrap();

        let (init_req_first, _session_first) = Client::auth_init(&config, username, password).unwrap();
        let (resp_first, _initial_first) =
            Server::auth_init(&config, username, &init_req_first, &creds).unwrap();

        // resp_first's PIbeta was generated against the first session's
        // X1*X2; a second session's own X1/X2 don't match, so PIbeta fails
        // verification under the fresh session's recomputed base.
        let (_init_req_second, session_second) = Client::auth_init(&config, username, password).unwrap();
        let result = session_second.auth_finish(&resp_first);
        assert!(result.is_err());
    }
}
