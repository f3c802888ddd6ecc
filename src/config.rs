//! Group parameters shared by the client and server state machines.

use crate::curve::Curve;
use crate::error::OwlError;

/// Static configuration for a Owl session: which group to run over, and the
/// server's identity string (hashed into `pi` and embedded in every
/// server-generated ZKP challenge).
///
/// Unlike the teacher library's `AccParams::default()` — whose parameters
/// are public constants with nothing caller-supplied to validate — `Config`
/// has an explicit, validating constructor, since `server_id` is caller
/// input and an empty one would silently weaken every proof it's folded
/// into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub curve: Curve,
    pub server_id: String,
}

impl Config {
    pub fn new(curve: Curve, server_id: impl Into<String>) -> Result<Self, OwlError> {
        let server_id = server_id.into();
        if server_id.is_empty() {
            return Err(OwlError::InvalidConfig {
                reason: "server_id must be non-empty",
            });
        }
        Ok(Self { curve, server_id })
    }
}
