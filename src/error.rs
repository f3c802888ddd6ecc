use thiserror::Error;

/// Category of field that failed validation during message deserialization.
///
/// Kept coarse on purpose: the exact field is never reported, only whether
/// the problem was structural (missing/malformed container) or cryptographic
/// (a point or scalar that parsed but failed validation).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldCategory {
    /// Missing field, wrong JSON shape, or a hex string of the wrong length.
    Structural,
    /// A point that failed the on-curve/subgroup/non-identity checks.
    Point,
    /// A scalar outside `[0, n)` or equal to zero where zero is disallowed.
    Scalar,
}

impl core::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            FieldCategory::Structural => "structural",
            FieldCategory::Point => "point",
            FieldCategory::Scalar => "scalar",
        };
        f.write_str(s)
    }
}

/// The error taxonomy for the Owl protocol core.
///
/// Every fallible operation returns one of these variants rather than
/// panicking or raising an exception; see the crate-level documentation for
/// which flow returns which variant.
#[derive(Error, Debug)]
pub enum OwlError {
    /// A ZKP, point-on-curve, or subgroup check failed somewhere in `flow`.
    /// Never carries which specific sub-check failed.
    #[error("zero-knowledge proof verification failed during {flow}")]
    ZkpVerification {
        /// Name of the protocol flow the failure occurred in (e.g. "authInit").
        flow: &'static str,
    },

    /// All proofs verified, but the key-confirmation tag did not match. The
    /// canonical "wrong password" signal on the server side.
    #[error("key confirmation tag mismatch")]
    AuthenticationFailure,

    /// `authFinish` was invoked without a prior successful `authInit`.
    #[error("client authFinish called before authInit")]
    UninitialisedClient,

    /// Structural or cryptographic validation failed while parsing a message.
    #[error("failed to deserialize message: invalid {field_category} field")]
    Deserialization {
        /// Which broad category of field failed validation.
        field_category: FieldCategory,
    },

    /// `Config` construction was given invalid input.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable reason, safe to log (never contains secret material).
        reason: &'static str,
    },

    /// The OS CSPRNG failed to supply entropy.
    #[error("random number generator failed")]
    Rng,
}
