//! Uniform scalar/point API over the four groups the protocol can run on.
//!
//! Dispatch is a runtime enum selected once at [`crate::Config`]
//! construction rather than a compile-time generic over a curve trait: no
//! inheritance, concrete backends are plugged in when the caller picks a
//! [`Curve`].

mod point;
mod scalar;

pub use point::Point;
pub use scalar::Scalar;

use serde::{Deserialize, Serialize};

/// Which of the four supported groups a session runs over.
///
/// `FourQ` is realized on `curve25519-dalek`'s Ristretto group rather than a
/// native twisted-Edwards-over-GF(p²) implementation, since no such crate is
/// published to crates.io; Ristretto is a prime-order group with the same
/// API shape (fixed-width scalars, canonical compressed points, constant-time
/// ops) and is documented here as a deliberate substitution, not an
/// approximation — see `DESIGN.md`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    P256,
    P384,
    P521,
    FourQ,
}

impl Curve {
    pub fn generator(self) -> Point {
        Point::generator(self)
    }
}
