//! Cryptographic core of an augmented Password-Authenticated Key Exchange
//! (aPAKE) implementing the Owl protocol.
//!
//! A client holding only a password and a server holding a password-derived
//! verifier jointly derive a high-entropy shared session key: an attacker
//! observing the wire learns nothing exploitable about the password, a
//! server compromise yields only an offline-dictionary-attackable verifier,
//! and both parties receive explicit confirmation that the derived keys
//! match.
//!
//! This crate is the protocol core only — transport, persistence, and wire
//! framing above the canonical message encoding are the caller's concern;
//! see [`message`] for the serialized record types and [`Config`] for the
//! group/identity parameters a session runs under.
#![deny(
    unused_import_braces,
    unused_qualifications,
    unused_parens,
    unconditional_recursion,
    unused_extern_crates,
    trivial_casts,
    trivial_numeric_casts
)]

pub mod client;
pub mod config;
pub mod curve;
pub mod error;
pub mod hash;
pub mod message;
pub mod server;
pub mod zkp;

#[cfg(test)]
mod tests;

pub use client::{Client, ClientHandle, ClientSession};
pub use config::Config;
pub use curve::Curve;
pub use error::{FieldCategory, OwlError};
pub use server::Server;
