//! # Key Derivation
//!
//! - [`stretch`] - passphrase → GlobalHash, once per session
//! - [`keygen`] - (GlobalHash, salt, passphrase) → per-block (key, IV)
//!
//! Most callers go through [`Session`](crate::Session), which runs the stretch
//! once and feeds the result to every block. These functions are public for
//! custom flows, such as checking a stored GlobalHash against a passphrase.

pub mod keygen;
pub mod stretch;
