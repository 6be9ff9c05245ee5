// src/crypto/mod.rs

//! Low-level crypto building blocks.
//!
//! - [`secure_buffer`] - pinned, zero-on-release storage for every secret
//! - [`kdf`] - passphrase stretching and per-block key derivation
//! - [`cts`] - AES-128-CBC with the legacy ciphertext-stealing tail
//! - [`rng`] - OS randomness for salts and padding

pub mod cts;
pub mod kdf;
pub mod rng;
pub mod secure_buffer;
