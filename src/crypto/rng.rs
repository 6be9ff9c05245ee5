// src/crypto/rng.rs
//! Secure randomness for salts and payload padding.
//!
//! Adds `T::random()` to every `Fixed<[u8; N]>` alias (`Salt16`, `Block16`, …)
//! using a thread-local `OsRng`. Randomness is the only primitive here that can
//! fail at runtime, so every entry point returns a `Result`.

use rand::{rngs::OsRng, TryRngCore};
use secure_gate::Fixed;
use std::cell::RefCell;

use crate::error::LrzCryptError;

/// Extension trait – gives `.random()` to all fixed-size secure types
pub trait SecureRandomExt: Sized {
    /// Generate a cryptographically secure random instance of this type
    fn random() -> Result<Self, LrzCryptError>;
}

thread_local! {
    static RNG: RefCell<OsRng> = const { RefCell::new(OsRng) };
}

/// Fill `dest` from the OS randomness source.
pub fn fill_random(dest: &mut [u8]) -> Result<(), LrzCryptError> {
    RNG.with(|rng_cell| {
        rng_cell
            .borrow_mut()
            .try_fill_bytes(dest)
            .map_err(|e| LrzCryptError::PrimitiveUnavailable(format!("OS randomness: {e}")))
    })
}

impl<const N: usize> SecureRandomExt for Fixed<[u8; N]> {
    #[inline(always)]
    fn random() -> Result<Self, LrzCryptError> {
        let mut value = Fixed::new([0u8; N]);
        fill_random(value.expose_secret_mut())?;
        Ok(value)
    }
}
