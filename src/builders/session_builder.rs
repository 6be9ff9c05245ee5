//! src/builders/session_builder.rs
//! Session builder: validates configuration, then stretches once

use crate::aliases::Passphrase;
use crate::consts::{DEFAULT_LOOPS, PASS_LEN};
use crate::crypto::secure_buffer::SecureBytes;
use crate::error::LrzCryptError;
use crate::loops::LoopCount;
use crate::session::Session;

/// Session configuration builder
///
/// Defaults: [`DEFAULT_LOOPS`] stretching loops, no archive salt prefix.
/// A passphrase is required.
///
/// # Thread Safety
///
/// This type is `Send + Sync`; the passphrase is held in pinned memory from
/// the moment it is handed over.
#[derive(Debug)]
pub struct SessionBuilder {
    loops: u64,
    archive_salt: Vec<u8>,
    passphrase: Option<Passphrase>,
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loops: DEFAULT_LOOPS,
            archive_salt: Vec::new(),
            passphrase: None,
        }
    }

    /// Set the passphrase. The bytes are copied into pinned memory right away.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl AsRef<[u8]>) -> Self {
        self.passphrase = Some(SecureBytes::from_slice(passphrase.as_ref()));
        self
    }

    /// Set the stretching work factor (must be ≥1).
    #[must_use]
    pub fn with_loops(mut self, loops: u64) -> Self {
        self.loops = loops;
        self
    }

    /// Set the work factor from its on-disk two-byte encoding.
    #[must_use]
    pub fn with_loop_count(mut self, count: LoopCount) -> Self {
        self.loops = count.loops();
        self
    }

    /// Prefix the passphrase with the archive-level salt.
    ///
    /// lrzip archives stretch and derive keys from `archive_salt || passphrase`
    /// rather than the bare passphrase.
    #[must_use]
    pub fn with_archive_salt(mut self, salt: impl AsRef<[u8]>) -> Self {
        self.archive_salt = salt.as_ref().to_vec();
        self
    }

    /// Current loop count
    #[must_use]
    pub const fn loops(&self) -> u64 {
        self.loops
    }

    /// Validate, assemble the salted passphrase and stretch it.
    pub fn build(self) -> Result<Session, LrzCryptError> {
        let passphrase = self
            .passphrase
            .ok_or_else(|| LrzCryptError::Config("passphrase is required".into()))?;
        if self.loops == 0 {
            return Err(LrzCryptError::Config("loop count must be ≥1".into()));
        }

        let salted = salted_passphrase(&self.archive_salt, &passphrase);
        if salted.len() > PASS_LEN {
            return Err(LrzCryptError::Config(format!(
                "salted passphrase is {} bytes, limit is {PASS_LEN}",
                salted.len()
            )));
        }

        Session::from_parts(salted, self.loops)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `archive_salt || passphrase`, assembled directly in pinned memory.
pub fn salted_passphrase(archive_salt: &[u8], passphrase: &Passphrase) -> Passphrase {
    SecureBytes::concat(&[archive_salt, passphrase.expose_secret()])
}
