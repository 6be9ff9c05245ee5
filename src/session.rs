//! # Session
//!
//! One `Session` per archive operation. It owns the (salted) passphrase and
//! the GlobalHash stretched from it; both live in pinned memory and are wiped
//! when the session drops.
//!
//! # Thread Safety
//!
//! A session is immutable after construction and `Sync`, so independent blocks
//! can be transformed from several threads at once. Every call derives its own
//! key material; nothing mutable is shared between block operations.

use std::fmt;

use crate::aliases::{GlobalHash64, Passphrase, Salt16};
use crate::block::{transform_block, Direction};
use crate::builders::SessionBuilder;
use crate::crypto::kdf::keygen::{derive_block_keys, BlockKeys};
use crate::crypto::kdf::stretch::stretch_passphrase;
use crate::error::LrzCryptError;
use crate::header::{protect_header, BlockHeader, EncryptedHeader};

pub struct Session {
    passphrase: Passphrase,
    global_hash: GlobalHash64,
    loops: u64,
}

impl Session {
    /// Stretch `passphrase` with `loops` and start a session.
    ///
    /// Shorthand for `Session::builder().with_passphrase(..).with_loops(..).build()`.
    pub fn new(passphrase: impl AsRef<[u8]>, loops: u64) -> Result<Self, LrzCryptError> {
        SessionBuilder::new()
            .with_passphrase(passphrase)
            .with_loops(loops)
            .build()
    }

    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Build from an already-assembled passphrase (salt prefix included).
    pub(crate) fn from_parts(passphrase: Passphrase, loops: u64) -> Result<Self, LrzCryptError> {
        let global_hash = stretch_passphrase(&passphrase, loops)?;
        Ok(Self {
            passphrase,
            global_hash,
            loops,
        })
    }

    pub fn loops(&self) -> u64 {
        self.loops
    }

    pub fn global_hash(&self) -> &GlobalHash64 {
        &self.global_hash
    }

    pub fn passphrase(&self) -> &Passphrase {
        &self.passphrase
    }

    pub fn derive_block_keys(&self, salt: &Salt16) -> Result<BlockKeys, LrzCryptError> {
        derive_block_keys(&self.global_hash, salt, &self.passphrase)
    }

    /// See [`transform_block`].
    pub fn transform_block(
        &self,
        buffer: &mut [u8],
        salt: &Salt16,
        direction: Direction,
    ) -> Result<(), LrzCryptError> {
        transform_block(buffer, salt, &self.global_hash, &self.passphrase, direction)
    }

    /// See [`protect_header`].
    pub fn protect_header(
        &self,
        header: &mut BlockHeader,
        salt: &Salt16,
        direction: Direction,
    ) -> Result<(), LrzCryptError> {
        protect_header(header, salt, &self.global_hash, &self.passphrase, direction)
    }

    pub fn seal_header(
        &self,
        header: &BlockHeader,
        salt: &Salt16,
    ) -> Result<EncryptedHeader, LrzCryptError> {
        EncryptedHeader::seal(header, salt, &self.global_hash, &self.passphrase)
    }

    pub fn open_header(
        &self,
        record: &EncryptedHeader,
        direction: Direction,
    ) -> Result<BlockHeader, LrzCryptError> {
        record.open(&self.global_hash, &self.passphrase, direction)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("passphrase", &self.passphrase)
            .field("global_hash", &self.global_hash)
            .field("loops", &self.loops)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn session_secrets_stay_locked_after_block_work() {
        use crate::crypto::secure_buffer::page_lock_count;

        let session = Session::new("hunter2", 16).unwrap();
        let salt = Salt16::new([9; 16]);
        for _ in 0..8 {
            let mut block = [0x33u8; 40];
            session
                .transform_block(&mut block, &salt, Direction::Encrypt)
                .unwrap();
        }

        let hash_ptr = session.global_hash().expose_secret().as_ptr();
        if session.global_hash().is_pinned() {
            assert!(page_lock_count(hash_ptr) >= 1);
            #[cfg(target_os = "linux")]
            {
                use crate::crypto::secure_buffer::mapping_locked_kb;
                if let Some(kb) = mapping_locked_kb(hash_ptr) {
                    assert!(kb > 0);
                }
            }
        }
        if session.passphrase().is_pinned() {
            assert!(page_lock_count(session.passphrase().expose_secret().as_ptr()) >= 1);
        }
    }

    #[test]
    fn debug_is_redacted() {
        let session = Session::new("hunter2", 16).unwrap();
        let shown = format!("{session:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("loops: 16"));
    }
}
