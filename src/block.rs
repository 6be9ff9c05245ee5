//! # Block Transform
//!
//! Encrypts or decrypts one block payload in place, deriving a fresh (key, IV)
//! from the block's own salt on every call.

use tracing::trace;

use crate::aliases::{GlobalHash64, Passphrase, Salt16};
use crate::consts::MIN_SIZE;
use crate::crypto::cts::LegacyCbcCts;
use crate::crypto::kdf::keygen::derive_block_keys;
use crate::crypto::rng::fill_random;
use crate::error::LrzCryptError;

/// What a transform does to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
    /// Decrypt, for callers that only need to confirm a header (test/info
    /// runs). Identical bytes to [`Direction::Decrypt`], but not logged.
    Validate,
}

/// Transform `buffer` in place under the (key, IV) derived from `salt`.
///
/// Output length always equals input length. Key material lives only for the
/// duration of the call and is wiped on every exit path. On error the buffer
/// contents are undefined and must be discarded.
///
/// # Example
///
/// ```
/// use lrzcrypt_rs::aliases::{Passphrase, Salt16};
/// use lrzcrypt_rs::{stretch_passphrase, transform_block, Direction};
///
/// let passphrase = Passphrase::from_slice(b"correct horse");
/// let global_hash = stretch_passphrase(&passphrase, 100)?;
/// let salt = Salt16::new([7u8; 16]);
///
/// let mut block = b"one block of compressed data".to_vec();
/// transform_block(&mut block, &salt, &global_hash, &passphrase, Direction::Encrypt)?;
/// transform_block(&mut block, &salt, &global_hash, &passphrase, Direction::Decrypt)?;
/// assert_eq!(block, b"one block of compressed data");
/// # Ok::<(), lrzcrypt_rs::LrzCryptError>(())
/// ```
pub fn transform_block(
    buffer: &mut [u8],
    salt: &Salt16,
    global_hash: &GlobalHash64,
    passphrase: &Passphrase,
    direction: Direction,
) -> Result<(), LrzCryptError> {
    let keys = derive_block_keys(global_hash, salt, passphrase)?;
    let cipher = LegacyCbcCts::new(keys.cipher_key())?;

    match direction {
        Direction::Encrypt => {
            trace!(len = buffer.len(), "Encrypting data");
            cipher.encrypt(keys.cipher_iv(), buffer)
        }
        Direction::Decrypt => {
            trace!(len = buffer.len(), "Decrypting data");
            cipher.decrypt(keys.cipher_iv(), buffer)
        }
        Direction::Validate => cipher.decrypt(keys.cipher_iv(), buffer),
    }
}

/// Pad a compressed payload shorter than one cipher block with random bytes.
///
/// Archive writers store the padded length, so readers never see a payload
/// shorter than [`MIN_SIZE`]. Returns the number of bytes appended.
pub fn pad_payload(payload: &mut Vec<u8>) -> Result<usize, LrzCryptError> {
    let len = payload.len();
    if len >= MIN_SIZE {
        return Ok(0);
    }
    payload.resize(MIN_SIZE, 0);
    fill_random(&mut payload[len..])?;
    Ok(MIN_SIZE - len)
}
