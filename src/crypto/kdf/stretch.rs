//! src/crypto/kdf/stretch.rs
//! Passphrase stretching: one SHA-512 context fed `counter || passphrase`
//! for a loop-count-dependent number of rounds.

use sha2::digest::Output;
use sha2::{Digest, Sha512};
use tracing::debug;

use crate::aliases::{GlobalHash64, Passphrase};
use crate::consts::{COUNTER_LEN, HASH_LEN};
use crate::error::LrzCryptError;

/// Number of hash rounds for a given passphrase length and loop count:
/// `loops * 64 / (passphrase_len + 8)`.
///
/// Each round feeds `passphrase_len + 8` bytes, so the total amount of hashed
/// data stays close to `loops * 64` regardless of passphrase length.
pub fn stretch_rounds(passphrase_len: usize, loops: u64) -> Result<u64, LrzCryptError> {
    let rounds =
        u128::from(loops) * HASH_LEN as u128 / (passphrase_len as u128 + COUNTER_LEN as u128);
    u64::try_from(rounds)
        .map_err(|_| LrzCryptError::Config(format!("loop count {loops} is too large")))
}

/// Stretch `passphrase` into the session's GlobalHash.
///
/// Rounds are accumulated into one running SHA-512 state, never reset in
/// between, each one feeding the little-endian 64-bit round index followed by
/// the passphrase. The digest is written straight into pinned memory.
///
/// `sha2` 0.10 offers no way to zeroize a hasher, so the final partial input
/// block (counter and passphrase bytes) survives in the dropped `Sha512`
/// value on the stack. Only the digest is guaranteed to live in pinned memory.
pub fn stretch_passphrase(
    passphrase: &Passphrase,
    loops: u64,
) -> Result<GlobalHash64, LrzCryptError> {
    let rounds = stretch_rounds(passphrase.len(), loops)?;
    debug!(loops, rounds, "Hashing passphrase {loops} ({rounds}) times");

    let pass = passphrase.expose_secret();
    let mut hasher = Sha512::new();
    for round in 0..rounds {
        hasher.update(round.to_le_bytes());
        hasher.update(pass);
    }

    let mut global_hash = GlobalHash64::zeroed();
    // resets the chaining state only; buffered input bytes are not cleared
    hasher.finalize_into_reset(Output::<Sha512>::from_mut_slice(
        global_hash.expose_secret_mut(),
    ));
    Ok(global_hash)
}
