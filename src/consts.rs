//! # Constants
//!
//! Sizes of every fixed-width field in the encrypted block format, plus the
//! loop-count defaults used when stretching a passphrase.

/// Length of a SHA-512 digest, and of every derived secret (GlobalHash, key, IV).
pub const HASH_LEN: usize = 64;

/// Length of the per-block salt stored in clear before each encrypted header.
pub const SALT_LEN: usize = 16;

/// AES block size. Also the length of the IV handed to CBC.
pub const CBC_LEN: usize = 16;

/// AES-128 key length. The first `AES_KEY_LEN` bytes of a derived key are used.
pub const AES_KEY_LEN: usize = 16;

/// Maximum passphrase length accepted by key derivation (salted form included).
pub const PASS_LEN: usize = 512;

/// Width of the little-endian round counter mixed in while stretching.
pub const COUNTER_LEN: usize = 8;

/// Plaintext block header: type(1) | c_len(8) | u_len(8) | last_head(8).
pub const HEADER_LEN: usize = 25;

/// On-disk encrypted header record: salt followed by the encrypted header.
pub const ENCRYPTED_HEADER_LEN: usize = SALT_LEN + HEADER_LEN;

/// Scratch space for one key derivation pass: `{hash, salt, passphrase}`.
pub const KEYGEN_SCRATCH_LEN: usize = HASH_LEN + SALT_LEN + PASS_LEN;

/// Smallest payload an archive writer emits when encryption is on.
///
/// Shorter compressed blocks are padded with random bytes up to this size.
pub const MIN_SIZE: usize = CBC_LEN;

/// Default stretching work factor (SHA-512 loops).
pub const DEFAULT_LOOPS: u64 = 1_000_000;

/// Largest shift the two-byte loop-count encoding may carry without
/// overflowing a `u64` (8-bit mantissa).
pub const MAX_LOOP_BITS: u8 = 56;
