//! # Secure Type Aliases
//!
//! Every secret in this crate lives in one of the types below.
//!
//! ## Clear-but-wrapped values ([`secure-gate`](https://github.com/Slurp9187/secure-gate))
//! - [`SpanBuffer<N>`] - generic zeroize-on-drop stack buffer
//! - [`Block16`] - one AES block (CBC chaining value, stolen tail)
//! - [`Salt16`] - per-block salt (not secret, but never repeated)
//!
//! ## Pinned secrets ([`SecureBuffer`] / [`SecureBytes`])
//! - [`GlobalHash64`] - stretched passphrase digest, one per session
//! - [`DerivedKey64`] / [`DerivedIv64`] - per-block key material
//! - [`KeygenScratch`] - `{hash, salt, passphrase}` derivation scratch
//! - [`HeaderBlock25`] - packed header during encode/decode
//! - [`Passphrase`] - variable-length passphrase bytes
//!
//! All of them require an explicit `.expose_secret()` to reach the bytes.

use secure_gate::fixed_alias;

use crate::consts::{HASH_LEN, HEADER_LEN, KEYGEN_SCRATCH_LEN};
use crate::crypto::secure_buffer::{SecureBuffer, SecureBytes};

// ─────────────────────────────────────────────────────────────────────────────
// SpanBuffer - generic secure stack buffer (direct alias to secure-gate's Fixed)
// ─────────────────────────────────────────────────────────────────────────────
pub type SpanBuffer<const N: usize> = secure_gate::Fixed<[u8; N]>;

pub type Block16 = SpanBuffer<16>; // one AES block

fixed_alias!(Salt16, 16); // per-block salt

// ─────────────────────────────────────────────────────────────────────────────
// Pinned secrets - mlocked for their whole lifetime, zeroed on drop
// ─────────────────────────────────────────────────────────────────────────────
pub type GlobalHash64 = SecureBuffer<HASH_LEN>;
pub type DerivedKey64 = SecureBuffer<HASH_LEN>;
pub type DerivedIv64 = SecureBuffer<HASH_LEN>;
pub type KeygenScratch = SecureBuffer<KEYGEN_SCRATCH_LEN>;
pub type HeaderBlock25 = SecureBuffer<HEADER_LEN>;

pub type Passphrase = SecureBytes;
