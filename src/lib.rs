// src/lib.rs

//! Block encryption layer for lrzip-compatible archives.
//!
//! A [`Session`] stretches the passphrase once into a GlobalHash. Each block
//! then gets its own AES-128 key and IV, derived from the GlobalHash, the
//! block's salt and the passphrase. Payloads and their 25-byte headers are
//! encrypted with CBC plus the legacy ciphertext-stealing tail, so ciphertext
//! is exactly as long as plaintext.
//!
//! ```
//! use lrzcrypt_rs::aliases::Salt16;
//! use lrzcrypt_rs::header::BlockHeader;
//! use lrzcrypt_rs::{Direction, Session};
//!
//! let session = Session::new("hunter2", 1_000)?;
//! let salt = Salt16::new([0x5a; 16]);
//!
//! let header = BlockHeader { c_type: 3, c_len: 30, u_len: 100, last_head: 0 };
//! let record = session.seal_header(&header, &salt)?;
//! assert_eq!(session.open_header(&record, Direction::Decrypt)?, header);
//! # Ok::<(), lrzcrypt_rs::LrzCryptError>(())
//! ```

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod block;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod header;
pub mod loops;
pub mod session;
pub mod utils;

// High-level API
pub use block::{pad_payload, transform_block, Direction};
pub use builders::SessionBuilder;
pub use error::LrzCryptError;
pub use header::{protect_header, BlockHeader, EncryptedHeader};
pub use loops::LoopCount;
pub use session::Session;

// Low-level pieces for custom flows
pub use crypto::cts::LegacyCbcCts;
pub use crypto::kdf::keygen::{derive_block_keys, BlockKeys};
pub use crypto::kdf::stretch::stretch_passphrase;
pub use crypto::rng::SecureRandomExt;

#[cfg(feature = "batch-ops")]
pub use batch_ops::transform_blocks;
