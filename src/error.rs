//! # Error Types
//!
//! Every operation in this crate returns [`Result<T, LrzCryptError>`](LrzCryptError).
//! Failures are local to a single block or header operation; nothing is retried
//! internally, and a buffer whose transform failed must be discarded.

use thiserror::Error;

/// The error type for all block-protection operations.
#[derive(Error, Debug)]
pub enum LrzCryptError {
    /// I/O error while reading or writing an on-disk header record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A primitive (hash, cipher, OS randomness) could not be initialized.
    #[error("Primitive unavailable: {0}")]
    PrimitiveUnavailable(String),

    /// Key or IV configuration was rejected.
    ///
    /// Raised for wrong key/IV lengths and for passphrases too long to fit the
    /// derivation scratch buffer.
    #[error("Key setup error: {0}")]
    KeySetup(String),

    /// The encrypt/decrypt step itself failed.
    ///
    /// The buffer being transformed is left in an undefined state.
    #[error("Transform error: {0}")]
    Transform(String),

    /// A fixed-size record had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Malformed block header record or loop-count encoding.
    #[error("Header error: {0}")]
    Header(String),

    /// Invalid session configuration.
    #[error("Config error: {0}")]
    Config(String),
}
