//! tests/common.rs
//! Common constants and helpers shared across test files

use lrzcrypt_rs::aliases::Salt16;
use lrzcrypt_rs::Session;

/// Small loop count to keep stretching fast - performance testing is in benches/
#[allow(dead_code)] // Used across multiple test files
pub const TEST_LOOPS: u64 = 256;

/// Standard test passphrase used across test files
#[allow(dead_code)] // Used across multiple test files
pub const TEST_PASSPHRASE: &str = "Hello";

/// Archive salt prefix used where a salted passphrase is exercised
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ARCHIVE_SALT: [u8; 8] = [0x0c, 0xf4, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

#[allow(dead_code)] // Used across multiple test files
pub fn test_session() -> Session {
    Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap()
}

/// Deterministic salt derived from a small index
#[allow(dead_code)] // Used across multiple test files
pub fn salt(n: u8) -> Salt16 {
    let mut bytes = [0u8; 16];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = n.wrapping_mul(31).wrapping_add(i as u8);
    }
    Salt16::new(bytes)
}

/// Deterministic, non-repeating payload of `len` bytes
#[allow(dead_code)] // Used across multiple test files
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 13 + 7) as u8).collect()
}
