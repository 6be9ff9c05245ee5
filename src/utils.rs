// ============================================================================
// FILE: src/utils.rs
// ============================================================================

//! Utility functions used across the library.

use crate::consts::CBC_LEN;

/// XORs `src` into `dst`, one AES block wide.
///
/// Used by the CBC chaining and by the ciphertext-stealing tail recovery.
///
/// # Panics (by contract)
///
/// Panics if either slice is shorter than 16 bytes. Every caller passes an
/// exact `Block16` or a `chunks_exact(16)` item.
#[inline(always)]
pub fn xor_block_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst[..CBC_LEN].iter_mut().zip(&src[..CBC_LEN]) {
        *d ^= s;
    }
}

/// Splits a buffer length into `(full, tail)`: the whole-block prefix and the
/// trailing partial-block remainder.
#[inline(always)]
pub const fn split_blocks(len: usize) -> (usize, usize) {
    let tail = len % CBC_LEN;
    (len - tail, tail)
}
