//! # Loop Count Encoding
//!
//! Archives record the stretching work factor in two bytes: a shift `bits`
//! and an 8-bit `mantissa`, with `loops = mantissa << bits`. Encoding rounds
//! down to the nearest representable value.

use crate::consts::MAX_LOOP_BITS;
use crate::error::LrzCryptError;

/// Two-byte on-disk loop count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopCount {
    bits: u8,
    mantissa: u8,
}

impl LoopCount {
    /// Encode `loops`, dropping low bits until the mantissa fits in a byte.
    pub fn from_loops(loops: u64) -> Self {
        let mut mantissa = loops;
        let mut bits = 0u8;
        while mantissa > u64::from(u8::MAX) {
            mantissa >>= 1;
            bits += 1;
        }
        Self {
            bits,
            mantissa: mantissa as u8,
        }
    }

    /// Decode the stored `[bits, mantissa]` pair.
    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self, LrzCryptError> {
        let [bits, mantissa] = bytes;
        if bits > MAX_LOOP_BITS {
            return Err(LrzCryptError::Header(format!(
                "loop count shift {bits} exceeds {MAX_LOOP_BITS}"
            )));
        }
        Ok(Self { bits, mantissa })
    }

    pub const fn to_bytes(self) -> [u8; 2] {
        [self.bits, self.mantissa]
    }

    /// The decoded work factor.
    pub const fn loops(self) -> u64 {
        (self.mantissa as u64) << self.bits
    }

    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub const fn mantissa(self) -> u8 {
        self.mantissa
    }
}
