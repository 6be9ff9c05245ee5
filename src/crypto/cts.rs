//! src/crypto/cts.rs
//! AES-128-CBC with the legacy ciphertext-stealing tail used by lrzip archives.
//!
//! Layout for a buffer of `len = N + M` bytes (`N` a multiple of 16, `0 < M < 16`):
//!
//! ```text
//! plaintext   P_1 .. P_{n-1} | tail (M bytes)
//! ciphertext  C_1 .. C_{n-2} | T | C_{n-1}[..M]
//!
//!   C_i = AES(P_i ^ C_{i-1})            ordinary CBC, C_0 = IV
//!   T   = AES(pad0(tail) ^ C_{n-1})     zero-padded tail, chained on C_{n-1}
//! ```
//!
//! This is not textbook CS3: the tail block goes in front and the truncated
//! last full block goes at the end. Archives written by earlier tools use this
//! layout, so it is reproduced bit for bit.
//!
//! A buffer shorter than one block has nothing to steal from; it is XORed with
//! `AES(IV)` instead. Archive writers never produce such buffers (payloads are
//! padded to one block first), so that path only exists so every non-empty
//! length round-trips.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128Dec, Aes128Enc, Block as AesBlock};

use crate::aliases::Block16;
use crate::consts::{AES_KEY_LEN, CBC_LEN};
use crate::error::LrzCryptError;
use crate::utils::{split_blocks, xor_block_in_place};

/// CBC-encrypt `data` in place, continuing from `chain`.
///
/// On return `chain` holds the last ciphertext block, so a following call
/// continues the same CBC stream.
#[inline]
pub fn cbc_encrypt(
    cipher: &Aes128Enc,
    chain: &mut Block16,
    data: &mut [u8],
) -> Result<(), LrzCryptError> {
    if data.len() % CBC_LEN != 0 {
        return Err(LrzCryptError::Transform(format!(
            "CBC input of {} bytes is not block aligned",
            data.len()
        )));
    }
    for block in data.chunks_exact_mut(CBC_LEN) {
        xor_block_in_place(block, chain.expose_secret());
        cipher.encrypt_block(AesBlock::from_mut_slice(block));
        chain.expose_secret_mut().copy_from_slice(block);
    }
    Ok(())
}

/// CBC-decrypt `data` in place, continuing from `chain`.
#[inline]
pub fn cbc_decrypt(
    cipher: &Aes128Dec,
    chain: &mut Block16,
    data: &mut [u8],
) -> Result<(), LrzCryptError> {
    if data.len() % CBC_LEN != 0 {
        return Err(LrzCryptError::Transform(format!(
            "CBC input of {} bytes is not block aligned",
            data.len()
        )));
    }
    let mut next_chain = Block16::new([0u8; CBC_LEN]);
    for block in data.chunks_exact_mut(CBC_LEN) {
        next_chain.expose_secret_mut().copy_from_slice(block);
        cipher.decrypt_block(AesBlock::from_mut_slice(block));
        xor_block_in_place(block, chain.expose_secret());
        chain
            .expose_secret_mut()
            .copy_from_slice(next_chain.expose_secret());
    }
    Ok(())
}

/// Keyed AES-128 pair running the legacy CBC + ciphertext-stealing framing.
pub struct LegacyCbcCts {
    enc: Aes128Enc,
    dec: Aes128Dec,
}

impl LegacyCbcCts {
    /// Key the cipher. `key` must be exactly [`AES_KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, LrzCryptError> {
        if key.len() != AES_KEY_LEN {
            return Err(LrzCryptError::KeySetup(format!(
                "AES key must be {AES_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let enc = Aes128Enc::new_from_slice(key)
            .map_err(|e| LrzCryptError::KeySetup(format!("AES encrypt key: {e}")))?;
        let dec = Aes128Dec::new_from_slice(key)
            .map_err(|e| LrzCryptError::KeySetup(format!("AES decrypt key: {e}")))?;
        Ok(Self { enc, dec })
    }

    /// Encrypt `buf` in place. Output length equals input length.
    pub fn encrypt(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), LrzCryptError> {
        let mut chain = chain_from_iv(iv)?;
        let (full, tail) = split_blocks(buf.len());

        if full == 0 {
            return self.short_keystream(&chain, buf);
        }

        cbc_encrypt(&self.enc, &mut chain, &mut buf[..full])?;
        if tail == 0 {
            return Ok(());
        }

        // T = AES(pad0(tail) ^ C_{n-1}); chain already holds C_{n-1}
        let mut stolen = Block16::new([0u8; CBC_LEN]);
        stolen.expose_secret_mut()[..tail].copy_from_slice(&buf[full..]);
        cbc_encrypt(&self.enc, &mut chain, stolen.expose_secret_mut())?;

        let last = full - CBC_LEN;
        buf.copy_within(last..last + tail, full);
        buf[last..full].copy_from_slice(stolen.expose_secret());
        Ok(())
    }

    /// Decrypt `buf` in place, undoing [`LegacyCbcCts::encrypt`].
    pub fn decrypt(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), LrzCryptError> {
        let mut chain = chain_from_iv(iv)?;
        let (full, tail) = split_blocks(buf.len());

        if full == 0 {
            return self.short_keystream(&chain, buf);
        }
        if tail == 0 {
            return cbc_decrypt(&self.dec, &mut chain, buf);
        }

        let last = full - CBC_LEN;
        cbc_decrypt(&self.dec, &mut chain, &mut buf[..last])?;

        // ECB-decrypt T: pad0(tail) ^ C_{n-1}
        let mut recovered = Block16::new([0u8; CBC_LEN]);
        recovered
            .expose_secret_mut()
            .copy_from_slice(&buf[last..full]);
        self.dec
            .decrypt_block(AesBlock::from_mut_slice(recovered.expose_secret_mut()));

        // XOR with the stolen C_{n-1}[..M]: first M bytes give the tail,
        // the rest is C_{n-1}[M..] because the tail was zero padded
        let mut rebuilt = Block16::new([0u8; CBC_LEN]);
        rebuilt.expose_secret_mut()[..tail].copy_from_slice(&buf[full..]);
        xor_block_in_place(recovered.expose_secret_mut(), rebuilt.expose_secret());
        buf[full..].copy_from_slice(&recovered.expose_secret()[..tail]);

        rebuilt.expose_secret_mut()[tail..].copy_from_slice(&recovered.expose_secret()[tail..]);
        cbc_decrypt(&self.dec, &mut chain, rebuilt.expose_secret_mut())?;
        buf[last..full].copy_from_slice(rebuilt.expose_secret());
        Ok(())
    }

    /// Sub-block buffers: XOR with the leading bytes of `AES(IV)`.
    fn short_keystream(&self, iv: &Block16, buf: &mut [u8]) -> Result<(), LrzCryptError> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut keystream = Block16::new(*iv.expose_secret());
        self.enc
            .encrypt_block(AesBlock::from_mut_slice(keystream.expose_secret_mut()));
        for (byte, k) in buf.iter_mut().zip(keystream.expose_secret()) {
            *byte ^= k;
        }
        Ok(())
    }
}

fn chain_from_iv(iv: &[u8]) -> Result<Block16, LrzCryptError> {
    if iv.len() != CBC_LEN {
        return Err(LrzCryptError::KeySetup(format!(
            "CBC IV must be {CBC_LEN} bytes, got {}",
            iv.len()
        )));
    }
    let mut chain = Block16::new([0u8; CBC_LEN]);
    chain.expose_secret_mut().copy_from_slice(iv);
    Ok(chain)
}
