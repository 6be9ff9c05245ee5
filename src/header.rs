//! # Block Headers
//!
//! Every compressed block is preceded by a header carrying its compression
//! type, compressed and uncompressed lengths, and the offset of the previous
//! header in the stream. With encryption on, the header is stored as
//!
//! ```text
//! [salt: 16][encrypted header: 25]
//! ```
//!
//! where the plaintext header is
//!
//! ```text
//! type(1) | c_len(8, LE) | u_len(8, LE) | last_head(8, LE)
//! ```
//!
//! The header is encrypted under the same salt as the block it describes. At
//! 25 bytes it always takes the ciphertext-stealing path of the block cipher.

use std::io::{Read, Write};

use crate::aliases::{GlobalHash64, HeaderBlock25, Passphrase, Salt16};
use crate::block::{transform_block, Direction};
use crate::consts::{ENCRYPTED_HEADER_LEN, HEADER_LEN, SALT_LEN};
use crate::error::LrzCryptError;

/// The four header fields.
///
/// Between [`protect_header`] calls the same struct carries either plaintext
/// values or the ciphertext reinterpreted as integers; only the direction of
/// the last successful call tells which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct BlockHeader {
    /// Compression type tag.
    pub c_type: u8,
    /// Compressed (stored) length in bytes.
    pub c_len: u64,
    /// Uncompressed length in bytes.
    pub u_len: u64,
    /// Stream offset of the previous block header.
    pub last_head: u64,
}

impl BlockHeader {
    /// Pack into the fixed 25-byte layout.
    pub fn pack_into(&self, out: &mut [u8; HEADER_LEN]) {
        out[0] = self.c_type;
        out[1..9].copy_from_slice(&self.c_len.to_le_bytes());
        out[9..17].copy_from_slice(&self.u_len.to_le_bytes());
        out[17..25].copy_from_slice(&self.last_head.to_le_bytes());
    }

    /// Unpack from the fixed 25-byte layout.
    pub fn unpack(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            c_type: bytes[0],
            c_len: read_u64_le(&bytes[1..9]),
            u_len: read_u64_le(&bytes[9..17]),
            last_head: read_u64_le(&bytes[17..25]),
        }
    }
}

#[inline(always)]
fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

/// Encrypt or decrypt the four header fields in place.
///
/// The fields are packed into pinned scratch, transformed with the block's
/// salt, and unpacked back. `header` is only written after the transform
/// succeeds; on error it is left as it was and must not be trusted.
pub fn protect_header(
    header: &mut BlockHeader,
    salt: &Salt16,
    global_hash: &GlobalHash64,
    passphrase: &Passphrase,
    direction: Direction,
) -> Result<(), LrzCryptError> {
    let mut scratch = HeaderBlock25::zeroed();
    header.pack_into(scratch.expose_secret_mut());
    transform_block(
        scratch.expose_secret_mut(),
        salt,
        global_hash,
        passphrase,
        direction,
    )?;
    *header = BlockHeader::unpack(scratch.expose_secret());
    Ok(())
}

/// On-disk encrypted header record: the block salt followed by the 25
/// encrypted header bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedHeader {
    salt: [u8; SALT_LEN],
    body: [u8; HEADER_LEN],
}

impl EncryptedHeader {
    /// Encrypt `header` under `salt`.
    pub fn seal(
        header: &BlockHeader,
        salt: &Salt16,
        global_hash: &GlobalHash64,
        passphrase: &Passphrase,
    ) -> Result<Self, LrzCryptError> {
        let mut sealed = *header;
        protect_header(
            &mut sealed,
            salt,
            global_hash,
            passphrase,
            Direction::Encrypt,
        )?;
        let mut body = [0u8; HEADER_LEN];
        sealed.pack_into(&mut body);
        Ok(Self {
            salt: *salt.expose_secret(),
            body,
        })
    }

    /// Decrypt the record with its own salt. `direction` must be
    /// [`Direction::Decrypt`] or [`Direction::Validate`].
    pub fn open(
        &self,
        global_hash: &GlobalHash64,
        passphrase: &Passphrase,
        direction: Direction,
    ) -> Result<BlockHeader, LrzCryptError> {
        if direction == Direction::Encrypt {
            return Err(LrzCryptError::Header(
                "cannot open an encrypted header with Direction::Encrypt".into(),
            ));
        }
        let mut header = BlockHeader::unpack(&self.body);
        protect_header(
            &mut header,
            &self.salt(),
            global_hash,
            passphrase,
            direction,
        )?;
        Ok(header)
    }

    /// Parse a record from exactly [`ENCRYPTED_HEADER_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LrzCryptError> {
        if bytes.len() != ENCRYPTED_HEADER_LEN {
            return Err(LrzCryptError::InvalidLength {
                expected: ENCRYPTED_HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let mut salt = [0u8; SALT_LEN];
        let mut body = [0u8; HEADER_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);
        body.copy_from_slice(&bytes[SALT_LEN..]);
        Ok(Self { salt, body })
    }

    pub fn to_bytes(&self) -> [u8; ENCRYPTED_HEADER_LEN] {
        let mut out = [0u8; ENCRYPTED_HEADER_LEN];
        out[..SALT_LEN].copy_from_slice(&self.salt);
        out[SALT_LEN..].copy_from_slice(&self.body);
        out
    }

    /// Read one record from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, LrzCryptError> {
        let mut bytes = [0u8; ENCRYPTED_HEADER_LEN];
        reader.read_exact(&mut bytes).map_err(LrzCryptError::Io)?;
        Self::from_bytes(&bytes)
    }

    /// Write the record to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), LrzCryptError> {
        writer.write_all(&self.to_bytes()).map_err(LrzCryptError::Io)
    }

    /// The block salt stored in clear at the front of the record.
    pub fn salt(&self) -> Salt16 {
        Salt16::new(self.salt)
    }

    /// The encrypted header bytes.
    pub fn body(&self) -> &[u8; HEADER_LEN] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_layout_is_little_endian() {
        let header = BlockHeader {
            c_type: 3,
            c_len: 0x0102,
            u_len: 0x0a0b0c,
            last_head: u64::MAX,
        };
        let mut bytes = [0u8; HEADER_LEN];
        header.pack_into(&mut bytes);
        assert_eq!(
            hex::encode(bytes),
            "03\
             0201000000000000\
             0c0b0a0000000000\
             ffffffffffffffff"
        );
        assert_eq!(BlockHeader::unpack(&bytes), header);
    }

    #[test]
    fn record_bytes_roundtrip() {
        let mut raw = [0u8; ENCRYPTED_HEADER_LEN];
        for (i, b) in raw.iter_mut().enumerate() {
            *b = i as u8;
        }
        let record = EncryptedHeader::from_bytes(&raw).unwrap();
        assert_eq!(record.salt().expose_secret(), &raw[..SALT_LEN]);
        assert_eq!(&record.body()[..], &raw[SALT_LEN..]);
        assert_eq!(record.to_bytes(), raw);
    }

    #[test]
    fn wrong_record_length() {
        let err = EncryptedHeader::from_bytes(&[0u8; 40]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid length: expected 41 bytes, got 40"
        );
    }
}
