//! src/crypto/kdf/keygen.rs
//! Per-block key/IV derivation: two chained SHA-512 passes over pinned scratch.

use sha2::digest::Output;
use sha2::{Digest, Sha512};

use crate::aliases::{DerivedIv64, DerivedKey64, GlobalHash64, KeygenScratch, Passphrase, Salt16};
use crate::consts::{AES_KEY_LEN, CBC_LEN, HASH_LEN, KEYGEN_SCRATCH_LEN, PASS_LEN, SALT_LEN};
use crate::error::LrzCryptError;

/// Key material for exactly one block operation.
///
/// Both halves are pinned and wiped on drop; holding a `BlockKeys` past the
/// transform it was derived for widens the exposure window for no benefit.
#[derive(Debug)]
pub struct BlockKeys {
    key: DerivedKey64,
    iv: DerivedIv64,
}

impl BlockKeys {
    /// Full 64-byte derived key.
    pub fn key(&self) -> &[u8; HASH_LEN] {
        self.key.expose_secret()
    }

    /// Full 64-byte derived IV.
    pub fn iv(&self) -> &[u8; HASH_LEN] {
        self.iv.expose_secret()
    }

    /// The AES-128 key actually used by the block cipher.
    pub fn cipher_key(&self) -> &[u8] {
        &self.key.expose_secret()[..AES_KEY_LEN]
    }

    /// The CBC IV actually used by the block cipher.
    pub fn cipher_iv(&self) -> &[u8] {
        &self.iv.expose_secret()[..CBC_LEN]
    }
}

/// Derive a block's (key, IV) from the GlobalHash, the block salt and the passphrase.
///
/// 1. `SHA-512(global_hash || salt || passphrase)` → key
/// 2. `SHA-512(key || salt || passphrase)` → IV
///
/// Allocates its own pinned scratch, wiped before return. The `Sha512`
/// context itself lives on the stack and cannot be zeroized with `sha2` 0.10;
/// its leftover input buffer may still hold salt and passphrase bytes.
pub fn derive_block_keys(
    global_hash: &GlobalHash64,
    salt: &Salt16,
    passphrase: &Passphrase,
) -> Result<BlockKeys, LrzCryptError> {
    let mut scratch = KeygenScratch::zeroed();
    derive_block_keys_with_scratch(&mut scratch, global_hash, salt, passphrase)
}

/// Same as [`derive_block_keys`], using caller-owned scratch.
///
/// `scratch` is all zeros when this returns, whether derivation succeeded or not.
pub fn derive_block_keys_with_scratch(
    scratch: &mut KeygenScratch,
    global_hash: &GlobalHash64,
    salt: &Salt16,
    passphrase: &Passphrase,
) -> Result<BlockKeys, LrzCryptError> {
    let mut scratch = scratch.wipe_on_drop();

    let pass = passphrase.expose_secret();
    if pass.len() > PASS_LEN {
        return Err(LrzCryptError::KeySetup(format!(
            "passphrase of {} bytes exceeds the {PASS_LEN}-byte derivation limit",
            pass.len()
        )));
    }
    let used = HASH_LEN + SALT_LEN + pass.len();

    let mut keys = BlockKeys {
        key: DerivedKey64::zeroed(),
        iv: DerivedIv64::zeroed(),
    };
    let mut hasher = Sha512::new();

    fill_scratch(
        scratch.expose_secret_mut(),
        global_hash.expose_secret(),
        salt.expose_secret(),
        pass,
    );
    hasher.update(&scratch.expose_secret()[..used]);
    hasher.finalize_into_reset(Output::<Sha512>::from_mut_slice(
        keys.key.expose_secret_mut(),
    ));

    fill_scratch(
        scratch.expose_secret_mut(),
        keys.key.expose_secret(),
        salt.expose_secret(),
        pass,
    );
    hasher.update(&scratch.expose_secret()[..used]);
    hasher.finalize_into_reset(Output::<Sha512>::from_mut_slice(
        keys.iv.expose_secret_mut(),
    ));

    Ok(keys)
}

#[inline(always)]
fn fill_scratch(
    scratch: &mut [u8; KEYGEN_SCRATCH_LEN],
    hash: &[u8; HASH_LEN],
    salt: &[u8; SALT_LEN],
    pass: &[u8],
) {
    scratch[..HASH_LEN].copy_from_slice(hash);
    scratch[HASH_LEN..HASH_LEN + SALT_LEN].copy_from_slice(salt);
    scratch[HASH_LEN + SALT_LEN..HASH_LEN + SALT_LEN + pass.len()].copy_from_slice(pass);
}
