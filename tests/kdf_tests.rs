//! tests/kdf_tests.rs
//! Passphrase stretching and per-block key derivation

mod common;

use common::{salt, TEST_LOOPS, TEST_PASSPHRASE};
use lrzcrypt_rs::aliases::{GlobalHash64, KeygenScratch, Passphrase};
use lrzcrypt_rs::consts::{HASH_LEN, KEYGEN_SCRATCH_LEN};
use lrzcrypt_rs::crypto::kdf::keygen::derive_block_keys_with_scratch;
use lrzcrypt_rs::crypto::kdf::stretch::stretch_rounds;
use lrzcrypt_rs::{derive_block_keys, stretch_passphrase, Session};
use sha2::{Digest, Sha512};

/// Straight-line rendition of the stretch loop, for comparison
fn reference_stretch(pass: &[u8], loops: u64) -> Vec<u8> {
    let rounds = loops * 64 / (pass.len() as u64 + 8);
    let mut hasher = Sha512::new();
    for j in 0..rounds {
        hasher.update(j.to_le_bytes());
        hasher.update(pass);
    }
    hasher.finalize().to_vec()
}

#[test]
fn stretch_matches_reference_loop() {
    let cases: &[(&[u8], u64)] = &[
        (b"Hello", TEST_LOOPS),
        (b"", 16),
        (b"a much longer passphrase with spaces", 1_000),
        ("パスワード".as_bytes(), 50),
    ];
    for &(pass, loops) in cases {
        let hash = stretch_passphrase(&Passphrase::from_slice(pass), loops).unwrap();
        assert_eq!(
            &hash.expose_secret()[..],
            &reference_stretch(pass, loops)[..],
            "pass {pass:?} loops {loops}"
        );
    }
}

#[test]
fn stretch_is_deterministic_and_loop_sensitive() {
    let pass = Passphrase::from_slice(TEST_PASSPHRASE.as_bytes());
    let a = stretch_passphrase(&pass, TEST_LOOPS).unwrap();
    let b = stretch_passphrase(&pass, TEST_LOOPS).unwrap();
    let c = stretch_passphrase(&pass, TEST_LOOPS * 2).unwrap();
    assert_eq!(a.expose_secret(), b.expose_secret());
    assert_ne!(a.expose_secret(), c.expose_secret());
}

#[test]
fn stretch_rounds_scale_with_passphrase_length() {
    assert_eq!(stretch_rounds(5, 256).unwrap(), 256 * 64 / 13);
    assert!(stretch_rounds(100, 1_000).unwrap() < stretch_rounds(10, 1_000).unwrap());
}

#[test]
fn session_global_hash_is_the_stretched_digest() {
    let session = Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap();
    assert_eq!(
        &session.global_hash().expose_secret()[..],
        &reference_stretch(TEST_PASSPHRASE.as_bytes(), TEST_LOOPS)[..]
    );
    assert_eq!(session.loops(), TEST_LOOPS);
}

#[test]
fn archive_salt_changes_everything_downstream() {
    let plain = Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap();
    let salted = Session::builder()
        .with_passphrase(TEST_PASSPHRASE)
        .with_archive_salt(common::TEST_ARCHIVE_SALT)
        .with_loops(TEST_LOOPS)
        .build()
        .unwrap();

    let mut expected_pass = common::TEST_ARCHIVE_SALT.to_vec();
    expected_pass.extend_from_slice(TEST_PASSPHRASE.as_bytes());
    assert_eq!(salted.passphrase().expose_secret(), &expected_pass[..]);
    assert_eq!(
        &salted.global_hash().expose_secret()[..],
        &reference_stretch(&expected_pass, TEST_LOOPS)[..]
    );

    let a = plain.derive_block_keys(&salt(1)).unwrap();
    let b = salted.derive_block_keys(&salt(1)).unwrap();
    assert_ne!(a.key(), b.key());
}

#[test]
fn derivation_matches_two_sha512_passes() {
    let global_hash = GlobalHash64::new([0x42; HASH_LEN]);
    let pass = Passphrase::from_slice(b"passphrase");
    let salt = salt(3);

    let keys = derive_block_keys(&global_hash, &salt, &pass).unwrap();

    let mut first = Vec::new();
    first.extend_from_slice(&[0x42; HASH_LEN]);
    first.extend_from_slice(salt.expose_secret());
    first.extend_from_slice(b"passphrase");
    let key = Sha512::digest(&first);

    let mut second = Vec::new();
    second.extend_from_slice(&key);
    second.extend_from_slice(salt.expose_secret());
    second.extend_from_slice(b"passphrase");
    let iv = Sha512::digest(&second);

    assert_eq!(&keys.key()[..], &key[..]);
    assert_eq!(&keys.iv()[..], &iv[..]);
}

#[test]
fn derivation_is_deterministic() {
    let session = Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap();
    let a = session.derive_block_keys(&salt(7)).unwrap();
    let b = session.derive_block_keys(&salt(7)).unwrap();
    assert_eq!(a.key(), b.key());
    assert_eq!(a.iv(), b.iv());
}

#[test]
fn distinct_salts_give_independent_keys() {
    let session = Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap();
    let mut seen_keys = Vec::new();
    let mut seen_ivs = Vec::new();
    for n in 0..32u8 {
        let keys = session.derive_block_keys(&salt(n)).unwrap();
        assert_ne!(keys.key(), keys.iv(), "key and IV must differ");
        seen_keys.push(*keys.key());
        seen_ivs.push(*keys.iv());
    }
    for i in 0..seen_keys.len() {
        for j in i + 1..seen_keys.len() {
            assert_ne!(seen_keys[i], seen_keys[j], "salts {i} and {j} share a key");
            assert_ne!(seen_ivs[i], seen_ivs[j], "salts {i} and {j} share an IV");
        }
    }
}

#[test]
fn caller_scratch_is_zero_after_derivation() {
    let session = Session::new(TEST_PASSPHRASE, TEST_LOOPS).unwrap();
    let mut scratch = KeygenScratch::new([0xee; KEYGEN_SCRATCH_LEN]);

    let keys = derive_block_keys_with_scratch(
        &mut scratch,
        session.global_hash(),
        &salt(9),
        session.passphrase(),
    )
    .unwrap();

    assert!(scratch.expose_secret().iter().all(|&b| b == 0));
    assert_eq!(
        keys.key(),
        session.derive_block_keys(&salt(9)).unwrap().key()
    );
}
