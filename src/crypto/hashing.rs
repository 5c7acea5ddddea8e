//! Gatekeeper password hashing.
//!
//! The stored hash is an Argon2id PHC string (`$argon2id$v=19$m=...`),
//! which carries its own random salt and cost parameters. Hashing the
//! same passphrase twice yields two different strings that both verify.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;

use super::kdf::Argon2Params;
use crate::errors::{LockboxError, Result};

/// Number of random salt bytes embedded in each PHC string.
const HASH_SALT_LEN: usize = 16;

/// Hash `passphrase` into a PHC string, returned as raw bytes for storage.
pub fn hash(passphrase: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let mut salt_bytes = [0u8; HASH_SALT_LEN];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| LockboxError::HashingFailed(format!("salt encoding: {e}")))?;

    let argon2 = params
        .argon2()
        .map_err(|e| LockboxError::HashingFailed(e.to_string()))?;
    let phc = argon2
        .hash_password(passphrase, &salt)
        .map_err(|e| LockboxError::HashingFailed(e.to_string()))?;

    Ok(phc.to_string().into_bytes())
}

/// Check `passphrase` against a stored PHC string.
///
/// The comparison inside `argon2` is constant-time. A hash that cannot be
/// parsed at all means the stored artifact is damaged, which is reported
/// as corruption rather than as a wrong passphrase.
pub fn verify(stored: &[u8], passphrase: &[u8]) -> Result<()> {
    let parsed = parse(stored)?;

    // Cost parameters are read back from the PHC string itself.
    match Argon2::default().verify_password(passphrase, &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(LockboxError::PassphraseRejected),
        Err(e) => Err(LockboxError::Corrupted(format!(
            "password hash cannot be verified: {e}"
        ))),
    }
}

/// Recover the Argon2 cost parameters a stored hash was made with.
///
/// The vault derives its passphrase key with the same cost, so changing
/// the configured parameters later never locks an existing vault out.
pub fn params_of(stored: &[u8]) -> Result<Argon2Params> {
    let parsed = parse(stored)?;
    let params = argon2::Params::try_from(&parsed)
        .map_err(|e| LockboxError::Corrupted(format!("password hash parameters: {e}")))?;

    Ok(Argon2Params {
        memory_kib: params.m_cost(),
        iterations: params.t_cost(),
        parallelism: params.p_cost(),
    })
}

fn parse(stored: &[u8]) -> Result<PasswordHash<'_>> {
    let phc = std::str::from_utf8(stored)
        .map_err(|_| LockboxError::Corrupted("password hash is not valid UTF-8".into()))?;
    PasswordHash::new(phc)
        .map_err(|e| LockboxError::Corrupted(format!("unreadable password hash: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn hash_is_a_phc_string() {
        let stored = hash(b"correct horse", &FAST).unwrap();
        let text = String::from_utf8(stored).unwrap();
        assert!(text.starts_with("$argon2id$"));
        assert!(text.contains("m=8192,t=1,p=1"));
    }

    #[test]
    fn verify_accepts_the_right_passphrase() {
        let stored = hash(b"correct horse", &FAST).unwrap();
        verify(&stored, b"correct horse").unwrap();
    }

    #[test]
    fn verify_rejects_a_wrong_passphrase() {
        let stored = hash(b"correct horse", &FAST).unwrap();
        let err = verify(&stored, b"battery staple").unwrap_err();
        assert!(matches!(err, LockboxError::PassphraseRejected));
    }

    #[test]
    fn rehashing_differs_but_both_verify() {
        let a = hash(b"pw", &FAST).unwrap();
        let b = hash(b"pw", &FAST).unwrap();
        assert_ne!(a, b);
        verify(&a, b"pw").unwrap();
        verify(&b, b"pw").unwrap();
    }

    #[test]
    fn garbage_hash_is_corruption() {
        let err = verify(b"not a phc string", b"pw").unwrap_err();
        assert!(matches!(err, LockboxError::Corrupted(_)));

        let err = verify(&[0xff, 0xfe], b"pw").unwrap_err();
        assert!(matches!(err, LockboxError::Corrupted(_)));
    }

    #[test]
    fn params_round_trip_through_the_hash() {
        let stored = hash(b"pw", &FAST).unwrap();
        assert_eq!(params_of(&stored).unwrap(), FAST);
    }

    #[test]
    fn weak_params_are_a_hashing_error() {
        let weak = Argon2Params {
            memory_kib: 8,
            ..FAST
        };
        let err = hash(b"pw", &weak).unwrap_err();
        assert!(matches!(err, LockboxError::HashingFailed(_)));
    }
}
