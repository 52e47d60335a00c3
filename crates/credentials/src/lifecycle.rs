//! Credential lifecycle operations.
//!
//! # Invariants
//! - Expiry is checked strictly before the secret comparison: an
//!   expired-but-correct token reports expiry, not success.
//! - Rotating the system-generated password is one-way; once rotated, the
//!   original credential can never be replayed.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use wardflow_core::{DomainError, DomainResult};

use crate::hasher::Hasher;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const TOKEN_DIGITS: usize = 6;

/// Policy knobs for issued credentials, injected at construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CredentialPolicy {
    /// Length of system-generated passwords.
    pub system_password_len: usize,

    /// Validity window for timed tokens.
    pub token_ttl: Duration,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            system_password_len: 10,
            token_ttl: Duration::hours(24),
        }
    }
}

/// A freshly issued secret: the plaintext goes out-of-band (mail), the hash
/// is what gets persisted.
#[derive(Debug, Clone)]
pub struct IssuedSecret {
    pub plaintext: String,
    pub hash: String,
}

/// A timed token: 6 decimal digits with an expiry instant.
#[derive(Debug, Clone)]
pub struct TimedToken {
    pub plaintext: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialPolicy {
    /// Generate a random alphanumeric system password and its hash.
    pub fn issue_system_password<H>(&self, hasher: &H) -> DomainResult<IssuedSecret>
    where
        H: Hasher + ?Sized,
    {
        let mut rng = rand::thread_rng();
        let plaintext: String = (0..self.system_password_len)
            .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
            .collect();
        let hash = hasher.hash(&plaintext)?;
        Ok(IssuedSecret { plaintext, hash })
    }

    /// Generate a 6-digit token (leading zeros allowed), its hash, and the
    /// expiry instant `now + ttl`.
    pub fn issue_timed_token<H>(&self, hasher: &H, now: DateTime<Utc>) -> DomainResult<TimedToken>
    where
        H: Hasher + ?Sized,
    {
        let mut rng = rand::thread_rng();
        let plaintext: String = (0..TOKEN_DIGITS)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        let hash = hasher.hash(&plaintext)?;
        Ok(TimedToken {
            plaintext,
            hash,
            expires_at: now + self.token_ttl,
        })
    }
}

/// Check a supplied token against the stored hash/expiry pair.
///
/// On success the caller must clear both stored fields in the same update,
/// so a consumed token is never left dangling.
pub fn consume_timed_token<H>(
    hasher: &H,
    stored_hash: Option<&str>,
    stored_expiry: Option<DateTime<Utc>>,
    supplied: &str,
    now: DateTime<Utc>,
) -> DomainResult<()>
where
    H: Hasher + ?Sized,
{
    // Expiry first: an expired-but-correct token must report expiry.
    if let Some(expiry) = stored_expiry {
        if now > expiry {
            return Err(DomainError::rule("token has expired"));
        }
    }

    let Some(hash) = stored_hash else {
        return Err(DomainError::rule("invalid token"));
    };
    if stored_expiry.is_none() {
        // Hash without expiry means the pair invariant was broken upstream.
        return Err(DomainError::rule("invalid token"));
    }

    if !hasher.verify(supplied, hash)? {
        return Err(DomainError::rule("invalid token"));
    }

    Ok(())
}

/// Verify the original system-issued password and produce the replacement
/// hash.
///
/// Fails if the one-way rotation already happened or the old password does
/// not match. The caller applies the returned hash together with the
/// verified/active/rotated flag flips in a single store update.
pub fn verify_and_rotate<H>(
    hasher: &H,
    already_rotated: bool,
    stored_hash: &str,
    old_password: &str,
    new_password: &str,
) -> DomainResult<String>
where
    H: Hasher + ?Sized,
{
    if already_rotated {
        return Err(DomainError::rule(
            "system generated password has been changed already",
        ));
    }

    if !hasher.verify(old_password, stored_hash)? {
        return Err(DomainError::rule("old password is invalid"));
    }

    hasher.hash(new_password)
}

/// Explicit password-set path: hash and return the value to persist.
///
/// Generic field updates never rehash; this is the only way a stored
/// password hash changes outside of rotation.
pub fn set_password<H>(hasher: &H, new_password: &str) -> DomainResult<String>
where
    H: Hasher + ?Sized,
{
    hasher.hash(new_password)
}
