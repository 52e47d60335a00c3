//! Hashing seam for passwords and timed tokens.

use std::sync::Arc;

use wardflow_core::DomainResult;

/// One-way hashing capability.
///
/// All password and token comparisons go through this trait; the domain never
/// stores or compares plaintext. The production implementation lives in the
/// infra crate.
pub trait Hasher: Send + Sync {
    /// Hash a plaintext secret.
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    /// Check a plaintext secret against a stored hash.
    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool>;
}

impl<H> Hasher for Arc<H>
where
    H: Hasher + ?Sized,
{
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        (**self).hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        (**self).verify(plaintext, hash)
    }
}
