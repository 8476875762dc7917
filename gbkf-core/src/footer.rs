//! Trailing SHA-256 integrity footer.
//!
//! The footer is the digest of every byte that precedes it. Its presence is
//! not flagged anywhere in the buffer, so verification simply recomputes the
//! digest over all but the last 32 bytes and compares.

use sha2::{Digest, Sha256};
use strum::Display;

use crate::format::{FOOTER_SIZE, HEADER_SIZE};

/// Digest function used for the integrity footer.
pub trait DigestProvider: Send + Sync {
    /// Returns the 32-byte digest of `bytes`.
    fn digest(&self, bytes: &[u8]) -> [u8; FOOTER_SIZE];
}

/// SHA-256 digest backed by `sha2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestProvider for Sha256Digest {
    fn digest(&self, bytes: &[u8]) -> [u8; FOOTER_SIZE] {
        Sha256::digest(bytes).into()
    }
}

/// Outcome of checking the trailing digest of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FooterStatus {
    /// The last 32 bytes are the digest of everything before them.
    #[strum(serialize = "verified")]
    Verified,
    /// The buffer is long enough to carry a footer but its last 32 bytes are
    /// not the digest. Footerless buffers of at least header plus footer size
    /// land here too, since a footer's presence is not flagged.
    #[strum(serialize = "mismatch")]
    Mismatch,
    /// The buffer is shorter than header plus footer size.
    #[strum(serialize = "absent")]
    Absent,
}

impl FooterStatus {
    /// Whether the footer matched.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Computes the footer for `bytes` with `provider`.
#[must_use]
pub fn compute_with(provider: &dyn DigestProvider, bytes: &[u8]) -> [u8; FOOTER_SIZE] {
    provider.digest(bytes)
}

/// Computes the SHA-256 footer for `bytes`.
#[must_use]
pub fn compute(bytes: &[u8]) -> [u8; FOOTER_SIZE] {
    compute_with(&Sha256Digest, bytes)
}

/// Checks the trailing digest of `bytes` with `provider`.
#[must_use]
pub fn status_with(provider: &dyn DigestProvider, bytes: &[u8]) -> FooterStatus {
    if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
        return FooterStatus::Absent;
    }
    let (body, stored) = bytes.split_at(bytes.len() - FOOTER_SIZE);
    if provider.digest(body).as_slice() == stored {
        FooterStatus::Verified
    } else {
        FooterStatus::Mismatch
    }
}

/// Checks the trailing SHA-256 digest of `bytes`.
#[must_use]
pub fn status(bytes: &[u8]) -> FooterStatus {
    status_with(&Sha256Digest, bytes)
}

/// Whether `bytes` ends with a matching SHA-256 footer.
#[must_use]
pub fn verify(bytes: &[u8]) -> bool {
    status(bytes).is_verified()
}
