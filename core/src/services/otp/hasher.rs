//! One-way hashing and constant-time comparison of codes

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

use crate::domain::value_objects::CodeDigest;

pub struct CodeHasher;

impl CodeHasher {
    /// SHA-256 of the code digits
    pub fn hash(code: &str) -> CodeDigest {
        let digest = Sha256::digest(code.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        CodeDigest::from_bytes(bytes)
    }

    /// Compare two digests without short-circuiting on the first difference
    pub fn compare(candidate: &CodeDigest, stored: &CodeDigest) -> bool {
        constant_time_eq(candidate.as_bytes(), stored.as_bytes())
    }
}
