//! Value objects: normalized identifiers and code material.

pub mod code;
pub mod identifier;

#[cfg(test)]
mod tests;

pub use code::{CodeDigest, DeviceId, PlainCode};
pub use identifier::Identifier;
