//! SHA-1 digests of archives.
//!
//! Minecraft servers advertise a resource pack together with the SHA-1 of
//! the archive so clients can cache it.

use sha1::{Digest, Sha1};
use std::fmt::Write;

/// Lowercase hex SHA-1 of `data`.
pub fn sha1_hex(data: &[u8]) -> String {
    let digest = Sha1::digest(data);
    digest
        .iter()
        .fold(String::with_capacity(40), |mut hex, byte| {
            let _ = write!(hex, "{:02x}", byte);
            hex
        })
}
