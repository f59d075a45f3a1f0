//! Random secret generation.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// 48 bytes encode to 64 base64 characters, well above the 32 the servers
/// require.
pub const DEFAULT_BYTES: usize = 48;

/// A base64 string of `bytes` random bytes.
#[must_use]
pub fn generate(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes.max(DEFAULT_BYTES / 2)];
    rand::rng().fill_bytes(&mut buf);
    STANDARD.encode(buf)
}

/// Write a fresh secret to stdout so it can be piped into an env file.
#[allow(clippy::print_stdout)]
pub fn print(bytes: usize) {
    println!("{}", generate(bytes));
}
