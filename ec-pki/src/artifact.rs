//! PEM artifact encoding and persistence.

use std::path::Path;

use fs_err as fs;
use pem::{EncodeConfig, LineEnding, Pem};

use crate::error::Result;

/// PEM type label for SEC1 EC private keys.
pub const EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";
/// PEM type label for SubjectPublicKeyInfo public keys.
pub const EC_PUBLIC_KEY: &str = "EC PUBLIC KEY";
/// PEM type label for X.509 certificates.
pub const CERTIFICATE: &str = "CERTIFICATE";

/// Wrap DER bytes in a PEM envelope carrying the given type label.
///
/// Output is deterministic: LF line endings and a 64-column body wrap.
pub fn encode(label: &str, der: &[u8]) -> String {
    let block = Pem::new(label, der);
    pem::encode_config(
        &block,
        EncodeConfig::new()
            .set_line_ending(LineEnding::LF)
            .set_line_wrap(64),
    )
}

/// Encode DER bytes and write the envelope to `path`.
///
/// The file handle is dropped on every exit path; an existing file is
/// truncated in place.
pub fn write_pem(path: impl AsRef<Path>, label: &str, der: &[u8]) -> Result<()> {
    fs::write(path.as_ref(), encode(label, der))?;
    Ok(())
}
