//! Archive password derivation
//!
//! The input archive is encrypted with a password that is never stored
//! anywhere: it is derived deterministically from a secret keyword supplied
//! through the environment. The derivation is a one-way hash, so the
//! keyword itself never reaches the archive tooling.

use sha2::{Digest, Sha256};

use crate::error::{EtlError, Result};

/// Environment variable holding the secret keyword.
pub const KEYWORD_ENV_VAR: &str = "SNAPLINE_KEYWORD";

/// Derive the archive password from the `SNAPLINE_KEYWORD` environment
/// variable.
///
/// Returns [`EtlError::Config`] when the variable is absent or empty; this
/// is checked before any record is read so a misconfigured run fails fast.
pub fn derive_archive_password() -> Result<String> {
    let keyword = std::env::var(KEYWORD_ENV_VAR).map_err(|_| {
        EtlError::Config(format!("Env variable `{}` could not be found", KEYWORD_ENV_VAR))
    })?;

    if keyword.is_empty() {
        return Err(EtlError::Config(format!(
            "Env variable `{}` is set but empty",
            KEYWORD_ENV_VAR
        )));
    }

    Ok(derive_from_keyword(&keyword))
}

/// Lowercase hex SHA-256 of the keyword.
pub fn derive_from_keyword(keyword: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(keyword.as_bytes());
    hex::encode(hasher.finalize())
}
