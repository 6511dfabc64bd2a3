//! Encrypted input archive
//!
//! The batch arrives as a password-protected ZIP holding one
//! newline-delimited JSON entry. The whole entry is read up front; this is
//! a batch pipeline, not a streaming one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;
use zip::ZipArchive;

use snapline_common::{EtlError, Result};

/// Read all record lines from the named entry, decrypting with `password`.
///
/// Blank lines are skipped. Any open, lookup, or decryption failure is
/// fatal; there is no per-record recovery at this stage.
pub fn read_record_lines(archive_path: &Path, entry: &str, password: &str) -> Result<Vec<String>> {
    let file = File::open(archive_path).map_err(|e| {
        EtlError::Archive(format!("Failed to open {}: {}", archive_path.display(), e))
    })?;

    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| EtlError::Archive(format!("Not a readable archive: {e}")))?;

    let entry_file = archive
        .by_name_decrypt(entry, password.as_bytes())
        .map_err(|e| EtlError::Archive(format!("Entry `{entry}` unavailable: {e}")))?
        .map_err(|_| EtlError::Archive(format!("Wrong password for entry `{entry}`")))?;

    let reader = BufReader::new(entry_file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    info!(
        archive = %archive_path.display(),
        entry,
        lines = lines.len(),
        "Read record lines from archive"
    );
    Ok(lines)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;
    use zip::unstable::write::FileOptionsExt;
    use zip::write::FileOptions;

    /// Write a password-protected single-entry archive for fixtures.
    pub(crate) fn write_encrypted_archive(
        path: &Path,
        entry: &str,
        password: &str,
        content: &str,
    ) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .with_deprecated_encryption(password.as_bytes());
        writer.start_file(entry, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
}
