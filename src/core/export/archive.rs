//! Zip archive output
//!
//! Each export produces `<file_name>.zip` holding a single `<file_name>.csv`
//! entry, deflated at the highest level.

use crate::domain::context::ResultExt;
use crate::domain::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes `contents` as `<file_name>.csv` inside `<output_dir>/<file_name>.zip`
///
/// The output directory is created if needed and an existing archive is
/// replaced.
///
/// # Errors
///
/// Returns an error if the directory or archive cannot be written.
pub fn write_archive(output_dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let path = output_dir.join(format!("{file_name}.zip"));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create archive {}", path.display()))?;

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut zip = ZipWriter::new(file);
    zip.start_file(format!("{file_name}.csv"), options)?;
    zip.write_all(contents)
        .with_context(|| format!("Failed to write archive {}", path.display()))?;
    zip.finish()?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Archive written");
    Ok(path)
}
