//! Output file writing

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory, relative to the parent of the working directory, for output files
pub const ARTIFACTS_DIR: &str = "artifacts";

/// File name of the persisted scrape result
pub const OUTPUT_FILE_NAME: &str = "books_data.txt";

/// Resolves the default output location `../artifacts/books_data.txt`
///
/// The path is relative to the parent of the current working directory. When
/// the working directory is a filesystem root it is used directly.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute path of the output file
/// * `Err(io::Error)` - The working directory could not be read
pub fn default_output_path() -> io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let base = cwd.parent().unwrap_or(&cwd);
    Ok(base.join(ARTIFACTS_DIR).join(OUTPUT_FILE_NAME))
}

/// Writes the output text as UTF-8, creating missing parent directories
///
/// An existing file is overwritten.
pub fn write_output(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content.as_bytes())
}
