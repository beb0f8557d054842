use super::DeliveryError;
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default report location, relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "LAST_REPORT.html";

/// Write the rendered report atomically, replacing any previous run's file.
///
/// A reader never observes a half-written report: the content goes to a
/// temporary file that is renamed over the target on commit.
pub fn save_report(path: &Path, html: &str) -> Result<PathBuf, DeliveryError> {
    let io_err = |source| DeliveryError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = AtomicWriteFile::open(path).map_err(io_err)?;
    file.write_all(html.as_bytes()).map_err(io_err)?;
    file.commit().map_err(io_err)?;

    Ok(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}
