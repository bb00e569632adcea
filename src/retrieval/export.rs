//! Copying matched files out of the source directory.

use std::fs::{self, File, FileTimes};
use std::path::Path;

use crate::error::{FolioError, Result};

/// Copy `source` to `destination`, keeping permissions, access time and
/// modification time. An existing destination file is overwritten.
pub fn copy_with_metadata(source: &Path, destination: &Path) -> Result<u64> {
    let filename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    let fail = |e: std::io::Error| FolioError::copy(filename.clone(), e.to_string());

    let metadata = fs::metadata(source).map_err(fail)?;
    let bytes = fs::copy(source, destination).map_err(fail)?;

    let mut times = FileTimes::new().set_modified(metadata.modified().map_err(fail)?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // fs::copy already applied the source permissions, which may forbid writing.
    let file = File::options()
        .write(true)
        .open(destination)
        .or_else(|_| File::open(destination))
        .map_err(fail)?;
    file.set_times(times).map_err(fail)?;

    Ok(bytes)
}
