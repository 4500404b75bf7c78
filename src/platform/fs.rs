// GlucosePlotter - platform/fs.rs
//
// Filesystem access for the pipeline: reading the export and creating the
// chart file. Errors are returned as plain io::Error; callers attach the
// path and operation.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// Read the full content of a file as a string.
///
/// The whole file is read and the handle released before returning. Invalid
/// UTF-8 is replaced rather than rejected: record patterns are ASCII, so
/// stray bytes in notes or device names never affect extraction.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "Input is not valid UTF-8; decoding lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(text)
}

/// Create (or truncate) the output file behind a buffered writer.
pub fn create_output(path: &Path) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}
