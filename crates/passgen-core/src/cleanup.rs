//! Cleanup of intermediate replica files

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::render::{RenderedPass, WorkDir};

/// Delete every replica file, then the working directory.
///
/// Best-effort: failures are logged and otherwise ignored.
pub fn cleanup(passes: &[RenderedPass], work: WorkDir) {
    remove_passes(passes);
    work.close();
}

/// Delete replica files, blank or not
pub fn remove_passes(passes: &[RenderedPass]) {
    for pass in passes {
        match fs::remove_file(pass.path()) {
            Ok(()) => debug!(path = %pass.path().display(), "Removed intermediate pass"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %pass.path().display(), error = %e, "Failed to remove intermediate pass"),
        }
    }
}

/// Delete the DOCX at `destination` and its PDF sibling, if an earlier
/// request left them there
pub fn remove_previous_output(destination: &Path) {
    for path in [destination.to_path_buf(), destination.with_extension("pdf")] {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed previous output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove previous output"),
        }
    }
}
