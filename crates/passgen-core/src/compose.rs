//! Document Composer: merge surviving passes into the final document

use std::fs;
use std::path::{Path, PathBuf};

use passgen_ooxml::{Composer, OoxmlArchive, OoxmlError};
use tracing::debug;

use crate::error::Result;
use crate::render::RenderedPass;

/// The merged output document of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    path: PathBuf,
    pass_count: usize,
}

impl ComposedDocument {
    /// Location of the DOCX
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of passes it contains
    pub fn pass_count(&self) -> usize {
        self.pass_count
    }
}

/// Write the composition of `passes` to `destination`.
///
/// The first pass is the base and the rest are appended in order. A single
/// pass is copied as-is without any composition step.
pub fn compose_passes(passes: &[&RenderedPass], destination: &Path) -> Result<ComposedDocument> {
    let (first, rest) = passes.split_first().ok_or(OoxmlError::NothingToCompose)?;

    if rest.is_empty() {
        fs::copy(first.path(), destination)?;
        debug!(path = %destination.display(), "Single pass, no composition needed");
    } else {
        let mut composer = Composer::new(OoxmlArchive::open(first.path())?)?;
        for pass in rest {
            composer.append(&OoxmlArchive::open(pass.path())?)?;
        }
        composer.finish()?.write_to_file(destination)?;
        debug!(
            path = %destination.display(),
            passes = passes.len(),
            "Composed passes"
        );
    }

    Ok(ComposedDocument {
        path: destination.to_path_buf(),
        pass_count: passes.len(),
    })
}
