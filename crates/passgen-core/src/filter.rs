//! Blank-Page Filter
//!
//! A rendered pass is blank when every paragraph of its main document part
//! (tables and text boxes included) is empty after trimming.

use std::path::Path;

use passgen_ooxml::{Document, OoxmlArchive};

use crate::error::Result;
use crate::render::RenderedPass;

/// Check whether the DOCX at `path` has no visible text
pub fn is_blank_docx(path: &Path) -> Result<bool> {
    let archive = OoxmlArchive::open(path)?;
    Ok(Document::from_archive(&archive)?.is_blank())
}

/// Check whether a rendered pass has no visible text
pub fn is_blank(pass: &RenderedPass) -> Result<bool> {
    is_blank_docx(pass.path())
}

/// Passes that are not blank, in their original order
pub fn non_blank(passes: &[RenderedPass]) -> Result<Vec<&RenderedPass>> {
    let mut survivors = Vec::with_capacity(passes.len());
    for pass in passes {
        if is_blank(pass)? {
            tracing::debug!(pass_number = pass.pass_number(), "Dropping blank pass");
        } else {
            survivors.push(pass);
        }
    }
    Ok(survivors)
}
