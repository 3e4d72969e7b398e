//! Template engine seam
//!
//! The renderer only needs "fill this template with these fields"; the
//! placeholder syntax is the engine's business.

use std::io::ErrorKind;
use std::path::Path;

use passgen_ooxml::{OoxmlError, Template};

use crate::error::{PassError, Result};
use crate::request::Fields;

/// Fills a template with field values
pub trait TemplateEngine: Send + Sync {
    /// Render `template` with `fields`, returning a complete DOCX package
    fn render(&self, template: &Path, fields: &Fields) -> Result<Vec<u8>>;
}

/// DOCX templates with `{{ Name }}` placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTemplateEngine;

impl DocxTemplateEngine {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, path: &Path) -> Result<Template> {
        Template::load(path).map_err(|e| match e {
            OoxmlError::Io(io) if io.kind() == ErrorKind::NotFound => {
                PassError::TemplateMissing(path.to_path_buf())
            }
            OoxmlError::Io(io) => PassError::Io(io),
            other => malformed(path, other),
        })
    }
}

impl TemplateEngine for DocxTemplateEngine {
    fn render(&self, template: &Path, fields: &Fields) -> Result<Vec<u8>> {
        let loaded = self.load(template)?;
        let rendered = loaded.render(fields).map_err(|e| match e {
            e @ OoxmlError::UnresolvedPlaceholder(_) => PassError::Document(e),
            other => malformed(template, other),
        })?;
        Ok(rendered.to_bytes()?)
    }
}

fn malformed(path: &Path, err: OoxmlError) -> PassError {
    PassError::TemplateMalformed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
