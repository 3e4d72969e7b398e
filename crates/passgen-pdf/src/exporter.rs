//! Format exporter with graceful fallback
//!
//! Any failure to produce a PDF, including a converter that is not installed,
//! is turned into [`ExportOutcome::Unavailable`]. Callers then offer the
//! native DOCX instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::converter::{remove_stale, PandocConverter, PdfConverter, SofficeConverter};
use crate::error::PdfError;

/// Format the caller wants to receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// The composed DOCX as-is
    #[default]
    Docx,
    /// A PDF derived from the composed DOCX
    Pdf,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}' (expected docx or pdf)", other)),
        }
    }
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// DOCX was requested; nothing was converted
    Native,
    /// A PDF was written at this path
    Exported(PathBuf),
    /// No converter could produce a PDF
    Unavailable { reason: String },
}

/// Tries each converter in order until one produces a PDF
pub struct Exporter {
    converters: Vec<Box<dyn PdfConverter>>,
}

impl Exporter {
    /// Create an exporter with an explicit converter chain
    pub fn new(converters: Vec<Box<dyn PdfConverter>>) -> Self {
        Self { converters }
    }

    /// Build the converter chain from configured names.
    ///
    /// Recognised names are `soffice`, `libreoffice` and `pandoc`; unknown
    /// names are skipped with a warning.
    pub fn from_names<S: AsRef<str>>(names: &[S], timeout: Duration) -> Self {
        let mut converters: Vec<Box<dyn PdfConverter>> = Vec::new();
        for name in names {
            match name.as_ref() {
                "soffice" => converters.push(Box::new(SofficeConverter::new().with_timeout(timeout))),
                "libreoffice" => converters.push(Box::new(
                    SofficeConverter::new()
                        .with_program("libreoffice")
                        .with_timeout(timeout),
                )),
                "pandoc" => converters.push(Box::new(PandocConverter::new().with_timeout(timeout))),
                other => warn!(converter = other, "Unknown PDF converter in configuration, skipping"),
            }
        }
        Self { converters }
    }

    /// Names of the configured converters, in priority order
    pub fn converter_names(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Export the DOCX at `docx` in the requested format.
    ///
    /// A PDF is written next to the DOCX with the same stem. A PDF already
    /// at that path is removed first and never returned as the result.
    pub fn export(&self, docx: &Path, format: ExportFormat) -> ExportOutcome {
        if format == ExportFormat::Docx {
            return ExportOutcome::Native;
        }

        let output = docx.with_extension("pdf");
        if let Err(e) = remove_stale(&output) {
            warn!(path = %output.display(), error = %e, "Cannot replace previous PDF");
            return ExportOutcome::Unavailable {
                reason: format!("PDF conversion failed ({})", e),
            };
        }
        let mut failures = Vec::new();

        for converter in &self.converters {
            match converter.convert(docx, &output) {
                Ok(()) if output.is_file() => {
                    info!(converter = converter.name(), path = %output.display(), "Exported PDF");
                    return ExportOutcome::Exported(output);
                }
                Ok(()) => {
                    let e = PdfError::MissingOutput(output.clone());
                    warn!(converter = converter.name(), error = %e, "PDF conversion failed");
                    failures.push(format!("{}: {}", converter.name(), e));
                }
                Err(e) => {
                    warn!(converter = converter.name(), error = %e, "PDF conversion failed");
                    failures.push(format!("{}: {}", converter.name(), e));
                }
            }
        }

        let reason = if failures.is_empty() {
            "PDF conversion failed: no converter is configured".to_string()
        } else {
            format!("PDF conversion failed ({})", failures.join("; "))
        };
        ExportOutcome::Unavailable { reason }
    }
}

impl Default for Exporter {
    /// LibreOffice first, then pandoc
    fn default() -> Self {
        Self::new(vec![
            Box::new(SofficeConverter::new()),
            Box::new(PandocConverter::new()),
        ])
    }
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("converters", &self.converter_names())
            .finish()
    }
}
