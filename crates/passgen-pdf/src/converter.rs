//! DOCX to PDF converters
//!
//! Conversion is delegated to an external program. Each converter wraps one
//! program; the [`Exporter`](crate::Exporter) tries them in order.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::{PdfError, Result};
use crate::process::run_tool;

/// Default per-call deadline for a converter
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for DOCX to PDF converters
///
/// Converters must be `Send + Sync` so an exporter can be shared.
pub trait PdfConverter: Send + Sync {
    /// Human-readable name of this converter
    fn name(&self) -> &'static str;

    /// Convert the DOCX at `input` into a PDF written to `output`.
    ///
    /// Success means `output` was written by this call; a file already
    /// present at `output` must never count as the result.
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// LibreOffice in headless mode
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: String,
    timeout: Duration,
}

impl SofficeConverter {
    pub fn new() -> Self {
        Self {
            program: "soffice".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different executable (e.g. `libreoffice` or an absolute path)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfConverter for SofficeConverter {
    fn name(&self) -> &'static str {
        "soffice"
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        // soffice only takes an output directory and names the file after the input
        let out_dir = parent_dir(output);
        let mut file_name = input
            .file_stem()
            .unwrap_or_else(|| OsStr::new("document"))
            .to_os_string();
        file_name.push(".pdf");
        let produced = out_dir.join(file_name);

        remove_stale(output)?;
        remove_stale(&produced)?;
        run_tool(
            &self.program,
            &[
                OsStr::new("--headless"),
                OsStr::new("--convert-to"),
                OsStr::new("pdf"),
                OsStr::new("--outdir"),
                out_dir.as_os_str(),
                input.as_os_str(),
            ],
            self.timeout,
            &log_path(output, self.name()),
        )?;

        if !produced.is_file() {
            return Err(PdfError::MissingOutput(produced));
        }
        if produced != output {
            fs::rename(&produced, output)?;
        }
        Ok(())
    }
}

/// pandoc (needs a PDF engine such as LaTeX installed alongside it)
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    timeout: Duration,
}

impl PandocConverter {
    pub fn new() -> Self {
        Self {
            program: "pandoc".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfConverter for PandocConverter {
    fn name(&self) -> &'static str {
        "pandoc"
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        remove_stale(output)?;
        run_tool(
            &self.program,
            &[input.as_os_str(), OsStr::new("-o"), output.as_os_str()],
            self.timeout,
            &log_path(output, self.name()),
        )?;

        if !output.is_file() {
            return Err(PdfError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }
}

/// Delete a PDF left at `path` by an earlier run
pub(crate) fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous PDF");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PdfError::Io(e)),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `<output>.<tool>.log`, next to the requested output
fn log_path(output: &Path, tool: &str) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.log", tool));
    parent_dir(output).join(name)
}
