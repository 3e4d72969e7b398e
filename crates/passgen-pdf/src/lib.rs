//! passgen-pdf - PDF export via external converters
//!
//! This crate turns a composed DOCX into a PDF by running an external
//! program, and degrades to "unavailable" rather than failing when no
//! converter works.
//!
//! # Architecture
//!
//! 1. **PdfConverter** - One external program (LibreOffice, pandoc)
//! 2. **Exporter** - Tries converters in priority order, absorbing failures
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use passgen_pdf::{ExportFormat, ExportOutcome, Exporter};
//!
//! let exporter = Exporter::default();
//! match exporter.export(Path::new("output/Fest_Passes.docx"), ExportFormat::Pdf) {
//!     ExportOutcome::Exported(pdf) => println!("PDF at {}", pdf.display()),
//!     ExportOutcome::Unavailable { reason } => eprintln!("{reason}"),
//!     ExportOutcome::Native => {}
//! }
//! ```

mod converter;
mod error;
mod exporter;
mod process;

pub use converter::{PandocConverter, PdfConverter, SofficeConverter, DEFAULT_TIMEOUT};
pub use error::{PdfError, Result};
pub use exporter::{ExportFormat, ExportOutcome, Exporter};
