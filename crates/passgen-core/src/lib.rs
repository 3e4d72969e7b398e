//! passgen-core - Event pass generation
//!
//! Fills a DOCX pass template once per physical pass, drops replicas that
//! rendered blank, merges the rest into one document and optionally exports
//! it as PDF.
//!
//! # Example
//!
//! ```no_run
//! use passgen_core::{Pipeline, PassRequest, PassType, Settings};
//! use passgen_core::{GenerationOutcome, ExportFormat};
//!
//! let pipeline = Pipeline::new(Settings::default());
//! let request = PassRequest::new(PassType::Foh, "Summer Fest", "07/24/2025", "555-1234", 3)?
//!     .with_export_format(ExportFormat::Pdf);
//!
//! match pipeline.generate(&request)? {
//!     GenerationOutcome::Generated(passes) => println!("{}", passes.file.display()),
//!     GenerationOutcome::NoContent => println!("nothing to print"),
//! }
//! # Ok::<(), passgen_core::PassError>(())
//! ```

pub mod cleanup;
pub mod collect;
pub mod compose;
pub mod config;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod render;
pub mod request;
pub mod sanitize;
pub mod session;

// Re-export main types and functions
pub use collect::{ConsoleCollector, FormCollector, FormSubmission};
pub use compose::ComposedDocument;
pub use config::Settings;
pub use delivery::{ConsoleDelivery, DownloadDelivery};
pub use engine::{DocxTemplateEngine, TemplateEngine};
pub use error::{PassError, Result};
pub use filter::is_blank;
pub use pipeline::{Delivery, FieldCollector, GeneratedPasses, GenerationOutcome, Pipeline};
pub use render::{PassRenderer, RenderedPass, RequestId, WorkDir};
pub use request::{Fields, PassRequest, PassType};
pub use sanitize::sanitize_filename;
pub use session::{AccessGate, GateStatus, Session};

pub use passgen_pdf::{ExportFormat, ExportOutcome, Exporter, PdfConverter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
