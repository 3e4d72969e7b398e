//! # passgen-ooxml
//!
//! OOXML (Office Open XML) handling for passgen.
//!
//! This crate provides functionality to:
//! - Read and write DOCX packages
//! - Fill `{{ Name }}` placeholders in a DOCX template
//! - Inspect paragraph text (for blank-page detection)
//! - Concatenate several DOCX documents into one
//!
//! ## Example: Rendering and composing
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use passgen_ooxml::{compose, Document, Template};
//!
//! let template = Template::load("templates/foh_pass_template.docx")?;
//! let mut passes = Vec::new();
//! for n in 1..=3 {
//!     let mut fields = BTreeMap::new();
//!     fields.insert("PassNumber".to_string(), n.to_string());
//!     passes.push(template.render(&fields)?);
//! }
//! passes.retain(|p| !Document::from_archive(p).map(|d| d.is_blank()).unwrap_or(false));
//! compose(&passes)?.write_to_file("passes.docx")?;
//! # Ok::<(), passgen_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod compose;
pub mod content_types;
pub mod document;
pub mod error;
pub mod relationships;
pub mod template;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::OoxmlArchive;
pub use compose::{compose, Composer};
pub use content_types::ContentTypes;
pub use document::{Document, Paragraph};
pub use error::{OoxmlError, Result};
pub use relationships::{RelationshipTarget, Relationships};
pub use template::Template;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
