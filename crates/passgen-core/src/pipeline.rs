//! The generation pipeline
//!
//! collect → render → filter → compose → export → cleanup → deliver
//!
//! Both entry points run this one pipeline; they differ only in the
//! [`FieldCollector`] that produces the request and the [`Delivery`] that
//! hands over the result.

use std::fs;
use std::path::{Path, PathBuf};

use passgen_pdf::{ExportFormat, ExportOutcome, Exporter};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::cleanup::{cleanup, remove_previous_output};
use crate::compose::compose_passes;
use crate::config::Settings;
use crate::engine::{DocxTemplateEngine, TemplateEngine};
use crate::error::Result;
use crate::filter::non_blank;
use crate::render::{PassRenderer, RequestId, WorkDir};
use crate::request::PassRequest;
use crate::sanitize::sanitize_filename;

/// Produces one pass request
pub trait FieldCollector {
    fn collect(&mut self) -> Result<PassRequest>;
}

/// Hands the result of a request to the user
pub trait Delivery {
    /// Passes were generated
    fn deliver(&mut self, passes: &GeneratedPasses) -> Result<()>;

    /// Every rendered pass was blank; nothing was produced
    fn no_content(&mut self) -> Result<()>;
}

/// Artifacts of a successful request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPasses {
    /// Request id, as used in intermediate file names
    pub request_id: String,
    /// The composed DOCX, always present
    pub docx: PathBuf,
    /// The file to hand out: the PDF when one was made, else the DOCX
    pub file: PathBuf,
    /// Format of `file`
    #[serde(serialize_with = "serialize_format")]
    pub format: ExportFormat,
    /// Number of passes in the document
    pub pass_count: usize,
    /// Set when the requested format could not be produced
    pub warning: Option<String>,
}

impl GeneratedPasses {
    /// File name of the artifact to hand out
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn serialize_format<S: serde::Serializer>(
    format: &ExportFormat,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(format.extension())
}

/// Result of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(GeneratedPasses),
    /// All rendered passes were blank
    NoContent,
}

/// The shared generation pipeline
pub struct Pipeline {
    settings: Settings,
    engine: Box<dyn TemplateEngine>,
    exporter: Exporter,
}

impl Pipeline {
    /// Pipeline with the DOCX template engine and the configured converters
    pub fn new(settings: Settings) -> Self {
        let exporter = Exporter::from_names(&settings.export.converters, settings.export.timeout());
        Self {
            settings,
            engine: Box::new(DocxTemplateEngine::new()),
            exporter,
        }
    }

    /// Replace the template engine
    pub fn with_engine(mut self, engine: Box<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the PDF exporter
    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collect a request, generate it and deliver the result
    pub fn run(
        &self,
        collector: &mut dyn FieldCollector,
        delivery: &mut dyn Delivery,
    ) -> Result<GenerationOutcome> {
        let request = collector.collect()?;
        let outcome = self.generate(&request)?;
        match &outcome {
            GenerationOutcome::Generated(passes) => delivery.deliver(passes)?,
            GenerationOutcome::NoContent => delivery.no_content()?,
        }
        Ok(outcome)
    }

    /// Generate the passes for one request.
    ///
    /// Intermediate files are removed on every path, including errors.
    pub fn generate(&self, request: &PassRequest) -> Result<GenerationOutcome> {
        let request_id = RequestId::new();
        let span = info_span!("generate", request_id = %request_id);
        let _enter = span.enter();

        info!(
            pass_type = %request.pass_type(),
            passes = request.pass_count(),
            format = %request.export_format(),
            "Generating passes"
        );

        let template = self.settings.templates.path_for(request.pass_type());
        let work = WorkDir::create(&self.settings.output.work_root(), request_id)?;

        let renderer = PassRenderer::new(self.engine.as_ref());
        let passes = renderer.render(&template, &request.fields(), request.pass_count(), &work)?;

        let survivors = if self.settings.output.skip_blank_passes {
            non_blank(&passes)?
        } else {
            passes.iter().collect()
        };

        if survivors.is_empty() {
            info!("All rendered passes are blank, nothing to export");
            remove_previous_output(&self.output_path(request));
            cleanup(&passes, work);
            return Ok(GenerationOutcome::NoContent);
        }

        fs::create_dir_all(&self.settings.output.dir)?;
        let destination = self.output_path(request);
        let composed = compose_passes(&survivors, &destination)?;

        let (file, format, warning) = match self.exporter.export(composed.path(), request.export_format()) {
            ExportOutcome::Native => (composed.path().to_path_buf(), ExportFormat::Docx, None),
            ExportOutcome::Exported(pdf) => (pdf, ExportFormat::Pdf, None),
            ExportOutcome::Unavailable { reason } => {
                warn!(%reason, "Falling back to DOCX");
                let warning = format!("{}. Serving DOCX instead.", reason);
                (composed.path().to_path_buf(), ExportFormat::Docx, Some(warning))
            }
        };

        cleanup(&passes, work);

        info!(path = %file.display(), passes = composed.pass_count(), "Passes generated");
        Ok(GenerationOutcome::Generated(GeneratedPasses {
            request_id: request_id.to_string(),
            docx: composed.path().to_path_buf(),
            file,
            format,
            pass_count: composed.pass_count(),
            warning,
        }))
    }

    /// `<output dir>/<sanitized event name>_Passes.docx`
    pub fn output_path(&self, request: &PassRequest) -> PathBuf {
        final_path(&self.settings.output.dir, request.event_name())
    }
}

fn final_path(dir: &Path, event_name: &str) -> PathBuf {
    dir.join(format!("{}_Passes.docx", sanitize_filename(event_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PassType;

    #[test]
    fn test_final_path_is_sanitized() {
        assert_eq!(
            final_path(Path::new("out"), "A/B:Test"),
            Path::new("out").join("A_B_Test_Passes.docx")
        );
        assert_eq!(
            final_path(Path::new("out"), "Summer Fest"),
            Path::new("out").join("Summer Fest_Passes.docx")
        );
    }

    #[test]
    fn test_output_path_uses_configured_dir() {
        let mut settings = Settings::default();
        settings.output.dir = PathBuf::from("/srv/passes");
        let pipeline = Pipeline::new(settings);
        let request = PassRequest::new(PassType::Foh, "Gala", "", "", 1).unwrap();

        assert_eq!(
            pipeline.output_path(&request),
            PathBuf::from("/srv/passes/Gala_Passes.docx")
        );
    }

    #[test]
    fn test_generated_passes_json_shape() {
        let passes = GeneratedPasses {
            request_id: "abc".to_string(),
            docx: PathBuf::from("out/Gala_Passes.docx"),
            file: PathBuf::from("out/Gala_Passes.docx"),
            format: ExportFormat::Docx,
            pass_count: 2,
            warning: None,
        };
        let json = serde_json::to_value(&passes).unwrap();

        assert_eq!(json["format"], "docx");
        assert_eq!(json["pass_count"], 2);
        assert!(json["warning"].is_null());
        assert_eq!(passes.file_name(), "Gala_Passes.docx");
    }
}
