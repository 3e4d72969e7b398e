//! Deliveries: how results reach the user

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::pipeline::{Delivery, GeneratedPasses};

/// Message shown when every rendered pass was blank
pub const NO_CONTENT_MESSAGE: &str = "❗ No non-blank pages found.";

/// Prints the saved path for a console user
pub struct ConsoleDelivery<W> {
    output: W,
}

impl<W: Write> ConsoleDelivery<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Delivery for ConsoleDelivery<W> {
    fn deliver(&mut self, passes: &GeneratedPasses) -> Result<()> {
        if let Some(warning) = &passes.warning {
            writeln!(self.output, "⚠️ {}", warning)?;
        }
        writeln!(self.output, "✅ Done! File saved to: {}", passes.file.display())?;
        Ok(())
    }

    fn no_content(&mut self) -> Result<()> {
        writeln!(self.output, "{}", NO_CONTENT_MESSAGE)?;
        Ok(())
    }
}

/// Download descriptor for a hosting UI
#[derive(Debug, Serialize)]
struct Download<'a> {
    status: &'static str,
    file_name: Option<String>,
    path: Option<&'a std::path::Path>,
    format: Option<&'static str>,
    warning: Option<&'a str>,
}

/// Prints one JSON object per result on the writer
pub struct DownloadDelivery<W> {
    output: W,
}

impl<W: Write> DownloadDelivery<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn emit(&mut self, download: &Download<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.output, download).map_err(std::io::Error::from)?;
        writeln!(self.output)?;
        Ok(())
    }
}

impl<W: Write> Delivery for DownloadDelivery<W> {
    fn deliver(&mut self, passes: &GeneratedPasses) -> Result<()> {
        self.emit(&Download {
            status: "generated",
            file_name: Some(passes.file_name()),
            path: Some(&passes.file),
            format: Some(passes.format.extension()),
            warning: passes.warning.as_deref(),
        })
    }

    fn no_content(&mut self) -> Result<()> {
        self.emit(&Download {
            status: "no_content",
            file_name: None,
            path: None,
            format: None,
            warning: Some(NO_CONTENT_MESSAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passgen_pdf::ExportFormat;
    use std::path::PathBuf;

    fn generated(warning: Option<&str>) -> GeneratedPasses {
        GeneratedPasses {
            request_id: "0f".to_string(),
            docx: PathBuf::from("output/Summer Fest_Passes.docx"),
            file: PathBuf::from("output/Summer Fest_Passes.docx"),
            format: ExportFormat::Docx,
            pass_count: 3,
            warning: warning.map(str::to_string),
        }
    }

    #[test]
    fn test_console_success_line() {
        let mut delivery = ConsoleDelivery::new(Vec::new());
        delivery.deliver(&generated(None)).unwrap();

        let text = String::from_utf8(delivery.into_inner()).unwrap();
        assert_eq!(
            text,
            "✅ Done! File saved to: output/Summer Fest_Passes.docx\n"
        );
    }

    #[test]
    fn test_console_shows_warning_first() {
        let mut delivery = ConsoleDelivery::new(Vec::new());
        delivery
            .deliver(&generated(Some("PDF conversion failed. Serving DOCX instead.")))
            .unwrap();

        let text = String::from_utf8(delivery.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("⚠️ PDF conversion failed"));
        assert!(lines[1].starts_with("✅ Done!"));
    }

    #[test]
    fn test_console_no_content() {
        let mut delivery = ConsoleDelivery::new(Vec::new());
        delivery.no_content().unwrap();
        assert_eq!(
            String::from_utf8(delivery.into_inner()).unwrap(),
            format!("{}\n", NO_CONTENT_MESSAGE)
        );
    }

    #[test]
    fn test_download_descriptor() {
        let mut delivery = DownloadDelivery::new(Vec::new());
        delivery.deliver(&generated(Some("fallback"))).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&delivery.into_inner()).unwrap();
        assert_eq!(json["status"], "generated");
        assert_eq!(json["file_name"], "Summer Fest_Passes.docx");
        assert_eq!(json["format"], "docx");
        assert_eq!(json["warning"], "fallback");
    }

    #[test]
    fn test_download_no_content() {
        let mut delivery = DownloadDelivery::new(Vec::new());
        delivery.no_content().unwrap();

        let json: serde_json::Value = serde_json::from_slice(&delivery.into_inner()).unwrap();
        assert_eq!(json["status"], "no_content");
        assert!(json["file_name"].is_null());
    }
}
