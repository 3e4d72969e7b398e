//! Package content types (`[Content_Types].xml`)

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Content types namespace
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Parsed `[Content_Types].xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// (extension, content type), extension lower-cased
    defaults: Vec<(String, String)>,
    /// (part name with leading slash, content type)
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse content types from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut types = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }
                    if let (Some(key), Some(ct)) = (key, content_type) {
                        match e.local_name().as_ref() {
                            b"Default" => types.defaults.push((key.to_ascii_lowercase(), ct)),
                            b"Override" => types.overrides.push((key, ct)),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type that applies to a package part (`word/media/image1.png`)
    pub fn content_type_for(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        if let Some((_, ct)) = self
            .overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&part_name))
        {
            return Some(ct);
        }
        let ext = extension(part)?;
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    /// Make sure `part` resolves to `content_type`, adding a Default for
    /// unknown extensions or an Override when the Default disagrees
    pub fn ensure(&mut self, part: &str, content_type: &str) {
        if self.content_type_for(part) == Some(content_type) {
            return;
        }
        match extension(part) {
            Some(ext) if !self.defaults.iter().any(|(e, _)| *e == ext) => {
                self.defaults.push((ext, content_type.to_string()));
            }
            _ => {
                let part_name = format!("/{}", part.trim_start_matches('/'));
                self.overrides.push((part_name, content_type.to_string()));
            }
        }
    }

    /// Serialize back to XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                quick_xml::escape::escape(ext.as_str()),
                quick_xml::escape::escape(ct.as_str())
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                quick_xml::escape::escape(part.as_str()),
                quick_xml::escape::escape(ct.as_str())
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

fn extension(part: &str) -> Option<String> {
    let name = part.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}
