//! Shared test utilities for passgen-ooxml
//!
//! In-memory DOCX fixtures used by this crate's tests and, through the
//! `test-utils` feature, by the pipeline and CLI tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::OoxmlArchive;

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office document relationships namespace (for `r:id`, `r:embed`)
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1">
    <w:name w:val="Normal"/>
  </w:style>
</w:styles>"#;

/// Wrap body children in a complete `word/document.xml`.
///
/// A body-level `<w:sectPr>` is appended, as Word always writes one.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#
    )
}

/// Create a minimal valid DOCX whose body holds the given XML
pub fn docx_with_body(body: &str) -> Vec<u8> {
    docx_with_parts(body, &[])
}

/// Create a minimal valid DOCX with extra parts.
///
/// Extra parts override the defaults, so a test can supply its own
/// `word/_rels/document.xml.rels` or `word/styles.xml`.
pub fn docx_with_parts(body: &str, extra: &[(&str, &str)]) -> Vec<u8> {
    let document = document_xml(body);
    let mut parts: Vec<(&str, &[u8])> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ];
    for (name, contents) in extra {
        parts.retain(|(existing, _)| existing != name);
        parts.push((*name, contents.as_bytes()));
    }
    zip_parts(&parts)
}

/// Create a DOCX whose body has one paragraph per text
pub fn docx_with_paragraphs(texts: &[&str]) -> Vec<u8> {
    let body: String = texts
        .iter()
        .map(|t| format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, t))
        .collect();
    docx_with_body(&body)
}

/// Zip arbitrary parts into DOCX bytes
pub fn zip_parts(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, contents) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents).unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

/// Extract document.xml content from a DOCX byte array
pub fn extract_document_xml(docx: &[u8]) -> String {
    let archive = OoxmlArchive::from_bytes(docx).unwrap();
    archive.get_string("word/document.xml").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_with_body_is_valid_zip() {
        let docx = docx_with_body("<w:p/>");
        let archive = OoxmlArchive::from_bytes(&docx).unwrap();

        assert!(archive.contains("[Content_Types].xml"));
        assert!(archive.contains("word/document.xml"));
        assert!(archive.contains("_rels/.rels"));
        assert!(archive.contains("word/styles.xml"));
    }

    #[test]
    fn test_extra_parts_override_defaults() {
        let docx = docx_with_parts("", &[("word/styles.xml", "<custom/>")]);
        let archive = OoxmlArchive::from_bytes(&docx).unwrap();
        assert_eq!(archive.get_string("word/styles.xml").unwrap(), "<custom/>");
    }

    #[test]
    fn test_extract_document_xml() {
        let doc_xml = extract_document_xml(&docx_with_paragraphs(&["Template"]));
        assert!(doc_xml.contains("w:document"));
        assert!(doc_xml.contains("Template"));
    }
}
