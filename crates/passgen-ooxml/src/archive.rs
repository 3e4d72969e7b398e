//! Archive handling for DOCX files
//!
//! DOCX files are ZIP archives containing XML parts and resources.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Path of the main document relationships part
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
/// Path of the styles part
pub const STYLES_PART: &str = "word/styles.xml";
/// Path of the package content types part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Represents an unpacked OOXML document
#[derive(Debug, Clone, Default)]
pub struct OoxmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Unpack a DOCX held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a file's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Get the styles definition (word/styles.xml)
    pub fn styles_xml(&self) -> Option<&[u8]> {
        self.get(STYLES_PART)
    }

    /// Get the document relationships (word/_rels/document.xml.rels)
    pub fn document_rels_xml(&self) -> Option<&[u8]> {
        self.get(DOCUMENT_RELS_PART)
    }

    /// Paths of every part that can carry placeholder text:
    /// the main document plus all headers and footers, sorted.
    pub fn text_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self
            .files
            .keys()
            .filter(|k| {
                k.as_str() == DOCUMENT_PART || is_header_or_footer(k.as_str())
            })
            .cloned()
            .collect();
        parts.sort();
        parts
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Set or update a file's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a file's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Remove a file from the archive
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Serialize the archive into DOCX bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the archive to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        // Sort keys for deterministic output
        let mut paths: Vec<_> = self.files.keys().collect();
        paths.sort();

        for path in paths {
            let contents = &self.files[path];
            zip.start_file(path, options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}

fn is_header_or_footer(path: &str) -> bool {
    let Some(name) = path.strip_prefix("word/") else {
        return false;
    };
    !name.contains('/')
        && name.ends_with(".xml")
        && (name.starts_with("header") || name.starts_with("footer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_operations() {
        let mut archive = OoxmlArchive::default();

        // Test set and get
        archive.set_string("test.xml", "<root/>");
        assert!(archive.contains("test.xml"));
        assert_eq!(archive.get_string("test.xml"), Some("<root/>".to_string()));

        // Test remove
        archive.remove("test.xml");
        assert!(!archive.contains("test.xml"));
    }

    #[test]
    fn test_missing_document_part() {
        let archive = OoxmlArchive::default();
        let err = archive.document_xml().unwrap_err();
        assert!(matches!(err, OoxmlError::MissingFile(ref p) if p == DOCUMENT_PART));
    }

    #[test]
    fn test_text_parts_includes_headers_and_footers() {
        let mut archive = OoxmlArchive::default();
        archive.set_string(DOCUMENT_PART, "<w:document/>");
        archive.set_string("word/header1.xml", "<w:hdr/>");
        archive.set_string("word/footer2.xml", "<w:ftr/>");
        archive.set_string("word/styles.xml", "<w:styles/>");
        archive.set_string("word/_rels/header1.xml.rels", "<Relationships/>");

        assert_eq!(
            archive.text_parts(),
            vec![
                "word/document.xml".to_string(),
                "word/footer2.xml".to_string(),
                "word/header1.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let mut archive = OoxmlArchive::default();
        archive.set_string(CONTENT_TYPES_PART, r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#);
        archive.set_string(DOCUMENT_PART, r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#);

        let bytes = archive.to_bytes().unwrap();
        let restored = OoxmlArchive::from_bytes(&bytes).unwrap();

        assert!(restored.contains(CONTENT_TYPES_PART));
        assert_eq!(
            restored.get_string(DOCUMENT_PART),
            archive.get_string(DOCUMENT_PART)
        );
    }

    #[test]
    fn test_from_invalid_bytes() {
        let result = OoxmlArchive::from_bytes(b"This is not a ZIP file");
        assert!(matches!(result, Err(OoxmlError::Archive(_))));
    }
}
