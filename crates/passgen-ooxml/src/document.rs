//! Document content inspection (word/document.xml)
//!
//! This module reads the main document part and extracts the plain text of
//! every paragraph, in document order. Paragraphs nested in tables and text
//! boxes are included.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};

/// A parsed Word document, reduced to its paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Paragraphs in document order (by opening tag)
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph's style and text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Style ID (references styles.xml)
    pub style_id: Option<String>,
    /// Concatenated run text; tabs and breaks become `\t` and `\n`
    pub text: String,
}

impl Paragraph {
    /// Whether the paragraph has no visible text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Don't trim text - whitespace-only runs must stay whitespace
        reader.config_mut().trim_text(false);

        let mut paragraphs: Vec<Paragraph> = Vec::new();
        // Indices into `paragraphs` of the currently open <w:p> elements
        let mut open: Vec<usize> = Vec::new();
        let mut in_text = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"p" => {
                        open.push(paragraphs.len());
                        paragraphs.push(Paragraph::default());
                    }
                    b"t" if !open.is_empty() => in_text = true,
                    b"pStyle" => set_style(&mut paragraphs, &open, e),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"p" => paragraphs.push(Paragraph::default()),
                    b"pStyle" => set_style(&mut paragraphs, &open, e),
                    b"tab" => push_text(&mut paragraphs, &open, "\t"),
                    b"br" | b"cr" => push_text(&mut paragraphs, &open, "\n"),
                    _ => {}
                },
                Ok(Event::Text(ref e)) if in_text => {
                    let text = e.unescape()?;
                    push_text(&mut paragraphs, &open, &text);
                }
                Ok(Event::CData(ref e)) if in_text => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    push_text(&mut paragraphs, &open, &text);
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"p" => {
                        open.pop();
                    }
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if !open.is_empty() {
            return Err(OoxmlError::InvalidStructure(
                "unterminated paragraph in document.xml".to_string(),
            ));
        }

        Ok(Self { paragraphs })
    }

    /// Parse the main document part of an archive
    pub fn from_archive(archive: &OoxmlArchive) -> Result<Self> {
        Self::parse(archive.document_xml()?)
    }

    /// A document is blank when every paragraph's trimmed text is empty.
    ///
    /// A document without paragraphs is blank as well.
    pub fn is_blank(&self) -> bool {
        self.paragraphs.iter().all(Paragraph::is_blank)
    }

    /// Paragraph texts in document order
    pub fn texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(|p| p.text.as_str()).collect()
    }
}

fn push_text(paragraphs: &mut [Paragraph], open: &[usize], text: &str) {
    if let Some(&idx) = open.last() {
        paragraphs[idx].text.push_str(text);
    }
}

fn set_style(paragraphs: &mut [Paragraph], open: &[usize], e: &BytesStart) {
    let Some(&idx) = open.last() else {
        return;
    };
    if let Some(style) = get_attr(e, b"w:val") {
        paragraphs[idx].style_id = Some(style);
    }
}

/// Get an attribute value from an element
fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
