//! Placeholder rendering for DOCX templates
//!
//! A template is an ordinary DOCX whose text contains named placeholders of
//! the form `{{ Name }}`. Rendering substitutes every placeholder by exact
//! field-name match in the main document part and in all headers and footers.
//!
//! Word frequently splits what the author typed as one placeholder over
//! several runs (spell checking, revision marks, formatting changes). When a
//! placeholder spans runs, the paragraph's text is merged into its first
//! text node and the other text nodes of that paragraph are emptied.
//!
//! # Example
//!
//! ```ignore
//! use std::collections::BTreeMap;
//! use passgen_ooxml::Template;
//!
//! let template = Template::load("templates/foh_pass_template.docx")?;
//! let mut fields = BTreeMap::new();
//! fields.insert("EventName".to_string(), "Summer Fest".to_string());
//! let rendered = template.render(&fields)?;
//! rendered.write_to_file("pass.docx")?;
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};

fn placeholder_re() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// A loaded DOCX template
#[derive(Debug, Clone)]
pub struct Template {
    archive: OoxmlArchive,
}

impl Template {
    /// Load a template from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Load a template from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_bytes(bytes)?)
    }

    /// Wrap an archive, checking that it has a main document part
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        archive.document_xml()?;
        Ok(Self { archive })
    }

    /// Get a reference to the underlying archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Names of all placeholders used anywhere in the template
    pub fn placeholders(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for part in self.archive.text_parts() {
            let Some(xml) = self.archive.get(&part) else {
                continue;
            };
            let scanned = ScannedPart::scan(xml)?;
            for text in scanned.paragraph_texts() {
                for caps in placeholder_re().captures_iter(&text) {
                    names.insert(caps[1].to_string());
                }
            }
        }
        Ok(names)
    }

    /// Render the template with the given field values.
    ///
    /// Returns a new archive; the template itself is left untouched so it
    /// can be rendered again.
    pub fn render(&self, fields: &BTreeMap<String, String>) -> Result<OoxmlArchive> {
        let mut rendered = self.archive.clone();
        for part in self.archive.text_parts() {
            let Some(xml) = self.archive.get(&part) else {
                continue;
            };
            let output = render_part(xml, fields)?;
            rendered.set(part, output);
        }
        Ok(rendered)
    }
}

/// A `<w:t>` text event and where it sits
#[derive(Debug)]
struct TextNode {
    /// Index of the enclosing `<w:t>` start event
    start: usize,
    /// Index of the text event itself
    event: usize,
    /// Paragraph the node belongs to
    paragraph: usize,
    text: String,
}

/// A part's event stream with its text nodes located
struct ScannedPart {
    events: Vec<Event<'static>>,
    nodes: Vec<TextNode>,
}

impl ScannedPart {
    fn scan(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut events = Vec::new();
        let mut nodes = Vec::new();
        let mut open_paragraphs: Vec<usize> = Vec::new();
        let mut paragraph_count = 0usize;
        let mut text_start: Option<usize> = None;
        let mut buf = Vec::new();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(event) => event.into_owned(),
                Err(e) => return Err(OoxmlError::Xml(e)),
            };

            match &event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"p" => {
                        open_paragraphs.push(paragraph_count);
                        paragraph_count += 1;
                    }
                    b"t" if !open_paragraphs.is_empty() => text_start = Some(events.len()),
                    _ => {}
                },
                Event::Text(e) => {
                    if let (Some(start), Some(&paragraph)) = (text_start, open_paragraphs.last()) {
                        nodes.push(TextNode {
                            start,
                            event: events.len(),
                            paragraph,
                            text: e.unescape()?.into_owned(),
                        });
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"p" => {
                        open_paragraphs.pop();
                    }
                    b"t" => text_start = None,
                    _ => {}
                },
                _ => {}
            }

            events.push(event);
            buf.clear();
        }

        Ok(Self { events, nodes })
    }

    /// Text node indices grouped by paragraph, in paragraph order
    fn groups(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            groups.entry(node.paragraph).or_default().push(idx);
        }
        groups
    }

    fn paragraph_texts(&self) -> Vec<String> {
        self.groups()
            .values()
            .map(|members| members.iter().map(|&i| self.nodes[i].text.as_str()).collect())
            .collect()
    }
}

fn render_part(xml: &[u8], fields: &BTreeMap<String, String>) -> Result<Vec<u8>> {
    let scanned = ScannedPart::scan(xml)?;

    // event index -> replacement text
    let mut replacements: BTreeMap<usize, String> = BTreeMap::new();
    // start event indices of text nodes whose content changed
    let mut touched_starts: BTreeSet<usize> = BTreeSet::new();

    for members in scanned.groups().values() {
        let split = members
            .iter()
            .any(|&i| has_partial_placeholder(&scanned.nodes[i].text));

        let new_texts: Vec<String> = if split {
            let joined: String = members.iter().map(|&i| scanned.nodes[i].text.as_str()).collect();
            let merged = substitute(&joined, fields)?;
            if merged == joined {
                // Stray braces that never form a placeholder: leave runs alone
                members.iter().map(|&i| scanned.nodes[i].text.clone()).collect()
            } else {
                let mut texts = vec![String::new(); members.len()];
                texts[0] = merged;
                texts
            }
        } else {
            members
                .iter()
                .map(|&i| substitute(&scanned.nodes[i].text, fields))
                .collect::<Result<_>>()?
        };

        for (&i, new_text) in members.iter().zip(new_texts) {
            let node = &scanned.nodes[i];
            if new_text != node.text {
                touched_starts.insert(node.start);
                replacements.insert(node.event, new_text);
            }
        }
    }

    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    for (idx, event) in scanned.events.into_iter().enumerate() {
        if let Some(text) = replacements.remove(&idx) {
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            continue;
        }
        match event {
            Event::Start(start) if touched_starts.contains(&idx) => {
                let preserves = start
                    .attributes()
                    .filter_map(|a| a.ok())
                    .any(|a| a.key.as_ref() == b"xml:space");
                let mut start = start;
                if !preserves {
                    start.push_attribute(("xml:space", "preserve"));
                }
                writer.write_event(Event::Start(start))?;
            }
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

/// Replace every placeholder in `text` with its field value
fn substitute(text: &str, fields: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in placeholder_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let name = &caps[1];
        let value = fields
            .get(name)
            .ok_or_else(|| OoxmlError::UnresolvedPlaceholder(name.to_string()))?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Whether a text node holds a fragment of a placeholder that continues in
/// a neighbouring run
fn has_partial_placeholder(text: &str) -> bool {
    let rest = placeholder_re().replace_all(text, "");
    rest.contains("{{") || rest.contains("}}") || rest.ends_with('{') || rest.starts_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::test_utils::{docx_with_body, docx_with_parts};

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn texts(archive: &OoxmlArchive) -> Vec<String> {
        Document::from_archive(archive)
            .unwrap()
            .paragraphs
            .into_iter()
            .map(|p| p.text)
            .collect()
    }

    #[test]
    fn test_render_simple_placeholders() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>{{ EventName }}</w:t></w:r></w:p><w:p><w:r><w:t>Pass #{{PassNumber}} of {{ Dates }}</w:t></w:r></w:p>"#,
        );
        let template = Template::from_bytes(&bytes).unwrap();
        let rendered = template
            .render(&fields(&[
                ("EventName", "Summer Fest"),
                ("PassNumber", "2"),
                ("Dates", "07/24/2025"),
            ]))
            .unwrap();

        assert_eq!(texts(&rendered), vec!["Summer Fest", "Pass #2 of 07/24/2025"]);
    }

    #[test]
    fn test_render_placeholder_split_across_runs() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Deck: {{ De</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ck }}</w:t></w:r><w:r><w:t xml:space="preserve"> ok</w:t></w:r></w:p>"#,
        );
        let template = Template::from_bytes(&bytes).unwrap();
        let rendered = template.render(&fields(&[("Deck", "B2")])).unwrap();

        assert_eq!(texts(&rendered), vec!["Deck: B2 ok"]);
        let xml = rendered.get_string("word/document.xml").unwrap();
        assert!(xml.contains(r#"<w:t xml:space="preserve">Deck: B2 ok</w:t>"#));
    }

    #[test]
    fn test_render_escapes_values() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>{{EventName}}</w:t></w:r></w:p>"#);
        let template = Template::from_bytes(&bytes).unwrap();
        let rendered = template
            .render(&fields(&[("EventName", "Rock & <Roll>")]))
            .unwrap();

        let xml = rendered.get_string("word/document.xml").unwrap();
        assert!(xml.contains("Rock &amp; &lt;Roll&gt;"));
        assert_eq!(texts(&rendered), vec!["Rock & <Roll>"]);
    }

    #[test]
    fn test_render_unresolved_placeholder_is_error() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>{{ TimeEntered }}</w:t></w:r></w:p>"#);
        let template = Template::from_bytes(&bytes).unwrap();
        let err = template.render(&fields(&[])).unwrap_err();

        assert!(matches!(err, OoxmlError::UnresolvedPlaceholder(ref n) if n == "TimeEntered"));
    }

    #[test]
    fn test_render_headers_and_footers() {
        let bytes = docx_with_parts(
            r#"<w:p><w:r><w:t>Body</w:t></w:r></w:p>"#,
            &[(
                "word/header1.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{{CellPhone}}</w:t></w:r></w:p></w:hdr>"#,
            )],
        );
        let template = Template::from_bytes(&bytes).unwrap();
        let rendered = template.render(&fields(&[("CellPhone", "555-1234")])).unwrap();

        let header = rendered.get_string("word/header1.xml").unwrap();
        assert!(header.contains("555-1234"));
        assert!(!header.contains("CellPhone"));
    }

    #[test]
    fn test_render_leaves_template_untouched() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>{{PassNumber}}</w:t></w:r></w:p>"#);
        let template = Template::from_bytes(&bytes).unwrap();

        let first = template.render(&fields(&[("PassNumber", "1")])).unwrap();
        let second = template.render(&fields(&[("PassNumber", "2")])).unwrap();

        assert_eq!(texts(&first), vec!["1"]);
        assert_eq!(texts(&second), vec!["2"]);
        assert_eq!(texts(template.archive()), vec!["{{PassNumber}}"]);
    }

    #[test]
    fn test_stray_braces_are_kept() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>Cost {{ 5 }} or {{x</w:t></w:r></w:p>"#);
        let template = Template::from_bytes(&bytes).unwrap();
        let rendered = template.render(&fields(&[])).unwrap();

        assert_eq!(texts(&rendered), vec!["Cost {{ 5 }} or {{x"]);
    }

    #[test]
    fn test_placeholders_lists_split_names() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>{{ Event</w:t></w:r><w:r><w:t>Name }}</w:t></w:r></w:p><w:p><w:r><w:t>{{Deck}}</w:t></w:r></w:p>"#,
        );
        let template = Template::from_bytes(&bytes).unwrap();
        let names: Vec<String> = template.placeholders().unwrap().into_iter().collect();

        assert_eq!(names, vec!["Deck".to_string(), "EventName".to_string()]);
    }

    #[test]
    fn test_from_bytes_requires_document_part() {
        let mut archive = OoxmlArchive::default();
        archive.set_string("word/styles.xml", "<w:styles/>");
        let bytes = archive.to_bytes().unwrap();

        let err = Template::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, OoxmlError::MissingFile(_)));
    }

    #[test]
    fn test_load_from_invalid_bytes() {
        assert!(Template::from_bytes(b"This is not a ZIP file").is_err());
    }
}
