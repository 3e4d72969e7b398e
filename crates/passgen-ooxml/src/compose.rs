//! Document composition
//!
//! Concatenates several DOCX packages into one. The first package is the
//! base: its styles, numbering, headers, footers and section properties are
//! kept. Every appended package contributes its body content in order,
//! without its trailing body-level `<w:sectPr>`.
//!
//! Appended content keeps working inside the base package:
//! - relationship references (`r:id`, `r:embed`, ...) are re-pointed at
//!   relationships added to the base, copying media parts as needed
//! - styles the base lacks are copied from the appended `styles.xml`
//! - namespace declarations the base root lacks are added
//! - drawing (`wp:docPr`) and bookmark ids are renumbered to stay unique
//!
//! # Example
//!
//! ```ignore
//! use passgen_ooxml::{compose, OoxmlArchive};
//!
//! let passes = vec![OoxmlArchive::open("temp_1.docx")?, OoxmlArchive::open("temp_2.docx")?];
//! let composed = compose(&passes)?;
//! composed.write_to_file("Summer Fest_Passes.docx")?;
//! ```

use std::collections::{BTreeSet, HashMap};

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, STYLES_PART,
};
use crate::content_types::ContentTypes;
use crate::error::{OoxmlError, Result};
use crate::relationships::{RelationshipTarget, Relationships};

/// Compose documents in order: the first is the base, the rest are appended.
///
/// A single document is returned unchanged.
pub fn compose(docs: &[OoxmlArchive]) -> Result<OoxmlArchive> {
    let (first, rest) = docs.split_first().ok_or(OoxmlError::NothingToCompose)?;
    let mut composer = Composer::new(first.clone())?;
    for doc in rest {
        composer.append(doc)?;
    }
    composer.finish()
}

/// Incremental composer over a base document
#[derive(Debug)]
pub struct Composer {
    base: OoxmlArchive,
    /// Base document.xml as owned events
    events: Vec<Event<'static>>,
    /// Index in `events` where appended content goes
    insert_at: usize,
    /// Index of the root element's start event
    root_at: usize,
    appended: Vec<Event<'static>>,
    rels: Relationships,
    content_types: ContentTypes,
    /// Namespace declarations on the base root
    namespaces: BTreeSet<String>,
    /// Namespace declarations to add to the base root
    extra_namespaces: Vec<(String, String)>,
    next_docpr_id: u64,
    next_bookmark_id: u64,
    appended_count: usize,
}

impl Composer {
    /// Start composing on top of `base`
    pub fn new(base: OoxmlArchive) -> Result<Self> {
        let events = read_events(base.document_xml()?)?;
        let layout = BodyLayout::locate(&events)?;

        let rels = match base.document_rels_xml() {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };
        let content_types = match base.get(CONTENT_TYPES_PART) {
            Some(xml) => ContentTypes::parse(xml)?,
            None => ContentTypes::default(),
        };
        let namespaces = match &events[layout.root] {
            Event::Start(root) => namespace_declarations(root)?
                .into_iter()
                .map(|(key, _)| key)
                .collect(),
            _ => BTreeSet::new(),
        };
        let (max_docpr, max_bookmark) = max_ids(&events)?;

        Ok(Self {
            base,
            events,
            insert_at: layout.insert_at,
            root_at: layout.root,
            appended: Vec::new(),
            rels,
            content_types,
            namespaces,
            extra_namespaces: Vec::new(),
            next_docpr_id: max_docpr + 1,
            next_bookmark_id: max_bookmark + 1,
            appended_count: 0,
        })
    }

    /// Number of documents appended so far
    pub fn appended_count(&self) -> usize {
        self.appended_count
    }

    /// Append a document's body after everything composed so far
    pub fn append(&mut self, doc: &OoxmlArchive) -> Result<()> {
        let events = read_events(doc.document_xml()?)?;
        let layout = BodyLayout::locate(&events)?;

        if let Event::Start(root) = &events[layout.root] {
            for (key, value) in namespace_declarations(root)? {
                if self.namespaces.insert(key.clone()) {
                    self.extra_namespaces.push((key, value));
                }
            }
        }

        let doc_rels = match doc.document_rels_xml() {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };
        let doc_types = match doc.get(CONTENT_TYPES_PART) {
            Some(xml) => ContentTypes::parse(xml)?,
            None => ContentTypes::default(),
        };

        let mut rel_map: HashMap<String, String> = HashMap::new();
        let mut bookmark_map: HashMap<String, String> = HashMap::new();

        for event in body_content(&events, &layout) {
            let rewritten = match event {
                Event::Start(e) => Event::Start(self.rewrite_element(
                    e,
                    doc,
                    &doc_rels,
                    &doc_types,
                    &mut rel_map,
                    &mut bookmark_map,
                )?),
                Event::Empty(e) => Event::Empty(self.rewrite_element(
                    e,
                    doc,
                    &doc_rels,
                    &doc_types,
                    &mut rel_map,
                    &mut bookmark_map,
                )?),
                other => other.clone(),
            };
            self.appended.push(rewritten);
        }

        if let (Some(base_styles), Some(doc_styles)) = (self.base.styles_xml(), doc.styles_xml()) {
            if let Some(merged) = merge_styles(base_styles, doc_styles)? {
                self.base.set(STYLES_PART, merged);
            }
        }

        self.appended_count += 1;
        Ok(())
    }

    /// Produce the composed package
    pub fn finish(mut self) -> Result<OoxmlArchive> {
        if self.appended_count == 0 {
            return Ok(self.base);
        }

        let mut writer = Writer::new(Vec::new());
        let tail = self.events.split_off(self.insert_at);
        for (idx, event) in self.events.into_iter().enumerate() {
            match event {
                Event::Start(mut root) if idx == self.root_at => {
                    for (key, value) in &self.extra_namespaces {
                        root.push_attribute((key.as_str(), value.as_str()));
                    }
                    writer.write_event(Event::Start(root))?;
                }
                other => writer.write_event(other)?,
            }
        }
        for event in self.appended {
            writer.write_event(event)?;
        }
        for event in tail {
            writer.write_event(event)?;
        }

        self.base.set(DOCUMENT_PART, writer.into_inner());
        self.base.set_string(DOCUMENT_RELS_PART, self.rels.to_xml());
        self.base
            .set_string(CONTENT_TYPES_PART, self.content_types.to_xml());
        Ok(self.base)
    }

    fn rewrite_element(
        &mut self,
        e: &BytesStart<'static>,
        doc: &OoxmlArchive,
        doc_rels: &Relationships,
        doc_types: &ContentTypes,
        rel_map: &mut HashMap<String, String>,
        bookmark_map: &mut HashMap<String, String>,
    ) -> Result<BytesStart<'static>> {
        let local = e.local_name();
        let local = local.as_ref();
        let is_docpr = local == b"docPr";
        let is_bookmark = local == b"bookmarkStart" || local == b"bookmarkEnd";

        let needs_rewrite = is_docpr
            || is_bookmark
            || e.attributes()
                .filter_map(|a| a.ok())
                .any(|a| a.key.as_ref().starts_with(b"r:"));
        if !needs_rewrite {
            return Ok(e.clone());
        }

        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut out = BytesStart::new(name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();

            let new_value = if key.starts_with("r:") {
                Some(self.map_relationship(&value, doc, doc_rels, doc_types, rel_map)?)
            } else if is_docpr && key == "id" {
                let id = self.next_docpr_id;
                self.next_docpr_id += 1;
                Some(id.to_string())
            } else if is_bookmark && key == "w:id" {
                let mapped = bookmark_map.entry(value.clone()).or_insert_with(|| {
                    let id = self.next_bookmark_id;
                    self.next_bookmark_id += 1;
                    id.to_string()
                });
                Some(mapped.clone())
            } else {
                None
            };

            match new_value {
                Some(v) => out.push_attribute((key.as_str(), v.as_str())),
                None => out.push_attribute((key.as_str(), value.as_str())),
            }
        }
        Ok(out)
    }

    /// Map a relationship id of an appended document to an id in the base
    fn map_relationship(
        &mut self,
        id: &str,
        doc: &OoxmlArchive,
        doc_rels: &Relationships,
        doc_types: &ContentTypes,
        rel_map: &mut HashMap<String, String>,
    ) -> Result<String> {
        if let Some(mapped) = rel_map.get(id) {
            return Ok(mapped.clone());
        }
        let Some(rel) = doc_rels.get(id) else {
            // Not a relationship id after all; leave it alone
            return Ok(id.to_string());
        };

        let mapped = if Relationships::is_package_level(&rel.rel_type) {
            match self.rels.iter().find(|(_, r)| r.rel_type == rel.rel_type) {
                Some((base_id, _)) => base_id.to_string(),
                None => id.to_string(),
            }
        } else if rel.is_external() {
            match self.rels.find(rel) {
                Some(base_id) => base_id.to_string(),
                None => self.rels.add(rel.clone()),
            }
        } else {
            self.import_part(rel, doc, doc_types)?
        };

        rel_map.insert(id.to_string(), mapped.clone());
        Ok(mapped)
    }

    /// Copy an internal relationship target into the base package
    fn import_part(
        &mut self,
        rel: &RelationshipTarget,
        doc: &OoxmlArchive,
        doc_types: &ContentTypes,
    ) -> Result<String> {
        let source_path = resolve_target(&rel.target);
        let Some(bytes) = doc.get(&source_path) else {
            return Err(OoxmlError::MissingFile(source_path));
        };

        // Same bytes already at the same path: share the part
        if self.base.get(&source_path) == Some(bytes) {
            if let Some(base_id) = self.rels.find(rel) {
                return Ok(base_id.to_string());
            }
            return Ok(self.rels.add(rel.clone()));
        }

        let target_path = self.unique_part_name(&source_path);
        self.base.set(target_path.clone(), bytes.to_vec());
        if let Some(ct) = doc_types.content_type_for(&source_path) {
            self.content_types.ensure(&target_path, ct);
        }

        let target = target_path
            .strip_prefix("word/")
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{}", target_path));
        Ok(self.rels.add(RelationshipTarget {
            target,
            rel_type: rel.rel_type.clone(),
            target_mode: None,
        }))
    }

    fn unique_part_name(&self, path: &str) -> String {
        if !self.base.contains(path) {
            return path.to_string();
        }
        let (stem, ext) = match path.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') => (stem, format!(".{}", ext)),
            _ => (path, String::new()),
        };
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}{}", stem, n, ext);
            if !self.base.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Where a document's body sits in its event stream
#[derive(Debug)]
struct BodyLayout {
    root: usize,
    /// First event inside `<w:body>`
    body_start: usize,
    /// Body-level `<w:sectPr>` start (or the body end when there is none)
    insert_at: usize,
    /// Event index just past the body-level `<w:sectPr>`
    sect_end: usize,
}

impl BodyLayout {
    fn locate(events: &[Event<'static>]) -> Result<Self> {
        let mut root = None;
        let mut body_start = None;
        let mut sect: Option<(usize, usize)> = None;
        let mut depth = 0usize;
        let mut body_depth = None;

        for (idx, event) in events.iter().enumerate() {
            match event {
                Event::Start(e) => {
                    if root.is_none() {
                        root = Some(idx);
                    }
                    if body_depth == Some(depth) && e.local_name().as_ref() == b"sectPr" {
                        sect = Some((idx, idx));
                    }
                    if body_depth.is_none() && e.local_name().as_ref() == b"body" {
                        body_depth = Some(depth + 1);
                        body_start = Some(idx + 1);
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    if body_depth == Some(depth) && e.local_name().as_ref() == b"sectPr" {
                        sect = Some((idx, idx + 1));
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if let Some((start, end)) = sect.as_mut() {
                        if *start == *end && body_depth == Some(depth) && e.local_name().as_ref() == b"sectPr" {
                            *end = idx + 1;
                        }
                    }
                    if body_depth == Some(depth + 1) && e.local_name().as_ref() == b"body" {
                        let body_start = body_start.unwrap_or(idx);
                        let (insert_at, sect_end) = sect.unwrap_or((idx, idx));
                        return Ok(Self {
                            root: root.unwrap_or(0),
                            body_start,
                            insert_at,
                            sect_end,
                        });
                    }
                }
                _ => {}
            }
        }

        Err(OoxmlError::InvalidStructure(
            "document.xml has no <w:body>".to_string(),
        ))
    }
}

/// Body children of a document, minus its body-level section properties
fn body_content<'a>(
    events: &'a [Event<'static>],
    layout: &'a BodyLayout,
) -> impl Iterator<Item = &'a Event<'static>> + 'a {
    let body_end = body_end(events, layout);
    events[layout.body_start..body_end]
        .iter()
        .enumerate()
        .filter(move |(offset, _)| {
            let idx = layout.body_start + offset;
            !(idx >= layout.insert_at && idx < layout.sect_end)
        })
        .map(|(_, event)| event)
}

/// Index of the `</w:body>` event
fn body_end(events: &[Event<'static>], layout: &BodyLayout) -> usize {
    let mut depth = 0usize;
    for (idx, event) in events.iter().enumerate().skip(layout.body_start) {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return idx,
            Event::End(_) => depth -= 1,
            _ => {}
        }
    }
    events.len()
}

fn read_events(xml: &[u8]) -> Result<Vec<Event<'static>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut events = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => events.push(event.into_owned()),
            Err(e) => return Err(OoxmlError::Xml(e)),
        }
        buf.clear();
    }
    Ok(events)
}

fn namespace_declarations(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut decls = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            decls.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                attr.unescape_value()?.into_owned(),
            ));
        }
    }
    Ok(decls)
}

/// Highest `wp:docPr` id and bookmark id in a document
fn max_ids(events: &[Event<'static>]) -> Result<(u64, u64)> {
    let mut docpr = 0u64;
    let mut bookmark = 0u64;
    for event in events {
        let (Event::Start(e) | Event::Empty(e)) = event else {
            continue;
        };
        let local = e.local_name();
        let (slot, key): (&mut u64, &[u8]) = match local.as_ref() {
            b"docPr" => (&mut docpr, &b"id"[..]),
            b"bookmarkStart" | b"bookmarkEnd" => (&mut bookmark, &b"w:id"[..]),
            _ => continue,
        };
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.as_ref() == key {
                if let Ok(n) = attr.unescape_value()?.parse::<u64>() {
                    *slot = (*slot).max(n);
                }
            }
        }
    }
    Ok((docpr, bookmark))
}

/// Resolve a target relative to `word/document.xml` to a package path
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Copy styles from `other` that `base` lacks.
///
/// Returns `None` when nothing needed copying.
fn merge_styles(base: &[u8], other: &[u8]) -> Result<Option<Vec<u8>>> {
    let base_events = read_events(base)?;
    let known: BTreeSet<String> = style_subtrees(&base_events)?
        .into_iter()
        .map(|(id, _)| id)
        .collect();

    let missing: Vec<Vec<Event<'static>>> = style_subtrees(&read_events(other)?)?
        .into_iter()
        .filter(|(id, _)| !known.contains(id))
        .map(|(_, events)| events)
        .collect();
    if missing.is_empty() {
        return Ok(None);
    }

    let mut writer = Writer::new(Vec::with_capacity(base.len()));
    let mut depth = 0usize;
    let mut pending = Some(missing);
    for event in base_events {
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    for style in pending.take().unwrap_or_default() {
                        for e in style {
                            writer.write_event(e)?;
                        }
                    }
                }
            }
            _ => {}
        }
        writer.write_event(event)?;
    }
    Ok(Some(writer.into_inner()))
}

/// `<w:style>` elements directly under the root, with their `w:styleId`
fn style_subtrees(events: &[Event<'static>]) -> Result<Vec<(String, Vec<Event<'static>>)>> {
    let mut styles = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<(String, Vec<Event<'static>>, usize)> = None;

    for event in events {
        match event {
            Event::Start(e) => {
                if current.is_none() && depth == 1 && e.local_name().as_ref() == b"style" {
                    current = Some((style_id(e)?, Vec::new(), depth));
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if current.is_none() && depth == 1 && e.local_name().as_ref() == b"style" {
                    styles.push((style_id(e)?, vec![event.clone()]));
                    continue;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }

        if let Some((_, collected, start_depth)) = current.as_mut() {
            collected.push(event.clone());
            if depth == *start_depth {
                if let Some((id, collected, _)) = current.take() {
                    styles.push((id, collected));
                }
            }
        }
    }
    Ok(styles)
}

fn style_id(e: &BytesStart) -> Result<String> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"w:styleId" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::test_utils::{docx_with_body, docx_with_paragraphs, docx_with_parts};

    fn archive(bytes: &[u8]) -> OoxmlArchive {
        OoxmlArchive::from_bytes(bytes).unwrap()
    }

    fn texts(archive: &OoxmlArchive) -> Vec<String> {
        Document::from_archive(archive)
            .unwrap()
            .paragraphs
            .into_iter()
            .map(|p| p.text)
            .collect()
    }

    const IMAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
</Relationships>"#;

    const IMAGE_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
</Types>"#;

    const IMAGE_BODY: &str = r#"<w:p><w:r><w:t>Logo</w:t></w:r><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1"/><a:blip r:embed="rId7"/></wp:inline></w:drawing></w:r></w:p>"#;

    #[test]
    fn test_compose_concatenates_paragraphs_in_order() {
        let docs = vec![
            archive(&docx_with_paragraphs(&["Pass 1", "Summer Fest"])),
            archive(&docx_with_paragraphs(&["Pass 2", "Summer Fest"])),
            archive(&docx_with_paragraphs(&["Pass 3"])),
        ];

        let composed = compose(&docs).unwrap();
        assert_eq!(
            texts(&composed),
            vec!["Pass 1", "Summer Fest", "Pass 2", "Summer Fest", "Pass 3"]
        );
    }

    #[test]
    fn test_compose_single_document_is_unchanged() {
        let only = archive(&docx_with_paragraphs(&["Only pass"]));
        let composed = compose(std::slice::from_ref(&only)).unwrap();

        assert_eq!(
            composed.get_string(DOCUMENT_PART),
            only.get_string(DOCUMENT_PART)
        );
    }

    #[test]
    fn test_compose_empty_is_error() {
        assert!(matches!(compose(&[]), Err(OoxmlError::NothingToCompose)));
    }

    #[test]
    fn test_compose_keeps_single_body_section() {
        let docs = vec![
            archive(&docx_with_paragraphs(&["A"])),
            archive(&docx_with_paragraphs(&["B"])),
        ];
        let composed = compose(&docs).unwrap();
        let xml = composed.get_string(DOCUMENT_PART).unwrap();

        assert_eq!(xml.matches("<w:sectPr>").count(), 1);
        let sect = xml.find("<w:sectPr>").unwrap();
        assert!(xml.find("B</w:t>").unwrap() < sect);
    }

    #[test]
    fn test_compose_body_without_section_properties() {
        let no_sect = crate::test_utils::zip_parts(&[(
            "word/document.xml",
            br#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>First</w:t></w:r></w:p></w:body></w:document>"#,
        )]);
        let docs = vec![archive(&no_sect), archive(&docx_with_paragraphs(&["Second"]))];

        let composed = compose(&docs).unwrap();
        assert_eq!(texts(&composed), vec!["First", "Second"]);
    }

    #[test]
    fn test_compose_shares_identical_media() {
        let bytes = docx_with_parts(
            IMAGE_BODY,
            &[
                ("word/_rels/document.xml.rels", IMAGE_RELS),
                ("[Content_Types].xml", IMAGE_TYPES),
                ("word/media/image1.png", "PNGDATA"),
            ],
        );
        let docs = vec![archive(&bytes), archive(&bytes)];

        let composed = compose(&docs).unwrap();
        let xml = composed.get_string(DOCUMENT_PART).unwrap();

        assert_eq!(xml.matches(r#"r:embed="rId7""#).count(), 2);
        assert!(!composed.contains("word/media/image1_2.png"));
        // drawing ids stay unique
        assert!(xml.contains(r#"id="1""#));
        assert!(xml.contains(r#"id="2""#));
    }

    #[test]
    fn test_compose_copies_distinct_media() {
        let first = docx_with_parts(
            IMAGE_BODY,
            &[
                ("word/_rels/document.xml.rels", IMAGE_RELS),
                ("[Content_Types].xml", IMAGE_TYPES),
                ("word/media/image1.png", "FIRST"),
            ],
        );
        let second = docx_with_parts(
            IMAGE_BODY,
            &[
                ("word/_rels/document.xml.rels", IMAGE_RELS),
                ("[Content_Types].xml", IMAGE_TYPES),
                ("word/media/image1.png", "SECOND"),
            ],
        );

        let composed = compose(&[archive(&first), archive(&second)]).unwrap();

        assert_eq!(composed.get("word/media/image1.png"), Some(&b"FIRST"[..]));
        assert_eq!(composed.get("word/media/image1_2.png"), Some(&b"SECOND"[..]));

        let rels = Relationships::parse(composed.document_rels_xml().unwrap()).unwrap();
        let (new_id, _) = rels
            .iter()
            .find(|(_, r)| r.target == "media/image1_2.png")
            .unwrap();
        let xml = composed.get_string(DOCUMENT_PART).unwrap();
        assert!(xml.contains(&format!(r#"r:embed="{}""#, new_id)));
    }

    #[test]
    fn test_compose_merges_missing_styles() {
        let base = docx_with_paragraphs(&["Base"]);
        let styled = docx_with_parts(
            r#"<w:p><w:pPr><w:pStyle w:val="PassTitle"/></w:pPr><w:r><w:t>Styled</w:t></w:r></w:p>"#,
            &[(
                "word/styles.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="PassTitle"><w:name w:val="Pass Title"/><w:rPr><w:b/></w:rPr></w:style>
</w:styles>"#,
            )],
        );

        let composed = compose(&[archive(&base), archive(&styled)]).unwrap();
        let styles = composed.get_string(STYLES_PART).unwrap();

        assert!(styles.contains(r#"w:styleId="PassTitle""#));
        assert_eq!(styles.matches(r#"w:styleId="Normal""#).count(), 1);
    }

    #[test]
    fn test_compose_renumbers_bookmarks() {
        let body = r#"<w:p><w:bookmarkStart w:id="0" w:name="pass"/><w:r><w:t>P</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#;
        let bytes = docx_with_body(body);

        let composed = compose(&[archive(&bytes), archive(&bytes)]).unwrap();
        let xml = composed.get_string(DOCUMENT_PART).unwrap();

        assert_eq!(xml.matches(r#"w:id="0""#).count(), 2);
        assert_eq!(xml.matches(r#"w:id="1""#).count(), 2);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_target("../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("/word/media/a.png"), "word/media/a.png");
    }
}
