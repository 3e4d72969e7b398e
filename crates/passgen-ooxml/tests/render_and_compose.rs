//! End-to-end tests: render a template several times, drop blank copies,
//! compose the rest and read the result back from disk.

use std::collections::BTreeMap;

use passgen_ooxml::test_utils::docx_with_body;
use passgen_ooxml::{compose, Document, OoxmlArchive, Template};

const PASS_BODY: &str = concat!(
    r#"<w:p><w:r><w:t>{{ EventName }}</w:t></w:r></w:p>"#,
    r#"<w:p><w:r><w:t xml:space="preserve">Pass #</w:t></w:r>"#,
    r#"<w:r><w:t>{{ Pass</w:t></w:r><w:r><w:t>Number }}</w:t></w:r></w:p>"#,
);

fn fields(pass_number: usize) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    fields.insert("EventName".to_string(), "Summer Fest".to_string());
    fields.insert("PassNumber".to_string(), pass_number.to_string());
    fields
}

#[test]
fn test_render_many_then_compose() {
    let template = Template::from_bytes(&docx_with_body(PASS_BODY)).unwrap();
    let names = template.placeholders().unwrap();
    assert!(names.contains("EventName"));
    assert!(names.contains("PassNumber"));

    let passes: Vec<OoxmlArchive> = (1..=3).map(|n| template.render(&fields(n)).unwrap()).collect();
    let composed = compose(&passes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Summer_Fest_Passes.docx");
    composed.write_to_file(&path).unwrap();

    let reopened = OoxmlArchive::open(&path).unwrap();
    let doc = Document::from_archive(&reopened).unwrap();
    assert_eq!(
        doc.texts(),
        vec![
            "Summer Fest",
            "Pass #1",
            "Summer Fest",
            "Pass #2",
            "Summer Fest",
            "Pass #3"
        ]
    );

    let xml = reopened.get_string("word/document.xml").unwrap();
    assert_eq!(xml.matches("<w:sectPr").count(), 1);
}

#[test]
fn test_blank_copies_are_detectable_before_compose() {
    let body = concat!(
        r#"<w:p><w:r><w:t>{{ Extra }}</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>"#,
    );
    let template = Template::from_bytes(&docx_with_body(body)).unwrap();

    let mut blank = BTreeMap::new();
    blank.insert("Extra".to_string(), String::new());
    let mut filled = BTreeMap::new();
    filled.insert("Extra".to_string(), "Deck 3".to_string());

    let rendered = [
        template.render(&blank).unwrap(),
        template.render(&filled).unwrap(),
    ];
    let survivors: Vec<OoxmlArchive> = rendered
        .into_iter()
        .filter(|pass| !Document::from_archive(pass).unwrap().is_blank())
        .collect();
    assert_eq!(survivors.len(), 1);

    let composed = compose(&survivors).unwrap();
    let doc = Document::from_archive(&composed).unwrap();
    assert_eq!(doc.texts()[0], "Deck 3");
}
