use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use extract::{EngineConfig, ExtractorSet, AZW_PLACEHOLDER, DOC_PLACEHOLDER};
use mediadex_core::TextExtractor;
use store::FileType;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn set() -> ExtractorSet {
    ExtractorSet::new(&EngineConfig::default())
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, body) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn plain_text_is_read_and_trimmed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("note.txt");
    fs::write(&path, "  hello from a note \n\n").unwrap();
    let text = set().extract_text(FileType::Txt, &path).unwrap();
    assert_eq!(text, "hello from a note");
}

#[test]
fn invalid_byte_sequences_are_tolerated() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.rtf");
    fs::write(&path, b"caf\xff latte").unwrap();
    let text = set().extract_text(FileType::Rtf, &path).unwrap();
    assert!(text.starts_with("caf"));
    assert!(text.ends_with("latte"));
}

#[test]
fn docx_paragraphs_come_out_newline_separated() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("memo.docx");
    let document = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
    write_zip(&path, &[("word/document.xml", document)]);

    let text = set().extract_text(FileType::Docx, &path).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    assert_eq!(lines, vec!["First paragraph", "Second paragraph"]);
}

#[test]
fn docx_without_document_xml_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("odd.docx");
    write_zip(&path, &[("something_else.xml", "<a/>")]);
    assert!(set().extract_text(FileType::Docx, &path).is_err());
}

#[test]
fn epub_document_items_are_stripped_of_markup() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("book.epub");
    write_zip(
        &path,
        &[
            ("mimetype", "application/epub+zip"),
            ("styles.css", "p { color: red }"),
            (
                "ch1.xhtml",
                "<html><body><p>Call me Ishmael.</p></body></html>",
            ),
            (
                "ch2.xhtml",
                "<html><body><p>Some years ago.</p></body></html>",
            ),
        ],
    );

    let text = set().extract_text(FileType::Epub, &path).unwrap();
    assert!(text.contains("Call me Ishmael."));
    assert!(text.contains("Some years ago."));
    assert!(!text.contains("color: red"));
    assert!(!text.contains("<p>"));
    // Archive item order is preserved.
    let first = text.find("Call me Ishmael.").unwrap();
    let second = text.find("Some years ago.").unwrap();
    assert!(first < second);
}

#[test]
fn legacy_formats_get_placeholder_text() {
    let tmp = TempDir::new().unwrap();
    let doc = tmp.path().join("old.doc");
    let azw = tmp.path().join("book.azw3");
    fs::write(&doc, b"binary").unwrap();
    fs::write(&azw, b"binary").unwrap();

    assert_eq!(
        set().extract_text(FileType::Doc, &doc).unwrap(),
        DOC_PLACEHOLDER
    );
    assert_eq!(
        set().extract_text(FileType::Azw, &azw).unwrap(),
        AZW_PLACEHOLDER
    );
}

#[test]
fn video_is_not_routed_through_file_dispatch() {
    let err = set()
        .extract_text(FileType::Video, &PathBuf::from("clip.mp4"))
        .unwrap_err();
    assert!(err.to_string().contains("sampled per frame"));
}

#[test]
fn garbage_workbook_fails_the_unit() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("fake.xlsx");
    fs::write(&path, b"this is not a workbook").unwrap();
    assert!(set().extract_text(FileType::Xlsx, &path).is_err());
}
