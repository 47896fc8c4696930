//! Office document extraction: DOCX paragraphs and spreadsheet grids.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Reader};
use xml::reader::{EventReader, XmlEvent};

/// Concatenate DOCX paragraph texts in document order, one per line.
pub fn extract_docx(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("not a docx archive")?;
    let mut document = archive
        .by_name("word/document.xml")
        .context("docx has no word/document.xml")?;
    let mut raw = String::new();
    document
        .read_to_string(&mut raw)
        .context("cannot read word/document.xml")?;

    let mut out = String::new();
    for event in EventReader::from_str(&raw) {
        match event.context("invalid document xml")? {
            XmlEvent::Characters(chunk) => out.push_str(&chunk),
            // A closed <w:p> ends one paragraph.
            XmlEvent::EndElement { name } if name.local_name == "p" => out.push('\n'),
            _ => {}
        }
    }
    Ok(out.trim().to_string())
}

/// Render every sheet of a workbook (xlsx or legacy xls) in workbook
/// order: a `--- Sheet: <name> ---` header, then all rows tab-separated,
/// header row included.
pub fn extract_sheets(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("cannot open workbook {}", path.display()))?;
    let mut out = String::new();
    for name in workbook.sheet_names().to_owned() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("cannot read sheet {}", name))?;
        out.push_str(&format!("\n--- Sheet: {} ---\n", name));
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
    }
    Ok(out.trim().to_string())
}
