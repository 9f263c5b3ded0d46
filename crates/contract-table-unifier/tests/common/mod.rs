use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, StringFormat, Stream, dictionary};

/// Left edge of the code, description and value columns in positioned
/// fixtures.
pub const COLUMN_X: [i64; 3] = [40, 140, 440];

fn winansi(line: &str) -> Object {
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(line);
    Object::String(bytes.into_owned(), StringFormat::Literal)
}

fn courier_resources(doc: &mut Document) -> Dictionary {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    }
}

fn line_operations(font: &str, lines: &[&str]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), 10.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![40.into(), 780.into()]),
    ];

    for (index, line) in lines.iter().enumerate() {
        operations.push(Operation::new("Tj", vec![winansi(line)]));
        if index + 1 < lines.len() {
            operations.push(Operation::new("T*", vec![]));
        }
    }
    operations.push(Operation::new("ET", vec![]));
    operations
}

/// Each non-empty cell is its own text object on the row's baseline.
fn cell_operations(rows: &[Vec<&str>]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        let y = 780 - 14 * i64::try_from(row_index).unwrap_or(0);
        for (cell, x) in row.iter().zip(COLUMN_X) {
            if cell.is_empty() {
                continue;
            }
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![winansi(cell)]),
                Operation::new("ET", vec![]),
            ]);
        }
    }
    operations
}

fn assemble(
    mut doc: Document,
    resources: Dictionary,
    pages: Vec<Vec<Operation>>,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let pages_id = doc.new_object_id();
    let resources_id = doc.add_object(resources);

    let mut page_ids = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// One page per entry, one text line per string, Courier with WinAnsi so
/// accented header labels survive extraction.
pub fn build_test_pdf(pages: &[Vec<&str>]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");
    let resources = courier_resources(&mut doc);
    let pages = pages
        .iter()
        .map(|lines| line_operations("F1", lines))
        .collect();
    assemble(doc, resources, pages)
}

/// One page per entry, laid out the way table generators draw them: every
/// cell placed with its own `Td` at `COLUMN_X`. An empty string leaves the
/// cell undrawn.
#[allow(dead_code)]
pub fn build_positioned_test_pdf(
    pages: &[Vec<Vec<&str>>],
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");
    let resources = courier_resources(&mut doc);
    let pages = pages.iter().map(|rows| cell_operations(rows)).collect();
    assemble(doc, resources, pages)
}

/// Loadable PDF whose content selects `/F9`, a font missing from the page
/// resources.
#[allow(dead_code)]
pub fn build_missing_font_pdf(lines: &[&str]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let doc = Document::with_version("1.5");
    assemble(doc, dictionary! {}, vec![line_operations("F9", lines)])
}

#[allow(dead_code)]
pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, build_test_pdf(pages)?)?;
    Ok(())
}

#[allow(dead_code)]
pub fn write_pdf(path: &Path, pdf: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, pdf)?;
    Ok(())
}
