use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::panic::AssertUnwindSafe;
use std::path::Path;

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::Document;
use lopdf::Object;
use lopdf::content::Content;

use crate::error::UnifyError;
use crate::model::PageText;
use crate::options::PageSelection;
use crate::table_parse::{soft_split_line_into_cells, split_line_into_cells};
use crate::text_layout::{TextCursor, lay_out};

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();
    let chars = text.chars().collect::<Vec<_>>();
    // UTF-8 read as Latin-1 leaves 'Ã'/'Â' followed by a symbol, as in "Ã“".
    let mojibake = chars
        .windows(2)
        .filter(|pair| {
            matches!(pair[0], 'Ã' | 'Â')
                && !pair[1].is_ascii_alphanumeric()
                && !pair[1].is_whitespace()
        })
        .count();

    replacement * 8 > total || control * 5 > total || mojibake * 20 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();
        if lower.contains("winansi") || lower.contains("1252") || lower.contains("latin") {
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if !had_errors {
                return text.into_owned();
            }
        }
    }

    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if bytes.starts_with(&[0xFE, 0xFF]) || bytes.starts_with(&[0xFF, 0xFE]) {
        let bytes = if bytes.len() > 2 { &bytes[2..] } else { bytes };
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();
        if lower.contains("utf16")
            || lower.contains("ucs2")
            || lower.contains("identity-h")
            || lower.contains("unicode")
        {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut multi_cell_lines = 0_i64;
    let mut soft_cell_lines = 0_i64;
    let mut value_like_lines = 0_i64;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        non_empty_lines += 1;

        if split_line_into_cells(line).len() >= 3 {
            multi_cell_lines += 1;
        } else if soft_split_line_into_cells(line).len() >= 3 {
            soft_cell_lines += 1;
        }

        let has_digit = line.chars().any(|ch| ch.is_ascii_digit());
        if has_digit && (line.contains(',') || line.contains('.')) {
            value_like_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    multi_cell_lines * 60 + soft_cell_lines * 30 + value_like_lines * 15 + non_empty_lines - broken_penalty
}

fn choose_best_text(candidates: &[String]) -> String {
    candidates
        .iter()
        .max_by_key(|text| extraction_quality_score(text))
        .cloned()
        .unwrap_or_default()
}

fn number(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|operand| operand.as_float().ok())
}

/// Walks the content stream keeping track of where each string is drawn,
/// then lays the runs out as lines with tab-separated cells.
fn extract_text_from_page_content(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    text.push_str(&decode_pdf_bytes(encoding, bytes));
                }
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                Object::Integer(value) => {
                    if *value < -100 {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut runs = Vec::new();
    let mut cursor = TextCursor::default();
    let mut current_encoding = None;
    for operation in content.operations {
        let operands = operation.operands.as_slice();
        let shown = match operation.operator.as_str() {
            "BT" => {
                cursor.begin_text();
                None
            }
            "Tf" => {
                if let Some(font_name) = operands.first().and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
                if let Some(size) = number(operands, 1) {
                    cursor.font_size = size;
                }
                None
            }
            "TL" => {
                if let Some(leading) = number(operands, 0) {
                    cursor.leading = leading;
                }
                None
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    if operation.operator == "TD" {
                        cursor.leading = -ty;
                    }
                    cursor.move_line(tx, ty);
                }
                None
            }
            "Tm" => {
                if let [Some(a), _, _, Some(d), Some(e), Some(f)] =
                    [0, 1, 2, 3, 4, 5].map(|index| number(operands, index))
                {
                    cursor.set_matrix(a, d, e, f);
                }
                None
            }
            "T*" => {
                cursor.next_line();
                None
            }
            "Tj" | "TJ" => Some(operands),
            "'" => {
                cursor.next_line();
                Some(operands)
            }
            "\"" => {
                cursor.next_line();
                operands.get(2..)
            }
            _ => None,
        };

        if let Some(operands) = shown {
            let mut text = String::new();
            collect_text(&mut text, current_encoding, operands);
            if !text.is_empty() {
                runs.push(cursor.show(text));
            }
        }
    }

    let text = lay_out(runs);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `pdf-extract` panics on some PDFs that lopdf reads fine, so a panic only
/// drops its candidate. wasm32 cannot unwind, so the candidate is skipped
/// there.
#[cfg(not(target_arch = "wasm32"))]
fn pdf_extract_candidate<F>(extract: F) -> Option<String>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(extract)) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(error)) => {
            tracing::debug!(%error, "pdf-extract could not read the document");
            None
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked, falling back to lopdf text");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn pdf_extract_candidate<F>(_extract: F) -> Option<String>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError>,
{
    None
}

fn read_document_pages(
    document: &Document,
    pdf_extract_text: Option<String>,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, UnifyError> {
    let pages_map = document.get_pages();

    let pdf_extract_pages = pdf_extract_text
        .map(|text| split_text_into_pages(&text))
        .filter(|pages| pages.len() == pages_map.len());

    let mut pages = Vec::new();
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        if page_selection.is_some_and(|selection| !selection.contains(*page_no)) {
            continue;
        }

        let mut candidates = Vec::new();
        if let Some(text) = pdf_extract_pages
            .as_ref()
            .and_then(|fallback| fallback.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        // Ties go to the last candidate, the position-aware one.
        if let Some(text) = extract_text_from_page_content(document, *page_id) {
            candidates.push(text);
        }

        let text = choose_best_text(&candidates);
        tracing::debug!(
            page = *page_no,
            candidates = candidates.len(),
            chars = text.len(),
            "decoded page text"
        );

        pages.push(PageText {
            page_number: *page_no,
            text,
        });
    }

    if pages.is_empty() {
        return Err(UnifyError::NoPagesSelected);
    }

    Ok(pages)
}

pub(crate) fn read_pdf_pages(
    input_pdf: &Path,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, UnifyError> {
    let document = Document::load(input_pdf)?;
    let full_text = pdf_extract_candidate(|| pdf_extract::extract_text(input_pdf));
    read_document_pages(&document, full_text, page_selection)
}

pub(crate) fn read_pdf_pages_from_bytes(
    input_pdf: &[u8],
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, UnifyError> {
    let document = Document::load_mem(input_pdf)?;
    let full_text = pdf_extract_candidate(|| pdf_extract::extract_text_from_mem(input_pdf));
    read_document_pages(&document, full_text, page_selection)
}
