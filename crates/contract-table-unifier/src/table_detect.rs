use crate::model::{PageText, RawTableGrid};
use crate::table_parse::line_cells;

fn detect_grids_in_page(page: &PageText, min_cols: usize) -> Vec<RawTableGrid> {
    let mut grids = Vec::new();
    let mut current_rows: Vec<Vec<Option<String>>> = Vec::new();

    let flush_current = |rows: &mut Vec<Vec<Option<String>>>, grids: &mut Vec<RawTableGrid>| {
        if rows.len() >= 2 {
            grids.push(RawTableGrid::new(page.page_number, std::mem::take(rows)));
        } else {
            rows.clear();
        }
    };

    for line in page.text.lines() {
        let cells = line_cells(line, min_cols);
        if cells.len() >= min_cols {
            current_rows.push(
                cells
                    .into_iter()
                    .map(|cell| (!cell.is_empty()).then_some(cell))
                    .collect(),
            );
        } else {
            flush_current(&mut current_rows, &mut grids);
        }
    }

    flush_current(&mut current_rows, &mut grids);
    grids
}

/// Grids in page order, then top-to-bottom within each page.
pub(crate) fn detect_grids(pages: &[PageText], min_cols: usize) -> Vec<RawTableGrid> {
    pages
        .iter()
        .flat_map(|page| detect_grids_in_page(page, min_cols.max(2)))
        .collect()
}
