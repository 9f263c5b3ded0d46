use std::collections::HashSet;

use crate::header::{GridVerdict, HeaderMatcher};
use crate::model::{NormalizedRow, RawTableGrid, UnifiedTable, UnifyOutcome};
use crate::table_parse::first_three;
use crate::warning::{ExtractWarning, WarningCode};

type PositionalRow = [Option<String>; 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DiscardCounts {
    pub blank: usize,
    pub empty_code: usize,
    pub duplicate: usize,
}

impl DiscardCounts {
    fn total(self) -> usize {
        self.blank + self.empty_code + self.duplicate
    }
}

/// Accepted grids' data rows, header row removed and cut to three positions.
pub(crate) fn collect_matching_rows<I>(
    grids: I,
    matcher: &HeaderMatcher,
    warnings: &mut Vec<ExtractWarning>,
) -> (Vec<PositionalRow>, usize)
where
    I: IntoIterator<Item = RawTableGrid>,
{
    let mut rows = Vec::new();
    let mut accepted = 0_usize;

    for (index, grid) in grids.into_iter().enumerate() {
        let grid_index = index + 1;
        match matcher.classify(&grid) {
            GridVerdict::Accepted => {
                accepted += 1;
                rows.extend(grid.rows.iter().skip(1).map(|row| {
                    first_three(row).map(|cell| cell.map(str::to_string))
                }));
            }
            GridVerdict::TooNarrow { width } => {
                tracing::debug!(page = grid.page, grid_index, width, "grid rejected: too narrow");
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::NarrowGrid,
                        format!("grid has {width} column(s); at least 3 are required"),
                    )
                    .with_page(grid.page)
                    .with_grid_index(grid_index),
                );
            }
            GridVerdict::HeaderNotFound => {
                tracing::debug!(page = grid.page, grid_index, "grid rejected: header token not found");
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::HeaderNotFound,
                        "first row does not contain the header token",
                    )
                    .with_page(grid.page)
                    .with_grid_index(grid_index),
                );
            }
        }
    }

    (rows, accepted)
}

fn is_blank(row: &PositionalRow) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(str::is_empty))
}

fn into_normalized(row: PositionalRow) -> NormalizedRow {
    let [code, description, value] = row.map(Option::unwrap_or_default);
    NormalizedRow {
        code,
        description,
        value,
    }
}

/// Drops blank and empty-code rows, then keeps the first occurrence of each
/// distinct row in original order.
pub(crate) fn normalize_rows<I>(rows: I) -> (Vec<NormalizedRow>, DiscardCounts)
where
    I: IntoIterator<Item = PositionalRow>,
{
    let mut counts = DiscardCounts::default();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        if is_blank(&row) {
            counts.blank += 1;
            continue;
        }

        let row = into_normalized(row);
        if row.code.trim().is_empty() {
            counts.empty_code += 1;
            continue;
        }

        if !seen.insert(row.clone()) {
            counts.duplicate += 1;
            continue;
        }
        out.push(row);
    }

    (out, counts)
}

pub(crate) fn unify<I>(
    grids: I,
    matcher: &HeaderMatcher,
    warnings: &mut Vec<ExtractWarning>,
) -> UnifyOutcome
where
    I: IntoIterator<Item = RawTableGrid>,
{
    let (rows, accepted) = collect_matching_rows(grids, matcher, warnings);
    if accepted == 0 {
        warnings.push(ExtractWarning::new(
            WarningCode::NoMatchingTables,
            "no table with the header token was found",
        ));
        return UnifyOutcome::NoMatchingTables;
    }

    let (rows, counts) = normalize_rows(rows);
    if counts.total() > 0 {
        warnings.push(ExtractWarning::new(
            WarningCode::RowsDiscarded,
            format!(
                "discarded {} blank, {} empty-code and {} duplicate row(s)",
                counts.blank, counts.empty_code, counts.duplicate
            ),
        ));
    }

    tracing::info!(
        tables = accepted,
        rows = rows.len(),
        discarded = counts.total(),
        "unified matching tables"
    );

    UnifyOutcome::Unified(UnifiedTable {
        rows,
        table_count: accepted,
    })
}
