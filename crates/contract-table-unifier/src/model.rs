#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A table's cell matrix as found on one page. `None` marks an absent or
/// empty cell; rows may be ragged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTableGrid {
    pub page: u32,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTableGrid {
    #[must_use]
    pub fn new(page: u32, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { page, rows }
    }

    /// Builds a grid from plain strings, mapping empty strings to `None`.
    #[must_use]
    pub fn from_text_rows<R, C>(page: u32, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell: String = cell.into();
                        (!cell.is_empty()).then_some(cell)
                    })
                    .collect()
            })
            .collect();
        Self { page, rows }
    }

    /// Column count of the grid, taken from its longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn header(&self) -> Option<&[Option<String>]> {
        self.rows.first().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedRow {
    pub code: String,
    pub description: String,
    pub value: String,
}

impl NormalizedRow {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> [&str; 3] {
        [&self.code, &self.description, &self.value]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedTable {
    pub rows: Vec<NormalizedRow>,
    pub table_count: usize,
}

impl UnifiedTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn preview(&self, limit: usize) -> &[NormalizedRow] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyOutcome {
    NoMatchingTables,
    Unified(UnifiedTable),
}

impl UnifyOutcome {
    #[must_use]
    pub fn table(&self) -> Option<&UnifiedTable> {
        match self {
            Self::NoMatchingTables => None,
            Self::Unified(table) => Some(table),
        }
    }

    #[must_use]
    pub fn into_table(self) -> Option<UnifiedTable> {
        match self {
            Self::NoMatchingTables => None,
            Self::Unified(table) => Some(table),
        }
    }
}
