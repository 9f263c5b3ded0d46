#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    NarrowGrid,
    HeaderNotFound,
    NoMatchingTables,
    RowsDiscarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
    pub grid_index: Option<usize>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            grid_index: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_grid_index(mut self, grid_index: usize) -> Self {
        self.grid_index = Some(grid_index);
        self
    }
}
