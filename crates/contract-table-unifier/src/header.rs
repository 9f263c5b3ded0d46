use regex::{Regex, RegexBuilder};

use crate::error::UnifyError;
use crate::model::RawTableGrid;

const MIN_GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridVerdict {
    Accepted,
    TooNarrow { width: usize },
    HeaderNotFound,
}

/// Case-insensitive substring test for the header token, Unicode aware.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    pattern: Regex,
}

impl HeaderMatcher {
    pub fn new(token: &str) -> Result<Self, UnifyError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(UnifyError::InvalidOption(
                "header token cannot be blank".to_string(),
            ));
        }

        let pattern = RegexBuilder::new(&regex::escape(token))
            .case_insensitive(true)
            .build()
            .map_err(|error| UnifyError::InvalidOption(format!("invalid header token: {error}")))?;
        Ok(Self { pattern })
    }

    #[must_use]
    pub fn is_header_row(&self, row: &[Option<String>]) -> bool {
        row.iter()
            .flatten()
            .any(|cell| self.pattern.is_match(cell))
    }

    #[must_use]
    pub fn classify(&self, grid: &RawTableGrid) -> GridVerdict {
        let width = grid.width();
        if width < MIN_GRID_COLUMNS {
            return GridVerdict::TooNarrow { width };
        }

        match grid.header() {
            Some(header) if self.is_header_row(header) => GridVerdict::Accepted,
            _ => GridVerdict::HeaderNotFound,
        }
    }
}
