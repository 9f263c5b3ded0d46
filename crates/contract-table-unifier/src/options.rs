use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::UnifyError;

pub const DEFAULT_HEADER_TOKEN: &str = "CÓDIGO";
pub const DEFAULT_SHEET_NAME: &str = "Tabelas Unificadas";
pub const DEFAULT_COLUMN_NAMES: [&str; 3] = ["CÓDIGO", "DESCRIÇÃO", "VALOR"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(selection: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range start: '{start}'"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range end: '{end}'"))?;
                if start == 0 || end == 0 {
                    return Err("pages are 1-based".to_string());
                }
                if end < start {
                    return Err(format!(
                        "invalid range '{token}': end is smaller than start"
                    ));
                }
                pages.extend(start..=end);
            } else {
                let page: u32 = token
                    .parse()
                    .map_err(|_| format!("invalid page number: '{token}'"))?;
                if page == 0 {
                    return Err("pages are 1-based".to_string());
                }
                pages.insert(page);
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifyOptions {
    pub pages: Option<PageSelection>,
    /// Minimum cells a text line needs to count as a grid row.
    pub min_cols: usize,
    pub header_token: String,
    pub column_names: [String; 3],
    pub sheet_name: String,
    pub delimiter: u8,
}

impl UnifyOptions {
    pub(crate) fn validate(&self) -> Result<(), UnifyError> {
        if self.min_cols < 2 {
            return Err(UnifyError::InvalidOption(
                "min_cols must be at least 2".to_string(),
            ));
        }
        if self.header_token.trim().is_empty() {
            return Err(UnifyError::InvalidOption(
                "header token cannot be blank".to_string(),
            ));
        }
        if self.column_names.iter().any(|name| name.trim().is_empty()) {
            return Err(UnifyError::InvalidOption(
                "column names cannot be blank".to_string(),
            ));
        }
        // Excel rejects longer names and these characters.
        if self.sheet_name.trim().is_empty()
            || self.sheet_name.chars().count() > 31
            || self
                .sheet_name
                .contains(['[', ']', ':', '*', '?', '/', '\\'])
        {
            return Err(UnifyError::InvalidOption(format!(
                "invalid sheet name '{}'",
                self.sheet_name
            )));
        }
        Ok(())
    }
}

impl Default for UnifyOptions {
    fn default() -> Self {
        Self {
            pages: None,
            min_cols: 2,
            header_token: DEFAULT_HEADER_TOKEN.to_string(),
            column_names: DEFAULT_COLUMN_NAMES.map(str::to_string),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            delimiter: b',',
        }
    }
}
