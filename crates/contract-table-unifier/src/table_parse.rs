/// Tabs mark positioned cells and keep empty fields, so a line that
/// starts with a tab has an empty first cell. Otherwise cells are split on
/// runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    if line.contains('\t') {
        let cells = line
            .split('\t')
            .map(|cell| cell.trim().to_string())
            .collect::<Vec<_>>();
        if cells.iter().all(String::is_empty) {
            return Vec::new();
        }
        return cells;
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                if !current.trim().is_empty() {
                    cells.push(current.trim().to_string());
                    current.clear();
                }
                continue;
            }
            current.push(' ');
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Code, description and value from a single-spaced line: the first and
/// last words are the outer columns and everything between them is the
/// description.
fn collapse_to_columns(words: Vec<String>) -> Vec<String> {
    if words.len() <= 3 {
        return words;
    }
    let last = words.len() - 1;
    vec![
        words[0].clone(),
        words[1..last].join(" "),
        words[last].clone(),
    ]
}

/// Single-space splitting is only trusted for short, non-sentence lines.
pub(crate) fn line_cells(line: &str, min_cols: usize) -> Vec<String> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return cells;
    }

    let words = soft_split_line_into_cells(line);
    let has_numeric = words
        .iter()
        .any(|word| word.chars().any(|ch| ch.is_ascii_digit()));
    let looks_like_sentence = ['.', '!', '?', ':', ';']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    if looks_like_sentence || !(has_numeric || words.len() <= 6) {
        return cells;
    }

    let columns = collapse_to_columns(words);
    if columns.len() >= min_cols {
        columns
    } else {
        cells
    }
}

/// Reads three positional fields from a ragged row; missing cells are absent.
pub(crate) fn first_three<'a>(row: &'a [Option<String>]) -> [Option<&'a str>; 3] {
    [0, 1, 2].map(|index| row.get(index).and_then(Option::as_deref))
}
