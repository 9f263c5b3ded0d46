//! Rebuilds page lines from positioned text runs. Runs sharing a baseline
//! form one line, and runs separated by a wide horizontal gap become
//! tab-separated cells, so tables drawn cell by cell keep their columns.

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
/// Horizontal gap, in font sizes, that separates two cells.
const CELL_GAP: f32 = 1.0;
/// Vertical distance, in font sizes, within which runs share a line.
const BASELINE_TOLERANCE: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub text: String,
}

impl TextRun {
    #[allow(clippy::cast_precision_loss)]
    fn estimated_end(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.font_size * GLYPH_WIDTH
    }
}

/// Text-space position tracking for `BT`/`Td`/`TD`/`Tm`/`T*`.
#[derive(Debug, Clone)]
pub(crate) struct TextCursor {
    x: f32,
    y: f32,
    line_x: f32,
    line_y: f32,
    scale_x: f32,
    scale_y: f32,
    pub font_size: f32,
    pub leading: f32,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

impl TextCursor {
    pub fn begin_text(&mut self) {
        self.set_matrix(1.0, 1.0, 0.0, 0.0);
    }

    pub fn set_matrix(&mut self, scale_x: f32, scale_y: f32, x: f32, y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self.line_x = x;
        self.line_y = y;
        self.x = x;
        self.y = y;
    }

    pub fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx * self.scale_x;
        self.line_y += ty * self.scale_y;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    pub fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn effective_size(&self) -> f32 {
        let scale = if self.scale_y == 0.0 {
            self.scale_x
        } else {
            self.scale_y
        };
        let size = (self.font_size * scale).abs();
        if size > 0.0 { size } else { 1.0 }
    }

    /// Places `text` at the current position and advances past it.
    pub fn show(&mut self, text: String) -> TextRun {
        let run = TextRun {
            x: self.x,
            y: self.y,
            font_size: self.effective_size(),
            text,
        };
        self.x = run.estimated_end();
        run
    }
}

#[derive(Debug)]
struct Cell {
    x: f32,
    end: f32,
    font_size: f32,
    text: String,
}

fn group_into_lines(mut runs: Vec<TextRun>) -> Vec<Vec<TextRun>> {
    runs.retain(|run| !run.text.trim().is_empty());
    runs.sort_by(|left, right| right.y.total_cmp(&left.y));

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    let mut line_y = f32::NAN;
    for run in runs {
        let tolerance = run.font_size * BASELINE_TOLERANCE;
        match lines.last_mut() {
            Some(line) if (run.y - line_y).abs() <= tolerance => line.push(run),
            _ => {
                line_y = run.y;
                lines.push(vec![run]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|left, right| left.x.total_cmp(&right.x));
    }
    lines
}

fn merge_into_cells(line: Vec<TextRun>) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    for run in line {
        let end = run.estimated_end();
        match cells.last_mut() {
            Some(cell) if run.x - cell.end <= cell.font_size * CELL_GAP => {
                if run.x - cell.end > cell.font_size * 0.1 && !cell.text.ends_with(' ') {
                    cell.text.push(' ');
                }
                cell.text.push_str(&run.text);
                cell.end = cell.end.max(end);
            }
            _ => cells.push(Cell {
                x: run.x,
                end,
                font_size: run.font_size,
                text: run.text,
            }),
        }
    }
    for cell in &mut cells {
        cell.text = cell.text.trim().to_string();
    }
    cells
}

/// Assigns each cell to the nearest column of `anchors`, left to right.
/// Columns with no cell stay empty.
fn place_cells<'a>(cells: &'a [Cell], anchors: &[f32]) -> Vec<&'a str> {
    let mut slots = vec![""; anchors.len()];
    let mut next = 0;
    for (index, cell) in cells.iter().enumerate() {
        let last_allowed = anchors.len() - (cells.len() - index);
        let slot = (next..=last_allowed)
            .min_by(|left, right| {
                (anchors[*left] - cell.x)
                    .abs()
                    .total_cmp(&(anchors[*right] - cell.x).abs())
            })
            .unwrap_or(next);
        slots[slot] = &cell.text;
        next = slot + 1;
    }
    slots
}

fn nearest_anchor(x: f32, anchors: &[f32]) -> Option<usize> {
    anchors
        .iter()
        .enumerate()
        .min_by(|(_, left), (_, right)| (**left - x).abs().total_cmp(&(**right - x).abs()))
        .map(|(index, _)| index)
}

/// A shorter line belongs to the columns above it. A lone cell only does
/// when it sits right of the first column, since narrative text starts at
/// the left margin.
fn fits_under(cells: &[Cell], anchors: &[f32]) -> bool {
    cells.len() < anchors.len()
        && (cells.len() >= 2
            || cells
                .first()
                .and_then(|cell| nearest_anchor(cell.x, anchors))
                .is_some_and(|index| index > 0))
}

/// Lines top to bottom. A multi-cell line sets the column anchors for the
/// lines below it; a shorter line is spread over those anchors so a missing
/// cell stays an empty field instead of shifting its neighbours left.
pub(crate) fn lay_out(runs: Vec<TextRun>) -> String {
    let mut output = Vec::new();
    let mut anchors: Option<Vec<f32>> = None;

    for line in group_into_lines(runs) {
        let cells = merge_into_cells(line);
        if let Some(columns) = anchors
            .as_ref()
            .filter(|columns| fits_under(&cells, columns))
        {
            output.push(place_cells(&cells, columns).join("\t"));
        } else if cells.len() >= 2 {
            anchors = Some(cells.iter().map(|cell| cell.x).collect());
            output.push(
                cells
                    .iter()
                    .map(|cell| cell.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
        } else {
            anchors = None;
            output.extend(cells.into_iter().map(|cell| cell.text));
        }
    }

    output.join("\n")
}
