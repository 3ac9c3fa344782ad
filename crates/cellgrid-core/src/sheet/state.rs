use cellgrid_engine::engine::{Cell, CellRef, Grid, ordinal_to_column};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::SheetConfig;

/// Rows never get shorter than this.
pub const MIN_ROW_HEIGHT: f64 = 15.0;
/// Columns never get narrower than this.
pub const MIN_COLUMN_WIDTH: f64 = 50.0;

/// A column header: letters id and display width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub width: f64,
}

/// A row header: decimal id and display height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub height: f64,
}

/// Flags controlling a find/replace pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub match_case: bool,
    pub match_entire_cell: bool,
}

/// Pending find/replace dialog input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindReplaceOptions {
    pub find_text: String,
    pub replace_text: String,
    pub match_case: bool,
    pub match_entire_cell: bool,
}

impl FindReplaceOptions {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            match_case: self.match_case,
            match_entire_cell: self.match_entire_cell,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindReplaceOptionsPatch {
    pub find_text: Option<String>,
    pub replace_text: Option<String>,
    pub match_case: Option<bool>,
    pub match_entire_cell: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
}

/// Pending chart dialog input. Charts are not rendered here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    #[serde(rename = "type")]
    pub kind: ChartType,
    pub title: String,
    pub data_range: String,
    pub label_range: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartOptionsPatch {
    pub kind: Option<ChartType>,
    pub title: Option<String>,
    pub data_range: Option<String>,
    pub label_range: Option<String>,
}

/// Selection and dialog state kept alongside the data so it round-trips
/// through saved documents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub selected_cell: Option<CellRef>,
    pub selected_range: Option<Vec<CellRef>>,
    pub formula_bar_value: String,
    pub find_replace_open: bool,
    pub find_replace_options: FindReplaceOptions,
    /// A fill gesture is in progress.
    pub is_dragging: bool,
    /// Source cell of the pending fill.
    pub drag_start_cell: Option<CellRef>,
    pub chart_open: bool,
    pub chart_options: ChartOptions,
}

/// UI-agnostic sheet state.
#[derive(Clone, Debug)]
pub struct Sheet {
    /// Sparse cell storage
    pub cells: Grid,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub view: ViewState,
    /// Sizes used for new sheets and inserted rows/columns
    pub config: SheetConfig,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since it was loaded or saved
    pub modified: bool,
}

impl Sheet {
    /// Create an empty sheet with the default extent.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    pub fn with_config(config: SheetConfig) -> Self {
        let columns = (1..=config.columns)
            .map(|ordinal| Column {
                id: ordinal_to_column(ordinal),
                width: config.column_width,
            })
            .collect();
        let rows = (1..=config.rows)
            .map(|n| Row {
                id: n.to_string(),
                height: config.row_height,
            })
            .collect();

        Sheet {
            cells: Grid::new(),
            columns,
            rows,
            view: ViewState::default(),
            config,
            file_path: None,
            modified: false,
        }
    }

    /// Replace everything with an empty sheet of the configured extent.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::with_config(config);
    }

    pub fn cell(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.cells.get(cell_ref)
    }

    /// Raw value of a cell; empty for unset cells.
    pub fn raw_value(&self, cell_ref: &CellRef) -> &str {
        self.cells.get(cell_ref).map_or("", |c| c.value.as_str())
    }

    /// Value to show for a cell: the formula result or the raw text.
    pub fn display_value(&self, cell_ref: &CellRef) -> String {
        self.cells
            .get(cell_ref)
            .map(|c| c.display_value())
            .unwrap_or_default()
    }

    /// Get the cell for writing, creating it with the default format if absent.
    pub(crate) fn cell_mut_or_default(&mut self, cell_ref: CellRef) -> &mut Cell {
        self.cells.entry(cell_ref).or_default()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sheet_extent() {
        let sheet = Sheet::new();
        assert_eq!(sheet.columns.len(), 26);
        assert_eq!(sheet.columns[0].id, "A");
        assert_eq!(sheet.columns[25].id, "Z");
        assert_eq!(sheet.columns[0].width, 100.0);
        assert_eq!(sheet.rows.len(), 100);
        assert_eq!(sheet.rows[99].id, "100");
        assert_eq!(sheet.rows[0].height, 25.0);
        assert!(sheet.cells.is_empty());
    }

    #[test]
    fn test_configured_extent_uses_multi_letter_columns() {
        let sheet = Sheet::with_config(SheetConfig {
            columns: 28,
            rows: 2,
            ..SheetConfig::default()
        });
        assert_eq!(sheet.columns[26].id, "AA");
        assert_eq!(sheet.columns[27].id, "AB");
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_reading_unset_cell_does_not_materialize_it() {
        let sheet = Sheet::new();
        let a1 = CellRef::new(0, 0);
        assert_eq!(sheet.raw_value(&a1), "");
        assert_eq!(sheet.display_value(&a1), "");
        assert!(sheet.cells.is_empty());
    }
}
