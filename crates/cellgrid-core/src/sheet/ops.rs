use super::state::{Column, MIN_COLUMN_WIDTH, MIN_ROW_HEIGHT, Row};
use super::Sheet;
use crate::error::{Result, SheetError};
use cellgrid_engine::engine::{
    CellFormatPatch, CellRef, Validation, ValidationOutcome, column_to_ordinal,
    evaluate_formula, ordinal_to_column, validate,
};

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug)]
enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Get the coordinate value from a CellRef for this dimension
    fn get_coord(&self, cell_ref: &CellRef) -> usize {
        match self {
            Dimension::Row => cell_ref.row,
            Dimension::Column => cell_ref.col,
        }
    }

    /// Create a new CellRef with modified coordinate in this dimension
    fn new_cell_ref(&self, cell_ref: &CellRef, new_coord: usize) -> CellRef {
        match self {
            Dimension::Row => CellRef::new(cell_ref.col, new_coord),
            Dimension::Column => CellRef::new(new_coord, cell_ref.row),
        }
    }

    /// Zero-based coordinate named by a header id (`"3"` or `"C"`).
    fn coord_of(&self, id: &str) -> Option<usize> {
        match self {
            Dimension::Row => id.parse::<usize>().ok().filter(|&n| n >= 1).map(|n| n - 1),
            Dimension::Column => {
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_uppercase()) {
                    return None;
                }
                column_to_ordinal(id).ok().map(|n| n - 1)
            }
        }
    }

    /// Header id for a zero-based coordinate.
    fn id_of(&self, coord: usize) -> String {
        match self {
            Dimension::Row => (coord + 1).to_string(),
            Dimension::Column => ordinal_to_column(coord + 1),
        }
    }
}

impl Sheet {
    /// Store a raw value, evaluating it if it is a formula, then recalculate.
    ///
    /// Validation rules are reported but never block the write; see
    /// [`Sheet::set_cell_value_validated`] for the gated variant.
    pub fn set_cell_value(&mut self, cell_ref: CellRef, raw: &str) {
        let cell = self.cell_mut_or_default(cell_ref);
        if cell.validation.is_some() {
            let outcome = validate(raw, cell.validation.as_ref());
            if !outcome.valid {
                tracing::warn!(
                    cell = %cell_ref,
                    message = outcome.message.as_deref().unwrap_or_default(),
                    "validation failed"
                );
            }
        }
        cell.set_raw(raw);

        if let Some(body) = cell.formula_body().map(str::to_string) {
            let computed = evaluate_formula(&body, &self.cells);
            if let Some(cell) = self.cells.get_mut(&cell_ref) {
                cell.computed = computed;
            }
        }

        self.modified = true;
        self.recalculate();
    }

    /// Validate first, and only store the value if it passes.
    pub fn set_cell_value_validated(&mut self, cell_ref: CellRef, raw: &str) -> Result<()> {
        let outcome = self.validate_cell(&cell_ref, raw);
        if !outcome.valid {
            return Err(SheetError::ValidationFailed {
                cell: cell_ref,
                message: outcome.message.unwrap_or_default(),
            });
        }
        self.set_cell_value(cell_ref, raw);
        Ok(())
    }

    /// Check a candidate value against the rule attached to a cell, if any.
    pub fn validate_cell(&self, cell_ref: &CellRef, candidate: &str) -> ValidationOutcome {
        validate(
            candidate,
            self.cells.get(cell_ref).and_then(|c| c.validation.as_ref()),
        )
    }

    /// Attach a validation rule. The current value is checked and a warning
    /// logged if it does not comply; nothing is rejected.
    pub fn set_cell_validation(&mut self, cell_ref: CellRef, rule: Validation) {
        let cell = self.cell_mut_or_default(cell_ref);
        let outcome = validate(&cell.value, Some(&rule));
        if !outcome.valid {
            tracing::warn!(
                cell = %cell_ref,
                message = outcome.message.as_deref().unwrap_or_default(),
                "current value doesn't meet validation criteria"
            );
        }
        cell.validation = Some(rule);
        self.modified = true;
    }

    /// Merge a partial format into a cell's format. No recalculation.
    pub fn update_cell_format(&mut self, cell_ref: CellRef, patch: &CellFormatPatch) {
        patch.apply(&mut self.cell_mut_or_default(cell_ref).format);
        self.modified = true;
    }

    /// Generic insert operation for row or column: a new header after
    /// `after_id`, with every later cell moved one step further.
    fn insert_dimension(&mut self, dim: Dimension, after_id: &str) {
        let Some(index) = self.header_index(dim, after_id) else {
            tracing::debug!(?dim, id = after_id, "insert after unknown id ignored");
            return;
        };
        let Some(at) = dim.coord_of(after_id).map(|c| c + 1) else {
            return;
        };

        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|(cell_ref, cell)| {
                let coord = dim.get_coord(&cell_ref);
                if coord >= at {
                    (dim.new_cell_ref(&cell_ref, coord + 1), cell)
                } else {
                    (cell_ref, cell)
                }
            })
            .collect();

        self.renumber_headers(dim, index + 1, |c| c + 1);
        match dim {
            Dimension::Row => self.rows.insert(
                index + 1,
                Row {
                    id: dim.id_of(at),
                    height: self.config.row_height,
                },
            ),
            Dimension::Column => self.columns.insert(
                index + 1,
                Column {
                    id: dim.id_of(at),
                    width: self.config.column_width,
                },
            ),
        }

        tracing::debug!(?dim, at, "inserted");
        self.modified = true;
        self.recalculate();
    }

    /// Generic delete operation for row or column
    fn delete_dimension(&mut self, dim: Dimension, id: &str) {
        let Some(index) = self.header_index(dim, id) else {
            tracing::debug!(?dim, id, "delete of unknown id ignored");
            return;
        };
        let Some(at) = dim.coord_of(id) else {
            return;
        };

        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter_map(|(cell_ref, cell)| {
                let coord = dim.get_coord(&cell_ref);
                if coord == at {
                    None
                } else if coord > at {
                    Some((dim.new_cell_ref(&cell_ref, coord - 1), cell))
                } else {
                    Some((cell_ref, cell))
                }
            })
            .collect();

        match dim {
            Dimension::Row => {
                self.rows.remove(index);
            }
            Dimension::Column => {
                self.columns.remove(index);
            }
        }
        self.renumber_headers(dim, index, |c| c.saturating_sub(1));

        tracing::debug!(?dim, at, "deleted");
        self.modified = true;
        self.recalculate();
    }

    fn header_index(&self, dim: Dimension, id: &str) -> Option<usize> {
        match dim {
            Dimension::Row => self.rows.iter().position(|r| r.id == id),
            Dimension::Column => self.columns.iter().position(|c| c.id == id),
        }
    }

    /// Re-id every header from `start` on by mapping its coordinate.
    fn renumber_headers(&mut self, dim: Dimension, start: usize, step: impl Fn(usize) -> usize) {
        let ids: Vec<&mut String> = match dim {
            Dimension::Row => self.rows.iter_mut().skip(start).map(|r| &mut r.id).collect(),
            Dimension::Column => self
                .columns
                .iter_mut()
                .skip(start)
                .map(|c| &mut c.id)
                .collect(),
        };
        for id in ids {
            if let Some(coord) = dim.coord_of(id.as_str()) {
                *id = dim.id_of(step(coord));
            }
        }
    }

    /// Insert a row below the row with id `after_row_id`
    pub fn add_row(&mut self, after_row_id: &str) {
        self.insert_dimension(Dimension::Row, after_row_id);
    }

    /// Delete the row with id `row_id`
    pub fn delete_row(&mut self, row_id: &str) {
        self.delete_dimension(Dimension::Row, row_id);
    }

    /// Insert a column right of the column with id `after_column_id`
    pub fn add_column(&mut self, after_column_id: &str) {
        self.insert_dimension(Dimension::Column, after_column_id);
    }

    /// Delete the column with id `column_id`
    pub fn delete_column(&mut self, column_id: &str) {
        self.delete_dimension(Dimension::Column, column_id);
    }

    pub fn resize_row(&mut self, row_id: &str, height: f64) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == row_id) {
            row.height = height.max(MIN_ROW_HEIGHT);
            self.modified = true;
        }
    }

    pub fn resize_column(&mut self, column_id: &str, width: f64) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == column_id) {
            column.width = width.max(MIN_COLUMN_WIDTH);
            self.modified = true;
        }
    }

    /// Select a single cell (or nothing) and load its raw value into the
    /// formula bar.
    pub fn set_selected_cell(&mut self, cell_ref: Option<CellRef>) {
        self.view.selected_cell = cell_ref;
        self.view.selected_range = cell_ref.map(|c| vec![c]);
        self.view.formula_bar_value = cell_ref
            .map(|c| self.raw_value(&c).to_string())
            .unwrap_or_default();
    }

    /// Select a range. A non-empty range also selects its first cell.
    pub fn set_selected_range(&mut self, range: Option<Vec<CellRef>>) {
        if let Some(&first) = range.as_ref().and_then(|r| r.first()) {
            self.view.selected_cell = Some(first);
            self.view.formula_bar_value = self.raw_value(&first).to_string();
        }
        self.view.selected_range = range;
    }

    pub fn set_formula_bar_value(&mut self, text: &str) {
        self.view.formula_bar_value = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_engine::engine::{
        Align, Cell, CellFormatPatch, Value, ValidationKind, ValidationValue,
    };
    use pretty_assertions::assert_eq;

    fn at(id: &str) -> CellRef {
        CellRef::parse(id).unwrap()
    }

    #[test]
    fn test_set_cell_value_evaluates_formulas() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "4");
        sheet.set_cell_value(at("A2"), "=A1*2");
        let a2 = sheet.cell(&at("A2")).unwrap();
        assert_eq!(a2.formula, "=A1*2");
        assert_eq!(a2.computed, Some(Value::Number(8.0)));

        let a1 = sheet.cell(&at("A1")).unwrap();
        assert_eq!(a1.formula, "");
        assert_eq!(a1.computed, None);
        assert!(sheet.modified);
    }

    #[test]
    fn test_dependents_refresh_after_write() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "1");
        sheet.set_cell_value(at("B1"), "=SUM(A1, 1)");
        sheet.set_cell_value(at("A1"), "10");
        assert_eq!(sheet.display_value(&at("B1")), "11");
    }

    #[test]
    fn test_overwriting_formula_with_text_clears_computed() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "=1+1");
        sheet.set_cell_value(at("A1"), "plain");
        let a1 = sheet.cell(&at("A1")).unwrap();
        assert_eq!(a1.formula, "");
        assert_eq!(a1.computed, None);
    }

    #[test]
    fn test_update_format_merges_and_creates_cell() {
        let mut sheet = Sheet::new();
        sheet.update_cell_format(
            at("C3"),
            &CellFormatPatch {
                bold: Some(true),
                ..CellFormatPatch::default()
            },
        );
        sheet.update_cell_format(
            at("C3"),
            &CellFormatPatch {
                align: Some(Align::Center),
                ..CellFormatPatch::default()
            },
        );
        let c3 = sheet.cell(&at("C3")).unwrap();
        assert!(c3.format.bold);
        assert_eq!(c3.format.align, Align::Center);
        assert_eq!(c3.value, "");
    }

    #[test]
    fn test_validation_is_advisory_on_plain_writes() {
        let mut sheet = Sheet::new();
        sheet.set_cell_validation(at("A1"), Validation::new(ValidationKind::Number));
        sheet.set_cell_value(at("A1"), "not a number");
        assert_eq!(sheet.raw_value(&at("A1")), "not a number");
        assert!(!sheet.validate_cell(&at("A1"), "still not").valid);
    }

    #[test]
    fn test_validated_write_rejects_without_mutating() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "5");
        sheet.set_cell_validation(
            at("A1"),
            Validation::new(ValidationKind::Number)
                .with_criteria("greater", ValidationValue::Single("0".to_string())),
        );

        let err = sheet.set_cell_value_validated(at("A1"), "-1").unwrap_err();
        match err {
            SheetError::ValidationFailed { cell, message } => {
                assert_eq!(cell, at("A1"));
                assert_eq!(message, "Value must be greater than 0");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(sheet.raw_value(&at("A1")), "5");

        sheet.set_cell_value_validated(at("A1"), "7").unwrap();
        assert_eq!(sheet.raw_value(&at("A1")), "7");
    }

    #[test]
    fn test_insert_row_shifts_cells_and_headers() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A2"), "two");
        sheet.set_cell_value(at("A3"), "three");
        sheet.set_cell_value(at("B4"), "four");

        sheet.add_row("2");

        assert_eq!(sheet.raw_value(&at("A2")), "two");
        assert_eq!(sheet.cell(&at("A3")), None);
        assert_eq!(sheet.raw_value(&at("A4")), "three");
        assert_eq!(sheet.raw_value(&at("B5")), "four");
        assert_eq!(sheet.rows.len(), 101);
        let ids: Vec<&str> = sheet.rows.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<String> = (1..=101).map(|n| n.to_string()).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(sheet.rows[2].height, 25.0);
    }

    #[test]
    fn test_delete_row_discards_then_shifts() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "one");
        sheet.set_cell_value(at("A2"), "two");
        sheet.set_cell_value(at("C3"), "three");

        sheet.delete_row("2");

        assert_eq!(sheet.raw_value(&at("A1")), "one");
        assert_eq!(sheet.raw_value(&at("C2")), "three");
        assert_eq!(sheet.cell(&at("C3")), None);
        assert_eq!(sheet.cells.len(), 2);
        assert_eq!(sheet.rows.len(), 99);
        assert_eq!(sheet.rows[1].id, "2");
        assert_eq!(sheet.rows[98].id, "99");
    }

    #[test]
    fn test_insert_then_delete_row_is_identity() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "1");
        sheet.set_cell_value(at("A3"), "3");
        sheet.set_cell_value(at("A5"), "=A1+A3");
        sheet.set_cell_value(at("B4"), "text");
        sheet.update_cell_format(
            at("B4"),
            &CellFormatPatch {
                italic: Some(true),
                ..CellFormatPatch::default()
            },
        );
        let before_cells = sheet.cells.clone();
        let before_rows = sheet.rows.clone();

        sheet.add_row("3");
        sheet.delete_row("4");

        assert_eq!(sheet.cells, before_cells);
        assert_eq!(sheet.rows, before_rows);
    }

    #[test]
    fn test_column_insert_and_delete() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "a");
        sheet.set_cell_value(at("B1"), "b");
        sheet.set_cell_value(at("Z2"), "z");

        sheet.add_column("A");
        assert_eq!(sheet.raw_value(&at("A1")), "a");
        assert_eq!(sheet.raw_value(&at("C1")), "b");
        assert_eq!(sheet.raw_value(&at("AA2")), "z");
        assert_eq!(sheet.columns.len(), 27);
        assert_eq!(sheet.columns[1].id, "B");
        assert_eq!(sheet.columns[26].id, "AA");

        sheet.delete_column("A");
        assert_eq!(sheet.cell(&at("A1")), None);
        assert_eq!(sheet.raw_value(&at("B1")), "b");
        assert_eq!(sheet.raw_value(&at("Z2")), "z");
        assert_eq!(sheet.columns.len(), 26);
        assert_eq!(sheet.columns[0].id, "A");
        assert_eq!(sheet.columns[25].id, "Z");
    }

    #[test]
    fn test_relocation_does_not_rewrite_formula_text() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "1");
        sheet.set_cell_value(at("A2"), "2");
        sheet.set_cell_value(at("B1"), "=A2");
        assert_eq!(sheet.display_value(&at("B1")), "2");

        sheet.add_row("1");

        // A2 moved to A3, but B1 still names A2, which is now empty.
        let b1 = sheet.cell(&at("B1")).unwrap();
        assert_eq!(b1.value, "=A2");
        assert_eq!(b1.computed, Some(Value::Number(0.0)));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "x");
        let before_cells: Vec<(CellRef, Cell)> = sheet.cells.clone().into_iter().collect();

        sheet.delete_row("500");
        sheet.add_row("0");
        sheet.delete_column("a");
        sheet.add_column("ZZ");
        sheet.resize_row("nope", 40.0);

        assert_eq!(sheet.cells.clone().into_iter().collect::<Vec<_>>(), before_cells);
        assert_eq!(sheet.rows.len(), 100);
        assert_eq!(sheet.columns.len(), 26);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut sheet = Sheet::new();
        sheet.resize_row("1", 3.0);
        sheet.resize_row("2", 40.0);
        sheet.resize_column("A", 10.0);
        sheet.resize_column("B", 180.0);
        assert_eq!(sheet.rows[0].height, 15.0);
        assert_eq!(sheet.rows[1].height, 40.0);
        assert_eq!(sheet.columns[0].width, 50.0);
        assert_eq!(sheet.columns[1].width, 180.0);
    }

    #[test]
    fn test_resize_keeps_fractional_sizes() {
        let mut sheet = Sheet::new();
        sheet.resize_column("C", 123.5);
        sheet.resize_row("4", 14.5);
        sheet.resize_row("5", f64::NAN);
        assert_eq!(sheet.columns[2].width, 123.5);
        assert_eq!(sheet.rows[3].height, 15.0);
        assert_eq!(sheet.rows[4].height, 15.0);
    }

    #[test]
    fn test_selection_loads_formula_bar() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("B2"), "=1+2");
        sheet.set_selected_cell(Some(at("B2")));
        assert_eq!(sheet.view.formula_bar_value, "=1+2");
        assert_eq!(sheet.view.selected_range, Some(vec![at("B2")]));

        sheet.set_selected_range(Some(vec![at("C1"), at("C2")]));
        assert_eq!(sheet.view.selected_cell, Some(at("C1")));
        assert_eq!(sheet.view.formula_bar_value, "");

        sheet.set_formula_bar_value("typing");
        assert_eq!(sheet.view.formula_bar_value, "typing");

        sheet.set_selected_cell(None);
        assert_eq!(sheet.view.selected_range, None);
        assert_eq!(sheet.view.formula_bar_value, "");
    }
}
