use super::Sheet;
use cellgrid_engine::engine::{CellRef, evaluate_formula};

impl Sheet {
    /// Start a fill gesture from `source`.
    pub fn begin_fill(&mut self, source: CellRef) {
        self.view.is_dragging = true;
        self.view.drag_start_cell = Some(source);
    }

    /// Finish the pending fill gesture onto `target`.
    ///
    /// Copies the source's raw value, formula and format (not its validation)
    /// into the target, creating it if needed. Formulas are evaluated at the
    /// target; other values carry the source's computed result. The gesture
    /// is cleared and the sheet recalculated whether or not anything was
    /// copied. Returns whether a cell was written.
    pub fn commit_fill(&mut self, target: CellRef) -> bool {
        let pending = self.view.is_dragging.then_some(self.view.drag_start_cell).flatten();
        let source = pending
            .filter(|&source| source != target)
            .and_then(|source| self.cells.get(&source))
            .cloned();

        let copied = if let Some(source) = source {
            let cell = self.cell_mut_or_default(target);
            cell.value = source.value.clone();
            cell.formula = source.formula.clone();
            cell.format = source.format.clone();
            cell.computed = source.computed.clone();

            if let Some(body) = source.formula_body() {
                let computed = evaluate_formula(body, &self.cells);
                if let Some(cell) = self.cells.get_mut(&target) {
                    cell.computed = computed;
                }
            }
            self.modified = true;
            true
        } else {
            false
        };

        self.cancel_fill();
        self.recalculate();
        copied
    }

    /// Abandon the pending fill gesture without touching any cell.
    pub fn cancel_fill(&mut self) {
        self.view.is_dragging = false;
        self.view.drag_start_cell = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_engine::engine::{
        CellFormatPatch, Value, Validation, ValidationKind,
    };
    use pretty_assertions::assert_eq;

    fn at(id: &str) -> CellRef {
        CellRef::parse(id).unwrap()
    }

    #[test]
    fn test_fill_copies_value_formula_and_format() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "2");
        sheet.set_cell_value(at("B1"), "=A1*3");
        sheet.update_cell_format(
            at("B1"),
            &CellFormatPatch {
                bold: Some(true),
                ..CellFormatPatch::default()
            },
        );
        sheet.set_cell_validation(at("B1"), Validation::new(ValidationKind::Number));

        sheet.begin_fill(at("B1"));
        assert!(sheet.commit_fill(at("B2")));

        let b2 = sheet.cell(&at("B2")).unwrap();
        assert_eq!(b2.value, "=A1*3");
        assert_eq!(b2.formula, "=A1*3");
        assert!(b2.format.bold);
        assert_eq!(b2.computed, Some(Value::Number(6.0)));
        assert_eq!(b2.validation, None);
        assert!(!sheet.view.is_dragging);
        assert_eq!(sheet.view.drag_start_cell, None);
    }

    #[test]
    fn test_fill_without_pending_gesture_does_nothing() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "x");
        assert!(!sheet.commit_fill(at("A2")));
        assert_eq!(sheet.cell(&at("A2")), None);
    }

    #[test]
    fn test_fill_onto_source_or_from_empty_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "x");
        sheet.begin_fill(at("A1"));
        assert!(!sheet.commit_fill(at("A1")));
        assert!(!sheet.view.is_dragging);

        sheet.begin_fill(at("C3"));
        assert!(!sheet.commit_fill(at("C4")));
        assert_eq!(sheet.cell(&at("C4")), None);
    }

    #[test]
    fn test_cancel_fill_keeps_cells() {
        let mut sheet = Sheet::new();
        sheet.set_cell_value(at("A1"), "x");
        sheet.begin_fill(at("A1"));
        sheet.cancel_fill();
        assert!(!sheet.commit_fill(at("A2")));
        assert_eq!(sheet.cell(&at("A2")), None);
    }
}
