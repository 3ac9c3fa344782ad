use super::Sheet;
use cellgrid_engine::engine::{CellRef, evaluate_formula};

impl Sheet {
    /// Re-evaluate every formula cell.
    ///
    /// Pass one marks formula cells dirty; pass two walks the grid in
    /// row-major order and evaluates each dirty cell against the grid as it
    /// stands at that moment. A formula that reads a cell visited later in
    /// the same sweep sees that cell's previous result. There is no
    /// dependency ordering and no cycle detection.
    pub fn recalculate(&mut self) {
        let mut formulas = 0usize;
        for cell in self.cells.values_mut() {
            if cell.is_formula() {
                cell.dirty = true;
                formulas += 1;
            }
        }

        let keys: Vec<CellRef> = self.cells.keys().copied().collect();
        for key in keys {
            let Some(body) = self
                .cells
                .get(&key)
                .filter(|cell| cell.dirty)
                .and_then(|cell| cell.formula_body())
                .map(str::to_string)
            else {
                continue;
            };
            let computed = evaluate_formula(&body, &self.cells);
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.computed = computed;
                cell.dirty = false;
            }
        }

        tracing::debug!(formulas, "recalculated sheet");
    }
}
