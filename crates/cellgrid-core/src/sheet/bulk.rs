use super::Sheet;
use super::state::{ChartOptionsPatch, FindReplaceOptionsPatch, MatchOptions};
use cellgrid_engine::engine::CellRef;
use regex::{NoExpand, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Joins a row's values into its duplicate-detection key.
const ROW_KEY_SEPARATOR: &str = "|";

impl Sheet {
    /// Replace `find` with `replace` in raw values.
    ///
    /// Searches the cells in `ids` (missing ones are skipped), or every cell
    /// when `ids` is `None`. Whole-cell mode swaps the entire value on an exact
    /// match; otherwise every occurrence of `find` is replaced literally.
    /// Returns the number of cells changed; the sheet is only recalculated if
    /// that is non-zero.
    pub fn find_and_replace(
        &mut self,
        find: &str,
        replace: &str,
        options: MatchOptions,
        ids: Option<&[CellRef]>,
    ) -> usize {
        if find.is_empty() {
            return 0;
        }

        let targets: BTreeSet<CellRef> = match ids {
            Some(ids) => ids.iter().copied().collect(),
            None => self.cells.keys().copied().collect(),
        };

        let pattern = match RegexBuilder::new(&regex::escape(find))
            .case_insensitive(!options.match_case)
            .build()
        {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::warn!(error = %err, "find text cannot be searched");
                return 0;
            }
        };
        let find_lower = find.to_lowercase();

        let mut changed = 0;
        for cell_ref in targets {
            let Some(cell) = self.cells.get_mut(&cell_ref) else {
                continue;
            };
            if cell.value.is_empty() {
                continue;
            }

            let new_value = if options.match_entire_cell {
                let matches = if options.match_case {
                    cell.value == find
                } else {
                    cell.value.to_lowercase() == find_lower
                };
                if !matches {
                    continue;
                }
                replace.to_string()
            } else {
                let replaced = pattern.replace_all(&cell.value, NoExpand(replace));
                if replaced == cell.value {
                    continue;
                }
                replaced.into_owned()
            };

            cell.set_raw(&new_value);
            cell.computed = None;
            changed += 1;
        }

        if changed > 0 {
            tracing::debug!(changed, "find and replace");
            self.modified = true;
            self.recalculate();
        }
        changed
    }

    /// Blank every row of `range` whose values repeat an earlier row's.
    ///
    /// Rows are compared by their selected cells' raw values in column order.
    /// The first occurrence is kept; cells of later duplicates lose their value
    /// and computed result but keep format and validation. Needs at least two
    /// selected cells. Returns the number of rows blanked.
    pub fn remove_duplicates(&mut self, range: &[CellRef]) -> usize {
        if range.len() < 2 {
            return 0;
        }

        // Selected, existing cells grouped by row, rows in first-seen order.
        let mut row_order: Vec<usize> = Vec::new();
        let mut rows: HashMap<usize, BTreeMap<usize, CellRef>> = HashMap::new();
        for cell_ref in range {
            if !self.cells.contains_key(cell_ref) {
                continue;
            }
            rows.entry(cell_ref.row)
                .or_insert_with(|| {
                    row_order.push(cell_ref.row);
                    BTreeMap::new()
                })
                .insert(cell_ref.col, *cell_ref);
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates: Vec<usize> = Vec::new();
        for row in &row_order {
            let key = rows[row]
                .values()
                .map(|cell_ref| self.raw_value(cell_ref))
                .collect::<Vec<_>>()
                .join(ROW_KEY_SEPARATOR);
            if !seen.insert(key) {
                duplicates.push(*row);
            }
        }
        if duplicates.is_empty() {
            return 0;
        }

        for row in &duplicates {
            for cell_ref in rows[row].values() {
                if let Some(cell) = self.cells.get_mut(cell_ref) {
                    cell.set_raw("");
                    cell.computed = None;
                }
            }
        }

        tracing::debug!(rows = duplicates.len(), "removed duplicate rows");
        self.modified = true;
        self.recalculate();
        duplicates.len()
    }

    pub fn toggle_find_replace(&mut self) {
        self.view.find_replace_open = !self.view.find_replace_open;
    }

    pub fn update_find_replace_options(&mut self, patch: FindReplaceOptionsPatch) {
        let options = &mut self.view.find_replace_options;
        if let Some(find_text) = patch.find_text {
            options.find_text = find_text;
        }
        if let Some(replace_text) = patch.replace_text {
            options.replace_text = replace_text;
        }
        if let Some(match_case) = patch.match_case {
            options.match_case = match_case;
        }
        if let Some(match_entire_cell) = patch.match_entire_cell {
            options.match_entire_cell = match_entire_cell;
        }
    }

    /// Run find/replace with the dialog's options over the selected range,
    /// or the whole sheet when nothing is selected.
    pub fn find_and_replace_text(&mut self) -> usize {
        let options = self.view.find_replace_options.clone();
        let range = self.view.selected_range.clone();
        self.find_and_replace(
            &options.find_text,
            &options.replace_text,
            options.match_options(),
            range.as_deref(),
        )
    }

    /// [`Sheet::remove_duplicates`] over the selected range.
    pub fn remove_duplicate_rows(&mut self) -> usize {
        let Some(range) = self.view.selected_range.clone() else {
            return 0;
        };
        self.remove_duplicates(&range)
    }

    pub fn toggle_chart(&mut self) {
        self.view.chart_open = !self.view.chart_open;
    }

    pub fn update_chart_options(&mut self, patch: ChartOptionsPatch) {
        let options = &mut self.view.chart_options;
        if let Some(kind) = patch.kind {
            options.kind = kind;
        }
        if let Some(title) = patch.title {
            options.title = title;
        }
        if let Some(data_range) = patch.data_range {
            options.data_range = data_range;
        }
        if let Some(label_range) = patch.label_range {
            options.label_range = label_range;
        }
    }

    /// Close the chart dialog. Rendering happens elsewhere.
    pub fn create_chart(&mut self) {
        self.view.chart_open = false;
    }
}
