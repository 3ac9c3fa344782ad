//! The persisted sheet document.
//!
//! Mirrors [`Sheet`] with string cell ids and camelCase keys:
//!
//! ```json
//! {
//!   "cells": { "A1": { "id": "A1", "value": "=1+1", "formula": "=1+1",
//!                      "format": { ... }, "computed": 2 } },
//!   "columns": [ { "id": "A", "width": 100 } ],
//!   "rows": [ { "id": "1", "height": 25 } ],
//!   "selectedCell": null, ...
//! }
//! ```

use cellgrid_engine::engine::{Cell, CellFormat, CellRef, Grid, Validation, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::SheetConfig;
use crate::error::Result;
use crate::sheet::{ChartOptions, Column, FindReplaceOptions, Row, Sheet, ViewState};

/// One cell as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub format: CellFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
}

/// The whole sheet as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocument {
    pub cells: BTreeMap<String, CellRecord>,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub selected_cell: Option<String>,
    #[serde(default)]
    pub selected_range: Option<Vec<String>>,
    #[serde(default)]
    pub formula_bar_value: String,
    #[serde(default)]
    pub find_replace_open: bool,
    #[serde(default)]
    pub find_replace_options: FindReplaceOptions,
    #[serde(default)]
    pub is_dragging: bool,
    #[serde(default)]
    pub drag_start_cell: Option<String>,
    #[serde(default)]
    pub chart_open: bool,
    #[serde(default)]
    pub chart_options: ChartOptions,
}

fn parse_ref(id: &str) -> Result<CellRef> {
    Ok(CellRef::parse(id)?)
}

fn parse_refs(ids: &[String]) -> Result<Vec<CellRef>> {
    ids.iter().map(|id| parse_ref(id)).collect()
}

impl SheetDocument {
    pub fn from_sheet(sheet: &Sheet) -> SheetDocument {
        let cells = sheet
            .cells
            .iter()
            .map(|(cell_ref, cell)| {
                let id = cell_ref.to_string();
                let record = CellRecord {
                    id: id.clone(),
                    value: cell.value.clone(),
                    formula: cell.formula.clone(),
                    format: cell.format.clone(),
                    computed: cell.computed.clone(),
                    validation: cell.validation.clone(),
                };
                (id, record)
            })
            .collect();

        let view = &sheet.view;
        let ids = |refs: &[CellRef]| -> Vec<String> { refs.iter().map(|r| r.to_string()).collect() };
        SheetDocument {
            cells,
            columns: sheet.columns.clone(),
            rows: sheet.rows.clone(),
            selected_cell: view.selected_cell.map(|c| c.to_string()),
            selected_range: view.selected_range.as_deref().map(ids),
            formula_bar_value: view.formula_bar_value.clone(),
            find_replace_open: view.find_replace_open,
            find_replace_options: view.find_replace_options.clone(),
            is_dragging: view.is_dragging,
            drag_start_cell: view.drag_start_cell.map(|c| c.to_string()),
            chart_open: view.chart_open,
            chart_options: view.chart_options.clone(),
        }
    }

    /// Build a sheet from this document. Cell map keys must be valid cell ids.
    ///
    /// Formula text is taken from the raw value so the two cannot disagree.
    /// The result is not yet recalculated.
    pub fn into_sheet(self, config: SheetConfig) -> Result<Sheet> {
        let mut cells = Grid::new();
        for (id, record) in self.cells {
            let mut cell = Cell {
                format: record.format,
                computed: record.computed,
                validation: record.validation,
                ..Cell::default()
            };
            cell.value = record.value;
            cell.formula = if cell.is_formula() {
                cell.value.clone()
            } else {
                String::new()
            };
            if !cell.is_formula() {
                cell.computed = None;
            }
            cells.insert(parse_ref(&id)?, cell);
        }

        let view = ViewState {
            selected_cell: self.selected_cell.as_deref().map(parse_ref).transpose()?,
            selected_range: self.selected_range.as_deref().map(parse_refs).transpose()?,
            formula_bar_value: self.formula_bar_value,
            find_replace_open: self.find_replace_open,
            find_replace_options: self.find_replace_options,
            is_dragging: self.is_dragging,
            drag_start_cell: self.drag_start_cell.as_deref().map(parse_ref).transpose()?,
            chart_open: self.chart_open,
            chart_options: self.chart_options,
        };

        let mut sheet = Sheet::with_config(config);
        sheet.cells = cells;
        sheet.columns = self.columns;
        sheet.rows = self.rows;
        sheet.view = view;
        Ok(sheet)
    }
}
