//! Sheet state and logic (UI-agnostic).

mod bulk;
mod fill;
mod io;
mod ops;
mod recalc;
mod state;

pub use state::{
    ChartOptions, ChartOptionsPatch, ChartType, Column, FindReplaceOptions,
    FindReplaceOptionsPatch, MIN_COLUMN_WIDTH, MIN_ROW_HEIGHT, MatchOptions, Row, Sheet,
    ViewState,
};
