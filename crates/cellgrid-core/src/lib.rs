//! cellgrid-core - UI-agnostic sheet model + storage.

pub mod config;
pub mod error;
pub mod sheet;
pub mod storage;

pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{
    ChartOptions, ChartOptionsPatch, ChartType, Column, FindReplaceOptions,
    FindReplaceOptionsPatch, MatchOptions, Row, Sheet, ViewState,
};

pub use cellgrid_engine::engine::CellRef;
