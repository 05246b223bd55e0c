#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output for extracted timetables and course maps: aligned terminal
//! tables ([`console`]), `.xlsx` workbooks ([`xlsx`]), and pretty JSON
//! ([`json`]).

pub mod console;
pub mod json;
pub mod xlsx;

pub use console::{render_course_map, render_grid, render_rows};
pub use json::{COURSE_MAP_INDENT, FACULTY_MAP_INDENT, write_json_pretty};
pub use xlsx::{grid_to_xlsx_buffer, write_grid_xlsx};

/// Errors that can occur while writing output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The workbook could not be built or saved.
    #[error("Workbook export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A value could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
