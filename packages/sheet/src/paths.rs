//! Canonical input and output locations.
//!
//! Inputs live under the timetables directory and generated data under the
//! data directory. Both default to directories in the current working
//! directory and can be moved with environment variables.

use std::path::PathBuf;

/// Overrides [`timetables_dir`].
pub const TIMETABLES_DIR_ENV: &str = "TIMETABLES_DIR";

/// Overrides [`data_dir`].
pub const DATA_DIR_ENV: &str = "DATA_DIR";

fn dir_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Returns the directory year workbooks are read from.
#[must_use]
pub fn timetables_dir() -> PathBuf {
    dir_from_env(TIMETABLES_DIR_ENV, "timetables")
}

/// Returns the directory generated data is written to.
#[must_use]
pub fn data_dir() -> PathBuf {
    dir_from_env(DATA_DIR_ENV, "data")
}

/// Returns the default year-wise course map output path.
#[must_use]
pub fn year_wise_data_path() -> PathBuf {
    PathBuf::from("year_wise_data.json")
}

/// Returns the default faculty map output path.
#[must_use]
pub fn teachers_path() -> PathBuf {
    data_dir().join("teachers.json")
}

/// Returns the default export path for a batch timetable.
#[must_use]
pub fn timetable_export_path(batch: &str) -> PathBuf {
    PathBuf::from(format!("timetable_{batch}.xlsx"))
}
