#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Course, subject, and faculty extraction from year workbooks.
//!
//! Workbooks are opened with [`calamine`] and flattened into a [`Sheet`] of
//! display strings. Extraction is purely positional: a [`YearLayout`]
//! names the rows and columns to scan, and the functions in [`scan`] apply
//! the column heuristics.

pub mod layout;
pub mod paths;
pub mod registry;
pub mod scan;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calamine::{Data, Range, Reader, Sheets};
use timetable_scraper_schedule_models::progress::ProgressCallback;
use timetable_scraper_schedule_models::{CourseSubjectMap, FacultyMap, YearWiseMaps};

pub use layout::{FacultyLayout, SubjectLayout, YearLayout};

/// Errors that can occur while reading workbooks or layouts.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The workbook could not be opened or parsed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The workbook has no worksheets.
    #[error("Workbook {0} has no worksheets")]
    NoWorksheet(PathBuf),

    /// A layouts file is malformed.
    #[error("Layout error: {0}")]
    Layout(#[from] toml::de::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A worksheet as a dense grid of trimmed display strings, addressed by
/// absolute (zero-based) row and column. Empty cells are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Sheet {
    /// Builds a sheet from rows of cells. Rows may have different lengths;
    /// missing cells read as empty.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.trim().to_owned()).collect())
            .collect();
        Self { rows, width }
    }

    /// Flattens a calamine range, keeping absolute positions: cells above
    /// or left of the range's start read as empty.
    #[must_use]
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((last_row, last_col)) = range.end() else {
            return Self::default();
        };

        let rows = (0..=last_row)
            .map(|row| {
                (0..=last_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self::from_rows(rows)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (the length of the longest row).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The cell at `(row, col)`, or `""` when out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

fn first_sheet<RS>(workbook: &mut Sheets<RS>, origin: &Path) -> Result<Sheet, SheetError>
where
    RS: std::io::Read + std::io::Seek,
{
    if let Some(name) = workbook.sheet_names().first() {
        log::debug!("Reading worksheet '{name}' from {}", origin.display());
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet(origin.to_path_buf()))??;

    Ok(Sheet::from_range(&range))
}

/// Opens a workbook (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.ods`) and reads
/// its first worksheet.
///
/// # Errors
///
/// Returns [`SheetError::Workbook`] if the file cannot be opened or is not a
/// supported format, or [`SheetError::NoWorksheet`] if it is empty.
pub fn open_first_sheet(path: &Path) -> Result<Sheet, SheetError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    first_sheet(&mut workbook, path)
}

/// Reads the first worksheet of an in-memory workbook.
///
/// # Errors
///
/// Same as [`open_first_sheet`].
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Sheet, SheetError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    first_sheet(&mut workbook, Path::new("<memory>"))
}

/// Reads a layouts file holding a `[[layouts]]` array.
///
/// # Errors
///
/// Returns [`SheetError::Io`] if the file cannot be read or
/// [`SheetError::Layout`] if it is malformed.
pub fn load_layouts(path: &Path) -> Result<Vec<YearLayout>, SheetError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(layout::parse_layout_set_toml(&contents)?)
}

/// Extracts one year's course map from its workbook under `timetables_dir`.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read.
pub fn course_subject_map(
    layout: &YearLayout,
    timetables_dir: &Path,
) -> Result<CourseSubjectMap, SheetError> {
    let path = timetables_dir.join(&layout.file);
    log::info!("Reading {} from {}", layout.year, path.display());
    let sheet = open_first_sheet(&path)?;
    Ok(layout.course_subject_map(&sheet))
}

/// Extracts the course maps of every layout, keyed by year.
///
/// A year whose workbook cannot be read is logged and left out; it never
/// fails the whole run.
#[must_use]
pub fn year_wise_maps(
    layouts: &[YearLayout],
    timetables_dir: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> YearWiseMaps {
    progress.set_total(layouts.len() as u64);

    let mut maps = YearWiseMaps::new();

    for layout in layouts {
        progress.set_message(layout.year.clone());

        match course_subject_map(layout, timetables_dir) {
            Ok(map) => {
                log::info!("{}: {} course(s)", layout.year, map.len());
                maps.insert(layout.year.clone(), map);
            }
            Err(e) => log::error!("Error processing {}: {e}", layout.year),
        }

        progress.inc(1);
    }

    progress.finish(format!("Extracted {} of {} year(s)", maps.len(), layouts.len()));

    maps
}

/// Extracts the faculty map from a workbook.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read.
pub fn faculty_map(path: &Path, layout: &FacultyLayout) -> Result<FacultyMap, SheetError> {
    log::info!("Reading faculty list from {}", path.display());
    let sheet = open_first_sheet(path)?;
    Ok(layout.faculty_map(&sheet))
}
