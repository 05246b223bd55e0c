//! Year layout definitions.
//!
//! A layout names a workbook and the fixed offsets of its course block (and
//! optionally its faculty list). Layouts are plain TOML, deserialized
//! with [`serde`]; see `layouts/` for the built-in set.

use serde::Deserialize;
use timetable_scraper_schedule_models::{CourseSubjectMap, FacultyMap};

use crate::Sheet;
use crate::scan::{
    self, DEFAULT_FACULTY_HEADING, RowWindow, course_codes, paired_columns,
    pair_codes_with_subjects, refine_course_codes, subject_names,
};

/// Where one year's course and faculty data live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearLayout {
    /// Key in the year-wise output, e.g. `"Year 1"`.
    pub year: String,
    /// Workbook path, relative to the timetables directory.
    pub file: String,
    /// First data row of the course block (inclusive).
    pub start_row: usize,
    /// End of the course block (exclusive).
    pub end_row: usize,
    pub subjects: SubjectLayout,
    #[serde(default)]
    pub faculty: Option<FacultyLayout>,
}

/// How course codes and subject names are laid out in the course block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SubjectLayout {
    /// Codes in a single column, subjects in every column from
    /// `subject_col_start` rightwards.
    SplitColumns {
        code_col: usize,
        subject_col_start: usize,
    },
    /// Code and subject columns paired one-to-one, starting at the given
    /// columns.
    PairedColumns {
        code_col_start: usize,
        subject_col_start: usize,
    },
}

/// Where the faculty list lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacultyLayout {
    pub start_row: usize,
    pub end_row: usize,
    #[serde(default = "default_col_start")]
    pub col_start: usize,
    #[serde(default = "default_heading")]
    pub heading: String,
}

const fn default_col_start() -> usize {
    1
}

fn default_heading() -> String {
    DEFAULT_FACULTY_HEADING.to_owned()
}

impl FacultyLayout {
    /// A layout searching `start_row..end_row` from `col_start` for the
    /// default heading.
    #[must_use]
    pub fn new(start_row: usize, end_row: usize, col_start: usize) -> Self {
        Self {
            start_row,
            end_row,
            col_start,
            heading: default_heading(),
        }
    }

    #[must_use]
    pub const fn window(&self) -> RowWindow {
        RowWindow::new(self.start_row, self.end_row)
    }

    /// Extracts the faculty map this layout describes from `sheet`.
    #[must_use]
    pub fn faculty_map(&self, sheet: &Sheet) -> FacultyMap {
        let entries = scan::faculty_entries(sheet, self.window(), self.col_start, &self.heading);
        log::debug!("Found {} faculty entr(ies)", entries.len());
        scan::faculty_map(&entries)
    }
}

impl YearLayout {
    #[must_use]
    pub const fn window(&self) -> RowWindow {
        RowWindow::new(self.start_row, self.end_row)
    }

    /// Extracts this year's course code to subject name map from `sheet`.
    #[must_use]
    pub fn course_subject_map(&self, sheet: &Sheet) -> CourseSubjectMap {
        let window = self.window();

        match self.subjects {
            SubjectLayout::SplitColumns {
                code_col,
                subject_col_start,
            } => {
                let codes = refine_course_codes(&course_codes(sheet, window, code_col));
                let subjects = subject_names(sheet, window, subject_col_start);
                log::debug!(
                    "{}: {} code(s), {} subject(s)",
                    self.year,
                    codes.len(),
                    subjects.len()
                );
                pair_codes_with_subjects(&codes, &subjects)
            }
            SubjectLayout::PairedColumns {
                code_col_start,
                subject_col_start,
            } => paired_columns(sheet, window, code_col_start, subject_col_start),
        }
    }
}

/// A set of layouts, as written in a user layouts file:
///
/// ```toml
/// [[layouts]]
/// year = "Year 1"
/// ...
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSet {
    pub layouts: Vec<YearLayout>,
}

/// Parses a single year layout.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_layout_toml(toml_str: &str) -> Result<YearLayout, toml::de::Error> {
    toml::de::from_str(toml_str)
}

/// Parses a layouts file holding a `[[layouts]]` array.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_layout_set_toml(toml_str: &str) -> Result<Vec<YearLayout>, toml::de::Error> {
    toml::de::from_str::<LayoutSet>(toml_str).map(|set| set.layouts)
}
