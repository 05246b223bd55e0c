//! Positional column scanning.
//!
//! Every function here trusts the sheet layout exactly: rows and columns are
//! addressed by fixed offsets, the first non-empty cell of a scanned column
//! is taken to be its heading, and lists are paired by position with no
//! validation of what they contain.

use timetable_scraper_schedule_models::{CourseSubjectMap, FacultyMap};

use crate::Sheet;

/// Number of header rows above the data rows. Row offsets in layouts count
/// from the first row below the header.
pub const HEADER_ROWS: usize = 1;

/// Heading above the faculty list in year layouts.
pub const DEFAULT_FACULTY_HEADING: &str = "Faculty Abbreviation with Names";

/// Separators between a faculty code and name.
pub const FACULTY_SEPARATORS: [char; 3] = ['-', ':', ';'];

/// Separator after which a course code carries an alternate code.
pub const COURSE_CODE_SEPARATOR: char = '/';

/// A half-open window of data rows, `start..end`, counted below the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Absolute sheet rows covered by this window.
    pub fn sheet_rows(self) -> impl Iterator<Item = usize> {
        (self.start + HEADER_ROWS)..(self.end.max(self.start) + HEADER_ROWS)
    }
}

/// Non-empty cells of `col` within `window`, top to bottom.
#[must_use]
pub fn non_empty_cells(sheet: &Sheet, window: RowWindow, col: usize) -> Vec<String> {
    window
        .sheet_rows()
        .map(|row| sheet.cell(row, col))
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Scans one column: the first non-empty cell in `window` is a heading and
/// is skipped, every later non-empty cell is returned.
#[must_use]
pub fn scan_column(sheet: &Sheet, window: RowWindow, col: usize) -> Vec<String> {
    non_empty_cells(sheet, window, col)
        .into_iter()
        .skip(1)
        .collect()
}

/// Course codes from the single column `code_col`.
#[must_use]
pub fn course_codes(sheet: &Sheet, window: RowWindow, code_col: usize) -> Vec<String> {
    scan_column(sheet, window, code_col)
}

/// Subject names from every column at or right of `subject_col_start`, in
/// column order.
#[must_use]
pub fn subject_names(sheet: &Sheet, window: RowWindow, subject_col_start: usize) -> Vec<String> {
    (subject_col_start..sheet.width())
        .flat_map(|col| scan_column(sheet, window, col))
        .collect()
}

/// Truncates a course code at its first `/`, trimming the remainder.
/// Codes without a `/` are returned unchanged.
#[must_use]
pub fn refine_course_code(code: &str) -> String {
    code.split_once(COURSE_CODE_SEPARATOR)
        .map_or_else(|| code.to_owned(), |(head, _)| head.trim().to_owned())
}

/// Applies [`refine_course_code`] to every code.
#[must_use]
pub fn refine_course_codes(codes: &[String]) -> Vec<String> {
    codes.iter().map(|c| refine_course_code(c)).collect()
}

/// Pairs codes with subjects by position. The excess of the longer list is
/// dropped; a repeated code keeps its last subject.
#[must_use]
pub fn pair_codes_with_subjects(codes: &[String], subjects: &[String]) -> CourseSubjectMap {
    if codes.len() != subjects.len() {
        log::debug!(
            "Pairing {} code(s) with {} subject(s); dropping {} unpaired",
            codes.len(),
            subjects.len(),
            codes.len().abs_diff(subjects.len())
        );
    }

    codes
        .iter()
        .cloned()
        .zip(subjects.iter().cloned())
        .collect()
}

/// Pairs code column `code_col_start + k` with subject column
/// `subject_col_start + k` for every `k` where both columns exist. Within a
/// pair, the non-empty cells are zipped; codes are refined.
#[must_use]
pub fn paired_columns(
    sheet: &Sheet,
    window: RowWindow,
    code_col_start: usize,
    subject_col_start: usize,
) -> CourseSubjectMap {
    let width = sheet.width();
    let mut map = CourseSubjectMap::new();

    for (code_col, subject_col) in (code_col_start..width).zip(subject_col_start..width) {
        let codes = non_empty_cells(sheet, window, code_col);
        let subjects = non_empty_cells(sheet, window, subject_col);

        for (code, subject) in codes.iter().zip(subjects) {
            map.insert(refine_course_code(code), subject);
        }
    }

    map
}

/// Faculty entries below `heading`.
///
/// Every column at or right of `col_start` is searched within `window`. In
/// each column containing a cell equal to `heading`, every later non-empty
/// cell is an entry; columns are concatenated left to right.
#[must_use]
pub fn faculty_entries(
    sheet: &Sheet,
    window: RowWindow,
    col_start: usize,
    heading: &str,
) -> Vec<String> {
    let mut entries = Vec::new();
    let mut found = false;

    for col in col_start..sheet.width() {
        let cells = non_empty_cells(sheet, window, col);
        if let Some(pos) = cells.iter().position(|c| c == heading) {
            log::debug!("Found faculty heading in column {col}");
            found = true;
            entries.extend(cells.into_iter().skip(pos + 1));
        }
    }

    if !found {
        log::warn!("Faculty heading '{heading}' not found");
    }

    entries
}

/// Splits `code<sep>name` into its trimmed halves.
///
/// Each separator in [`FACULTY_SEPARATORS`] is located at its first
/// occurrence, and the split happens at the right-most of those positions.
/// Returns `None` when no separator is present.
#[must_use]
pub fn split_faculty_entry(entry: &str) -> Option<(String, String)> {
    let idx = FACULTY_SEPARATORS
        .iter()
        .filter_map(|&sep| entry.find(sep))
        .max()?;

    let (code, rest) = entry.split_at(idx);
    let name = &rest[1..];
    Some((code.trim().to_owned(), name.trim().to_owned()))
}

/// Builds the faculty map, skipping entries without a separator. A repeated
/// code keeps its last name.
#[must_use]
pub fn faculty_map(entries: &[String]) -> FacultyMap {
    let mut map = FacultyMap::new();

    for entry in entries {
        match split_faculty_entry(entry) {
            Some((code, name)) => {
                map.insert(code, name);
            }
            None => log::warn!("Separator not found in faculty entry: {entry}"),
        }
    }

    map
}
