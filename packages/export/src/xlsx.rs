//! Timetable workbooks.
//!
//! The sheet mirrors a labelled table: `A1` is empty, row 1 holds the time
//! slots, and column A holds the weekday labels.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use timetable_scraper_schedule_models::{TimeSlot, TimetableGrid};

use crate::ExportError;

const SHEET_NAME: &str = "Sheet1";

fn build_workbook(grid: &TimetableGrid) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let label_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    for (col, slot) in (1_u16..).zip(TimeSlot::ALL) {
        worksheet.write_string_with_format(0, col, slot.to_string(), &label_format)?;
    }

    for (row, (day, cells)) in (1_u32..).zip(grid.rows()) {
        worksheet.write_string_with_format(row, 0, day.to_string(), &label_format)?;
        for (col, cell) in (1_u16..).zip(cells) {
            if !cell.is_empty() {
                worksheet.write_string(row, col, cell)?;
            }
        }
    }

    Ok(workbook)
}

/// Serializes the grid to an in-memory `.xlsx` file.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be assembled.
pub fn grid_to_xlsx_buffer(grid: &TimetableGrid) -> Result<Vec<u8>, ExportError> {
    Ok(build_workbook(grid)?.save_to_buffer()?)
}

/// Writes the grid to an `.xlsx` file at `path`.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be assembled or
/// written.
pub fn write_grid_xlsx(grid: &TimetableGrid, path: &Path) -> Result<(), ExportError> {
    build_workbook(grid)?.save(path)?;
    log::info!("Wrote timetable to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use timetable_scraper_schedule_models::Weekday;

    #[test]
    fn buffer_is_a_zip_archive() {
        let mut grid = TimetableGrid::new();
        grid.set(Weekday::Mon, TimeSlot::NineToTen, "DBMS");

        let bytes = grid_to_xlsx_buffer(&grid).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_grid_still_exports() {
        assert!(!grid_to_xlsx_buffer(&TimetableGrid::new()).unwrap().is_empty());
    }
}
