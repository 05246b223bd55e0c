#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Timetable grid extraction.
//!
//! Maps the candidate tables found in a timetable PDF onto the fixed
//! weekday x time-slot [`TimetableGrid`]. Within each table, a row whose
//! first cell is a weekday label selects the current day ([`classify_row`]),
//! and the cells after the first are written into the eight slots by
//! position ([`map_row`]), skipping `BREAK` markers.

use std::path::Path;
use std::sync::Arc;

use timetable_scraper_pdf::{PageTables, PdfError, PdfTableScanner, TableSettings};
use timetable_scraper_schedule_models::progress::ProgressCallback;
use timetable_scraper_schedule_models::{TimeSlot, TimetableGrid, Weekday};

/// Cell text marking a break period; never written to the grid.
pub const BREAK_MARKER: &str = "BREAK";

/// Errors that can occur while extracting a timetable.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The PDF could not be read or scanned.
    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] PdfError),
}

/// Returns the weekday a row starts, if its first cell is a weekday label.
#[must_use]
pub fn classify_row(row: &[String]) -> Option<Weekday> {
    row.first().and_then(|cell| Weekday::from_label(cell))
}

/// Writes the cells of `row` after the first into `day`'s slots.
///
/// Cell `i + 1` goes to slot `i`. Empty cells and `BREAK` (any case) are
/// skipped; anything else overwrites the slot.
pub fn map_row(grid: &mut TimetableGrid, day: Weekday, row: &[String]) {
    for (slot, cell) in TimeSlot::ALL.iter().zip(row.iter().skip(1)) {
        let content = cell.trim();
        if content.is_empty() || content.eq_ignore_ascii_case(BREAK_MARKER) {
            continue;
        }
        grid.set(day, *slot, content);
    }
}

/// Trims every cell and turns missing cells into empty strings.
#[must_use]
pub fn clean_table(table: &[Vec<Option<String>>]) -> Vec<Vec<String>> {
    table
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().map(str::trim).unwrap_or_default().to_owned())
                .collect()
        })
        .collect()
}

/// Applies one table to `grid`.
///
/// The current day starts unset; rows before the first weekday label are
/// ignored, and rows after it without a label of their own continue the
/// current day.
pub fn apply_table(grid: &mut TimetableGrid, table: &[Vec<Option<String>>]) {
    let mut current_day: Option<Weekday> = None;

    for row in clean_table(table) {
        if let Some(day) = classify_row(&row) {
            current_day = Some(day);
        }
        if let Some(day) = current_day {
            map_row(grid, day, &row);
        }
    }
}

/// Builds a fresh grid from the scanned pages, applying every table in
/// page order.
#[must_use]
pub fn build_grid(pages: &[PageTables]) -> TimetableGrid {
    let mut grid = TimetableGrid::new();

    for page in pages {
        for (idx, table) in page.tables.iter().enumerate() {
            log::debug!(
                "Page {} table {}: {} row(s)",
                page.page_number,
                idx + 1,
                table.rows.len()
            );
            apply_table(&mut grid, &table.rows);
        }
    }

    grid
}

/// Extracts a [`TimetableGrid`] from timetable PDFs.
#[derive(Debug, Clone)]
pub struct TimetableExtractor {
    scanner: PdfTableScanner,
}

impl Default for TimetableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableExtractor {
    /// Creates an extractor using [`TableSettings::timetable`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_scanner(PdfTableScanner::new(TableSettings::timetable()))
    }

    /// Creates an extractor around a custom scanner.
    #[must_use]
    pub const fn with_scanner(scanner: PdfTableScanner) -> Self {
        Self { scanner }
    }

    /// Extracts the timetable from an in-memory PDF.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Pdf`] if the PDF cannot be parsed.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<TimetableGrid, ScheduleError> {
        let pages = self.scanner.scan_bytes(bytes, progress)?;
        Ok(Self::grid_from_pages(&pages))
    }

    /// Extracts the timetable from a PDF file.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Pdf`] if the file cannot be read or parsed.
    pub fn extract_file(
        &self,
        path: &Path,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<TimetableGrid, ScheduleError> {
        log::info!("Extracting timetable from {}", path.display());
        let pages = self.scanner.scan_file(path, progress)?;
        Ok(Self::grid_from_pages(&pages))
    }

    fn grid_from_pages(pages: &[PageTables]) -> TimetableGrid {
        let grid = build_grid(pages);
        log::info!(
            "Extracted {} filled slot(s) from {} page(s)",
            grid.filled_count(),
            pages.len()
        );
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use timetable_scraper_pdf::Table;
    use timetable_scraper_pdf::glyphs::BBox;
    use timetable_scraper_schedule_models::progress::null_progress;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| Some((*c).to_owned())).collect()
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    const TIMETABLE: [[&str; 9]; 7] = [
        ["Day", "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5"],
        ["MON", "DBMS", "OS", "CN", "BREAK", "AI", "ML", "LAB", "PE"],
        ["TUE", "CN", "AI", "OS", "BREAK", "DBMS", "ML", "LAB", "SE"],
        ["Wed", "ML", "CN", "DBMS", "BREAK", "OS", "AI", "SE", "PE"],
        ["Thu", "OS", "ML", "AI", "BREAK", "CN", "DBMS", "PE", "LAB"],
        ["Fri", "AI", "DBMS", "ML", "BREAK", "SE", "OS", "CN", "LAB"],
        ["Sat", "SE", "PE", "LAB", "BREAK", "ML", "CN", "AI", "OS"],
    ];

    /// A one-page PDF laying `rows` out as 10pt Helvetica text, 65pt
    /// between columns and 30pt between rows, with no ruling lines.
    fn timetable_pdf(rows: &[[&str; 9]]) -> Vec<u8> {
        use std::fmt::Write as _;

        let mut content = String::from("BT /F1 10 Tf\n");
        for (r, row) in rows.iter().enumerate() {
            let y = 700 - r * 30;
            for (c, text) in row.iter().enumerate() {
                let x = 40 + c * 65;
                writeln!(content, "1 0 0 1 {x} {y} Tm ({text}) Tj").unwrap();
            }
        }
        content.push_str("ET");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_owned(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_owned(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (idx, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            writeln!(pdf, "{} 0 obj\n{object}\nendobj", idx + 1).unwrap();
        }

        let xref = pdf.len();
        writeln!(pdf, "xref\n0 {}\n0000000000 65535 f ", objects.len() + 1).unwrap();
        for offset in offsets {
            writeln!(pdf, "{offset:010} 00000 n ").unwrap();
        }
        writeln!(
            pdf,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%EOF",
            objects.len() + 1
        )
        .unwrap();

        pdf.into_bytes()
    }

    #[test]
    fn weekday_row_switches_current_day() {
        let mut grid = TimetableGrid::new();
        apply_table(
            &mut grid,
            &[
                row(&["MON", "DBMS"]),
                row(&["", "", "OS"]),
                row(&["tue", "CN"]),
                row(&["", "", "AI"]),
            ],
        );

        assert_eq!(grid.get(Weekday::Mon, TimeSlot::NineToTen), "DBMS");
        assert_eq!(grid.get(Weekday::Mon, TimeSlot::TenToEleven), "OS");
        assert_eq!(grid.get(Weekday::Tue, TimeSlot::NineToTen), "CN");
        assert_eq!(grid.get(Weekday::Tue, TimeSlot::TenToEleven), "AI");
        assert_eq!(grid.filled_count(), 4);
    }

    #[test]
    fn mixed_case_labels_select_canonical_rows() {
        let mut grid = TimetableGrid::new();
        apply_table(&mut grid, &[row(&["WED", "X"]), row(&["fri", "Y"])]);
        assert_eq!(grid.get(Weekday::Wed, TimeSlot::NineToTen), "X");
        assert_eq!(grid.get(Weekday::Fri, TimeSlot::NineToTen), "Y");
    }

    #[test]
    fn break_is_never_written() {
        let mut grid = TimetableGrid::new();
        apply_table(
            &mut grid,
            &[row(&[
                "Thu", "ML", "BREAK", "break", " Break ", "", "", "", "LAB",
            ])],
        );

        assert_eq!(grid.get(Weekday::Thu, TimeSlot::NineToTen), "ML");
        assert_eq!(grid.get(Weekday::Thu, TimeSlot::TenToEleven), "");
        assert_eq!(grid.get(Weekday::Thu, TimeSlot::ElevenToTwelve), "");
        assert_eq!(grid.get(Weekday::Thu, TimeSlot::TwelveToOne), "");
        assert_eq!(grid.get(Weekday::Thu, TimeSlot::FourToFive), "LAB");
        assert!(grid.rows().flat_map(|(_, r)| r).all(|c| !c.eq_ignore_ascii_case("break")));
    }

    #[test]
    fn break_does_not_clear_an_earlier_write() {
        let mut grid = TimetableGrid::new();
        apply_table(&mut grid, &[row(&["Sat", "PE"]), row(&["", "BREAK"])]);
        assert_eq!(grid.get(Weekday::Sat, TimeSlot::NineToTen), "PE");
    }

    #[test]
    fn no_matching_rows_leaves_grid_empty() {
        let mut grid = TimetableGrid::new();
        apply_table(
            &mut grid,
            &[
                row(&["Day", "9-10", "10-11"]),
                row(&["Monday", "DBMS"]),
                row(&["", "OS"]),
            ],
        );
        assert!(grid.is_empty());
        assert_eq!(grid, TimetableGrid::new());
    }

    #[test]
    fn later_writes_win() {
        let mut grid = TimetableGrid::new();
        apply_table(&mut grid, &[row(&["MON", "A"]), row(&["MON", "B"])]);
        assert_eq!(grid.get(Weekday::Mon, TimeSlot::NineToTen), "B");
    }

    #[test]
    fn cells_beyond_the_last_slot_are_ignored() {
        let mut grid = TimetableGrid::new();
        map_row(
            &mut grid,
            Weekday::Fri,
            &strings(&["Fri", "1", "2", "3", "4", "5", "6", "7", "8", "9"]),
        );
        assert_eq!(grid.get(Weekday::Fri, TimeSlot::FourToFive), "8");
        assert_eq!(grid.filled_count(), 8);
    }

    #[test]
    fn current_day_resets_between_tables() {
        let page = PageTables {
            page_number: 1,
            tables: vec![
                Table {
                    bbox: BBox {
                        x0: 0.0,
                        top: 0.0,
                        x1: 10.0,
                        bottom: 10.0,
                    },
                    rows: vec![row(&["MON", "A"])],
                },
                Table {
                    bbox: BBox {
                        x0: 0.0,
                        top: 20.0,
                        x1: 10.0,
                        bottom: 30.0,
                    },
                    rows: vec![row(&["", "B"])],
                },
            ],
        };

        let grid = build_grid(&[page]);
        assert_eq!(grid.get(Weekday::Mon, TimeSlot::NineToTen), "A");
        assert_eq!(grid.filled_count(), 1);
    }

    #[test]
    fn missing_cells_are_cleaned_to_empty_strings() {
        let cleaned = clean_table(&[vec![Some(" MON ".to_owned()), None]]);
        assert_eq!(cleaned, vec![strings(&["MON", ""])]);
    }

    #[test]
    fn extracts_a_text_only_timetable_pdf() {
        let pdf = timetable_pdf(&TIMETABLE);
        let grid = TimetableExtractor::new()
            .extract_bytes(&pdf, &null_progress())
            .unwrap();

        assert_eq!(
            grid.row(Weekday::Mon),
            strings(&["DBMS", "OS", "CN", "", "AI", "ML", "LAB", "PE"]).as_slice()
        );
        assert_eq!(grid.get(Weekday::Mon, TimeSlot::NineToTen), "DBMS");
        assert_eq!(grid.get(Weekday::Wed, TimeSlot::TwoToThree), "AI");
        assert_eq!(grid.get(Weekday::Sat, TimeSlot::FourToFive), "OS");
        for day in Weekday::ALL {
            assert_eq!(grid.get(day, TimeSlot::TwelveToOne), "");
        }
        assert_eq!(grid.filled_count(), 6 * 7);
    }

    #[test]
    fn scanner_finds_the_timetable_table() {
        let pdf = timetable_pdf(&TIMETABLE);
        let pages = PdfTableScanner::new(TableSettings::timetable())
            .scan_bytes(&pdf, &null_progress())
            .unwrap();

        assert_eq!(pages.len(), 1);
        let rows: Vec<Vec<String>> = pages[0]
            .tables
            .iter()
            .flat_map(|table| clean_table(&table.rows))
            .collect();
        assert!(rows.iter().any(|row| row.first().is_some_and(|c| c == "MON")));
        assert!(rows.iter().any(|row| row.iter().any(|c| c == "BREAK")));
    }

    #[test]
    fn classify_requires_first_cell() {
        assert_eq!(classify_row(&[]), None);
        assert_eq!(classify_row(&strings(&["", "MON"])), None);
        assert_eq!(classify_row(&strings(&[" Sat "])), Some(Weekday::Sat));
    }
}
