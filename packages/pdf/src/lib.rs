#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF table extraction for timetable documents.
//!
//! Timetables are published as PDFs whose tables have no ruling lines, so
//! the page text itself has to reveal the grid. This crate collects
//! positioned glyphs with [`pdf_extract`] ([`glyphs`]), groups them into
//! words ([`words`]), and detects tables from text alignment
//! ([`text_table`]) under a fixed set of geometric tolerances
//! ([`TableSettings`]).
//!
//! The primary entry point is [`PdfTableScanner`], which turns a whole PDF
//! into the candidate tables of each page.

pub mod glyphs;
pub mod text_table;
pub mod words;

use std::path::Path;
use std::sync::Arc;

use timetable_scraper_schedule_models::progress::ProgressCallback;

pub use text_table::Table;
use words::WordOptions;

/// Errors specific to PDF table extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The document could not be parsed or its content streams could not
    /// be interpreted.
    #[error("PDF extraction error: {0}")]
    Extraction(#[from] pdf_extract::OutputError),

    /// The document is encrypted with a non-empty password.
    #[error("PDF is password protected")]
    Encrypted,

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Geometric tolerances for table detection, all in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Tolerances for grouping glyphs into words.
    pub word_options: WordOptions,
    /// Vertical edges closer than this are snapped together.
    pub snap_x_tolerance: f64,
    /// Horizontal edges closer than this are snapped together.
    pub snap_y_tolerance: f64,
    /// Collinear vertical edges with gaps up to this are joined.
    pub join_x_tolerance: f64,
    /// Collinear horizontal edges with gaps up to this are joined.
    pub join_y_tolerance: f64,
    /// Edges shorter than this are discarded.
    pub edge_min_length: f64,
    /// Minimum words sharing an alignment to imply a vertical edge.
    pub min_words_vertical: usize,
    /// Minimum words sharing a top to imply a horizontal edge.
    pub min_words_horizontal: usize,
    /// How far apart horizontally two edges may be and still intersect.
    pub intersection_x_tolerance: f64,
    /// How far apart vertically two edges may be and still intersect.
    pub intersection_y_tolerance: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            word_options: WordOptions::default(),
            snap_x_tolerance: 3.0,
            snap_y_tolerance: 3.0,
            join_x_tolerance: 3.0,
            join_y_tolerance: 3.0,
            edge_min_length: 3.0,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_x_tolerance: 3.0,
            intersection_y_tolerance: 3.0,
        }
    }
}

impl TableSettings {
    /// Settings tuned for timetable PDFs: default tolerances with loose
    /// (10pt) intersection tolerances, since text-derived edges rarely meet
    /// exactly.
    #[must_use]
    pub fn timetable() -> Self {
        Self {
            intersection_x_tolerance: 10.0,
            intersection_y_tolerance: 10.0,
            ..Self::default()
        }
    }
}

/// The tables detected on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTables {
    /// One-based page number.
    pub page_number: u32,
    /// Tables top to bottom, then left to right.
    pub tables: Vec<Table>,
}

/// Scans PDFs for tables with a fixed [`TableSettings`].
#[derive(Debug, Clone, Default)]
pub struct PdfTableScanner {
    settings: TableSettings,
}

impl PdfTableScanner {
    /// Creates a scanner using the given settings.
    #[must_use]
    pub const fn new(settings: TableSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings this scanner detects tables with.
    #[must_use]
    pub const fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Reads and scans a PDF file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read, or any error
    /// from [`Self::scan_bytes`].
    pub fn scan_file(
        &self,
        path: &Path,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<PageTables>, PdfError> {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.scan_bytes(&bytes, progress)
    }

    /// Scans an in-memory PDF, returning the tables of every page in page
    /// order.
    ///
    /// Encrypted documents open only when their user password is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Encrypted`] if the document needs a password, or
    /// [`PdfError::Extraction`] if it cannot be parsed.
    pub fn scan_bytes(
        &self,
        bytes: &[u8],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<PageTables>, PdfError> {
        let doc =
            pdf_extract::Document::load_mem(bytes).map_err(pdf_extract::OutputError::from)?;

        // Loading already decrypts documents whose password is empty.
        if doc.is_encrypted() && doc.encryption_state.is_none() {
            return Err(PdfError::Encrypted);
        }

        let mut collector = glyphs::GlyphCollector::default();
        pdf_extract::output_doc(&doc, &mut collector)?;
        let pages = collector.into_pages();

        progress.set_total(pages.len() as u64);

        let scanned: Vec<PageTables> = pages
            .into_iter()
            .map(|page| {
                let tables = text_table::find_tables(&page.glyphs, &self.settings);
                log::debug!(
                    "Page {}: {} glyph(s), {} table(s)",
                    page.page_number,
                    page.glyphs.len(),
                    tables.len()
                );
                progress.inc(1);
                PageTables {
                    page_number: page.page_number,
                    tables,
                }
            })
            .collect();

        progress.finish(format!("Scanned {} page(s)", scanned.len()));

        Ok(scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use timetable_scraper_schedule_models::progress::null_progress;

    #[test]
    fn timetable_settings_loosen_intersections_only() {
        let settings = TableSettings::timetable();
        let defaults = TableSettings::default();
        assert!((settings.intersection_x_tolerance - 10.0).abs() < f64::EPSILON);
        assert!((settings.intersection_y_tolerance - 10.0).abs() < f64::EPSILON);
        assert!((settings.snap_x_tolerance - defaults.snap_x_tolerance).abs() < f64::EPSILON);
        assert_eq!(settings.min_words_vertical, 3);
        assert_eq!(settings.min_words_horizontal, 1);
    }

    #[test]
    fn rejects_bytes_that_are_not_a_pdf() {
        let scanner = PdfTableScanner::new(TableSettings::timetable());
        let result = scanner.scan_bytes(b"definitely not a pdf", &null_progress());
        assert!(matches!(result, Err(PdfError::Extraction(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let scanner = PdfTableScanner::default();
        let result = scanner.scan_file(Path::new("does/not/exist.pdf"), &null_progress());
        assert!(matches!(result, Err(PdfError::Io(_))));
    }
}
