//! Subcommand implementations shared by the flag-driven and interactive
//! front ends.

use std::path::{Path, PathBuf};

use timetable_scraper_cli_utils::{IndicatifProgress, MultiProgress};
use timetable_scraper_export::{
    COURSE_MAP_INDENT, FACULTY_MAP_INDENT, render_course_map, render_grid, render_rows,
    write_grid_xlsx, write_json_pretty,
};
use timetable_scraper_schedule::TimetableExtractor;
use timetable_scraper_schedule_models::{Batch, FacultyMap, TimetableGrid, YearWiseMaps};
use timetable_scraper_sheet::{
    FacultyLayout, YearLayout, load_layouts, open_first_sheet, paths, registry, year_wise_maps,
};

pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Shown after any failure.
pub const TROUBLESHOOTING_TIPS: &str = "Troubleshooting tips:
  1. Ensure the PDF is not password protected
  2. Check if the PDF contains readable text (not scanned)
  3. Make sure the file matches the expected timetable structure";

/// Heading and grid as printed for `batch`. Empty grids still show every
/// label.
#[must_use]
pub fn timetable_report(batch: Batch, grid: &TimetableGrid) -> String {
    format!("Timetable for batch {batch}\n\n{}", render_grid(grid))
}

/// Extracts a timetable, prints it, and exports it for `batch` unless
/// `export` is false.
///
/// The grid is printed and exported even when every cell is empty; a
/// warning is logged in that case.
///
/// # Errors
///
/// Returns an error if the PDF cannot be read or the export fails.
pub fn timetable(
    multi: &MultiProgress,
    pdf: &Path,
    batch: Batch,
    output: Option<PathBuf>,
    export: bool,
) -> CommandResult<TimetableGrid> {
    let progress = IndicatifProgress::pages_bar(multi, "Processing PDF...");
    let grid = TimetableExtractor::new().extract_file(pdf, &progress)?;

    println!("{}", timetable_report(batch, &grid));

    if grid.is_empty() {
        log::warn!("No data found in the timetable");
    }

    if export {
        let path = output.unwrap_or_else(|| paths::timetable_export_path(&batch.to_string()));
        write_grid_xlsx(&grid, &path)?;
        println!();
        println!("Saved {}", path.display());
    }

    Ok(grid)
}

/// Resolves the layouts to use: a user file when given, else the built-in
/// set.
///
/// # Errors
///
/// Returns an error if the layouts file cannot be read or parsed.
pub fn resolve_layouts(layouts: Option<&Path>) -> CommandResult<Vec<YearLayout>> {
    match layouts {
        Some(path) => {
            log::info!("Using layouts from {}", path.display());
            Ok(load_layouts(path)?)
        }
        None => Ok(registry::builtin_layouts()),
    }
}

/// Extracts the year-wise course maps, prints them, and writes them as
/// JSON.
///
/// # Errors
///
/// Returns an error if the layouts cannot be loaded or the JSON cannot be
/// written. Unreadable year workbooks are logged and skipped.
pub fn subjects(
    multi: &MultiProgress,
    layouts: Option<&Path>,
    timetables_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CommandResult<YearWiseMaps> {
    let layouts = resolve_layouts(layouts)?;
    let dir = timetables_dir.unwrap_or_else(paths::timetables_dir);

    let progress = IndicatifProgress::steps_bar(multi, "Years", layouts.len() as u64);
    let maps = year_wise_maps(&layouts, &dir, &progress);

    for (year, map) in &maps {
        println!("{}", render_course_map(year, map));
        println!();
    }

    let path = output.unwrap_or_else(paths::year_wise_data_path);
    write_json_pretty(&maps, &path, COURSE_MAP_INDENT)?;
    println!("Saved {}", path.display());

    Ok(maps)
}

/// Where to find the faculty list.
#[derive(Debug, Clone)]
pub enum FacultySource {
    /// A built-in year layout, read from the timetables directory.
    Year(String),
    /// An explicit workbook and window.
    Explicit {
        workbook: PathBuf,
        layout: FacultyLayout,
    },
}

impl FacultySource {
    fn resolve(self, timetables_dir: &Path) -> CommandResult<(PathBuf, FacultyLayout)> {
        match self {
            Self::Explicit { workbook, layout } => Ok((workbook, layout)),
            Self::Year(year) => {
                let layout = registry::builtin_layout(&year)
                    .ok_or_else(|| format!("No built-in layout for '{year}'"))?;
                let faculty = layout
                    .faculty
                    .ok_or_else(|| format!("{} has no faculty list", layout.year))?;
                Ok((timetables_dir.join(layout.file), faculty))
            }
        }
    }
}

/// Extracts the faculty map, prints it, and writes it as JSON.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read, the year has no
/// faculty layout, or the JSON cannot be written.
pub fn faculty(
    source: FacultySource,
    timetables_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CommandResult<FacultyMap> {
    let dir = timetables_dir.unwrap_or_else(paths::timetables_dir);
    let (workbook, layout) = source.resolve(&dir)?;

    let map = timetable_scraper_sheet::faculty_map(&workbook, &layout)?;
    if map.is_empty() {
        log::warn!("No faculty entries found in {}", workbook.display());
    }

    let rows: Vec<Vec<String>> = map
        .iter()
        .map(|(code, name)| vec![code.clone(), name.clone()])
        .collect();
    println!("{}", render_rows(&rows));

    let path = output.unwrap_or_else(paths::teachers_path);
    write_json_pretty(&map, &path, FACULTY_MAP_INDENT)?;
    println!("Saved {}", path.display());

    Ok(map)
}

/// Prints the first worksheet of a workbook.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read.
pub fn dump(workbook: &Path) -> CommandResult<()> {
    let sheet = open_first_sheet(workbook)?;
    log::info!(
        "{}: {} row(s) x {} column(s)",
        workbook.display(),
        sheet.height(),
        sheet.width()
    );
    println!("{}", render_rows(sheet.rows()));
    Ok(())
}

/// Prints every batch identifier, one group per line.
pub fn batches() {
    let all = Batch::all();
    for group in timetable_scraper_schedule_models::BatchGroup::ALL {
        let names: Vec<String> = all
            .iter()
            .filter(|b| b.group == group)
            .map(ToString::to_string)
            .collect();
        println!("{}", names.join(" "));
    }
}

/// Logs a failure and prints it once with the troubleshooting tips.
pub fn report_failure(err: &dyn std::error::Error) {
    log::error!("{err}");
    eprintln!("Error processing the file: {err}");
    eprintln!();
    eprintln!("{TROUBLESHOOTING_TIPS}");
}

#[cfg(test)]
mod tests {
    use super::*;

    use timetable_scraper_export::grid_to_xlsx_buffer;
    use timetable_scraper_schedule_models::{TimeSlot, Weekday};
    use timetable_scraper_sheet::read_first_sheet;

    #[test]
    fn exported_timetable_reads_back_with_labels() {
        let mut grid = TimetableGrid::new();
        grid.set(Weekday::Mon, TimeSlot::NineToTen, "DBMS");
        grid.set(Weekday::Sat, TimeSlot::FourToFive, "Sports");

        let sheet = read_first_sheet(grid_to_xlsx_buffer(&grid).unwrap()).unwrap();

        assert_eq!(sheet.cell(0, 0), "");
        assert_eq!(sheet.cell(0, 1), "9-10");
        assert_eq!(sheet.cell(0, 8), "4-5");
        assert_eq!(sheet.cell(1, 0), "MON");
        assert_eq!(sheet.cell(1, 1), "DBMS");
        assert_eq!(sheet.cell(6, 0), "Sat");
        assert_eq!(sheet.cell(6, 8), "Sports");
        assert_eq!(sheet.cell(3, 4), "");
    }

    #[test]
    fn empty_timetable_report_still_shows_the_grid() {
        let report = timetable_report("B4".parse().unwrap(), &TimetableGrid::new());
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Timetable for batch B4");
        assert_eq!(lines[1], "");
        assert_eq!(lines.len(), 2 + 7);
        assert!(lines[2].contains("9-10") && lines[2].contains("4-5"));
        assert_eq!(lines[3].trim_end(), "MON");
        assert_eq!(lines[8].trim_end(), "Sat");
    }

    #[test]
    fn default_layouts_are_builtin() {
        let layouts = resolve_layouts(None).unwrap();
        assert_eq!(layouts, registry::builtin_layouts());
    }

    #[test]
    fn unknown_year_is_rejected() {
        let result = FacultySource::Year("Year 7".to_owned()).resolve(Path::new("t"));
        assert!(result.is_err());
    }

    #[test]
    fn year_without_faculty_list_is_rejected() {
        let result = FacultySource::Year("Year 2".to_owned()).resolve(Path::new("t"));
        assert!(result.is_err());
    }

    #[test]
    fn first_year_faculty_resolves_under_timetables_dir() {
        let (path, layout) = FacultySource::Year("Year 1".to_owned())
            .resolve(Path::new("t"))
            .unwrap();
        assert_eq!(path, Path::new("t").join("year1.xlsx"));
        assert_eq!(layout, FacultyLayout::new(149, 168, 1));
    }
}
