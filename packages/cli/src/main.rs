#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line timetable and course scraper.
//!
//! Extracts a weekly timetable from a PDF and exports it as `.xlsx`, and
//! pulls course and faculty lists out of year workbooks as JSON. Run with a
//! subcommand for scripted use, or without one for an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via
//! [`timetable_scraper_cli_utils::init_logger`]) to route `log` output
//! through `indicatif::MultiProgress` so that log lines and progress bars
//! never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use timetable_scraper_cli_utils::MultiProgress;
use timetable_scraper_schedule_models::Batch;
use timetable_scraper_sheet::FacultyLayout;

use commands::{CommandResult, FacultySource};

#[derive(Parser)]
#[command(
    name = "timetable_scraper",
    about = "Timetable, course, and faculty scraper"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the weekly timetable from a PDF and export it as .xlsx
    Timetable {
        /// Timetable PDF
        pdf: PathBuf,
        /// Batch the export is labelled with (A1-A18, B1-B18, C1-C3)
        #[arg(long, default_value = "A1")]
        batch: Batch,
        /// Export path (default: `timetable_<batch>.xlsx`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the timetable without exporting it
        #[arg(long)]
        no_export: bool,
    },
    /// Extract year-wise course code to subject maps as JSON
    Subjects {
        /// TOML file with a `[[layouts]]` array replacing the built-in layouts
        #[arg(long)]
        layouts: Option<PathBuf>,
        /// Directory holding the year workbooks (overrides `TIMETABLES_DIR`)
        #[arg(long)]
        timetables_dir: Option<PathBuf>,
        /// JSON output path (default: `year_wise_data.json`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract the faculty code to name map as JSON
    Faculty {
        /// Workbook holding the faculty list. Omit when using `--year`.
        #[arg(required_unless_present = "year", conflicts_with = "year")]
        workbook: Option<PathBuf>,
        /// Use a built-in year layout instead (e.g., "Year 1")
        #[arg(long)]
        year: Option<String>,
        /// First data row to search
        #[arg(long, default_value = "149")]
        start_row: usize,
        /// End of the rows to search (exclusive)
        #[arg(long, default_value = "168")]
        end_row: usize,
        /// First column to search
        #[arg(long, default_value = "1")]
        col_start: usize,
        /// Directory holding the year workbooks (overrides `TIMETABLES_DIR`)
        #[arg(long)]
        timetables_dir: Option<PathBuf>,
        /// JSON output path (default: `$DATA_DIR/teachers.json`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the first worksheet of a workbook
    Dump {
        /// Workbook (.xls, .xlsx, .xlsm, .xlsb, .ods)
        workbook: PathBuf,
    },
    /// List every batch identifier
    Batches,
}

fn run(command: Commands, multi: &MultiProgress) -> CommandResult<()> {
    match command {
        Commands::Timetable {
            pdf,
            batch,
            output,
            no_export,
        } => {
            commands::timetable(multi, &pdf, batch, output, !no_export)?;
        }
        Commands::Subjects {
            layouts,
            timetables_dir,
            output,
        } => {
            commands::subjects(multi, layouts.as_deref(), timetables_dir, output)?;
        }
        Commands::Faculty {
            workbook,
            year,
            start_row,
            end_row,
            col_start,
            timetables_dir,
            output,
        } => {
            let source = match (year, workbook) {
                (Some(year), _) => FacultySource::Year(year),
                (None, Some(workbook)) => FacultySource::Explicit {
                    workbook,
                    layout: FacultyLayout::new(start_row, end_row, col_start),
                },
                (None, None) => return Err("Either a workbook or --year is required".into()),
            };
            commands::faculty(source, timetables_dir, output)?;
        }
        Commands::Dump { workbook } => commands::dump(&workbook)?,
        Commands::Batches => commands::batches(),
    }

    Ok(())
}

fn main() -> ExitCode {
    let multi = timetable_scraper_cli_utils::init_logger();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(command) => run(command, &multi),
        None => interactive::run(&multi),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::report_failure(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn timetable_defaults_to_batch_a1_with_export() {
        let cli = Cli::try_parse_from(["timetable_scraper", "timetable", "tt.pdf"]).unwrap();
        let Some(Commands::Timetable {
            pdf,
            batch,
            output,
            no_export,
        }) = cli.command
        else {
            panic!("expected timetable command");
        };
        assert_eq!(pdf, PathBuf::from("tt.pdf"));
        assert_eq!(batch.to_string(), "A1");
        assert!(output.is_none());
        assert!(!no_export);
    }

    #[test]
    fn rejects_out_of_range_batch() {
        let result =
            Cli::try_parse_from(["timetable_scraper", "timetable", "tt.pdf", "--batch", "C4"]);
        assert!(result.is_err());
    }

    #[test]
    fn faculty_requires_workbook_or_year() {
        assert!(Cli::try_parse_from(["timetable_scraper", "faculty"]).is_err());
        assert!(Cli::try_parse_from(["timetable_scraper", "faculty", "--year", "Year 1"]).is_ok());
        assert!(Cli::try_parse_from(["timetable_scraper", "faculty", "year1.xlsx"]).is_ok());
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["timetable_scraper"]).unwrap();
        assert!(cli.command.is_none());
    }
}
