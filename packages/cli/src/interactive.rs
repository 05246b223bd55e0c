//! Menu-driven front end using `dialoguer`, for running the scraper
//! without memorizing subcommands and flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use timetable_scraper_cli_utils::MultiProgress;
use timetable_scraper_schedule_models::Batch;
use timetable_scraper_sheet::{FacultyLayout, registry};

use crate::commands::{self, CommandResult, FacultySource};

/// Top-level actions available in the interactive menu.
enum Action {
    ExtractTimetable,
    ExtractSubjects,
    ExtractFaculty,
    DumpWorkbook,
    ListBatches,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ExtractTimetable,
        Self::ExtractSubjects,
        Self::ExtractFaculty,
        Self::DumpWorkbook,
        Self::ListBatches,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ExtractTimetable => "Extract a batch timetable from a PDF",
            Self::ExtractSubjects => "Extract year-wise course lists",
            Self::ExtractFaculty => "Extract the faculty list",
            Self::DumpWorkbook => "Print a workbook",
            Self::ListBatches => "List batches",
        }
    }
}

fn prompt_path(prompt: &str) -> CommandResult<PathBuf> {
    let raw: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(PathBuf::from(raw.trim()))
}

fn prompt_usize(prompt: &str, default: usize) -> CommandResult<usize> {
    Ok(Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()?)
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub fn run(multi: &MultiProgress) -> CommandResult<()> {
    println!("Batch Timetable Extractor");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::ExtractTimetable => extract_timetable(multi)?,
        Action::ExtractSubjects => {
            commands::subjects(multi, None, None, None)?;
        }
        Action::ExtractFaculty => extract_faculty()?,
        Action::DumpWorkbook => {
            let path = prompt_path("Workbook path")?;
            commands::dump(&path)?;
        }
        Action::ListBatches => commands::batches(),
    }

    Ok(())
}

fn extract_timetable(multi: &MultiProgress) -> CommandResult<()> {
    let pdf = prompt_path("Timetable PDF path")?;

    let batches = Batch::all();
    let names: Vec<String> = batches.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Select your batch")
        .items(&names)
        .default(0)
        .max_length(12)
        .interact()?;
    let batch = batches[idx];

    let export = Confirm::new()
        .with_prompt(format!("Export to timetable_{batch}.xlsx?"))
        .default(true)
        .interact()?;

    commands::timetable(multi, &pdf, batch, None, export)?;
    Ok(())
}

fn extract_faculty() -> CommandResult<()> {
    let mut options: Vec<String> = registry::builtin_layouts()
        .into_iter()
        .filter(|l| l.faculty.is_some())
        .map(|l| l.year)
        .collect();
    let custom_idx = options.len();
    options.push("Another workbook...".to_owned());

    let idx = Select::new()
        .with_prompt("Where is the faculty list?")
        .items(&options)
        .default(0)
        .interact()?;

    let source = if idx == custom_idx {
        let workbook = prompt_path("Workbook path")?;
        let start_row = prompt_usize("First row", 0)?;
        let end_row = prompt_usize("End row (exclusive)", start_row + 20)?;
        let col_start = prompt_usize("First column", 1)?;
        FacultySource::Explicit {
            workbook,
            layout: FacultyLayout::new(start_row, end_row, col_start),
        }
    } else {
        FacultySource::Year(options[idx].clone())
    };

    commands::faculty(source, None, None)?;
    Ok(())
}
