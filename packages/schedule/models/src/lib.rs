#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Timetable grid, weekday, time slot, and course mapping types.
//!
//! This crate defines the shapes shared by every stage of the scraper: the
//! fixed 6 x 8 [`TimetableGrid`] produced from PDF timetables, the
//! code-to-name dictionaries produced from spreadsheet layouts, and the
//! student [`Batch`] identifiers used to label exports.

pub mod progress;

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Course code to subject name, in the order the codes appear in the sheet.
///
/// Re-inserting a code replaces its subject but keeps its first position.
pub type CourseSubjectMap = IndexMap<String, String>;

/// Academic year label (e.g. `"Year 1"`) to that year's course map.
pub type YearWiseMaps = IndexMap<String, CourseSubjectMap>;

/// Faculty abbreviation to full name, in sheet order.
pub type FacultyMap = IndexMap<String, String>;

/// One of the six weekday rows of a timetable.
///
/// Parsing is ASCII case-insensitive, so `"wed"`, `"WED"` and `"Wed"` all
/// resolve to [`Weekday::Wed`]. Display uses the label printed in the
/// source timetables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    #[strum(serialize = "MON")]
    #[serde(rename = "MON")]
    Mon,
    #[strum(serialize = "TUE")]
    #[serde(rename = "TUE")]
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All weekdays in row order.
    pub const ALL: [Self; 6] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
    ];

    /// Row index of this weekday within a [`TimetableGrid`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Matches a raw table cell against the weekday labels.
    ///
    /// Surrounding whitespace is ignored and the comparison is
    /// case-insensitive. Returns `None` for anything else.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::from_str(label.trim()).ok()
    }
}

/// One of the eight hourly time-slot columns of a timetable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimeSlot {
    #[strum(serialize = "9-10")]
    #[serde(rename = "9-10")]
    NineToTen,
    #[strum(serialize = "10-11")]
    #[serde(rename = "10-11")]
    TenToEleven,
    #[strum(serialize = "11-12")]
    #[serde(rename = "11-12")]
    ElevenToTwelve,
    #[strum(serialize = "12-1")]
    #[serde(rename = "12-1")]
    TwelveToOne,
    #[strum(serialize = "1-2")]
    #[serde(rename = "1-2")]
    OneToTwo,
    #[strum(serialize = "2-3")]
    #[serde(rename = "2-3")]
    TwoToThree,
    #[strum(serialize = "3-4")]
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[strum(serialize = "4-5")]
    #[serde(rename = "4-5")]
    FourToFive,
}

impl TimeSlot {
    /// All time slots in column order.
    pub const ALL: [Self; 8] = [
        Self::NineToTen,
        Self::TenToEleven,
        Self::ElevenToTwelve,
        Self::TwelveToOne,
        Self::OneToTwo,
        Self::TwoToThree,
        Self::ThreeToFour,
        Self::FourToFive,
    ];

    /// Column index of this slot within a [`TimetableGrid`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the slot at column `index`, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A weekday x time-slot timetable.
///
/// Every cell starts as the empty string. Writes overwrite whatever was
/// there before; there is no history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimetableGrid {
    cells: [[String; TimeSlot::ALL.len()]; Weekday::ALL.len()],
}

impl TimetableGrid {
    /// Creates a grid with every cell empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content of one cell.
    #[must_use]
    pub fn get(&self, day: Weekday, slot: TimeSlot) -> &str {
        &self.cells[day.index()][slot.index()]
    }

    /// Overwrites one cell.
    pub fn set(&mut self, day: Weekday, slot: TimeSlot, content: impl Into<String>) {
        self.cells[day.index()][slot.index()] = content.into();
    }

    /// Returns the eight cells of one weekday row in slot order.
    #[must_use]
    pub fn row(&self, day: Weekday) -> &[String] {
        &self.cells[day.index()]
    }

    /// Iterates over `(weekday, row)` pairs in row order.
    pub fn rows(&self) -> impl Iterator<Item = (Weekday, &[String])> {
        Weekday::ALL
            .iter()
            .map(|&day| (day, self.cells[day.index()].as_slice()))
    }

    /// Whether every cell is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(String::is_empty)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }
}

/// The lettered group a [`Batch`] belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum BatchGroup {
    A,
    B,
    C,
}

impl BatchGroup {
    /// All groups in display order.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Highest batch number in this group.
    #[must_use]
    pub const fn max_number(self) -> u8 {
        match self {
            Self::A | Self::B => 18,
            Self::C => 3,
        }
    }
}

/// A student batch such as `A7` or `C2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Batch {
    /// Lettered group.
    pub group: BatchGroup,
    /// Number within the group, starting at 1.
    pub number: u8,
}

impl Batch {
    /// Returns every valid batch, grouped by letter then ascending number.
    #[must_use]
    pub fn all() -> Vec<Self> {
        BatchGroup::ALL
            .iter()
            .flat_map(|&group| (1..=group.max_number()).map(move |number| Self { group, number }))
            .collect()
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.group, self.number)
    }
}

/// Error returned when a string does not name a valid [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBatchError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidBatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid batch '{}': expected A1-A18, B1-B18, or C1-C3",
            self.value
        )
    }
}

impl std::error::Error for InvalidBatchError {}

impl FromStr for Batch {
    type Err = InvalidBatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || InvalidBatchError {
            value: s.to_owned(),
        };

        let (letter, digits) = trimmed.split_at_checked(1).ok_or_else(err)?;
        let group = BatchGroup::from_str(&letter.to_ascii_uppercase()).map_err(|_| err())?;
        let number: u8 = digits.parse().map_err(|_| err())?;

        if number == 0 || number > group.max_number() {
            return Err(err());
        }

        Ok(Self { group, number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_labels_match_case_insensitively() {
        assert_eq!(Weekday::from_label("MON"), Some(Weekday::Mon));
        assert_eq!(Weekday::from_label("mon"), Some(Weekday::Mon));
        assert_eq!(Weekday::from_label(" WED "), Some(Weekday::Wed));
        assert_eq!(Weekday::from_label("sat"), Some(Weekday::Sat));
        assert_eq!(Weekday::from_label("Monday"), None);
        assert_eq!(Weekday::from_label("SUN"), None);
        assert_eq!(Weekday::from_label(""), None);
    }

    #[test]
    fn weekday_display_uses_source_labels() {
        let labels: Vec<String> = Weekday::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["MON", "TUE", "Wed", "Thu", "Fri", "Sat"]);
    }

    #[test]
    fn time_slot_labels_are_in_column_order() {
        let labels: Vec<&str> = TimeSlot::ALL.iter().map(AsRef::as_ref).collect();
        assert_eq!(
            labels,
            ["9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5"]
        );
        assert_eq!(TimeSlot::from_index(3), Some(TimeSlot::TwelveToOne));
        assert_eq!(TimeSlot::from_index(8), None);
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = TimetableGrid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.filled_count(), 0);
        for (_, row) in grid.rows() {
            assert_eq!(row.len(), 8);
            assert!(row.iter().all(String::is_empty));
        }
    }

    #[test]
    fn grid_set_overwrites() {
        let mut grid = TimetableGrid::new();
        grid.set(Weekday::Thu, TimeSlot::OneToTwo, "DBMS");
        grid.set(Weekday::Thu, TimeSlot::OneToTwo, "OS LAB");
        assert_eq!(grid.get(Weekday::Thu, TimeSlot::OneToTwo), "OS LAB");
        assert_eq!(grid.filled_count(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn maps_keep_insertion_order() {
        let mut map = FacultyMap::new();
        map.insert("ZK".to_owned(), "Zara Khan".to_owned());
        map.insert("AB".to_owned(), "Alice Brown".to_owned());
        map.insert("ZK".to_owned(), "Zoe King".to_owned());

        let entries: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, [("ZK", "Zoe King"), ("AB", "Alice Brown")]);
    }

    #[test]
    fn all_batches_are_listed() {
        let batches = Batch::all();
        assert_eq!(batches.len(), 39);
        assert_eq!(batches[0].to_string(), "A1");
        assert_eq!(batches[17].to_string(), "A18");
        assert_eq!(batches[18].to_string(), "B1");
        assert_eq!(batches[38].to_string(), "C3");
    }

    #[test]
    fn parses_batches() {
        assert_eq!(
            "a7".parse::<Batch>(),
            Ok(Batch {
                group: BatchGroup::A,
                number: 7
            })
        );
        assert!("C3".parse::<Batch>().is_ok());
        assert!("C4".parse::<Batch>().is_err());
        assert!("B19".parse::<Batch>().is_err());
        assert!("A0".parse::<Batch>().is_err());
        assert!("D1".parse::<Batch>().is_err());
        assert!("".parse::<Batch>().is_err());
    }
}
