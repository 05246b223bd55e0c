//! Built-in year layouts, embedded from `layouts/` at compile time via
//! [`include_str!`].

use crate::layout::{YearLayout, parse_layout_toml};

const LAYOUT_TOMLS: &[(&str, &str)] = &[
    ("year1", include_str!("../layouts/year1.toml")),
    ("year2", include_str!("../layouts/year2.toml")),
    ("year3", include_str!("../layouts/year3.toml")),
    ("year4", include_str!("../layouts/year4.toml")),
];

#[cfg(test)]
const EXPECTED_LAYOUT_COUNT: usize = 4;

/// Returns the built-in layouts in year order.
///
/// # Panics
///
/// Panics if an embedded layout is malformed; the files are part of the
/// crate, so this is caught by the tests below.
#[must_use]
pub fn builtin_layouts() -> Vec<YearLayout> {
    LAYOUT_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_layout_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a built-in layout by its year key (case-insensitive).
#[must_use]
pub fn builtin_layout(year: &str) -> Option<YearLayout> {
    builtin_layouts()
        .into_iter()
        .find(|l| l.year.eq_ignore_ascii_case(year.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::layout::SubjectLayout;

    #[test]
    fn loads_all_layouts() {
        assert_eq!(builtin_layouts().len(), EXPECTED_LAYOUT_COUNT);
    }

    #[test]
    fn years_are_unique_and_ordered() {
        let years: Vec<String> = builtin_layouts().into_iter().map(|l| l.year).collect();
        assert_eq!(years, ["Year 1", "Year 2", "Year 3", "Year 4"]);
    }

    #[test]
    fn first_year_has_faculty_list() {
        let layout = builtin_layout("year 1").unwrap();
        assert_eq!(layout.file, "year1.xlsx");
        assert_eq!((layout.start_row, layout.end_row), (148, 163));
        assert_eq!(
            layout.subjects,
            SubjectLayout::SplitColumns {
                code_col: 7,
                subject_col_start: 8
            }
        );
        let faculty = layout.faculty.unwrap();
        assert_eq!((faculty.start_row, faculty.end_row, faculty.col_start), (149, 168, 1));
    }

    #[test]
    fn later_years_share_column_offsets() {
        for layout in builtin_layouts().into_iter().skip(1) {
            assert!(layout.file.ends_with(".xls"), "{}", layout.file);
            assert!(layout.start_row < layout.end_row, "{}", layout.year);
            assert_eq!(
                layout.subjects,
                SubjectLayout::SplitColumns {
                    code_col: 1,
                    subject_col_start: 3
                }
            );
        }
    }

    #[test]
    fn unknown_year_is_none() {
        assert!(builtin_layout("Year 5").is_none());
    }
}
