//! Plain-text tables for the terminal.

use timetable_scraper_schedule_models::{CourseSubjectMap, TimeSlot, TimetableGrid};

/// Renders rows as left-aligned columns separated by two spaces. Short rows
/// are padded with empty cells.
#[must_use]
pub fn render_rows(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut col_widths = vec![0; width];

    for row in rows {
        for (w, cell) in col_widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            col_widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = row.get(i).map_or("", String::as_str);
                    format!("{cell:<w$}")
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The grid as rows: a header of time-slot labels under an empty corner,
/// then one row per weekday with its label first.
#[must_use]
pub fn grid_rows(grid: &TimetableGrid) -> Vec<Vec<String>> {
    let header = std::iter::once(String::new())
        .chain(TimeSlot::ALL.iter().map(ToString::to_string))
        .collect();

    std::iter::once(header)
        .chain(grid.rows().map(|(day, cells)| {
            std::iter::once(day.to_string())
                .chain(cells.iter().cloned())
                .collect()
        }))
        .collect()
}

#[must_use]
pub fn render_grid(grid: &TimetableGrid) -> String {
    render_rows(&grid_rows(grid))
}

/// Renders a course map as `code  subject` lines under a heading.
#[must_use]
pub fn render_course_map(title: &str, map: &CourseSubjectMap) -> String {
    let rows: Vec<Vec<String>> = map
        .iter()
        .map(|(code, subject)| vec![code.clone(), subject.clone()])
        .collect();

    if rows.is_empty() {
        format!("{title}\n(no courses)")
    } else {
        format!("{title}\n{}", render_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use timetable_scraper_schedule_models::Weekday;

    #[test]
    fn aligns_columns() {
        let text = render_rows(&[
            vec!["a".to_owned(), "bb".to_owned()],
            vec!["ccc".to_owned()],
        ]);
        assert_eq!(text, "a    bb\nccc");
    }

    #[test]
    fn grid_has_header_and_day_rows() {
        let mut grid = TimetableGrid::new();
        grid.set(Weekday::Tue, TimeSlot::TwoToThree, "DBMS");

        let rows = grid_rows(&grid);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0][0], "");
        assert_eq!(rows[0][1], "9-10");
        assert_eq!(rows[0][8], "4-5");
        assert_eq!(rows[2][0], "TUE");
        assert_eq!(rows[2][6], "DBMS");
        assert_eq!(rows[3][0], "Wed");

        let text = render_grid(&grid);
        assert!(text.lines().nth(2).is_some_and(|l| l.starts_with("TUE") && l.ends_with("DBMS")));
    }

    #[test]
    fn empty_course_map_says_so() {
        assert_eq!(
            render_course_map("Year 2", &CourseSubjectMap::new()),
            "Year 2\n(no courses)"
        );
    }
}
