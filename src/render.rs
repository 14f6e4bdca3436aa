//! Plain text rendering of a timetable: intervals as rows, days as columns and one line per
//! room inside every interval.

use crate::data::{Assignment, Day, RoomName, TeacherName};
use crate::projection::{self, Cell, IntervalGrid};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

const MIN_COLUMN_WIDTH: usize = 30;
const CELL_INDENT: usize = 2;

/// Short labels for teachers: the first letters of the first two name components, with a
/// counter appended when two teachers share them (`AP`, `AP2`, ...).
pub fn teacher_initials<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<TeacherName, String> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let base: String = name
                .split_whitespace()
                .take(2)
                .filter_map(|part| part.chars().next())
                .collect();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let initials = if *count == 1 {
                base
            } else {
                format!("{base}{count}")
            };
            (name.to_owned(), initials)
        })
        .collect()
}

pub struct TimetableTable<'a> {
    grid: IntervalGrid,
    days: Vec<Day>,
    rooms: Vec<RoomName>,
    initials: &'a BTreeMap<TeacherName, String>,
}

impl<'a> TimetableTable<'a> {
    pub fn new(assignments: &[Assignment], initials: &'a BTreeMap<TeacherName, String>) -> Self {
        let days: BTreeSet<Day> = assignments.iter().map(|a| a.day).collect();
        // Rooms keep the order in which the search visited them.
        let rooms = assignments.iter().map(|a| &a.room).unique();
        TimetableTable {
            grid: projection::by_interval(assignments),
            days: days.into_iter().collect(),
            rooms: rooms.cloned().collect(),
            initials,
        }
    }

    fn cell_text(&self, room: &str, cell: Option<&Cell>) -> String {
        match cell {
            Some(Some(session)) => {
                let initials = self
                    .initials
                    .get(&session.teacher)
                    .map(String::as_str)
                    .unwrap_or(session.teacher.as_str());
                format!("{} : ({} - {})", session.course, room, initials)
            }
            _ => format!("{room} - empty"),
        }
    }

    fn column_width(&self) -> usize {
        self.grid
            .values()
            .flat_map(|days| days.values())
            .flat_map(|rooms| rooms.iter())
            .map(|(room, cell)| {
                self.cell_text(room, Some(cell)).chars().count() + 2 * CELL_INDENT
            })
            .max()
            .unwrap_or(0)
            .max(MIN_COLUMN_WIDTH)
    }
}

impl fmt::Display for TimetableTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.column_width();
        let delimiter = "-".repeat((width + 1) * (self.days.len() + 1) + 1);

        write!(f, "|{:^width$}", "Interval")?;
        for day in &self.days {
            write!(f, "|{:^width$}", day.name())?;
        }
        writeln!(f, "|")?;
        writeln!(f, "{delimiter}")?;

        for (interval, days) in &self.grid {
            for (line, room) in self.rooms.iter().enumerate() {
                let label = if line == 0 {
                    interval.to_string()
                } else {
                    String::new()
                };
                write!(f, "|{label:^width$}")?;
                for day in &self.days {
                    let cell = days.get(day).and_then(|rooms| rooms.get(room));
                    let text = self.cell_text(room, cell);
                    write!(
                        f,
                        "|{:indent$}{:<rest$}",
                        "",
                        text,
                        indent = CELL_INDENT,
                        rest = width - CELL_INDENT
                    )?;
                }
                writeln!(f, "|")?;
            }
            writeln!(f, "{delimiter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Interval, ScheduledSession};

    #[test]
    fn initials_take_two_components_and_count_collisions() {
        let initials = teacher_initials([
            "Ana Popescu",
            "Andrei Pop",
            "Dan Ionescu",
            "Alex Paul Radu",
            "Plato",
        ]);
        assert_eq!(initials["Ana Popescu"], "AP");
        assert_eq!(initials["Andrei Pop"], "AP2");
        assert_eq!(initials["Alex Paul Radu"], "AP3");
        assert_eq!(initials["Dan Ionescu"], "DI");
        assert_eq!(initials["Plato"], "P");
    }

    #[test]
    fn table_shows_sessions_and_empty_rooms() {
        let interval = Interval::new(8, 10).unwrap();
        let assignments = vec![
            Assignment {
                day: Day::Monday,
                interval,
                room: "EC004".to_owned(),
                session: Some(ScheduledSession {
                    course: "Algebra".to_owned(),
                    teacher: "Ana Popescu".to_owned(),
                }),
            },
            Assignment {
                day: Day::Monday,
                interval,
                room: "EC101".to_owned(),
                session: None,
            },
        ];
        let initials = teacher_initials(["Ana Popescu"]);
        let table = TimetableTable::new(&assignments, &initials).to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Interval") && lines[0].contains("Monday"));
        assert!(lines[2].contains("8-10"));
        assert!(lines[2].contains("Algebra : (EC004 - AP)"));
        assert!(lines[3].contains("EC101 - empty"));
        assert!(lines.iter().all(|l| l.chars().count() == lines[1].len()));
    }
}
