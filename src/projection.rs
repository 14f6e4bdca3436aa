//! Regrouping of a flat solution into nested grids for presentation.

use crate::data::{Assignment, Day, Interval, RoomName, ScheduledSession};
use crate::domain::{Problem, Session};
use std::collections::BTreeMap;

/// `None` marks a room left empty.
pub type Cell = Option<ScheduledSession>;
pub type DayGrid = BTreeMap<Day, BTreeMap<Interval, BTreeMap<RoomName, Cell>>>;
pub type IntervalGrid = BTreeMap<Interval, BTreeMap<Day, BTreeMap<RoomName, Cell>>>;

/// Names every variable of `problem` with its value in `solution`. Without a solution every
/// slot is empty.
pub fn assignments(
    problem: &Problem<'_>,
    solution: Option<&[Option<Session>]>,
) -> Vec<Assignment> {
    let timetable = problem.timetable;
    problem
        .variables
        .iter()
        .enumerate()
        .map(|(i, variable)| Assignment {
            day: variable.day,
            interval: variable.interval,
            room: timetable.room(variable.room).name.clone(),
            session: solution
                .and_then(|values| values.get(i).copied().flatten())
                .map(|session| ScheduledSession {
                    course: timetable.course(session.course).name.clone(),
                    teacher: timetable.teacher(session.teacher).name.clone(),
                }),
        })
        .collect()
}

pub fn by_day(assignments: &[Assignment]) -> DayGrid {
    let mut grid = DayGrid::new();
    for a in assignments {
        grid.entry(a.day)
            .or_default()
            .entry(a.interval)
            .or_default()
            .insert(a.room.clone(), a.session.clone());
    }
    grid
}

pub fn by_interval(assignments: &[Assignment]) -> IntervalGrid {
    let mut grid = IntervalGrid::new();
    for a in assignments {
        grid.entry(a.interval)
            .or_default()
            .entry(a.day)
            .or_default()
            .insert(a.room.clone(), a.session.clone());
    }
    grid
}
