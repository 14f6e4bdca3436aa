use crate::error::ConfigError;
use crate::projection::DayGrid;
use crate::search::SearchStatus;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// Type aliases for clarity
pub type RoomName = String;
pub type CourseName = String;
pub type TeacherName = String;

/// A teaching day. The derived order is the order of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// Name used both in the input document and in availability tokens.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A teaching window `[start, end)` in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "IntervalRepr", into = "String")]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Result<Self, ConfigError> {
        if start >= end {
            return Err(ConfigError::EmptyInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

/// Accepts `8-10`, `(8, 10)` and `8,10`.
impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedInterval(s.to_owned());
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (start, end) = inner
            .split_once(',')
            .or_else(|| inner.split_once('-'))
            .ok_or_else(malformed)?;
        let start = start.trim().parse().map_err(|_| malformed())?;
        let end = end.trim().parse().map_err(|_| malformed())?;
        Interval::new(start, end)
    }
}

/// The shapes an interval may take in the input document.
#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalRepr {
    Text(String),
    Pair(u32, u32),
    Bounds { start: u32, end: u32 },
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = ConfigError;

    fn try_from(value: IntervalRepr) -> Result<Self, Self::Error> {
        match value {
            IntervalRepr::Text(text) => text.parse(),
            IntervalRepr::Pair(start, end) | IntervalRepr::Bounds { start, end } => {
                Interval::new(start, end)
            }
        }
    }
}

/// Represents a physical room with a given capacity and the courses it is equipped for.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomInput {
    pub capacity: u32,
    pub courses: Vec<CourseName>,
}

/// Represents a teacher with their courses and availability tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeacherInput {
    pub courses: Vec<CourseName>,
    /// Day names, hour ranges such as `8-12`, or negated tokens such as `!Algebra`.
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// The complete input for the timetabling problem.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableInput {
    pub intervals: Vec<Interval>,
    pub days: Vec<Day>,
    /// Weekly volume of every course.
    pub courses: BTreeMap<CourseName, u32>,
    pub teachers: BTreeMap<TeacherName, TeacherInput>,
    /// Kept in document order, which is the room order of the search.
    pub rooms: IndexMap<RoomName, RoomInput>,
}

impl TimetableInput {
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// A teacher giving a course, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScheduledSession {
    pub course: CourseName,
    pub teacher: TeacherName,
}

impl fmt::Display for ScheduledSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.course, self.teacher)
    }
}

/// One slot of the final timetable; `session` is `None` for a slot left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub day: Day,
    pub interval: Interval,
    pub room: RoomName,
    pub session: Option<ScheduledSession>,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub status: SearchStatus,
    pub cost: u32,
    pub iterations: u64,
    pub assignments: Vec<Assignment>,
    pub rejected_teachers: Vec<String>,
    pub timetable: DayGrid,
}
