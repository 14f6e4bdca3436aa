use thiserror::Error;

/// Problems with the timetable definition itself. Any of these aborts the solve before the
/// search starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to parse timetable: {0}")]
    Parse(String),

    #[error("interval '{0}' is not of the form 'start-end'")]
    MalformedInterval(String),

    #[error("interval {start}-{end} must start before it ends")]
    EmptyInterval { start: u32, end: u32 },

    #[error("intervals {first} and {second} overlap")]
    OverlappingIntervals { first: String, second: String },

    #[error("the timetable has no {0}")]
    Missing(&'static str),

    #[error("room '{0}' has zero capacity")]
    ZeroCapacity(String),

    #[error("room '{room}' hosts unknown course '{course}'")]
    UnknownRoomCourse { room: String, course: String },

    #[error("teacher '{teacher}' teaches unknown course '{course}'")]
    UnknownTeacherCourse { teacher: String, course: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

/// A single availability token that could not be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("hour range '{0}' is not of the form 'lo-hi'")]
    MalformedRange(String),

    #[error("hour range '{token}' has a non-numeric bound '{bound}'")]
    NonNumericBound { token: String, bound: String },
}

/// Availability tokens of a teacher were rejected; the teacher gets no domain entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("availability of teacher '{teacher}' rejected: {source}")]
pub struct RejectedTeacher {
    pub teacher: String,
    #[source]
    pub source: AvailabilityError,
}
