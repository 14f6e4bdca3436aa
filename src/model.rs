//! Validated, index-based view of a [`TimetableInput`].
//!
//! Rooms are numbered in document order. Courses and teachers are numbered in identifier order,
//! so comparing their ids gives the same order as comparing names.

use crate::data::{CourseName, Day, Interval, RoomName, TeacherName, TimetableInput};
use crate::error::ConfigError;
use itertools::Itertools;
use std::collections::HashMap;

pub type RoomId = u32;
pub type CourseId = u32;
pub type TeacherId = u32;

#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    pub capacity: u32,
    pub courses: Vec<CourseId>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub name: CourseName,
    pub volume: u32,
}

#[derive(Debug, Clone)]
pub struct Teacher {
    pub name: TeacherName,
    pub courses: Vec<CourseId>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Timetable {
    pub days: Vec<Day>,
    pub intervals: Vec<Interval>,
    pub rooms: Vec<Room>,
    pub courses: Vec<Course>,
    pub teachers: Vec<Teacher>,
}

impl Timetable {
    pub fn from_input(input: &TimetableInput) -> Result<Self, ConfigError> {
        if input.days.is_empty() {
            return Err(ConfigError::Missing("days"));
        }
        if input.intervals.is_empty() {
            return Err(ConfigError::Missing("intervals"));
        }
        if input.rooms.is_empty() {
            return Err(ConfigError::Missing("rooms"));
        }
        if let Some((first, second)) = input
            .intervals
            .iter()
            .tuple_combinations()
            .find(|(a, b)| a.overlaps(b))
        {
            return Err(ConfigError::OverlappingIntervals {
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        let course_ids: HashMap<&str, CourseId> = input
            .courses
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i as CourseId))
            .collect();
        let courses = input
            .courses
            .iter()
            .map(|(name, volume)| Course {
                name: name.clone(),
                volume: *volume,
            })
            .collect();

        let mut rooms = Vec::with_capacity(input.rooms.len());
        for (name, room) in &input.rooms {
            if room.capacity == 0 {
                return Err(ConfigError::ZeroCapacity(name.clone()));
            }
            let courses = room
                .courses
                .iter()
                .map(|course| {
                    course_ids.get(course.as_str()).copied().ok_or_else(|| {
                        ConfigError::UnknownRoomCourse {
                            room: name.clone(),
                            course: course.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rooms.push(Room {
                name: name.clone(),
                capacity: room.capacity,
                courses,
            });
        }

        let mut teachers = Vec::with_capacity(input.teachers.len());
        for (name, teacher) in &input.teachers {
            let courses = teacher
                .courses
                .iter()
                .map(|course| {
                    course_ids.get(course.as_str()).copied().ok_or_else(|| {
                        ConfigError::UnknownTeacherCourse {
                            teacher: name.clone(),
                            course: course.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            teachers.push(Teacher {
                name: name.clone(),
                courses,
                constraints: teacher.constraints.clone(),
            });
        }

        Ok(Timetable {
            days: input.days.iter().copied().unique().collect(),
            intervals: input.intervals.clone(),
            rooms,
            courses,
            teachers,
        })
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id as usize]
    }

    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id as usize]
    }

    pub fn teacher(&self, id: TeacherId) -> &Teacher {
        &self.teachers[id as usize]
    }
}
