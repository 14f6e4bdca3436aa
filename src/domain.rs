//! Construction of the search variables and their domains from a [`Timetable`].

use crate::availability::Availability;
use crate::data::{Day, Interval};
use crate::error::RejectedTeacher;
use crate::model::{CourseId, RoomId, TeacherId, Timetable};
use itertools::{Itertools, iproduct};
use log::{debug, info, warn};
use std::collections::VecDeque;

/// A slot to fill: one room at one time of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub day: Day,
    pub interval: Interval,
    pub room: RoomId,
}

/// A teacher giving one of their courses. Ordered by course, then teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Session {
    pub course: CourseId,
    pub teacher: TeacherId,
}

/// Values still available for one variable, front first.
pub type Domain = VecDeque<Session>;

/// Everything the search needs: variables in branching order, one domain per variable and
/// the derived per-course session caps.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
    pub timetable: &'a Timetable,
    pub variables: Vec<Variable>,
    pub domains: Vec<Domain>,
    /// Indexed by course. Courses no room hosts keep a cap of zero; they never reach a domain.
    pub course_caps: Vec<u32>,
    /// Parsed availability per teacher, `None` when the teacher's tokens were rejected.
    pub availability: Vec<Option<Availability>>,
    pub rejected: Vec<RejectedTeacher>,
}

impl<'a> Problem<'a> {
    pub fn build(timetable: &'a Timetable) -> Self {
        let mut rejected = Vec::new();
        let availability = timetable
            .teachers
            .iter()
            .map(|teacher| match Availability::parse(&teacher.constraints) {
                Ok(availability) => Some(availability),
                Err(source) => {
                    let rejection = RejectedTeacher {
                        teacher: teacher.name.clone(),
                        source,
                    };
                    warn!("{rejection}");
                    rejected.push(rejection);
                    None
                }
            })
            .collect::<Vec<_>>();

        let variables: Vec<Variable> = iproduct!(
            timetable.days.iter().copied(),
            timetable.intervals.iter().copied(),
            0..timetable.rooms.len() as RoomId
        )
        .map(|(day, interval, room)| Variable {
            day,
            interval,
            room,
        })
        .collect();

        let domains: Vec<Domain> = variables
            .iter()
            .map(|variable| build_domain(timetable, &availability, variable))
            .collect();

        let problem = Problem {
            timetable,
            variables,
            domains,
            course_caps: course_caps(timetable),
            availability,
            rejected,
        };
        info!(
            "Built {} variables with {} candidate sessions in total.",
            problem.variables.len(),
            problem.domain_size()
        );
        problem
    }

    /// Sum of all domain sizes.
    pub fn domain_size(&self) -> usize {
        self.domains.iter().map(VecDeque::len).sum()
    }
}

fn build_domain(
    timetable: &Timetable,
    availability: &[Option<Availability>],
    variable: &Variable,
) -> Domain {
    let room = timetable.room(variable.room);
    timetable
        .teachers
        .iter()
        .zip(availability)
        .enumerate()
        .filter(|(_, (_, availability))| {
            availability
                .as_ref()
                .is_some_and(|a| a.admits(variable.day, variable.interval))
        })
        .flat_map(|(teacher_id, (teacher, _))| {
            teacher
                .courses
                .iter()
                .filter(|course| room.courses.contains(course))
                .map(move |&course| Session {
                    course,
                    teacher: teacher_id as TeacherId,
                })
        })
        .sorted()
        .dedup()
        .collect()
}

/// `floor(volume / capacity)` per course. A course hosted by several rooms takes the cap of
/// the last of them in document order.
fn course_caps(timetable: &Timetable) -> Vec<u32> {
    let mut caps = vec![0; timetable.courses.len()];
    for room in &timetable.rooms {
        for &course in &room.courses {
            let cap = timetable.course(course).volume / room.capacity;
            debug!(
                "Course {} in room {} is capped at {} sessions a week.",
                timetable.course(course).name,
                room.name,
                cap
            );
            caps[course as usize] = cap;
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AvailabilityError;
    use crate::model::tests::{TWO_ROOMS, input_from_json};

    fn timetable(json: &str) -> Timetable {
        Timetable::from_input(&input_from_json(json)).unwrap()
    }

    #[test]
    fn variables_follow_day_interval_room_order() {
        let timetable = timetable(TWO_ROOMS);
        let problem = Problem::build(&timetable);
        assert_eq!(problem.variables.len(), 2 * 2 * 2);
        let first: Vec<_> = problem.variables[..3]
            .iter()
            .map(|v| (v.day, v.interval.start, v.room))
            .collect();
        assert_eq!(
            first,
            vec![
                (Day::Monday, 8, 0),
                (Day::Monday, 8, 1),
                (Day::Monday, 10, 0)
            ]
        );
        assert_eq!(problem.variables[4].day, Day::Tuesday);
    }

    #[test]
    fn domains_respect_eligibility_and_availability() {
        let timetable = timetable(TWO_ROOMS);
        let problem = Problem::build(&timetable);
        let session = |course, teacher| Session { course, teacher };

        // Monday 8-10 in EC004: both teachers, Dan also for Physics.
        assert_eq!(
            problem.domains[0],
            vec![session(0, 0), session(0, 1), session(1, 1)]
        );
        // Monday 8-10 in EC101: Algebra only.
        assert_eq!(problem.domains[1], vec![session(0, 0), session(0, 1)]);
        // Monday 10-12 in EC004: Dan is only available 8-10.
        assert_eq!(problem.domains[2], vec![session(0, 0)]);
        // Tuesday: Dan lists Monday only.
        assert_eq!(problem.domains[4], vec![session(0, 0)]);
    }

    #[test]
    fn domains_are_sorted_without_duplicates() {
        let mut input = input_from_json(TWO_ROOMS);
        input
            .teachers
            .get_mut("Dan Ionescu")
            .unwrap()
            .courses
            .push("Algebra".to_owned());
        let timetable = Timetable::from_input(&input).unwrap();
        let problem = Problem::build(&timetable);
        for domain in &problem.domains {
            assert!(domain.iter().tuple_windows().all(|(a, b)| a < b));
        }
    }

    #[test]
    fn caps_divide_volume_by_capacity() {
        let timetable = timetable(
            r#"{
                "intervals": ["8-10"],
                "days": ["Monday"],
                "courses": {"C1": 10},
                "teachers": {},
                "rooms": {"R1": {"capacity": 4, "courses": ["C1"]}}
            }"#,
        );
        let problem = Problem::build(&timetable);
        assert_eq!(problem.course_caps, vec![2]);
        assert_eq!(problem.domain_size(), 0);
    }

    #[test]
    fn last_room_decides_the_cap() {
        let timetable = timetable(TWO_ROOMS);
        let problem = Problem::build(&timetable);
        // Algebra: EC004 gives 60/20 = 3, EC101 (later) gives 60/30 = 2.
        assert_eq!(problem.course_caps, vec![2, 2]);
    }

    #[test]
    fn document_order_drives_rooms_and_caps() {
        let timetable = timetable(
            r#"{
                "intervals": ["8-10"],
                "days": ["Monday"],
                "courses": {"C1": 8},
                "teachers": {},
                "rooms": {
                    "Z101": {"capacity": 2, "courses": ["C1"]},
                    "A202": {"capacity": 4, "courses": ["C1"]}
                }
            }"#,
        );
        let problem = Problem::build(&timetable);
        let rooms: Vec<_> = problem
            .variables
            .iter()
            .map(|v| timetable.room(v.room).name.as_str())
            .collect();
        assert_eq!(rooms, vec!["Z101", "A202"]);
        // A202 comes last: 8 / 4.
        assert_eq!(problem.course_caps, vec![2]);
    }

    #[test]
    fn malformed_tokens_only_reject_their_teacher() {
        let mut input = input_from_json(TWO_ROOMS);
        input
            .teachers
            .get_mut("Dan Ionescu")
            .unwrap()
            .constraints
            .push("8-x".to_owned());
        let timetable = Timetable::from_input(&input).unwrap();
        let problem = Problem::build(&timetable);

        assert_eq!(
            problem.rejected,
            vec![RejectedTeacher {
                teacher: "Dan Ionescu".to_owned(),
                source: AvailabilityError::NonNumericBound {
                    token: "8-x".to_owned(),
                    bound: "x".to_owned(),
                },
            }]
        );
        assert!(
            problem
                .domains
                .iter()
                .flatten()
                .all(|session| session.teacher == 0)
        );
        assert_eq!(problem.domains[0].len(), 1);
    }
}
