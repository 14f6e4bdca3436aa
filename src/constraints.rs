//! The four checks applied to every committed session, and the running registers behind the
//! two weekly caps.
//!
//! Each violated check adds one to the cost of the branch. The two cap checks also prune: when
//! a register reaches its cap, every domain handed in loses the sessions that would push it
//! further.

use crate::domain::{Domain, Problem, Session};
use crate::model::{CourseId, TeacherId};
use log::debug;

/// Number of checks run per attempted session.
pub const EVALUATOR_COUNT: u32 = 4;

/// Outcome of counting one more session against a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapCheck {
    Below,
    /// The register just reached the cap; domains have been purged.
    Reached,
    /// The register was already at the cap and was left untouched.
    Exceeded,
}

impl CapCheck {
    pub fn counted(self) -> bool {
        self != CapCheck::Exceeded
    }
}

/// Which registers a commit incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counted {
    pub teacher: bool,
    pub course: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub violations: u32,
    pub counted: Counted,
}

/// Constraint state of one search run.
#[derive(Debug)]
pub struct Constraints<'p> {
    problem: &'p Problem<'p>,
    teacher_limit: u32,
    teacher_sessions: Vec<u32>,
    course_sessions: Vec<u32>,
}

impl<'p> Constraints<'p> {
    pub fn new(problem: &'p Problem<'p>, teacher_limit: u32) -> Self {
        Constraints {
            problem,
            teacher_limit,
            teacher_sessions: vec![0; problem.timetable.teachers.len()],
            course_sessions: vec![0; problem.timetable.courses.len()],
        }
    }

    /// Runs all checks for `session` committed to variable `index`, where `trail` holds the
    /// values committed to the variables before it.
    pub fn evaluate(
        &mut self,
        index: usize,
        trail: &[Option<Session>],
        session: Session,
        domains: &mut [Domain],
    ) -> Evaluation {
        let mut violations = 0;
        let mut counted = Counted::default();

        let double_booked = self.teacher_double_booked(index, trail, session);
        if double_booked {
            violations += 1;
        }

        let teacher = self.count_teacher(session.teacher, domains);
        counted.teacher = teacher.counted();
        if !counted.teacher {
            violations += 1;
        }

        // A conflicting commitment does not count towards the course cap.
        if !double_booked {
            let course = self.count_course(session.course, domains);
            counted.course = course.counted();
            if !counted.course {
                violations += 1;
            }
        }

        if self.violates_preference(session) {
            violations += 1;
        }

        Evaluation {
            violations,
            counted,
        }
    }

    /// The teacher already holds a session in another room at the same day and interval.
    pub fn teacher_double_booked(
        &self,
        index: usize,
        trail: &[Option<Session>],
        session: Session,
    ) -> bool {
        let variable = &self.problem.variables[index];
        self.problem.variables[..index]
            .iter()
            .zip(trail)
            .any(|(other, committed)| {
                other.day == variable.day
                    && other.interval == variable.interval
                    && other.room != variable.room
                    && committed.is_some_and(|c| c.teacher == session.teacher)
            })
    }

    pub fn count_teacher(&mut self, teacher: TeacherId, domains: &mut [Domain]) -> CapCheck {
        let check = bump(
            &mut self.teacher_sessions[teacher as usize],
            self.teacher_limit,
        );
        if check == CapCheck::Reached {
            let removed = purge(domains, |s| s.teacher == teacher);
            debug!(
                "Teacher {} reached {} sessions, pruned {} candidates.",
                self.problem.timetable.teacher(teacher).name,
                self.teacher_limit,
                removed
            );
        }
        check
    }

    pub fn count_course(&mut self, course: CourseId, domains: &mut [Domain]) -> CapCheck {
        let cap = self.problem.course_caps[course as usize];
        let check = bump(&mut self.course_sessions[course as usize], cap);
        if check == CapCheck::Reached {
            let removed = purge(domains, |s| s.course == course);
            debug!(
                "Course {} reached {} sessions, pruned {} candidates.",
                self.problem.timetable.course(course).name,
                cap,
                removed
            );
        }
        check
    }

    /// One of the teacher's negated tokens names the teacher or the course of `session`.
    pub fn violates_preference(&self, session: Session) -> bool {
        let timetable = self.problem.timetable;
        self.problem.availability[session.teacher as usize]
            .as_ref()
            .is_some_and(|availability| {
                availability.excludes(&timetable.teacher(session.teacher).name)
                    || availability.excludes(&timetable.course(session.course).name)
            })
    }

    /// Takes back the register increments of a discarded commit.
    pub fn undo(&mut self, session: Session, counted: Counted) {
        if counted.teacher {
            self.teacher_sessions[session.teacher as usize] -= 1;
        }
        if counted.course {
            self.course_sessions[session.course as usize] -= 1;
        }
    }

    pub fn teacher_sessions(&self, teacher: TeacherId) -> u32 {
        self.teacher_sessions[teacher as usize]
    }

    pub fn course_sessions(&self, course: CourseId) -> u32 {
        self.course_sessions[course as usize]
    }
}

fn bump(register: &mut u32, cap: u32) -> CapCheck {
    if *register >= cap {
        return CapCheck::Exceeded;
    }
    *register += 1;
    if *register == cap {
        CapCheck::Reached
    } else {
        CapCheck::Below
    }
}

fn purge(domains: &mut [Domain], matches: impl Fn(&Session) -> bool) -> usize {
    domains
        .iter_mut()
        .map(|domain| {
            let before = domain.len();
            domain.retain(|session| !matches(session));
            before - domain.len()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timetable;
    use crate::model::tests::{TWO_ROOMS, input_from_json};

    const ANA: TeacherId = 0;
    const DAN: TeacherId = 1;
    const ALGEBRA: CourseId = 0;
    const PHYSICS: CourseId = 1;

    fn session(course: CourseId, teacher: TeacherId) -> Session {
        Session { course, teacher }
    }

    fn timetable() -> Timetable {
        Timetable::from_input(&input_from_json(TWO_ROOMS)).unwrap()
    }

    #[test]
    fn same_teacher_in_two_rooms_at_once_is_double_booked() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let constraints = Constraints::new(&problem, 7);
        let trail = [Some(session(ALGEBRA, ANA))];

        assert!(constraints.teacher_double_booked(1, &trail, session(ALGEBRA, ANA)));
        assert!(!constraints.teacher_double_booked(1, &trail, session(ALGEBRA, DAN)));
        // Monday 10-12 is a different interval.
        let trail = [Some(session(ALGEBRA, ANA)), None];
        assert!(!constraints.teacher_double_booked(2, &trail, session(ALGEBRA, ANA)));
    }

    #[test]
    fn teacher_register_stops_at_limit_and_prunes() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let mut domains = problem.domains.clone();
        let mut constraints = Constraints::new(&problem, 2);

        assert_eq!(constraints.count_teacher(ANA, &mut domains), CapCheck::Below);
        assert!(domains.iter().flatten().any(|s| s.teacher == ANA));
        assert_eq!(constraints.count_teacher(ANA, &mut domains), CapCheck::Reached);
        assert!(domains.iter().flatten().all(|s| s.teacher != ANA));
        assert_eq!(constraints.count_teacher(ANA, &mut domains), CapCheck::Exceeded);
        assert_eq!(constraints.teacher_sessions(ANA), 2);
    }

    #[test]
    fn course_register_stops_at_cap_and_prunes() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let mut domains = problem.domains.clone();
        let mut constraints = Constraints::new(&problem, 7);

        assert_eq!(constraints.count_course(PHYSICS, &mut domains), CapCheck::Below);
        assert_eq!(constraints.count_course(PHYSICS, &mut domains), CapCheck::Reached);
        assert!(domains.iter().flatten().all(|s| s.course != PHYSICS));
        assert!(domains.iter().flatten().any(|s| s.course == ALGEBRA));
        assert_eq!(constraints.count_course(PHYSICS, &mut domains), CapCheck::Exceeded);
        assert_eq!(constraints.course_sessions(PHYSICS), 2);
    }

    #[test]
    fn negated_tokens_mark_preference_violations() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let constraints = Constraints::new(&problem, 7);

        assert!(constraints.violates_preference(session(PHYSICS, DAN)));
        assert!(!constraints.violates_preference(session(ALGEBRA, DAN)));
        assert!(!constraints.violates_preference(session(ALGEBRA, ANA)));
    }

    #[test]
    fn double_booking_skips_the_course_register() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let mut domains = problem.domains.clone();
        let mut constraints = Constraints::new(&problem, 7);
        let trail = [Some(session(ALGEBRA, DAN))];

        let evaluation = constraints.evaluate(1, &trail, session(ALGEBRA, DAN), &mut domains);
        assert_eq!(evaluation.violations, 1);
        assert_eq!(
            evaluation.counted,
            Counted {
                teacher: true,
                course: false
            }
        );
        assert_eq!(constraints.course_sessions(ALGEBRA), 0);

        constraints.undo(session(ALGEBRA, DAN), evaluation.counted);
        assert_eq!(constraints.teacher_sessions(DAN), 0);
    }

    #[test]
    fn violations_add_up() {
        let timetable = timetable();
        let problem = Problem::build(&timetable);
        let mut domains = problem.domains.clone();
        let mut constraints = Constraints::new(&problem, 0);

        // Over the teacher limit and a disliked course.
        let evaluation = constraints.evaluate(0, &[], session(PHYSICS, DAN), &mut domains);
        assert_eq!(evaluation.violations, 2);
        assert_eq!(constraints.course_sessions(PHYSICS), 1);
    }
}
