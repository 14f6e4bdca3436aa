use crate::data::{SolveReport, TimetableInput};
use crate::domain::Problem;
use crate::error::ConfigError;
use crate::model::Timetable;
use crate::projection;
use crate::search::{Search, SolverConfig};
use log::info;
use std::time::Instant;

/// Solves the timetabling problem with the branch and bound search.
pub fn solve(input: &TimetableInput, config: &SolverConfig) -> Result<SolveReport, ConfigError> {
    let start_time = Instant::now();
    let timetable = Timetable::from_input(input)?;
    info!(
        "Setting up timetable with {} days, {} intervals, {} rooms, {} courses and {} teachers...",
        timetable.days.len(),
        timetable.intervals.len(),
        timetable.rooms.len(),
        timetable.courses.len(),
        timetable.teachers.len()
    );

    let problem = Problem::build(&timetable);
    let outcome = Search::new(&problem, config).run();
    info!("Search finished in {:.2?}", start_time.elapsed());

    let assignments = projection::assignments(&problem, outcome.best.as_deref());
    Ok(SolveReport {
        status: outcome.status,
        cost: outcome.best_cost,
        iterations: outcome.iterations,
        timetable: projection::by_day(&assignments),
        assignments,
        rejected_teachers: problem.rejected.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Day;
    use crate::model::tests::{TWO_ROOMS, input_from_json};
    use crate::search::SearchStatus;

    #[test]
    fn report_covers_every_slot() {
        let report = solve(&input_from_json(TWO_ROOMS), &SolverConfig::default()).unwrap();
        assert_eq!(report.status, SearchStatus::Acceptable);
        assert_eq!(report.cost, 0);
        assert_eq!(report.assignments.len(), 8);
        assert_eq!(report.timetable.len(), 2);
        assert!(report.rejected_teachers.is_empty());

        // No teacher holds two rooms at once.
        for (i, a) in report.assignments.iter().enumerate() {
            for b in &report.assignments[i + 1..] {
                if let (Some(x), Some(y)) = (&a.session, &b.session) {
                    if a.day == b.day && a.interval == b.interval {
                        assert_ne!(x.teacher, y.teacher);
                    }
                }
            }
        }
        // Dan's Physics is disliked, so only Algebra is ever placed.
        assert!(
            report
                .assignments
                .iter()
                .flat_map(|a| &a.session)
                .all(|s| s.course == "Algebra")
        );
        assert!(
            report
                .assignments
                .iter()
                .filter(|a| a.day == Day::Tuesday)
                .flat_map(|a| &a.session)
                .all(|s| s.teacher == "Ana Popescu")
        );
    }

    #[test]
    fn config_errors_abort_the_solve() {
        let mut input = input_from_json(TWO_ROOMS);
        input.days.clear();
        assert_eq!(
            solve(&input, &SolverConfig::default()).unwrap_err(),
            ConfigError::Missing("days")
        );
    }

    #[test]
    fn rejected_teachers_are_reported() {
        let mut input = input_from_json(TWO_ROOMS);
        input
            .teachers
            .get_mut("Ana Popescu")
            .unwrap()
            .constraints
            .push("morning-10".to_owned());
        let report = solve(&input, &SolverConfig::default()).unwrap();
        assert_eq!(report.rejected_teachers.len(), 1);
        assert!(report.rejected_teachers[0].contains("Ana Popescu"));
    }

    #[test]
    fn report_serializes_in_camel_case() {
        let report = solve(&input_from_json(TWO_ROOMS), &SolverConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "acceptable");
        assert!(json["rejectedTeachers"].is_array());
        assert!(json["timetable"]["Monday"]["8-10"]["EC004"].is_object());
        assert!(json["assignments"][0]["session"].is_object());
    }
}
