//! Depth-first branch and bound over the variables of a [`Problem`].
//!
//! The search walks the variables in order and tries the values of each domain front to back.
//! A committed value is charged one cost unit per violated constraint. A branch is only
//! followed while its cost stays below the best complete assignment found so far and within
//! the acceptable cost. The first complete assignment within the acceptable cost ends the search.
//!
//! Instead of recursing, the search keeps an explicit stack of frames. A frame owns the domains
//! of the variables it has not passed yet and the cost accumulated before its variable; the
//! values committed on the current path are kept in one shared trail.

use crate::constraints::{Constraints, Counted, EVALUATOR_COUNT};
use crate::domain::{Domain, Problem, Session};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// What happens to register increments and domain purges of a value that is abandoned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BacktrackPolicy {
    /// Registers keep every increment and purges stay in the frame that made them.
    #[default]
    Persistent,
    /// Increments of an abandoned value are taken back and its purges only reach the branch
    /// below it.
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    /// Highest cost at which a complete assignment ends the search.
    pub acceptable_cost: u32,
    /// Sessions a teacher may give per week.
    pub teacher_session_limit: u32,
    pub backtrack: BacktrackPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            acceptable_cost: 0,
            teacher_session_limit: 7,
            backtrack: BacktrackPolicy::Persistent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    /// A complete assignment within the acceptable cost was found.
    Acceptable,
    /// Every branch was tried or cut without reaching the acceptable cost.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Best complete assignment seen, one entry per variable, `None` for an empty slot.
    pub best: Option<Vec<Option<Session>>>,
    pub best_cost: u32,
    /// Number of values tried.
    pub iterations: u64,
}

struct Frame {
    /// Variable this frame assigns.
    index: usize,
    /// Variable whose domain is `domains[0]`.
    first: usize,
    domains: Vec<Domain>,
    /// Cost of the path up to, excluding, `index`.
    cost: u32,
    /// Last value tried here whose register increments are still to be taken back.
    pending: Option<(Session, Counted)>,
}

pub struct Search<'p> {
    problem: &'p Problem<'p>,
    config: SolverConfig,
    constraints: Constraints<'p>,
    best: Option<Vec<Option<Session>>>,
    best_cost: u32,
    iterations: u64,
}

impl<'p> Search<'p> {
    pub fn new(problem: &'p Problem<'p>, config: &SolverConfig) -> Self {
        // Every attempted value runs every check once, so no assignment can cost more.
        let bound = (problem.domain_size() as u64) * u64::from(EVALUATOR_COUNT);
        Search {
            problem,
            config: *config,
            constraints: Constraints::new(problem, config.teacher_session_limit),
            best: None,
            best_cost: u32::try_from(bound).unwrap_or(u32::MAX),
            iterations: 0,
        }
    }

    pub fn run(mut self) -> SearchOutcome {
        let variables = self.problem.variables.len();
        info!(
            "Starting branch and bound over {} variables (acceptable cost {}, initial bound {}).",
            variables, self.config.acceptable_cost, self.best_cost
        );

        let restore = self.config.backtrack == BacktrackPolicy::Restore;
        let mut trail: Vec<Option<Session>> = Vec::with_capacity(variables);
        let mut stack = vec![Frame {
            index: 0,
            first: 0,
            domains: self.problem.domains.clone(),
            cost: 0,
            pending: None,
        }];
        let mut status = SearchStatus::Exhausted;

        while let Some(frame) = stack.last_mut() {
            trail.truncate(frame.index);
            if let Some((session, counted)) = frame.pending.take() {
                self.constraints.undo(session, counted);
            }

            if frame.index == variables {
                let cost = frame.cost;
                self.record(&trail, cost);
                if cost <= self.config.acceptable_cost {
                    status = SearchStatus::Acceptable;
                    break;
                }
                stack.pop();
                continue;
            }

            let index = frame.index;
            let local = index - frame.first;
            let Some(&session) = frame.domains[local].front() else {
                // Nothing left to try: leave the slot empty and carry on in the same frame.
                trail.push(None);
                frame.index += 1;
                continue;
            };
            if frame.cost == self.best_cost {
                stack.pop();
                continue;
            }
            frame.domains[local].pop_front();
            self.iterations += 1;

            let mut branch_domains = if restore {
                frame.domains[local + 1..].to_vec()
            } else {
                Vec::new()
            };
            let evaluation = self.constraints.evaluate(
                index,
                &trail,
                session,
                if restore {
                    &mut branch_domains[..]
                } else {
                    &mut frame.domains[local..]
                },
            );
            if restore {
                frame.pending = Some((session, evaluation.counted));
            }

            let cost = frame.cost + evaluation.violations;
            trace!(
                "Variable {} <- {:?}: cost {} (best {}).",
                index, session, cost, self.best_cost
            );
            if cost < self.best_cost && cost <= self.config.acceptable_cost {
                let domains = if restore {
                    branch_domains
                } else {
                    frame.domains[local + 1..].to_vec()
                };
                trail.push(Some(session));
                stack.push(Frame {
                    index: index + 1,
                    first: index + 1,
                    domains,
                    cost,
                    pending: None,
                });
            }
        }

        info!(
            "Search {:?} after {} iterations with best cost {}.",
            status, self.iterations, self.best_cost
        );
        SearchOutcome {
            status,
            best: self.best,
            best_cost: self.best_cost,
            iterations: self.iterations,
        }
    }

    fn record(&mut self, trail: &[Option<Session>], cost: u32) {
        if self.best.is_none() || cost < self.best_cost {
            debug!(
                "New best assignment with cost {} after {} iterations.",
                cost, self.iterations
            );
            self.best = Some(trail.to_vec());
            self.best_cost = cost;
        }
    }
}
