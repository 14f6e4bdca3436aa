//! Weekly university timetabling as a partial constraint satisfaction problem.
//!
//! Every (day, interval, room) slot is a variable whose domain holds the (teacher, course)
//! pairs allowed there. A depth-first branch and bound search fills the slots in order,
//! charging one cost unit per violated constraint, and stops at the first complete timetable
//! within the acceptable cost.

pub mod availability;
pub mod constraints;
pub mod data;
pub mod domain;
pub mod error;
pub mod model;
pub mod projection;
pub mod render;
pub mod search;
pub mod server;
pub mod solver;
