//! Backtracking timetable solver.
//!
//! `availability` holds the occupancy state, `candidates` the per-kind
//! placement orders, `acceptance` the checks on complete assignments and
//! `search` the recursion tying them together.

mod acceptance;
mod availability;
mod candidates;
mod search;

pub use acceptance::{default_checks, AcceptanceCheck, BreakDistribution, DayCoverage};
pub use availability::{Availability, HourMask, Placement};
pub use candidates::{break_candidates, teaching_candidates, FixedBreakHours};
pub use search::{
    generate_timetable, SearchStats, SearchToken, SolveResult, SolveStatus, Solver, SolverError,
};
