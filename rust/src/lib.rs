//! Weekly timetable generation by backtracking search.
//!
//! Sessions (lectures, labs, tutorials and daily breaks) are placed into a
//! grid of days and hours so that no division, room or faculty member is
//! double-booked, daily load stays under a ceiling and each division teaches
//! on enough distinct days. The crate also builds session lists from course
//! loads, verifies finished timetables and renders them as text grids.

pub mod catalog;
pub mod config;
pub mod interner;
pub mod logging;
pub mod models;
pub mod render;
pub mod requirements;
pub mod solver;
pub mod verify;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::{FixedBreak, SolverConfig};
pub use models::{Session, SessionKind, Slot};
pub use requirements::{build_sessions, CourseLoad, DivisionPlan, PinnedBlock, SetupError};
pub use solver::{
    generate_timetable, AcceptanceCheck, SearchStats, SolveResult, SolveStatus, Solver,
    SolverError,
};
pub use verify::{verify, Violation};
