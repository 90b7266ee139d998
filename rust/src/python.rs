//! Python bindings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

// Note: We use std HashMap here for PyO3 interface compatibility

use crate::catalog::Catalog;
use crate::config::{FixedBreak, SolverConfig};
use crate::models::{Session, SessionKind, Slot};
use crate::render::render_all;
use crate::solver::{self, SolveStatus};
use crate::verify::verify;

/// A session as seen from Python. `day`/`start_hour` are set for pinned or solved sessions.
#[pyclass(name = "Session")]
#[derive(Clone, Debug)]
pub struct PySession {
    #[pyo3(get, set)]
    pub division: String,
    #[pyo3(get, set)]
    pub sub_batch: Option<String>,
    #[pyo3(get, set)]
    pub subject: String,
    #[pyo3(get, set)]
    pub kind: String,
    #[pyo3(get, set)]
    pub duration: u8,
    #[pyo3(get, set)]
    pub day: Option<u8>,
    #[pyo3(get, set)]
    pub start_hour: Option<u8>,
    #[pyo3(get, set)]
    pub room: Option<String>,
    #[pyo3(get, set)]
    pub faculty: Option<String>,
}

#[pymethods]
impl PySession {
    #[new]
    #[pyo3(signature = (
        division,
        subject,
        kind,
        duration=None,
        sub_batch=None,
        day=None,
        start_hour=None,
        room=None,
        faculty=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        division: String,
        subject: String,
        kind: String,
        duration: Option<u8>,
        sub_batch: Option<String>,
        day: Option<u8>,
        start_hour: Option<u8>,
        room: Option<String>,
        faculty: Option<String>,
    ) -> PyResult<Self> {
        let parsed = kind
            .parse::<SessionKind>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self {
            division,
            sub_batch,
            subject,
            kind: parsed.as_str().to_string(),
            duration: duration.unwrap_or_else(|| parsed.default_duration()),
            day,
            start_hour,
            room,
            faculty,
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "Session(division={:?}, sub_batch={:?}, subject={:?}, kind={:?}, duration={}, day={:?}, start_hour={:?}, room={:?}, faculty={:?})",
            self.division,
            self.sub_batch,
            self.subject,
            self.kind,
            self.duration,
            self.day,
            self.start_hour,
            self.room,
            self.faculty
        )
    }

    fn __str__(&self) -> PyResult<String> {
        Ok(self.to_session()?.to_string())
    }
}

impl PySession {
    fn to_session(&self) -> PyResult<Session> {
        let kind = self
            .kind
            .parse::<SessionKind>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let slot = match (self.day, self.start_hour) {
            (Some(day), Some(start_hour)) => Some(Slot {
                day,
                start_hour,
                room: self.room.clone(),
                faculty: self.faculty.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(PyValueError::new_err(
                    "day and start_hour must be set together",
                ))
            }
        };
        Ok(Session {
            division: self.division.clone(),
            sub_batch: self.sub_batch.clone(),
            subject: self.subject.clone(),
            kind,
            duration: self.duration,
            slot,
        })
    }
}

impl From<&Session> for PySession {
    fn from(session: &Session) -> Self {
        let slot = session.slot.as_ref();
        Self {
            division: session.division.clone(),
            sub_batch: session.sub_batch.clone(),
            subject: session.subject.clone(),
            kind: session.kind.as_str().to_string(),
            duration: session.duration,
            day: slot.map(|s| s.day),
            start_hour: slot.map(|s| s.start_hour),
            room: slot.and_then(|s| s.room.clone()),
            faculty: slot.and_then(|s| s.faculty.clone()),
        }
    }
}

/// Solver configuration (PyO3 wrapper).
#[pyclass(name = "SolverConfig")]
#[derive(Clone, Debug)]
pub struct PySolverConfig {
    #[pyo3(get, set)]
    pub day_start_hour: u8,
    #[pyo3(get, set)]
    pub day_end_hour: u8,
    #[pyo3(get, set)]
    pub days_per_week: u8,
    #[pyo3(get, set)]
    pub daily_load_ceiling: u8,
    #[pyo3(get, set)]
    pub min_teaching_days: u8,
    #[pyo3(get, set)]
    pub break_start: u8,
    #[pyo3(get, set)]
    pub break_end: u8,
    /// (division, day, hour)
    #[pyo3(get, set)]
    pub fixed_breaks: Vec<(String, u8, u8)>,
    #[pyo3(get, set)]
    pub verbosity: u8,
    #[pyo3(get, set)]
    pub node_limit: Option<u64>,
}

#[pymethods]
impl PySolverConfig {
    #[new]
    #[pyo3(signature = (
        day_start_hour=8,
        day_end_hour=18,
        days_per_week=5,
        daily_load_ceiling=8,
        min_teaching_days=3,
        break_start=11,
        break_end=13,
        fixed_breaks=Vec::new(),
        verbosity=0,
        node_limit=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        day_start_hour: u8,
        day_end_hour: u8,
        days_per_week: u8,
        daily_load_ceiling: u8,
        min_teaching_days: u8,
        break_start: u8,
        break_end: u8,
        fixed_breaks: Vec<(String, u8, u8)>,
        verbosity: u8,
        node_limit: Option<u64>,
    ) -> Self {
        Self {
            day_start_hour,
            day_end_hour,
            days_per_week,
            daily_load_ceiling,
            min_teaching_days,
            break_start,
            break_end,
            fixed_breaks,
            verbosity,
            node_limit,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SolverConfig(day_start_hour={}, day_end_hour={}, days_per_week={}, min_teaching_days={}, node_limit={:?})",
            self.day_start_hour,
            self.day_end_hour,
            self.days_per_week,
            self.min_teaching_days,
            self.node_limit
        )
    }
}

impl From<&PySolverConfig> for SolverConfig {
    fn from(py: &PySolverConfig) -> Self {
        Self {
            day_start_hour: py.day_start_hour,
            day_end_hour: py.day_end_hour,
            days_per_week: py.days_per_week,
            daily_load_ceiling: py.daily_load_ceiling,
            min_teaching_days: py.min_teaching_days,
            break_window: py.break_start..=py.break_end,
            fixed_breaks: py
                .fixed_breaks
                .iter()
                .map(|(division, day, hour)| FixedBreak::new(division, *day, *hour))
                .collect(),
            verbosity: py.verbosity,
            node_limit: py.node_limit,
        }
    }
}

fn status_name(status: SolveStatus) -> &'static str {
    match status {
        SolveStatus::Solved => "solved",
        SolveStatus::Infeasible => "infeasible",
        SolveStatus::BudgetExhausted => "budget_exhausted",
    }
}

fn to_sessions(sessions: &[PySession]) -> PyResult<Vec<Session>> {
    sessions.iter().map(PySession::to_session).collect()
}

/// Search for a timetable.
///
/// # Returns
/// * `(status, sessions)` where status is "solved", "infeasible" or "budget_exhausted"
///   and sessions are in search order
///
/// # Raises
/// * ValueError on unknown names, bad pinned sessions or an invalid config
#[pyfunction]
#[pyo3(signature = (
    sessions,
    lecture_rooms,
    tutorial_rooms,
    lab_rooms,
    faculty_by_subject,
    divisions,
    config=None
))]
fn generate_timetable(
    sessions: Vec<PySession>,
    lecture_rooms: Vec<String>,
    tutorial_rooms: Vec<String>,
    lab_rooms: Vec<String>,
    faculty_by_subject: HashMap<String, Vec<String>>,
    divisions: Vec<String>,
    config: Option<PySolverConfig>,
) -> PyResult<(String, Vec<PySession>)> {
    // Sorted so interned faculty ids do not depend on dict iteration order
    let mut subjects: Vec<_> = faculty_by_subject.into_iter().collect();
    subjects.sort_by(|a, b| a.0.cmp(&b.0));

    let catalog = subjects
        .iter()
        .fold(
            Catalog::builder()
                .lecture_rooms(&lecture_rooms)
                .tutorial_rooms(&tutorial_rooms)
                .lab_rooms(&lab_rooms)
                .divisions(&divisions),
            |builder, (subject, faculty)| builder.subject(subject, faculty),
        )
        .build();
    let config = config.as_ref().map(SolverConfig::from).unwrap_or_default();

    match solver::generate_timetable(&catalog, to_sessions(&sessions)?, config) {
        Ok(result) => Ok((
            status_name(result.status).to_string(),
            result.sessions.iter().map(PySession::from).collect(),
        )),
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// Render one grid per division.
#[pyfunction]
#[pyo3(signature = (sessions, config=None))]
fn render_timetable(sessions: Vec<PySession>, config: Option<PySolverConfig>) -> PyResult<String> {
    let config = config.as_ref().map(SolverConfig::from).unwrap_or_default();
    Ok(render_all(&to_sessions(&sessions)?, &config))
}

/// Check an assignment against every hard constraint.
///
/// # Returns
/// * List of violation messages, empty when the timetable is consistent
#[pyfunction]
#[pyo3(signature = (sessions, config=None))]
fn verify_timetable(sessions: Vec<PySession>, config: Option<PySolverConfig>) -> PyResult<Vec<String>> {
    let config = config.as_ref().map(SolverConfig::from).unwrap_or_default();
    match verify(&to_sessions(&sessions)?, &config) {
        Ok(()) => Ok(Vec::new()),
        Err(violations) => Ok(violations.iter().map(|v| v.to_string()).collect()),
    }
}

/// The timetable.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<PySession>()?;
    m.add_class::<PySolverConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(generate_timetable, m)?)?;
    m.add_function(wrap_pyfunction!(render_timetable, m)?)?;
    m.add_function(wrap_pyfunction!(verify_timetable, m)?)?;

    Ok(())
}
