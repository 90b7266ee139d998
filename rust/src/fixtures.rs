//! Reference week used across tests: four divisions, four core subjects and
//! combined BIDA/AI blocks on Tuesday for divisions A, B and C.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::config::{FixedBreak, SolverConfig};
use crate::models::{Session, Slot};
use crate::requirements::{build_sessions, CourseLoad, DivisionPlan, PinnedBlock};

pub const DIVISIONS: [&str; 4] = ["A", "B", "C", "D"];
pub const TUESDAY: u8 = 1;

pub fn catalog_builder() -> CatalogBuilder {
    Catalog::builder()
        .lecture_rooms(["Room101", "Room104", "Room201", "Room204"])
        .tutorial_rooms(["Room214", "Room314", "Room104"])
        .lab_rooms(["105Lab", "106Lab", "307Lab"])
        .subject("CN", ["NNS", "VAMI"])
        .subject("DSML", ["PDM", "NNW"])
        .subject("SEPM", ["MPM", "YYD"])
        .subject("SMSS", ["LAB", "VKK"])
        .subject("AI", ["LAB"])
        .subject("BIDA", ["NK"])
        .divisions(DIVISIONS)
}

pub fn catalog() -> Catalog {
    catalog_builder().build()
}

fn course(subject: &str) -> CourseLoad {
    match subject {
        "SMSS" => CourseLoad::new(subject).lectures(2).tutorials(1),
        _ => CourseLoad::new(subject).lectures(2).labs(1),
    }
}

pub fn plans() -> Vec<DivisionPlan> {
    DIVISIONS
        .iter()
        .map(|&division| {
            let subjects: &[&str] = if division == "C" {
                &["CN", "DSML", "SMSS", "SEPM"]
            } else {
                &["CN", "DSML", "SEPM", "SMSS"]
            };
            DivisionPlan::new(
                division,
                &["1", "2", "3"],
                subjects.iter().map(|s| course(s)).collect(),
            )
        })
        .collect()
}

pub fn pinned() -> Vec<PinnedBlock> {
    ["A", "B", "C"]
        .iter()
        .flat_map(|&division| {
            [
                PinnedBlock::lecture(
                    division,
                    "BIDA",
                    2,
                    Slot::teaching(TUESDAY, 9, "Room101", "NK"),
                ),
                PinnedBlock::lecture(
                    division,
                    "AI",
                    2,
                    Slot::teaching(TUESDAY, 12, "Room104", "LAB"),
                ),
            ]
        })
        .collect()
}

pub fn sessions() -> Vec<Session> {
    build_sessions(&plans(), &pinned(), 5).expect("reference plans are valid")
}

/// Default rules plus the single 11:00 Tuesday break left open by the fixed blocks.
pub fn config() -> SolverConfig {
    SolverConfig {
        fixed_breaks: ["A", "B", "C"]
            .iter()
            .map(|d| FixedBreak::new(d, TUESDAY, 11))
            .collect(),
        ..Default::default()
    }
}
