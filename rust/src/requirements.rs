//! Building the session list from per-division course loads.
//!
//! Produces sessions in a fixed order: pinned blocks, one break per division
//! per day, then for each division and subject its lectures, labs and
//! tutorials. Labs and tutorials are split across the division's sub-batches.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::models::{Session, SessionKind, Slot};

/// Errors detected while assembling session requirements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Division {0} is planned twice")]
    DuplicateDivision(String),
    #[error("Division {division} needs sub-batches for split {subject} sessions")]
    MissingSubBatches { division: String, subject: String },
    #[error("Subject {0} has a zero-hour session")]
    ZeroDuration(String),
    #[error("Pinned block for unplanned division {0}")]
    UnknownDivision(String),
    #[error("Pinned {subject} block for {division} is outside the week")]
    PinnedOutsideWeek { division: String, subject: String },
}

/// Weekly requirement for one subject within a division.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseLoad {
    pub subject: String,
    /// Whole-division lectures per week
    pub lectures: u8,
    /// Labs per sub-batch per week
    pub labs: u8,
    /// Tutorials per sub-batch per week
    pub tutorials: u8,
    pub lecture_hours: u8,
    pub lab_hours: u8,
    pub tutorial_hours: u8,
}

impl CourseLoad {
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            lectures: 0,
            labs: 0,
            tutorials: 0,
            lecture_hours: SessionKind::Lecture.default_duration(),
            lab_hours: SessionKind::Lab.default_duration(),
            tutorial_hours: SessionKind::Tutorial.default_duration(),
        }
    }

    pub fn lectures(mut self, count: u8) -> Self {
        self.lectures = count;
        self
    }

    pub fn labs(mut self, count: u8) -> Self {
        self.labs = count;
        self
    }

    pub fn tutorials(mut self, count: u8) -> Self {
        self.tutorials = count;
        self
    }
}

/// Everything one division studies in a week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivisionPlan {
    pub division: String,
    /// Sub-batch labels, e.g. ["1", "2", "3"] for groups A1..A3
    pub sub_batches: Vec<String>,
    pub courses: Vec<CourseLoad>,
}

impl DivisionPlan {
    pub fn new(division: &str, sub_batches: &[&str], courses: Vec<CourseLoad>) -> Self {
        Self {
            division: division.to_string(),
            sub_batches: sub_batches.iter().map(|s| s.to_string()).collect(),
            courses,
        }
    }
}

/// A block fixed in advance (e.g. a combined lecture shared by several divisions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinnedBlock {
    pub division: String,
    pub subject: String,
    pub kind: SessionKind,
    pub duration: u8,
    pub slot: Slot,
}

impl PinnedBlock {
    pub fn lecture(division: &str, subject: &str, duration: u8, slot: Slot) -> Self {
        Self {
            division: division.to_string(),
            subject: subject.to_string(),
            kind: SessionKind::Lecture,
            duration,
            slot,
        }
    }
}

/// Expand division plans and pinned blocks into the session list the solver consumes.
pub fn build_sessions(
    plans: &[DivisionPlan],
    pinned: &[PinnedBlock],
    days_per_week: u8,
) -> Result<Vec<Session>, SetupError> {
    let mut seen = FxHashSet::default();
    for plan in plans {
        if !seen.insert(plan.division.as_str()) {
            return Err(SetupError::DuplicateDivision(plan.division.clone()));
        }
    }

    let mut sessions = Vec::new();

    for block in pinned {
        if !seen.contains(block.division.as_str()) {
            return Err(SetupError::UnknownDivision(block.division.clone()));
        }
        if block.duration == 0 {
            return Err(SetupError::ZeroDuration(block.subject.clone()));
        }
        if block.slot.day >= days_per_week {
            return Err(SetupError::PinnedOutsideWeek {
                division: block.division.clone(),
                subject: block.subject.clone(),
            });
        }
        sessions.push(
            Session::new(&block.division, &block.subject, block.kind, block.duration)
                .pinned(block.slot.clone()),
        );
    }

    for plan in plans {
        for _ in 0..days_per_week {
            sessions.push(Session::break_for(&plan.division));
        }
    }

    for plan in plans {
        for course in &plan.courses {
            push_course(&mut sessions, plan, course)?;
        }
    }

    Ok(sessions)
}

fn push_course(
    sessions: &mut Vec<Session>,
    plan: &DivisionPlan,
    course: &CourseLoad,
) -> Result<(), SetupError> {
    let split = course.labs > 0 || course.tutorials > 0;
    if split && plan.sub_batches.is_empty() {
        return Err(SetupError::MissingSubBatches {
            division: plan.division.clone(),
            subject: course.subject.clone(),
        });
    }
    let zero = (course.lectures > 0 && course.lecture_hours == 0)
        || (course.labs > 0 && course.lab_hours == 0)
        || (course.tutorials > 0 && course.tutorial_hours == 0);
    if zero {
        return Err(SetupError::ZeroDuration(course.subject.clone()));
    }

    let division = plan.division.as_str();
    let subject = course.subject.as_str();

    for _ in 0..course.lectures {
        sessions.push(Session::new(
            division,
            subject,
            SessionKind::Lecture,
            course.lecture_hours,
        ));
    }
    for _ in 0..course.labs {
        for sb in &plan.sub_batches {
            sessions.push(
                Session::new(division, subject, SessionKind::Lab, course.lab_hours)
                    .in_sub_batch(sb),
            );
        }
    }
    for _ in 0..course.tutorials {
        for sb in &plan.sub_batches {
            sessions.push(
                Session::new(division, subject, SessionKind::Tutorial, course.tutorial_hours)
                    .in_sub_batch(sb),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_a() -> DivisionPlan {
        DivisionPlan::new(
            "A",
            &["1", "2"],
            vec![
                CourseLoad::new("CN").lectures(2).labs(1),
                CourseLoad::new("SMSS").lectures(1).tutorials(1),
            ],
        )
    }

    #[test]
    fn test_session_order_and_counts() {
        let pinned = vec![PinnedBlock::lecture(
            "A",
            "BIDA",
            2,
            Slot::teaching(1, 9, "Room101", "NK"),
        )];
        let sessions = build_sessions(&[plan_a()], &pinned, 5).unwrap();

        // 1 pinned + 5 breaks + 2 CN lectures + 2 CN labs + 1 SMSS lecture + 2 SMSS tutorials
        assert_eq!(sessions.len(), 13);
        assert!(sessions[0].is_assigned());
        assert_eq!(sessions[0].subject, "BIDA");
        assert!(sessions[1..6].iter().all(|s| s.kind == SessionKind::Break));

        let labels: Vec<String> = sessions[6..]
            .iter()
            .map(|s| format!("{}:{}:{}", s.group_label(), s.subject, s.kind))
            .collect();
        assert_eq!(
            labels,
            vec![
                "A:CN:Lecture",
                "A:CN:Lecture",
                "A1:CN:Lab",
                "A2:CN:Lab",
                "A:SMSS:Lecture",
                "A1:SMSS:Tutorial",
                "A2:SMSS:Tutorial",
            ]
        );
        assert!(sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Lab)
            .all(|s| s.duration == 2));
    }

    #[test]
    fn test_split_course_needs_sub_batches() {
        let plan = DivisionPlan::new("B", &[], vec![CourseLoad::new("CN").labs(1)]);
        assert_eq!(
            build_sessions(&[plan], &[], 5),
            Err(SetupError::MissingSubBatches {
                division: "B".to_string(),
                subject: "CN".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            build_sessions(&[plan_a(), plan_a()], &[], 5),
            Err(SetupError::DuplicateDivision("A".to_string()))
        );

        let stray = PinnedBlock::lecture("Z", "AI", 2, Slot::teaching(1, 12, "Room104", "LAB"));
        assert_eq!(
            build_sessions(&[plan_a()], &[stray], 5),
            Err(SetupError::UnknownDivision("Z".to_string()))
        );

        let saturday = PinnedBlock::lecture("A", "AI", 2, Slot::teaching(5, 12, "Room104", "LAB"));
        assert!(matches!(
            build_sessions(&[plan_a()], &[saturday], 5),
            Err(SetupError::PinnedOutsideWeek { .. })
        ));

        let mut zero = CourseLoad::new("CN").lectures(1);
        zero.lecture_hours = 0;
        let plan = DivisionPlan::new("C", &[], vec![zero]);
        assert_eq!(
            build_sessions(&[plan], &[], 5),
            Err(SetupError::ZeroDuration("CN".to_string()))
        );
    }
}
