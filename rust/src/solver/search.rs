//! Depth-first backtracking search over session placements.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::SolverConfig;
use crate::interner::NameId;
use crate::models::{day_name, format_hour, Session, SessionKind, Slot};
use crate::{log_checks, log_placements, log_trace};

use super::acceptance::{default_checks, AcceptanceCheck};
use super::availability::{Availability, Placement};
use super::candidates::{break_candidates, teaching_candidates, FixedBreakHours};

/// Errors raised while preparing a search. Infeasibility is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Unknown division: {0}")]
    UnknownDivision(String),
    #[error("Unknown room {room} in pinned session {session}")]
    UnknownRoom { session: String, room: String },
    #[error("Unknown faculty {faculty} in pinned session {session}")]
    UnknownFaculty { session: String, faculty: String },
    #[error("Session has zero duration: {0}")]
    ZeroDuration(String),
    #[error("Pinned session lies outside the working week: {0}")]
    PinnedOutsideWindow(String),
    #[error("Pinned session collides with an earlier pinned session: {0}")]
    PinnedConflict(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every session holds a consistent placement
    Solved,
    /// No assignment satisfies the constraints
    Infeasible,
    /// The node budget ran out before the search finished
    BudgetExhausted,
}

/// Counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Recursive steps entered
    pub nodes: u64,
    pub commits: u64,
    pub backtracks: u64,
    /// Complete assignments turned down by an acceptance check
    pub rejected_terminals: u64,
}

/// Outcome of [`Solver::solve`].
#[derive(Clone, Debug)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Sessions in search order. Placed when solved; otherwise only pinned sessions carry a slot.
    pub sessions: Vec<Session>,
    pub stats: SearchStats,
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }
}

/// Cancellation token threaded through the recursion.
///
/// Once solved or aborted, every active loop stops issuing candidates as soon
/// as its recursive call returns.
#[derive(Debug, Clone)]
pub struct SearchToken {
    solved: bool,
    aborted: bool,
    nodes: u64,
    node_limit: Option<u64>,
}

impl SearchToken {
    pub fn new(node_limit: Option<u64>) -> Self {
        Self {
            solved: false,
            aborted: false,
            nodes: 0,
            node_limit,
        }
    }

    /// Count a node. Returns false, aborting the search, once the budget is spent.
    fn enter(&mut self) -> bool {
        self.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                self.aborted = true;
                return false;
            }
        }
        true
    }

    fn mark_solved(&mut self) {
        self.solved = true;
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn should_stop(&self) -> bool {
        self.solved || self.aborted
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}

/// A session resolved against the catalog.
#[derive(Clone, Copy, Debug)]
struct PlannedSession<'c> {
    division: NameId,
    kind: SessionKind,
    duration: u8,
    rooms: &'c [NameId],
    faculty: &'c [NameId],
    pinned: bool,
}

/// Backtracking timetable solver.
///
/// Owns the session list and the availability state; the catalog is borrowed
/// and never mutated.
pub struct Solver<'c> {
    catalog: &'c Catalog,
    config: SolverConfig,
    sessions: Vec<Session>,
    plan: Vec<PlannedSession<'c>>,
    fixed_breaks: FixedBreakHours,
    checks: Vec<Box<dyn AcceptanceCheck>>,
    availability: Availability,
    placements: Vec<Option<Placement>>,
}

impl<'c> Solver<'c> {
    /// Prepare a search: order the sessions, resolve names to indices and
    /// commit pinned sessions into the availability state.
    pub fn new(
        catalog: &'c Catalog,
        mut sessions: Vec<Session>,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        config.validate()?;

        // Pinned first, then breaks, labs, tutorials, lectures; stable within each group
        sessions.sort_by_key(|s| match s.slot {
            Some(_) => 0,
            None => 1 + s.kind.search_rank(),
        });

        let mut fixed_breaks = FixedBreakHours::default();
        for fixed in &config.fixed_breaks {
            let division = catalog
                .division_id(&fixed.division)
                .ok_or_else(|| SolverError::UnknownDivision(fixed.division.clone()))?;
            fixed_breaks.insert((division, fixed.day), fixed.hour);
        }

        let mut availability = Availability::new(
            catalog.division_count(),
            catalog.room_count(),
            catalog.faculty_count(),
            &config,
        );
        let mut plan = Vec::with_capacity(sessions.len());
        let mut placements = Vec::with_capacity(sessions.len());
        let mut joint_blocks = FxHashSet::default();

        for session in &sessions {
            let division = catalog
                .division_id(&session.division)
                .ok_or_else(|| SolverError::UnknownDivision(session.division.clone()))?;
            if session.duration == 0 {
                return Err(SolverError::ZeroDuration(session.to_string()));
            }
            let (rooms, faculty) = if session.kind.is_break() {
                (&[][..], &[][..])
            } else {
                (
                    catalog.rooms_for(session.kind),
                    catalog.eligible_faculty(&session.subject),
                )
            };

            let placement = match &session.slot {
                Some(slot) => {
                    let p = resolve_pinned(catalog, &config, session, division, slot)?;
                    // A repeat of an already committed joint block reuses its room and faculty
                    let joint_repeat = !p.is_break
                        && !joint_blocks.insert((
                            session.subject.as_str(),
                            session.kind,
                            p.day,
                            p.start_hour,
                            p.duration,
                            p.room,
                            p.faculty,
                        ));
                    let free = if joint_repeat {
                        availability.is_division_free(&p)
                    } else {
                        availability.is_free(&p)
                    };
                    if !free || (p.is_break && availability.has_break(division, p.day)) {
                        return Err(SolverError::PinnedConflict(session.to_string()));
                    }
                    availability.commit(&p);
                    Some(p)
                }
                None => None,
            };

            plan.push(PlannedSession {
                division,
                kind: session.kind,
                duration: session.duration,
                rooms,
                faculty,
                pinned: placement.is_some(),
            });
            placements.push(placement);
        }

        let checks = default_checks(config.min_teaching_days);
        Ok(Self {
            catalog,
            config,
            sessions,
            plan,
            fixed_breaks,
            checks,
            availability,
            placements,
        })
    }

    /// Append an acceptance check run after the built-in ones.
    pub fn with_check(mut self, check: Box<dyn AcceptanceCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Sessions in search order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Current availability state (pinned sessions only, before solving).
    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Run the search to its first accepted assignment, exhaustion, or budget.
    pub fn solve(self) -> SolveResult {
        let Solver {
            catalog,
            config,
            mut sessions,
            plan,
            fixed_breaks,
            checks,
            availability,
            placements,
        } = self;
        let verbosity = config.verbosity;

        let mut search = Search {
            ctx: SearchContext {
                catalog,
                config: &config,
                sessions: &sessions,
                plan: &plan,
                fixed_breaks: &fixed_breaks,
                checks: &checks,
            },
            availability,
            placements,
            stats: SearchStats::default(),
        };

        let mut token = SearchToken::new(config.node_limit);
        let status = match search.preflight() {
            Some(idx) => {
                log_checks!(
                    verbosity,
                    "No candidate can ever host {}; search skipped",
                    sessions[idx]
                );
                SolveStatus::Infeasible
            }
            None => {
                search.descend(0, &mut token);
                if token.is_solved() {
                    SolveStatus::Solved
                } else if token.is_aborted() {
                    SolveStatus::BudgetExhausted
                } else {
                    SolveStatus::Infeasible
                }
            }
        };

        let Search {
            placements,
            mut stats,
            ..
        } = search;
        stats.nodes = token.nodes();

        if status == SolveStatus::Solved {
            for (session, placement) in sessions.iter_mut().zip(&placements) {
                if session.slot.is_none() {
                    session.slot = placement.as_ref().map(|p| slot_for(catalog, p));
                }
            }
        }

        log_placements!(
            verbosity,
            "Search finished: {:?} after {} nodes ({} commits, {} backtracks)",
            status,
            stats.nodes,
            stats.commits,
            stats.backtracks
        );

        SolveResult {
            status,
            sessions,
            stats,
        }
    }
}

/// Build a solver and run it.
pub fn generate_timetable(
    catalog: &Catalog,
    sessions: Vec<Session>,
    config: SolverConfig,
) -> Result<SolveResult, SolverError> {
    Ok(Solver::new(catalog, sessions, config)?.solve())
}

fn resolve_pinned(
    catalog: &Catalog,
    config: &SolverConfig,
    session: &Session,
    division: NameId,
    slot: &Slot,
) -> Result<Placement, SolverError> {
    if slot.day >= config.days_per_week || !config.fits_window(slot.start_hour, session.duration)
    {
        return Err(SolverError::PinnedOutsideWindow(session.to_string()));
    }
    let is_break = session.kind.is_break();
    let room = match (&slot.room, is_break) {
        (Some(name), false) => Some(catalog.room_id(name).ok_or_else(|| {
            SolverError::UnknownRoom {
                session: session.to_string(),
                room: name.clone(),
            }
        })?),
        _ => None,
    };
    let faculty = match (&slot.faculty, is_break) {
        (Some(name), false) => Some(catalog.faculty_id(name).ok_or_else(|| {
            SolverError::UnknownFaculty {
                session: session.to_string(),
                faculty: name.clone(),
            }
        })?),
        _ => None,
    };
    Ok(Placement {
        division,
        day: slot.day,
        start_hour: slot.start_hour,
        duration: session.duration,
        room,
        faculty,
        is_break,
    })
}

fn slot_for(catalog: &Catalog, p: &Placement) -> Slot {
    Slot {
        day: p.day,
        start_hour: p.start_hour,
        room: p
            .room
            .and_then(|r| catalog.room_name(r))
            .map(str::to_string),
        faculty: p
            .faculty
            .and_then(|f| catalog.faculty_name(f))
            .map(str::to_string),
    }
}

/// Read-only inputs of a running search, copied freely so candidate
/// iterators never borrow the mutable search state.
#[derive(Clone, Copy)]
struct SearchContext<'a> {
    catalog: &'a Catalog,
    config: &'a SolverConfig,
    sessions: &'a [Session],
    plan: &'a [PlannedSession<'a>],
    fixed_breaks: &'a FixedBreakHours,
    checks: &'a [Box<dyn AcceptanceCheck>],
}

struct Search<'a> {
    ctx: SearchContext<'a>,
    availability: Availability,
    placements: Vec<Option<Placement>>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    /// Index of the first unpinned session that no state could ever host.
    fn preflight(&self) -> Option<usize> {
        let ctx = self.ctx;
        ctx.plan.iter().position(|planned| {
            if planned.pinned {
                return false;
            }
            if planned.kind.is_break() {
                return break_candidates(
                    planned.division,
                    planned.duration,
                    ctx.fixed_breaks,
                    ctx.config,
                )
                .next()
                .is_none();
            }
            planned.duration > ctx.config.daily_load_ceiling
                || teaching_candidates(
                    planned.division,
                    planned.duration,
                    planned.rooms,
                    planned.faculty,
                    ctx.config,
                )
                .next()
                .is_none()
        })
    }

    /// Assign session `idx` and everything after it.
    fn descend(&mut self, idx: usize, token: &mut SearchToken) {
        if token.should_stop() || !token.enter() {
            return;
        }
        let ctx = self.ctx;
        if idx == ctx.plan.len() {
            self.accept_terminal(token);
            return;
        }

        let planned = ctx.plan[idx];
        if planned.pinned {
            self.descend(idx + 1, token);
            return;
        }

        if planned.kind.is_break() {
            let candidates = break_candidates(
                planned.division,
                planned.duration,
                ctx.fixed_breaks,
                ctx.config,
            );
            self.try_candidates(idx, candidates, token);
        } else {
            let candidates = teaching_candidates(
                planned.division,
                planned.duration,
                planned.rooms,
                planned.faculty,
                ctx.config,
            );
            self.try_candidates(idx, candidates, token);
        }
    }

    fn try_candidates<I>(&mut self, idx: usize, candidates: I, token: &mut SearchToken)
    where
        I: Iterator<Item = Placement>,
    {
        let ctx = self.ctx;
        let verbosity = ctx.config.verbosity;
        let planned = ctx.plan[idx];

        for placement in candidates {
            if !self.admits(&planned, &placement) {
                continue;
            }

            self.availability.commit(&placement);
            self.placements[idx] = Some(placement);
            self.stats.commits += 1;
            log_placements!(
                verbosity,
                "  [{}] {} {} {} {} -> {} {}",
                idx,
                ctx.sessions[idx].group_label(),
                ctx.sessions[idx].subject,
                ctx.sessions[idx].kind,
                day_name(placement.day),
                format_hour(placement.start_hour),
                describe_resources(ctx.catalog, &placement)
            );

            self.descend(idx + 1, token);
            if token.is_solved() {
                // Winning state stays committed
                return;
            }

            self.availability.rollback(&placement);
            self.placements[idx] = None;
            self.stats.backtracks += 1;
            log_trace!(
                verbosity,
                "  [{}] backtrack from {} {}",
                idx,
                day_name(placement.day),
                format_hour(placement.start_hour)
            );
            if token.is_aborted() {
                return;
            }
        }

        log_checks!(
            verbosity,
            "  [{}] no placement left for {} {} {}",
            idx,
            ctx.sessions[idx].group_label(),
            ctx.sessions[idx].subject,
            ctx.sessions[idx].kind
        );
    }

    fn admits(&self, planned: &PlannedSession<'_>, p: &Placement) -> bool {
        let fits = if planned.kind.is_break() {
            !self.availability.has_break(p.division, p.day)
        } else {
            self.availability.fits_load(
                p.division,
                p.day,
                p.duration,
                self.ctx.config.daily_load_ceiling,
            )
        };
        fits && self.availability.is_free(p)
    }

    fn accept_terminal(&mut self, token: &mut SearchToken) {
        let ctx = self.ctx;
        let placements: Vec<Placement> = self.placements.iter().flatten().copied().collect();
        for check in ctx.checks {
            if !check.accept(&placements, ctx.catalog.division_count()) {
                self.stats.rejected_terminals += 1;
                log_checks!(
                    ctx.config.verbosity,
                    "  Complete assignment rejected by {}",
                    check.name()
                );
                return;
            }
        }
        token.mark_solved();
    }
}

fn describe_resources(catalog: &Catalog, p: &Placement) -> String {
    match (p.room, p.faculty) {
        (Some(room), Some(faculty)) => format!(
            "@ {} by {}",
            catalog.room_name(room).unwrap_or("?"),
            catalog.faculty_name(faculty).unwrap_or("?")
        ),
        _ => String::from("(break)"),
    }
}
