//! Plain-text weekly grids, one per division.

use std::fmt::Write;

use crate::config::SolverConfig;
use crate::models::{day_name, Session};

const DAY_COLUMN_WIDTH: usize = 15;
const HOUR_COLUMN_WIDTH: usize = 25;
const EMPTY_CELL: &str = "--";

/// Text shown in a grid cell for a placed session.
fn cell_text(session: &Session) -> String {
    if session.kind.is_break() {
        return "BREAK".to_string();
    }
    let faculty = session
        .slot
        .as_ref()
        .and_then(|s| s.faculty.as_deref())
        .unwrap_or("?");
    format!(
        "{} {} ({})",
        session.subject,
        session.kind.grid_marker(),
        faculty
    )
}

/// Day-by-hour cells for `division`, sub-batch sessions included.
///
/// Sub-batch sessions share the division's hours, so at most one session lands in a cell.
pub fn division_grid(sessions: &[Session], division: &str, config: &SolverConfig) -> Vec<Vec<String>> {
    let width = config.window_hours() as usize;
    let mut grid = vec![vec![EMPTY_CELL.to_string(); width]; config.days_per_week as usize];

    for session in sessions.iter().filter(|s| s.division == division) {
        let Some(slot) = &session.slot else {
            continue;
        };
        let Some(row) = grid.get_mut(slot.day as usize) else {
            continue;
        };
        let text = cell_text(session);
        for hour in slot.start_hour..slot.start_hour.saturating_add(session.duration) {
            let Some(col) = hour.checked_sub(config.day_start_hour) else {
                continue;
            };
            if let Some(cell) = row.get_mut(col as usize) {
                *cell = text.clone();
            }
        }
    }
    grid
}

/// Render one division's week as an aligned text table.
pub fn render_division(sessions: &[Session], division: &str, config: &SolverConfig) -> String {
    let grid = division_grid(sessions, division, config);
    let rule = "=".repeat(53);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{:^53}", format!("Timetable for Division {}", division));
    let _ = writeln!(out, "{}", rule);

    let _ = write!(out, "{:<w$}", "Day/Time", w = DAY_COLUMN_WIDTH);
    for hour in config.day_start_hour..config.day_end_hour {
        let _ = write!(
            out,
            "{:<w$}",
            format!("{}-{}", hour, hour + 1),
            w = HOUR_COLUMN_WIDTH
        );
    }
    out.push('\n');

    for (day, row) in grid.iter().enumerate() {
        let _ = write!(out, "{:<w$}", day_name(day as u8), w = DAY_COLUMN_WIDTH);
        for cell in row {
            let _ = write!(out, "{:<w$}", cell, w = HOUR_COLUMN_WIDTH);
        }
        out.push('\n');
    }
    out
}

/// Render every division appearing in `sessions`, in first-appearance order.
pub fn render_all(sessions: &[Session], config: &SolverConfig) -> String {
    let mut divisions: Vec<&str> = Vec::new();
    for session in sessions {
        if !divisions.contains(&session.division.as_str()) {
            divisions.push(&session.division);
        }
    }
    divisions
        .into_iter()
        .map(|d| render_division(sessions, d, config))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionKind, Slot};

    fn sample() -> Vec<Session> {
        vec![
            Session::new("A", "CN", SessionKind::Lab, 2)
                .in_sub_batch("1")
                .pinned(Slot::teaching(0, 8, "105Lab", "NNS")),
            Session::break_for("A").pinned(Slot::new(0, 11)),
            Session::new("A", "SMSS", SessionKind::Tutorial, 1)
                .in_sub_batch("2")
                .pinned(Slot::teaching(4, 17, "Room214", "VKK")),
            Session::new("B", "DSML", SessionKind::Lecture, 1)
                .pinned(Slot::teaching(0, 8, "Room101", "PDM")),
        ]
    }

    #[test]
    fn test_grid_cells() {
        let grid = division_grid(&sample(), "A", &SolverConfig::default());
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0].len(), 10);
        assert_eq!(grid[0][0], "CN (Lab) (NNS)");
        assert_eq!(grid[0][1], "CN (Lab) (NNS)");
        assert_eq!(grid[0][2], "--");
        assert_eq!(grid[0][3], "BREAK");
        assert_eq!(grid[4][9], "SMSS (T) (VKK)");
        // Division B's lecture stays out of A's grid
        assert!(grid.iter().flatten().all(|c| !c.contains("DSML")));
    }

    #[test]
    fn test_render_layout() {
        let text = render_division(&sample(), "B", &SolverConfig::default());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("Timetable for Division B"));
        assert!(lines[3].starts_with("Day/Time"));
        assert!(lines[3].contains("17-18"));
        assert!(lines[4].starts_with("Monday"));
        assert!(lines[4].contains("DSML (L) (PDM)"));
        assert!(lines[8].starts_with("Friday"));
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_render_all_lists_each_division_once() {
        let text = render_all(&sample(), &SolverConfig::default());
        assert_eq!(text.matches("Timetable for Division A").count(), 1);
        assert_eq!(text.matches("Timetable for Division B").count(), 1);
    }
}
