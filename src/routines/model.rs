//! The `Routine` entity and its streak bookkeeping.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A tracked daily routine.
///
/// State is intentionally minimal: only the current streak length and the
/// last completion date are kept, no per-day completion log. Toggling off a
/// multi-day streak therefore rewinds `last_done_date` to yesterday rather
/// than to the true previous completion day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_done_date: Option<NaiveDate>,
    pub streak: u32,
    pub best_streak: u32,
}

impl Routine {
    /// Flip today's completion status, adjusting streak counters.
    ///
    /// Turning ON continues the streak when `last_done_date` is yesterday and
    /// restarts it otherwise; `best_streak` is raised to the new streak.
    /// Turning OFF decrements a streak of 2+ back to yesterday, or resets a
    /// streak of 0/1 entirely. `best_streak` is never lowered or touched on OFF.
    pub fn toggle(&mut self, today: NaiveDate) {
        let yesterday = today - Days::new(1);

        if self.last_done_date == Some(today) {
            // Already done today — turn OFF.
            if self.streak >= 2 {
                self.streak -= 1;
                self.last_done_date = Some(yesterday);
            } else {
                self.streak = 0;
                self.last_done_date = None;
            }
            return;
        }

        // Not done today — turn ON.
        if self.last_done_date == Some(yesterday) {
            self.streak += 1;
        } else {
            self.streak = 1;
        }
        self.best_streak = self.best_streak.max(self.streak);
        self.last_done_date = Some(today);
    }

    /// Project into the output record for the given calendar date.
    pub fn view(&self, today: NaiveDate) -> RoutineView {
        RoutineView {
            id: self.id,
            title: self.title.clone(),
            done: self.last_done_date == Some(today),
            created_at: self.created_at,
            last_done_date: self.last_done_date,
            streak: self.streak,
            best_streak: self.best_streak,
        }
    }
}

/// What the API returns for a routine. `done` is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineView {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub last_done_date: Option<NaiveDate>,
    pub streak: u32,
    pub best_streak: u32,
}
