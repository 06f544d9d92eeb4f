// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Daily risk state (spec §3, intraday mode only): realized P&L and
//! consecutive-loss tracking, reset whenever the calendar date (in China
//! Standard Time) rolls over. Kept in memory only — it is transient by
//! construction, so it is not one of the four persisted files (spec §4.4).

use autotrader_markets::local_date;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRiskState {
    pub date: NaiveDate,
    pub realized_pnl: f64,
    pub consecutive_loss_count: u32,
    pub pause_until: Option<DateTime<Utc>>,
}

impl DailyRiskState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            realized_pnl: 0.0,
            consecutive_loss_count: 0,
            pause_until: None,
        }
    }

    /// Resets all counters if `now` has rolled onto a new China-local
    /// calendar date since the state was last touched.
    pub fn roll_to(&mut self, now: DateTime<Utc>) {
        let today = local_date(now);
        if today != self.date {
            *self = Self::new(today);
        }
    }

    /// Records a closed trade's realized P&L and updates the
    /// consecutive-loss counter and pause window (spec §4.6: pause for 30
    /// minutes after `max_consecutive_losses` losing closes in a row).
    pub fn record_close(&mut self, pnl: f64, now: DateTime<Utc>, max_consecutive_losses: u32) {
        self.realized_pnl += pnl;
        if pnl < 0.0 {
            self.consecutive_loss_count += 1;
            if self.consecutive_loss_count >= max_consecutive_losses {
                self.pause_until = Some(now + chrono::Duration::minutes(30));
            }
        } else {
            self.consecutive_loss_count = 0;
            self.pause_until = None;
        }
    }

    pub fn is_paused(&self, now: DateTime<Utc>) -> bool {
        self.pause_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pause_triggers_after_n_consecutive_losses() {
        let mut state = DailyRiskState::new(Utc::now().date_naive());
        let now = Utc.with_ymd_and_hms(2026, 7, 29, 3, 0, 0).unwrap();
        state.record_close(-10.0, now, 3);
        state.record_close(-5.0, now, 3);
        assert!(!state.is_paused(now));
        state.record_close(-1.0, now, 3);
        assert!(state.is_paused(now));
        assert!(!state.is_paused(now + chrono::Duration::minutes(31)));
    }

    #[test]
    fn a_winning_close_resets_the_streak() {
        let mut state = DailyRiskState::new(Utc::now().date_naive());
        let now = Utc::now();
        state.record_close(-10.0, now, 3);
        state.record_close(20.0, now, 3);
        assert_eq!(state.consecutive_loss_count, 0);
        assert!(!state.is_paused(now));
    }

    #[test]
    fn rolling_to_a_new_date_resets_everything() {
        let mut state = DailyRiskState::new(Utc.with_ymd_and_hms(2026, 7, 28, 1, 0, 0).unwrap().date_naive());
        state.realized_pnl = -100.0;
        state.roll_to(Utc.with_ymd_and_hms(2026, 7, 29, 1, 0, 0).unwrap());
        assert_eq!(state.realized_pnl, 0.0);
    }
}
