// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `ManagedPosition`: the engine's internal view of an open trade (spec §3),
//! with the ATR-anchored stop-loss/take-profit setup, the monotonic
//! trailing-stop ratchet, exit detection, and P&L attribution (spec §4.7).

use autotrader_integration::ManagedPositionRecord;
use autotrader_markets::{is_forced_close_window, Direction};
use chrono::{DateTime, Utc};

/// Parameters for opening a new managed position (spec §4.7).
#[derive(Debug, Clone, Copy)]
pub struct EntryParams {
    pub direction: Direction,
    pub entry_price: f64,
    pub atr_at_entry: f64,
    pub lots: u32,
    pub sl_mult: f64,
    pub tp_mult: f64,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    ForcedClose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePnl {
    pub pnl_points: f64,
    pub pnl_pct: f64,
    pub holding_seconds: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagedPosition {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub atr_at_entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub highest_since_entry: f64,
    pub lowest_since_entry: f64,
    pub lots: u32,
    pub opened_at: DateTime<Utc>,
    /// Set once the trailing ratchet has moved `stop_loss` to at least
    /// break-even (spec §3's `breakeven_triggered?`, an open question:
    /// interpreted here as "no longer risking a loss on a reversal").
    pub breakeven_triggered: bool,
    /// Set the first time the ratchet fires at all (spec §3's
    /// `sl_tightened?`), distinguishing a still-virgin stop from one that
    /// has already been moved off its entry-time value.
    pub sl_tightened: bool,
    /// Cumulative whole ratchet steps already applied, counted against the
    /// fixed entry price rather than the previous call's price. A step only
    /// counts once favorable movement strictly exceeds its boundary, so a
    /// move landing exactly on `n * trail_step * atr_at_entry` applies `n-1`
    /// steps, not `n`, matching spec §8 scenario S1's boundary case.
    ratchet_steps: u32,
}

impl ManagedPosition {
    /// Opens a managed position at entry, per spec §4.7:
    /// - LONG: `stop_loss = entry - sl_mult*atr`, `take_profit = entry + tp_mult*atr`
    /// - SHORT: `stop_loss = entry + sl_mult*atr`, `take_profit = entry - tp_mult*atr`
    pub fn open(symbol: impl Into<String>, params: EntryParams) -> Self {
        let EntryParams {
            direction,
            entry_price,
            atr_at_entry,
            lots,
            sl_mult,
            tp_mult,
            opened_at,
        } = params;
        let (stop_loss, take_profit) = match direction {
            Direction::Long => (
                entry_price - sl_mult * atr_at_entry,
                entry_price + tp_mult * atr_at_entry,
            ),
            Direction::Short => (
                entry_price + sl_mult * atr_at_entry,
                entry_price - tp_mult * atr_at_entry,
            ),
        };
        Self {
            symbol: symbol.into(),
            direction,
            entry_price,
            atr_at_entry,
            stop_loss,
            take_profit,
            highest_since_entry: entry_price,
            lowest_since_entry: entry_price,
            lots,
            opened_at,
            breakeven_triggered: false,
            sl_tightened: false,
            ratchet_steps: 0,
        }
    }

    /// Total whole steps of favorable movement away from entry, `n` such
    /// that `favorable_move > n * step_size` (strict: a move landing exactly
    /// on a step boundary counts as `n - 1` steps, not `n`, until price
    /// moves past it). Computed against the fixed entry price so the result
    /// does not depend on call history.
    fn steps_from_entry(favorable_move: f64, step_size: f64) -> u32 {
        const EPS: f64 = 1e-9;
        if favorable_move <= 0.0 {
            return 0;
        }
        (((favorable_move - EPS) / step_size).floor().max(0.0)) as u32
    }

    /// The monotonic trailing-stop ratchet (spec §4.7): steps the stop
    /// toward price in `trail_move * atr_at_entry` increments, one per
    /// `trail_step * atr_at_entry` of favorable movement past entry, and
    /// never loosens. Cumulative step count is tracked against the fixed
    /// entry price rather than derived per-call off the last seen extreme,
    /// so a move that lands exactly on a step boundary doesn't fire early.
    pub fn apply_trailing_ratchet(&mut self, price: f64, trail_step: f64, trail_move: f64) {
        let step_size = trail_step * self.atr_at_entry;
        let move_size = trail_move * self.atr_at_entry;
        if step_size <= 0.0 {
            return;
        }
        match self.direction {
            Direction::Long => {
                if price > self.highest_since_entry {
                    self.highest_since_entry = price;
                }
                let total_steps =
                    Self::steps_from_entry(self.highest_since_entry - self.entry_price, step_size);
                if total_steps > self.ratchet_steps {
                    let new_steps = (total_steps - self.ratchet_steps) as f64;
                    let candidate = self.stop_loss + new_steps * move_size;
                    if candidate > self.stop_loss {
                        self.stop_loss = candidate;
                        self.sl_tightened = true;
                    }
                    self.ratchet_steps = total_steps;
                }
                if self.stop_loss >= self.entry_price {
                    self.breakeven_triggered = true;
                }
            }
            Direction::Short => {
                if price < self.lowest_since_entry {
                    self.lowest_since_entry = price;
                }
                let total_steps =
                    Self::steps_from_entry(self.entry_price - self.lowest_since_entry, step_size);
                if total_steps > self.ratchet_steps {
                    let new_steps = (total_steps - self.ratchet_steps) as f64;
                    let candidate = self.stop_loss - new_steps * move_size;
                    if candidate < self.stop_loss {
                        self.stop_loss = candidate;
                        self.sl_tightened = true;
                    }
                    self.ratchet_steps = total_steps;
                }
                if self.stop_loss <= self.entry_price {
                    self.breakeven_triggered = true;
                }
            }
        }
    }

    /// Exit detection against a bar's high/low (spec §4.7). Tick-driven
    /// callers pass `price` for both `low` and `high`.
    pub fn check_exit(&self, low: f64, high: f64, now: DateTime<Utc>, close_before_market_close: bool) -> Option<ExitReason> {
        if close_before_market_close && is_forced_close_window(now) {
            return Some(ExitReason::ForcedClose);
        }
        match self.direction {
            Direction::Long => {
                if low <= self.stop_loss {
                    Some(ExitReason::StopLoss)
                } else if high >= self.take_profit {
                    Some(ExitReason::TakeProfit)
                } else {
                    None
                }
            }
            Direction::Short => {
                if high >= self.stop_loss {
                    Some(ExitReason::StopLoss)
                } else if low <= self.take_profit {
                    Some(ExitReason::TakeProfit)
                } else {
                    None
                }
            }
        }
    }

    /// P&L attribution on close (spec §4.7).
    pub fn close_pnl(&self, exit_price: f64, now: DateTime<Utc>) -> ClosePnl {
        let pnl_points = match self.direction {
            Direction::Long => exit_price - self.entry_price,
            Direction::Short => self.entry_price - exit_price,
        };
        let pnl_pct = if self.entry_price != 0.0 {
            pnl_points / self.entry_price * 100.0
        } else {
            0.0
        };
        let holding_seconds = (now - self.opened_at).num_seconds().max(0);
        ClosePnl {
            pnl_points,
            pnl_pct,
            holding_seconds,
        }
    }

    pub fn to_record(&self) -> ManagedPositionRecord {
        ManagedPositionRecord {
            symbol: self.symbol.clone(),
            direction: self.direction,
            entry_price: self.entry_price,
            atr_at_entry: self.atr_at_entry,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            highest_since_entry: self.highest_since_entry,
            lowest_since_entry: self.lowest_since_entry,
            lots: self.lots,
            opened_at: self.opened_at,
            breakeven_triggered: self.breakeven_triggered,
            sl_tightened: self.sl_tightened,
            ratchet_steps: self.ratchet_steps,
        }
    }

    pub fn from_record(record: ManagedPositionRecord) -> Self {
        Self {
            symbol: record.symbol,
            direction: record.direction,
            entry_price: record.entry_price,
            atr_at_entry: record.atr_at_entry,
            stop_loss: record.stop_loss,
            take_profit: record.take_profit,
            highest_since_entry: record.highest_since_entry,
            lowest_since_entry: record.lowest_since_entry,
            lots: record.lots,
            opened_at: record.opened_at,
            breakeven_triggered: record.breakeven_triggered,
            sl_tightened: record.sl_tightened,
            ratchet_steps: record.ratchet_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn opened_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 29, 2, 0, 0).unwrap()
    }

    fn long_position() -> ManagedPosition {
        ManagedPosition::open(
            "C2605",
            EntryParams {
                direction: Direction::Long,
                entry_price: 2450.0,
                atr_at_entry: 10.0,
                lots: 1,
                sl_mult: 1.2,
                tp_mult: 2.0,
                opened_at: opened_at(),
            },
        )
    }

    #[test]
    fn s1_long_trailing_ratchet() {
        let mut pos = long_position();
        assert_eq!(pos.stop_loss, 2438.0);
        assert_eq!(pos.take_profit, 2470.0);

        pos.apply_trailing_ratchet(2453.0, 0.3, 0.15);
        assert_eq!(pos.stop_loss, 2438.0); // < 3 ATR move, no ratchet yet

        pos.apply_trailing_ratchet(2456.0, 0.3, 0.15);
        assert!((pos.stop_loss - 2439.5).abs() < 1e-9);

        pos.apply_trailing_ratchet(2462.0, 0.3, 0.15);
        assert!((pos.stop_loss - 2442.5).abs() < 1e-9);
    }

    #[test]
    fn s2_long_stop_loss_hit() {
        let pos = long_position();
        assert_eq!(pos.check_exit(2450.0, 2450.0, opened_at(), false), None);
        let exit = pos.check_exit(2437.9, 2437.9, opened_at(), false);
        assert_eq!(exit, Some(ExitReason::StopLoss));
        let pnl = pos.close_pnl(2437.9, opened_at());
        assert!((pnl.pnl_points - (-12.1)).abs() < 1e-9);
        assert!((pnl.pnl_pct - (-0.4938775510204082)).abs() < 1e-6);
    }

    #[test]
    fn s3_short_take_profit_hit() {
        let pos = ManagedPosition::open(
            "C2605",
            EntryParams {
                direction: Direction::Short,
                entry_price: 2450.0,
                atr_at_entry: 10.0,
                lots: 1,
                sl_mult: 1.2,
                tp_mult: 2.0,
                opened_at: opened_at(),
            },
        );
        assert_eq!(pos.stop_loss, 2462.0);
        assert_eq!(pos.take_profit, 2430.0);
        assert_eq!(pos.check_exit(2435.0, 2435.0, opened_at(), false), None);
        let exit = pos.check_exit(2429.0, 2429.0, opened_at(), false);
        assert_eq!(exit, Some(ExitReason::TakeProfit));
        let pnl = pos.close_pnl(2429.0, opened_at());
        assert_eq!(pnl.pnl_points, 21.0);
    }

    #[test]
    fn stop_loss_is_monotonically_non_decreasing_for_long() {
        let mut pos = long_position();
        let mut last = pos.stop_loss;
        for price in [2451.0, 2448.0, 2460.0, 2455.0, 2470.0, 2465.0] {
            pos.apply_trailing_ratchet(price, 0.3, 0.15);
            assert!(pos.stop_loss >= last);
            last = pos.stop_loss;
        }
    }

    #[test]
    fn stop_loss_is_monotonically_non_increasing_for_short() {
        let mut pos = ManagedPosition::open(
            "C2605",
            EntryParams {
                direction: Direction::Short,
                entry_price: 2450.0,
                atr_at_entry: 10.0,
                lots: 1,
                sl_mult: 1.2,
                tp_mult: 2.0,
                opened_at: opened_at(),
            },
        );
        let mut last = pos.stop_loss;
        for price in [2449.0, 2452.0, 2440.0, 2445.0, 2430.0, 2435.0] {
            pos.apply_trailing_ratchet(price, 0.3, 0.15);
            assert!(pos.stop_loss <= last);
            last = pos.stop_loss;
        }
    }

    #[test]
    fn forced_close_window_overrides_sl_tp() {
        let pos = long_position();
        let near_close = Utc.with_ymd_and_hms(2026, 7, 29, 6, 56, 0).unwrap(); // 14:56 China
        assert_eq!(
            pos.check_exit(2450.0, 2450.0, near_close, true),
            Some(ExitReason::ForcedClose)
        );
    }

    #[test]
    fn no_false_exit_while_price_never_crosses_initial_stop() {
        let mut pos = long_position();
        for price in [2451.0, 2453.0, 2449.0, 2452.0, 2448.5] {
            assert_eq!(pos.check_exit(price, price, opened_at(), false), None);
            pos.apply_trailing_ratchet(price, 0.3, 0.15);
        }
    }
}
