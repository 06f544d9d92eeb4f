// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The fixed Chinese futures trading-session calendar (spec §6), shared by
//! the risk gate's session check and the scheduler's sleep-until-next-open
//! calculation so the two components can't disagree about what "open" means.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

/// China Standard Time, UTC+8. The session calendar is defined in local
/// exchange time regardless of where the process runs.
fn china_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("valid fixed offset")
}

/// Minute-of-day (0..1440) in China Standard Time for a given instant.
pub fn minute_of_day(at: DateTime<Utc>) -> u32 {
    let local = at.with_timezone(&china_offset());
    local.hour() * 60 + local.minute()
}

/// Calendar date in China Standard Time for a given instant; used to detect
/// the daily rollover that resets intraday risk state (spec §3).
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&china_offset()).date_naive()
}

/// The four trading windows, in minutes since local midnight (spec §6):
/// `[540, 690)` (09:00-11:30), `[810, 900)` (13:30-15:00),
/// `[1260, 1440)` (21:00-24:00), `[0, 150)` (00:00-02:30, the night
/// session's tail past midnight).
const SESSIONS: [(u32, u32); 4] = [(540, 690), (810, 900), (1260, 1440), (0, 150)];

/// Whether `minute` (0..1440) falls inside a trading session.
pub fn is_trading_minute(minute: u32) -> bool {
    SESSIONS.iter().any(|&(start, end)| minute >= start && minute < end)
}

/// Whether `at` falls inside a trading session, per the China Standard Time
/// calendar.
pub fn is_trading_time(at: DateTime<Utc>) -> bool {
    is_trading_minute(minute_of_day(at))
}

/// Session-open times used for sleep calculation, in minutes since local
/// midnight: 09:00, 13:30, 21:00 (spec §6). The night session's continuation
/// past midnight is not a fresh "open" — it is the same session as 21:00.
const SESSION_OPENS: [u32; 3] = [540, 810, 1260];

/// Minutes to sleep from `at` until the next session-open minute (or `0` if
/// currently inside a session).
pub fn minutes_until_next_open(at: DateTime<Utc>) -> u32 {
    let minute = minute_of_day(at);
    if is_trading_minute(minute) {
        return 0;
    }
    SESSION_OPENS
        .iter()
        .filter(|&&open| open > minute)
        .min()
        .map(|&open| open - minute)
        .unwrap_or_else(|| (1440 - minute) + SESSION_OPENS[0])
}

/// Whether `at` falls in the forced-close window `[14:55, 15:00)` China
/// time (spec §4.7).
pub fn is_forced_close_window(at: DateTime<Utc>) -> bool {
    let minute = minute_of_day(at);
    (14 * 60 + 55..15 * 60).contains(&minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn china(h: u32, m: u32) -> DateTime<Utc> {
        // Build directly in UTC such that adding the +8h offset lands on h:m.
        let utc_hour = (h + 24 - 8) % 24;
        Utc.with_ymd_and_hms(2026, 7, 29, utc_hour, m, 0).unwrap()
    }

    #[test]
    fn morning_session_is_open() {
        assert!(is_trading_time(china(10, 0)));
    }

    #[test]
    fn lunch_break_is_closed() {
        assert!(!is_trading_time(china(12, 0)));
    }

    #[test]
    fn night_session_past_midnight_is_open() {
        assert!(is_trading_time(china(1, 0)));
    }

    #[test]
    fn no_entry_hour_boundary_03_06_13_checked_by_caller() {
        // hours 3, 6, 13 are a risk-gate concern (spec §4.6), not the
        // session gate itself; 03:00 and 06:00 are outside any session here.
        assert!(!is_trading_time(china(3, 0)));
        assert!(!is_trading_time(china(6, 0)));
    }

    #[test]
    fn forced_close_window_is_1455_to_1500() {
        assert!(is_forced_close_window(china(14, 56)));
        assert!(!is_forced_close_window(china(15, 0)));
        assert!(!is_forced_close_window(china(14, 54)));
    }

    #[test]
    fn minutes_until_next_open_from_closed_period() {
        // 12:00 -> next open is 13:30, i.e. 90 minutes away.
        assert_eq!(minutes_until_next_open(china(12, 0)), 90);
    }

    #[test]
    fn minutes_until_next_open_is_zero_inside_session() {
        assert_eq!(minutes_until_next_open(china(10, 0)), 0);
    }
}
