// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The risk gate (C6): position sizing plus the hard entry gates of spec
//! §4.6, evaluated in the order the spec lists them so the first violation
//! determines the refusal reason.

use crate::daily::DailyRiskState;
use crate::error::RiskRefusal;
use crate::sizing::position_size;
use autotrader_integration::StrategyMode;
use autotrader_markets::{is_trading_time, minute_of_day};
use chrono::{DateTime, Utc};

/// Hours (China local time) blacklisted for new intraday entries, per the
/// v6 alignment rules (spec §4.6).
const NO_ENTRY_HOURS: [u32; 3] = [3, 6, 13];

/// Minute-of-day past which intraday mode stops opening new positions
/// (14:30 China time).
const NO_ENTRY_AFTER_MINUTE: u32 = 14 * 60 + 30;

#[derive(Debug, Clone, Copy)]
pub struct RiskParams {
    pub mode: StrategyMode,
    pub sl_mult: f64,
    pub risk_pct: f64,
    pub max_lots: u32,
    pub max_risk_ratio: f64,
    pub max_daily_loss_pct: f64,
    pub max_consecutive_losses: u32,
}

/// Snapshot of account/market facts the gate needs to evaluate a single
/// entry attempt; gathered by the scheduler from the market-data service.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext {
    pub now: DateTime<Utc>,
    pub equity: f64,
    pub risk_ratio: f64,
    pub volume_multiple: f64,
    pub atr: f64,
}

/// Evaluates every hard gate in spec order, returning the sized lot count
/// on success or the first violated gate's reason on failure.
pub fn check_entry(
    params: &RiskParams,
    ctx: &EntryContext,
    daily: &DailyRiskState,
) -> Result<u32, RiskRefusal> {
    if !is_trading_time(ctx.now) {
        return Err(RiskRefusal::SessionClosed);
    }

    if ctx.risk_ratio >= params.max_risk_ratio {
        return Err(RiskRefusal::RiskRatioCap {
            observed: ctx.risk_ratio,
            cap: params.max_risk_ratio,
        });
    }

    if matches!(params.mode, StrategyMode::Intraday) {
        if daily.realized_pnl < 0.0 && ctx.equity > 0.0 {
            let loss_pct = daily.realized_pnl.abs() / ctx.equity;
            if loss_pct >= params.max_daily_loss_pct {
                return Err(RiskRefusal::DailyLossCap {
                    observed_pct: loss_pct * 100.0,
                    cap_pct: params.max_daily_loss_pct * 100.0,
                });
            }
        }

        if daily.is_paused(ctx.now) {
            return Err(RiskRefusal::ConsecutiveLossPause {
                count: daily.consecutive_loss_count,
                pause_until: daily.pause_until.unwrap_or(ctx.now),
            });
        }

        let minute = minute_of_day(ctx.now);
        let hour = minute / 60;
        if NO_ENTRY_HOURS.contains(&hour) {
            return Err(RiskRefusal::NoEntryHour { hour });
        }
        if minute >= NO_ENTRY_AFTER_MINUTE {
            return Err(RiskRefusal::NoEntryAfterCutoff);
        }
    }

    Ok(position_size(
        ctx.equity,
        ctx.volume_multiple,
        ctx.atr,
        params.sl_mult,
        params.risk_pct,
        params.max_lots,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn intraday_params() -> RiskParams {
        RiskParams {
            mode: StrategyMode::Intraday,
            sl_mult: 1.2,
            risk_pct: 0.01,
            max_lots: 1,
            max_risk_ratio: 0.80,
            max_daily_loss_pct: 0.03,
            max_consecutive_losses: 3,
        }
    }

    fn in_session_now() -> DateTime<Utc> {
        // 10:00 China time.
        Utc.with_ymd_and_hms(2026, 7, 29, 2, 0, 0).unwrap()
    }

    #[test]
    fn s5_risk_ratio_cap_rejects_entry() {
        let params = intraday_params();
        let ctx = EntryContext {
            now: in_session_now(),
            equity: 100_000.0,
            risk_ratio: 0.81,
            volume_multiple: 10.0,
            atr: 10.0,
        };
        let daily = DailyRiskState::new(in_session_now().date_naive());
        let err = check_entry(&params, &ctx, &daily).unwrap_err();
        assert!(err.to_string().contains("risk ratio"));
    }

    #[test]
    fn session_gate_blocks_regardless_of_signal_strength() {
        let params = intraday_params();
        let closed = Utc.with_ymd_and_hms(2026, 7, 29, 4, 0, 0).unwrap(); // 12:00 China
        let ctx = EntryContext {
            now: closed,
            equity: 100_000.0,
            risk_ratio: 0.1,
            volume_multiple: 10.0,
            atr: 10.0,
        };
        let daily = DailyRiskState::new(closed.date_naive());
        assert_eq!(check_entry(&params, &ctx, &daily), Err(RiskRefusal::SessionClosed));
    }

    #[test]
    fn consecutive_loss_pause_blocks_new_entries() {
        let params = intraday_params();
        let now = in_session_now();
        let mut daily = DailyRiskState::new(now.date_naive());
        daily.record_close(-1.0, now, 3);
        daily.record_close(-1.0, now, 3);
        daily.record_close(-1.0, now, 3);
        let ctx = EntryContext {
            now,
            equity: 100_000.0,
            risk_ratio: 0.1,
            volume_multiple: 10.0,
            atr: 10.0,
        };
        assert!(matches!(
            check_entry(&params, &ctx, &daily),
            Err(RiskRefusal::ConsecutiveLossPause { .. })
        ));
    }

    #[test]
    fn swing_mode_skips_intraday_only_gates() {
        let mut params = intraday_params();
        params.mode = StrategyMode::Swing;
        let now = in_session_now();
        let mut daily = DailyRiskState::new(now.date_naive());
        daily.realized_pnl = -1_000_000.0; // would trip daily-loss cap if checked
        let ctx = EntryContext {
            now,
            equity: 100_000.0,
            risk_ratio: 0.1,
            volume_multiple: 10.0,
            atr: 10.0,
        };
        assert!(check_entry(&params, &ctx, &daily).is_ok());
    }
}
