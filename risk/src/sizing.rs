// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! ATR-derived position sizing on accepted entry (spec §4.6).

/// `lots = clamp(floor(R / (d * M)), 1, max_lots)` where `R = equity *
/// risk_pct` is the per-trade risk cap and `d = atr * sl_mult` is the stop
/// distance. Falls back to `max_lots` if equity or the volume multiple are
/// unavailable (`<= 0`).
pub fn position_size(
    equity: f64,
    volume_multiple: f64,
    atr: f64,
    sl_mult: f64,
    risk_pct: f64,
    max_lots: u32,
) -> u32 {
    if equity <= 0.0 || volume_multiple <= 0.0 || !atr.is_finite() || atr <= 0.0 {
        return max_lots.max(1);
    }
    let risk_cap = equity * risk_pct;
    let stop_distance = atr * sl_mult;
    let denom = stop_distance * volume_multiple;
    if denom <= 0.0 {
        return max_lots.max(1);
    }
    let raw_lots = (risk_cap / denom).floor() as i64;
    raw_lots.clamp(1, max_lots.max(1) as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_down_to_risk_budget() {
        // equity 100_000, risk_pct 1% -> budget 1_000. atr=10, sl_mult=1.2,
        // volume_multiple=10 -> d*M = 120. floor(1000/120) = 8, capped at 5.
        let lots = position_size(100_000.0, 10.0, 10.0, 1.2, 0.01, 5);
        assert_eq!(lots, 5);
    }

    #[test]
    fn at_least_one_lot_even_when_budget_is_tiny() {
        let lots = position_size(1_000.0, 10.0, 10.0, 1.2, 0.01, 5);
        assert_eq!(lots, 1);
    }

    #[test]
    fn falls_back_to_max_lots_when_equity_unavailable() {
        assert_eq!(position_size(0.0, 10.0, 10.0, 1.2, 0.01, 3), 3);
        assert_eq!(position_size(100_000.0, 0.0, 10.0, 1.2, 0.01, 3), 3);
        assert_eq!(position_size(100_000.0, 10.0, f64::NAN, 1.2, 0.01, 3), 3);
    }
}
