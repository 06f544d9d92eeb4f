// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The per-symbol cycle body shared by the swing main loop, the intraday
//! fast scan, and the 500ms SL/TP monitor (spec §4.8, data flow in §2):
//! fetch quote/ATR/position -> reconcile -> check exit -> if flat, evaluate
//! an entry through the signal pipeline and the risk gate.

use autotrader_execution::{MarketDataService, OrderResult, OrderResultStatus};
use autotrader_integration::{
    decision::{OrderOutcomeRecord, OrderStatusLabel},
    DataStore, StrategyMode, TradeDecision, TradeLogEntry, TradeLogType,
};
use autotrader_markets::{Action, Direction, Duration as BarDuration, Offset, Side};
use autotrader_risk::{check_entry, EntryContext, RiskParams};
use autotrader_strategies::{evaluate_intraday, evaluate_swing, factors, Evaluation};
use chrono::{DateTime, Utc};

use crate::state::SchedulerState;

/// Runs one full cycle for `symbol`. Never panics on missing market data —
/// a cache miss or not-ready service is a skipped cycle for this symbol,
/// logged at debug (spec §7 `TransientDataGap`).
pub fn run_cycle(symbol: &str, market_data: &MarketDataService, store: &DataStore, state: &mut SchedulerState, now: DateTime<Utc>) {
    let Some(quote) = market_data.get_quote(symbol) else {
        tracing::debug!(symbol, "quote not yet cached, skipping this cycle");
        return;
    };
    if !quote.is_usable() {
        tracing::debug!(symbol, "quote not usable yet, skipping this cycle");
        return;
    }

    let bar_duration = match state.config.strategy_mode {
        StrategyMode::Swing => BarDuration::M15,
        StrategyMode::Intraday => BarDuration::M5,
    };
    let atr = market_data.get_atr(symbol, bar_duration, 14).unwrap_or(f64::NAN);

    let broker_position = market_data.get_position_info(symbol).unwrap_or_default();
    state.positions.reconcile(
        symbol,
        &broker_position,
        atr,
        state.config.atr_sl_multiplier,
        state.config.atr_tp_multiplier,
        now,
    );

    if state.positions.has_position(symbol) {
        manage_open_position(symbol, market_data, store, state, quote.last_price, now);
    } else {
        evaluate_entry(symbol, market_data, store, state, quote.last_price, quote.volume_multiple, atr, now);
    }
}

/// The 500ms SL/TP-only monitor (spec §4.7/§5): re-checks exit conditions
/// on an already-open position without re-running the signal pipeline.
pub fn monitor_exit(symbol: &str, market_data: &MarketDataService, store: &DataStore, state: &mut SchedulerState, now: DateTime<Utc>) {
    if !state.positions.has_position(symbol) {
        return;
    }
    let Some(quote) = market_data.get_quote(symbol) else {
        return;
    };
    if !quote.is_usable() {
        return;
    }
    manage_open_position(symbol, market_data, store, state, quote.last_price, now);
}

fn manage_open_position(symbol: &str, market_data: &MarketDataService, store: &DataStore, state: &mut SchedulerState, price: f64, now: DateTime<Utc>) {
    state.positions.apply_trailing(symbol, price, state.config.trail_step_atr, state.config.trail_move_atr);

    let close_before_close = state.config.close_before_market_close;
    let Some(reason) = state.positions.check_exit(symbol, price, price, now, close_before_close) else {
        return;
    };
    let Some(position) = state.positions.get(symbol).cloned() else {
        return;
    };

    let results = match market_data.close_position(symbol) {
        Ok(results) => results,
        Err(err) => {
            tracing::warn!(symbol, %err, "close order submission failed, retrying next cycle");
            return;
        }
    };
    let Some(result) = results.into_iter().next() else {
        tracing::warn!(symbol, "exit triggered but broker already reports a flat position");
        return;
    };
    if result.status != OrderResultStatus::Submitted {
        tracing::warn!(symbol, status = ?result.status, "close order did not submit, retrying next cycle");
        return;
    }

    let pnl = position.close_pnl(price, now);
    let action = match position.direction {
        Direction::Long => Action::CloseLong,
        Direction::Short => Action::CloseShort,
    };
    state.daily.record_close(pnl.pnl_points, now, state.config.max_consecutive_losses);
    store.append_trade_log(TradeLogEntry {
        timestamp: now,
        symbol: symbol.to_string(),
        r#type: TradeLogType::Close,
        direction: position.direction,
        lots: position.lots,
        price,
        order_id: Some(result.id),
    });
    state.record_decision(TradeDecision {
        timestamp: now,
        symbol: symbol.to_string(),
        action,
        lots: position.lots,
        price,
        reason: format!("{reason:?}"),
        signal: None,
        composite_score: 0.0,
        atr: position.atr_at_entry,
        stop_loss: position.stop_loss,
        take_profit: position.take_profit,
        entry_price: position.entry_price,
        pnl_points: pnl.pnl_points,
        pnl_pct: pnl.pnl_pct,
        holding_seconds: pnl.holding_seconds,
        order_result: Some(OrderOutcomeRecord {
            id: result.id,
            status: OrderStatusLabel::Submitted,
            error: None,
        }),
    });
    let _ = state.positions.remove(symbol);
    state.positions.save(store);
}

fn evaluate_entry(
    symbol: &str,
    market_data: &MarketDataService,
    store: &DataStore,
    state: &mut SchedulerState,
    price: f64,
    volume_multiple: f64,
    atr: f64,
    now: DateTime<Utc>,
) {
    let bias = state.bias.get(symbol);
    let evaluation = match state.config.strategy_mode {
        StrategyMode::Swing => evaluate_swing(bias),
        StrategyMode::Intraday => match market_data.get_klines(symbol, BarDuration::M5, factors::MIN_BARS + 10) {
            Some(bars) => evaluate_intraday(&bars, bias),
            None => {
                tracing::debug!(symbol, "not enough 5m bars cached yet, skipping entry evaluation");
                return;
            }
        },
    };

    if !evaluation.action.is_entry() {
        if let Some(veto) = evaluation.veto {
            tracing::debug!(symbol, veto, "entry vetoed by alignment gate");
        }
        return;
    }

    let account = market_data.get_account_info().unwrap_or_default();
    let risk_params = RiskParams {
        mode: state.config.strategy_mode,
        sl_mult: state.config.atr_sl_multiplier,
        risk_pct: state.config.max_risk_per_trade,
        max_lots: state.config.max_lots,
        max_risk_ratio: state.config.max_risk_ratio,
        max_daily_loss_pct: state.config.max_daily_loss_pct,
        max_consecutive_losses: state.config.max_consecutive_losses,
    };
    let entry_ctx = EntryContext {
        now,
        equity: account.balance,
        risk_ratio: account.risk_ratio(),
        volume_multiple,
        atr,
    };

    let lots = match check_entry(&risk_params, &entry_ctx, &state.daily) {
        Ok(lots) => lots,
        Err(refusal) => {
            tracing::debug!(symbol, %refusal, "entry refused by risk gate");
            state.record_decision(hold_decision(symbol, price, &evaluation, refusal.to_string(), now));
            return;
        }
    };

    let side = if evaluation.action == Action::Buy { Side::Buy } else { Side::Sell };
    let order = match market_data.place_order(symbol, side, Offset::Open, lots as f64, None) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(symbol, %err, "order submission failed");
            return;
        }
    };

    if order.status != OrderResultStatus::Submitted {
        tracing::warn!(symbol, status = ?order.status, "entry order did not submit; no managed position created");
        state.record_decision(rejected_entry_decision(symbol, price, &evaluation, lots, &order, now));
        return;
    }

    let direction = if evaluation.action == Action::Buy { Direction::Long } else { Direction::Short };
    if let Err(err) = state.positions.open(
        symbol,
        direction,
        price,
        atr,
        lots,
        state.config.atr_sl_multiplier,
        state.config.atr_tp_multiplier,
        now,
    ) {
        tracing::warn!(symbol, %err, "order filled but a managed position already existed");
        return;
    }
    state.positions.save(store);
    store.append_trade_log(TradeLogEntry {
        timestamp: now,
        symbol: symbol.to_string(),
        r#type: TradeLogType::Open,
        direction,
        lots,
        price,
        order_id: Some(order.id),
    });

    let opened = state.positions.get(symbol).expect("just inserted");
    state.record_decision(TradeDecision {
        timestamp: now,
        symbol: symbol.to_string(),
        action: evaluation.action,
        lots,
        price,
        reason: format!("entry accepted, score {:.2}", evaluation.score),
        signal: None,
        composite_score: evaluation.score,
        atr,
        stop_loss: opened.stop_loss,
        take_profit: opened.take_profit,
        entry_price: price,
        pnl_points: 0.0,
        pnl_pct: 0.0,
        holding_seconds: 0,
        order_result: Some(OrderOutcomeRecord {
            id: order.id,
            status: OrderStatusLabel::Submitted,
            error: None,
        }),
    });
}

fn hold_decision(symbol: &str, price: f64, evaluation: &Evaluation, reason: String, now: DateTime<Utc>) -> TradeDecision {
    TradeDecision {
        timestamp: now,
        symbol: symbol.to_string(),
        action: Action::Hold,
        lots: 0,
        price,
        reason,
        signal: None,
        composite_score: evaluation.score,
        atr: 0.0,
        stop_loss: 0.0,
        take_profit: 0.0,
        entry_price: 0.0,
        pnl_points: 0.0,
        pnl_pct: 0.0,
        holding_seconds: 0,
        order_result: None,
    }
}

fn rejected_entry_decision(symbol: &str, price: f64, evaluation: &Evaluation, lots: u32, order: &OrderResult, now: DateTime<Utc>) -> TradeDecision {
    let status = match order.status {
        OrderResultStatus::Submitted => OrderStatusLabel::Submitted,
        OrderResultStatus::Error => OrderStatusLabel::Error,
        OrderResultStatus::Timeout => OrderStatusLabel::Timeout,
    };
    TradeDecision {
        timestamp: now,
        symbol: symbol.to_string(),
        action: evaluation.action,
        lots,
        price,
        reason: order.error.clone().unwrap_or_else(|| format!("{:?}", order.status)),
        signal: None,
        composite_score: evaluation.score,
        atr: 0.0,
        stop_loss: 0.0,
        take_profit: 0.0,
        entry_price: price,
        pnl_points: 0.0,
        pnl_pct: 0.0,
        holding_seconds: 0,
        order_result: Some(OrderOutcomeRecord {
            id: order.id,
            status,
            error: order.error.clone(),
        }),
    }
}
