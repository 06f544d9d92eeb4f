// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! [`Scheduler`]: the control surface the host application drives (spec §6),
//! owning the session-aware swing/intraday loop thread and the market-data
//! worker thread it talks through.
//!
//! Concurrency model (spec §5): two OS threads (the broker worker inside
//! [`MarketDataService`], and this scheduler's own loop thread) plus a
//! current-thread `tokio` runtime the loop thread owns itself, used only to
//! fan the AI-bias refresh out to up to four concurrent HTTP calls. That is
//! a deliberate simplification of a literal bounded thread pool — see
//! `DESIGN.md`.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use autotrader_broker::{BrokerGateway, Credentials};
use autotrader_execution::MarketDataService;
use autotrader_integration::{DataStore, StrategyMode, TradeConfig, TradeDecision, TradeLogEntry};
use autotrader_markets::{is_trading_time, minutes_until_next_open, Bias};
use autotrader_strategies::BiasOracle;
use autotrader_trader::PositionManager;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::state::SchedulerState;
use crate::status::{EngineStatus, ManagedPositionView, PnlSummary};

/// Cadence of the 500ms SL/TP-only monitor run between full cycles while any
/// position is open (spec §5).
const MONITOR_TICK: StdDuration = StdDuration::from_millis(500);

/// Upper bound on concurrent AI-bias oracle calls (spec §5 "bounded worker
/// pool (<= 4 tasks)").
const BIAS_FANOUT: usize = 4;

pub struct Scheduler {
    market_data: MarketDataService,
    market_data_handle: Mutex<Option<JoinHandle<()>>>,
    scheduler_handle: Mutex<Option<JoinHandle<()>>>,
    store: Arc<DataStore>,
    state: Arc<Mutex<SchedulerState>>,
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("running", &self.running.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Starts the broker worker and the scheduler loop thread (spec §6
    /// `start`). Fails with [`EngineError::AlreadyRunning`] is the caller's
    /// responsibility to avoid by not holding two live `Scheduler`s over the
    /// same data directory; this constructor itself always starts fresh.
    pub fn start(
        contracts: Vec<String>,
        mut config: TradeConfig,
        gateway: Box<dyn BrokerGateway>,
        creds: Credentials,
        data_dir: impl AsRef<Path>,
        bias_oracle: Arc<dyn BiasOracle>,
    ) -> Result<Self, EngineError> {
        config.contracts = contracts;

        let (market_data, market_data_handle) = MarketDataService::start(gateway, creds, &data_dir);
        let store = market_data.trade_log_store();
        store.save_config(&config);

        let positions = PositionManager::load(&store);
        let decisions = store.load_decisions();
        let today = autotrader_markets::local_date(Utc::now());
        let state = Arc::new(Mutex::new(SchedulerState::new(config.clone(), positions, decisions, today)));

        let running = Arc::new(AtomicBool::new(true));

        let scheduler_handle = spawn_loop(
            market_data.clone(),
            Arc::clone(&store),
            Arc::clone(&state),
            Arc::clone(&running),
            bias_oracle,
            config.strategy_mode,
        );

        Ok(Self {
            market_data,
            market_data_handle: Mutex::new(Some(market_data_handle)),
            scheduler_handle: Mutex::new(Some(scheduler_handle)),
            store,
            state,
            running,
        })
    }

    /// Restarts with the persisted config if it was left `enabled` with at
    /// least one contract (spec §4.8: auto-resume on process start).
    pub fn auto_resume(
        gateway: Box<dyn BrokerGateway>,
        creds: Credentials,
        data_dir: impl AsRef<Path>,
        bias_oracle: Arc<dyn BiasOracle>,
    ) -> Result<Option<Self>, EngineError> {
        let store = DataStore::new(data_dir.as_ref());
        let Some(config) = store.load_config() else {
            return Ok(None);
        };
        if !config.enabled || config.contracts.is_empty() {
            return Ok(None);
        }
        let contracts = config.contracts.clone();
        Self::start(contracts, config, gateway, creds, data_dir, bias_oracle).map(Some)
    }

    /// Signals both worker threads to stop and joins them, each bounded by a
    /// 30s timeout (spec §5 `join(timeout=30s)`).
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.market_data.stop();
        if let Some(handle) = self.scheduler_handle.lock().take() {
            join_with_timeout(handle, StdDuration::from_secs(30));
        }
        if let Some(handle) = self.market_data_handle.lock().take() {
            join_with_timeout(handle, StdDuration::from_secs(30));
        }
    }

    pub fn add_contract(&self, symbol: &str) {
        let mut state = self.state.lock();
        if !state.config.contracts.iter().any(|c| c == symbol) {
            state.config.contracts.push(symbol.to_string());
            self.store.save_config(&state.config);
        }
    }

    /// Refuses to remove a symbol with an open managed position (spec §6).
    pub fn remove_contract(&self, symbol: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.positions.has_position(symbol) {
            return Err(EngineError::PositionOpen(symbol.to_string()));
        }
        state.config.contracts.retain(|c| c != symbol);
        self.store.save_config(&state.config);
        Ok(())
    }

    /// The well-formed status snapshot (spec §6/§7): always returns zeros for
    /// unavailable numerics rather than failing.
    pub fn get_status(&self) -> EngineStatus {
        let now = Utc::now();
        let (config, ai_bias, daily_pnl, daily_loss_count, positions, decisions_count) = {
            let state = self.state.lock();
            (
                state.config.clone(),
                state.bias.snapshot(),
                state.daily.realized_pnl,
                state.daily.consecutive_loss_count,
                state.positions.all().cloned().collect::<Vec<_>>(),
                state.decisions.len(),
            )
        };

        let managed_positions = positions
            .into_iter()
            .map(|position| {
                let current_price = self
                    .market_data
                    .get_quote(&position.symbol)
                    .map(|q| q.last_price)
                    .unwrap_or(position.entry_price);
                let pnl = position.close_pnl(current_price, now);
                (
                    position.symbol.clone(),
                    ManagedPositionView {
                        direction: position.direction,
                        entry: position.entry_price,
                        atr: position.atr_at_entry,
                        stop_loss: position.stop_loss,
                        take_profit: position.take_profit,
                        lots: position.lots,
                        current_price,
                        float_pnl: pnl.pnl_points,
                        float_pnl_pct: pnl.pnl_pct,
                    },
                )
            })
            .collect();

        let account = self.market_data.get_account_info().unwrap_or_default();

        EngineStatus {
            running: self.running.load(Ordering::Acquire),
            contracts: config.contracts.clone(),
            effective_params: config.clone(),
            config,
            ai_bias,
            daily_pnl,
            daily_loss_count,
            managed_positions,
            pnl_summary: PnlSummary {
                realized_today: daily_pnl,
                consecutive_losses: daily_loss_count,
            },
            account_pnl: account.close_profit + account.float_profit,
            unrealized_pnl: account.float_profit,
            decisions_count,
            trading_hours: is_trading_time(now),
        }
    }

    /// Page `page` (0-based) of decisions, most recent first.
    pub fn get_decisions(&self, page: usize, page_size: usize) -> Vec<TradeDecision> {
        let state = self.state.lock();
        paginate(&state.decisions, page, page_size)
    }

    pub fn clear_decisions(&self) {
        let mut state = self.state.lock();
        state.decisions.clear();
        self.store.save_decisions(&state.decisions);
    }

    /// Page `page` (0-based) of the on-disk trade log, most recent first.
    pub fn get_trade_log(&self, page: usize, page_size: usize) -> Vec<TradeLogEntry> {
        let entries = self.store.load_trade_log();
        paginate(&entries, page, page_size)
    }
}

fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page_size == 0 {
        return Vec::new();
    }
    let len = items.len();
    let skip_from_end = page * page_size;
    if skip_from_end >= len {
        return Vec::new();
    }
    let end = len - skip_from_end;
    let start = end.saturating_sub(page_size);
    items[start..end].iter().rev().cloned().collect()
}

fn join_with_timeout(handle: JoinHandle<()>, timeout: StdDuration) {
    let (tx, rx) = std::sync::mpsc::channel();
    let watcher = std::thread::spawn(move || {
        let _ = handle.join();
        let _ = tx.send(());
    });
    match rx.recv_timeout(timeout) {
        Ok(()) => {
            let _ = watcher.join();
        }
        Err(_) => tracing::warn!("worker thread did not shut down within the 30s join timeout"),
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_loop(
    market_data: MarketDataService,
    store: Arc<DataStore>,
    state: Arc<Mutex<SchedulerState>>,
    running: Arc<AtomicBool>,
    bias_oracle: Arc<dyn BiasOracle>,
    mode: StrategyMode,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("current-thread tokio runtime builds");
        match mode {
            StrategyMode::Swing => run_loop(&rt, &market_data, &store, &state, &running, &bias_oracle, |cfg| {
                cfg.analysis_interval_secs
            }),
            StrategyMode::Intraday => run_loop(&rt, &market_data, &store, &state, &running, &bias_oracle, |cfg| {
                cfg.intraday_scan_interval_secs
            }),
        }
    })
}

/// The shared loop body for both modes (spec §4.8): sleep until the next
/// session open, refresh any due AI bias, run one cycle per contract behind
/// the non-blocking cycle lock, then spend the rest of the tick interval in
/// the sub-second SL/TP monitor. `interval_of` reads the mode-specific tick
/// length from the live config on every iteration, so a persisted config
/// change takes effect on the next tick without a restart.
fn run_loop(
    rt: &tokio::runtime::Runtime,
    market_data: &MarketDataService,
    store: &DataStore,
    state: &Arc<Mutex<SchedulerState>>,
    running: &AtomicBool,
    bias_oracle: &Arc<dyn BiasOracle>,
    interval_of: impl Fn(&TradeConfig) -> u64,
) {
    // The cycle lock (spec §5/§9 glossary): at most one full analysis/SL-TP
    // cycle runs at a time. A single-threaded loop body never actually
    // contends on it today, but it is the seam a future multi-symbol worker
    // pool would acquire through, so it stays load-bearing rather than
    // decorative.
    let cycle_lock = Mutex::new(());

    while running.load(Ordering::Acquire) {
        let now = Utc::now();
        let sleep_minutes = minutes_until_next_open(now);
        if sleep_minutes > 0 {
            sleep_in_chunks(sleep_minutes as u64 * 60, running);
            continue;
        }

        if let Some(_guard) = cycle_lock.try_lock() {
            let contracts = state.lock().config.contracts.clone();
            refresh_due_biases(rt, bias_oracle, state, &contracts, now);
            for symbol in &contracts {
                let mut s = state.lock();
                s.daily.roll_to(now);
                crate::cycle::run_cycle(symbol, market_data, store, &mut s, now);
            }
        }

        let interval = interval_of(&state.lock().config).max(1);
        monitor_until(interval, market_data, store, state, running);
    }
}

/// Sleeps up to `total_secs`, in 1s increments so `stop()` is honored
/// promptly instead of after a multi-minute session-closed sleep.
fn sleep_in_chunks(total_secs: u64, running: &AtomicBool) {
    let mut remaining = total_secs;
    while remaining > 0 && running.load(Ordering::Acquire) {
        std::thread::sleep(StdDuration::from_secs(1));
        remaining -= 1;
    }
}

/// Spends up to `total_secs` running the 500ms SL/TP-only monitor against
/// every currently-open managed position (spec §4.7/§5).
fn monitor_until(total_secs: u64, market_data: &MarketDataService, store: &DataStore, state: &Arc<Mutex<SchedulerState>>, running: &AtomicBool) {
    let deadline = std::time::Instant::now() + StdDuration::from_secs(total_secs);
    while std::time::Instant::now() < deadline {
        if !running.load(Ordering::Acquire) {
            return;
        }
        std::thread::sleep(MONITOR_TICK);
        let symbols: Vec<String> = {
            let s = state.lock();
            s.positions.all().map(|p| p.symbol.clone()).collect()
        };
        if symbols.is_empty() {
            continue;
        }
        let now = Utc::now();
        for symbol in symbols {
            let mut s = state.lock();
            crate::cycle::monitor_exit(&symbol, market_data, store, &mut s, now);
        }
    }
}

/// Refreshes every symbol in `symbols` whose bias is due, fanning the oracle
/// calls out across up to [`BIAS_FANOUT`] concurrent tasks on `rt` (spec
/// §4.5/§5's bounded worker pool). A failed refresh leaves the previous bias
/// untouched ([`BiasCache::set`] is simply not called for it).
fn refresh_due_biases(rt: &tokio::runtime::Runtime, bias_oracle: &Arc<dyn BiasOracle>, state: &Arc<Mutex<SchedulerState>>, symbols: &[String], now: DateTime<Utc>) {
    let due: Vec<String> = {
        let s = state.lock();
        symbols.iter().filter(|symbol| s.bias.is_due(symbol, now)).cloned().collect()
    };
    if due.is_empty() {
        return;
    }

    let results = rt.block_on(async {
        use futures::stream::{self, StreamExt};
        stream::iter(due.into_iter())
            .map(|symbol| {
                let oracle = Arc::clone(bias_oracle);
                async move {
                    let outcome = oracle.query(&symbol).await;
                    (symbol, outcome)
                }
            })
            .buffer_unordered(BIAS_FANOUT)
            .collect::<Vec<_>>()
            .await
    });

    let mut s = state.lock();
    for (symbol, outcome) in results {
        match outcome {
            Ok((signal, composite_score)) => {
                s.bias.set(&symbol, Bias::from_oracle(signal, composite_score), now);
            }
            Err(err) => {
                tracing::warn!(symbol, %err, "bias refresh failed, keeping previous bias");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrader_broker::{Credentials, MockConnector, TradeMode};
    use autotrader_markets::Direction;
    use autotrader_strategies::MockBiasOracle;
    use std::path::PathBuf;

    fn creds() -> Credentials {
        Credentials {
            user: "demo".into(),
            password: "demo".into(),
            trade_mode: TradeMode::Sim,
            broker_id: String::new(),
            broker_account: String::new(),
            broker_password: String::new(),
        }
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("autotrader-core-test-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn start(tag: &str, config: TradeConfig) -> (Scheduler, PathBuf) {
        std::env::set_var("BROKER_MOCK_INTERVAL_MS", "10");
        let dir = scratch_dir(tag);
        let gateway: Box<dyn BrokerGateway> = Box::new(MockConnector::new().unwrap());
        let scheduler = Scheduler::start(
            vec!["DCE.c2605".into()],
            config,
            gateway,
            creds(),
            &dir,
            Arc::new(MockBiasOracle::new()),
        )
        .unwrap();
        (scheduler, dir)
    }

    #[test]
    fn paginate_returns_most_recent_first() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(paginate(&items, 0, 2), vec![4, 3]);
        assert_eq!(paginate(&items, 1, 2), vec![2, 1]);
        assert_eq!(paginate(&items, 2, 2), vec![0]);
        assert_eq!(paginate(&items, 3, 2), Vec::<u32>::new());
    }

    #[test]
    fn paginate_with_zero_page_size_is_empty() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, 0, 0).is_empty());
    }

    #[test]
    fn add_and_remove_contract_updates_live_config() {
        let (scheduler, dir) = start("contracts", TradeConfig::default());
        scheduler.add_contract("DCE.c2610");
        assert!(scheduler.state.lock().config.contracts.contains(&"DCE.c2610".to_string()));
        scheduler.remove_contract("DCE.c2610").unwrap();
        assert!(!scheduler.state.lock().config.contracts.contains(&"DCE.c2610".to_string()));
        scheduler.stop();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn removing_a_symbol_with_an_open_position_is_refused() {
        let (scheduler, dir) = start("open-position", TradeConfig::default());
        scheduler
            .state
            .lock()
            .positions
            .open("DCE.c2605", Direction::Long, 2450.0, 10.0, 1, 1.2, 2.0, Utc::now())
            .unwrap();
        let err = scheduler.remove_contract("DCE.c2605").unwrap_err();
        assert!(matches!(err, EngineError::PositionOpen(ref s) if s == "DCE.c2605"));
        scheduler.stop();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn get_status_is_well_formed_before_any_cycle_runs() {
        let (scheduler, dir) = start("status", TradeConfig::default());
        let status = scheduler.get_status();
        assert!(status.running);
        assert_eq!(status.contracts, vec!["DCE.c2605".to_string()]);
        assert_eq!(status.decisions_count, 0);
        scheduler.stop();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
