// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Reasons an entry can be rejected by the risk gate (spec §4.6). Each
//! variant's `Display` text is substring-matched by the scheduler when it
//! records a `HOLD` decision's `reason` field (e.g. S5: "risk ratio").

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskRefusal {
    #[error("risk ratio {observed:.2} exceeds cap {cap:.2}")]
    RiskRatioCap { observed: f64, cap: f64 },

    #[error("daily loss {observed_pct:.2}% exceeds cap {cap_pct:.2}%")]
    DailyLossCap { observed_pct: f64, cap_pct: f64 },

    #[error("paused after {count} consecutive losses until {pause_until}")]
    ConsecutiveLossPause {
        count: u32,
        pause_until: chrono::DateTime<chrono::Utc>,
    },

    #[error("no-entry hour {hour} (intraday v6 blackout)")]
    NoEntryHour { hour: u32 },

    #[error("no new opens after 14:30")]
    NoEntryAfterCutoff,

    #[error("outside trading session")]
    SessionClosed,
}
