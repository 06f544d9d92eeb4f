pub mod profit_factor;
pub mod summary;
pub mod win_rate;

pub use profit_factor::ProfitFactor;
pub use summary::TradeSummary;
pub use win_rate::WinRate;
