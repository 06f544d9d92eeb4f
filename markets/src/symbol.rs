// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Bidirectional mapping between the engine's internal symbol form (`C2605`)
//! and the broker's wire form (`DCE.c2605`).
//!
//! Each commodity base maps to exactly one exchange. Exchange casing and
//! digit-width rules differ: CZCE quotes a 3-digit month and uppercases the
//! base; CFFEX keeps the base uppercase with the full 4-digit month; every
//! other exchange lowercases the base and keeps the full digits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Futures exchange a contract base is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Dalian Commodity Exchange.
    Dce,
    /// Shanghai Futures Exchange.
    Shfe,
    /// Zhengzhou Commodity Exchange.
    Czce,
    /// Shanghai International Energy Exchange.
    Ine,
    /// China Financial Futures Exchange.
    Cffex,
    /// Guangzhou Futures Exchange.
    Gfex,
}

impl Exchange {
    fn as_str(self) -> &'static str {
        match self {
            Exchange::Dce => "DCE",
            Exchange::Shfe => "SHFE",
            Exchange::Czce => "CZCE",
            Exchange::Ine => "INE",
            Exchange::Cffex => "CFFEX",
            Exchange::Gfex => "GFEX",
        }
    }

    /// Whether the broker form keeps the base uppercase (CZCE, CFFEX) or
    /// lowercases it (every other exchange).
    fn uppercase_base(self) -> bool {
        matches!(self, Exchange::Czce | Exchange::Cffex)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned by [`to_broker`] / [`from_broker`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// The commodity base is not in the exchange table.
    #[error("unknown base {0:?}")]
    UnknownBase(String),
    /// The input does not match `^[A-Z]{{1,2}}\\d+$`.
    #[error("malformed symbol {0:?}")]
    MalformedSymbol(String),
}

/// Full base → exchange table. Bases are listed exactly as the original
/// TqSdk-style service maps them: no abbreviation, since an unlisted base
/// must round-trip to `UnknownBase` rather than a silent guess.
fn exchange_for_base(base: &str) -> Option<Exchange> {
    use Exchange::*;
    Some(match base {
        "A" | "B" | "C" | "CS" | "I" | "J" | "JD" | "JM" | "L" | "LH" | "LG" | "M" | "P"
        | "PP" | "V" | "Y" | "EG" | "EB" | "PG" | "RR" | "BZ" => Dce,
        "CU" | "AL" | "ZN" | "PB" | "NI" | "SN" | "AU" | "AG" | "RB" | "HC" | "BU" | "RU"
        | "FU" | "SP" | "SS" | "AO" | "BR" | "WR" => Shfe,
        "TA" | "MA" | "CF" | "SR" | "OI" | "RM" | "FG" | "SA" | "AP" | "CJ" | "UR" | "PF"
        | "PK" | "SF" | "SM" | "CY" | "WH" | "RS" | "SH" | "PX" | "PR" | "PL" => Czce,
        "SC" | "NR" | "LU" | "BC" | "EC" => Ine,
        "IF" | "IH" | "IC" | "IM" | "TF" | "TS" | "T" => Cffex,
        "SI" | "LC" | "PS" | "PT" | "PD" => Gfex,
        _ => return None,
    })
}

/// Splits `<BASE><DIGITS>` into (base, digits); `None` if malformed.
fn split_base_digits(symbol: &str) -> Option<(&str, &str)> {
    let split_at = symbol.find(|c: char| c.is_ascii_digit())?;
    let (base, digits) = symbol.split_at(split_at);
    let base_ok = !base.is_empty()
        && base.len() <= 2
        && base.chars().all(|c| c.is_ascii_uppercase());
    let digits_ok = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
    (base_ok && digits_ok).then_some((base, digits))
}

/// Converts an internal symbol (`C2605`) to its broker wire form
/// (`DCE.c2605`). A main-contract suffix of `0` (e.g. `C0`) is not a
/// tradable contract and returns `None` without error, per spec.
pub fn to_broker(internal: &str) -> Result<Option<String>, SymbolError> {
    let upper = internal.trim().to_ascii_uppercase();
    let (base, digits) =
        split_base_digits(&upper).ok_or_else(|| SymbolError::MalformedSymbol(internal.into()))?;
    if digits == "0" {
        return Ok(None);
    }
    let exchange =
        exchange_for_base(base).ok_or_else(|| SymbolError::UnknownBase(base.to_string()))?;

    let code = if exchange.uppercase_base() {
        base.to_string()
    } else {
        base.to_ascii_lowercase()
    };

    let month = if matches!(exchange, Exchange::Czce) && digits.len() >= 3 {
        &digits[digits.len() - 3..]
    } else {
        digits
    };

    Ok(Some(format!("{exchange}.{code}{month}")))
}

/// Converts a broker wire form (`DCE.c2605`) back to the internal symbol
/// (`C2605`). CZCE's 3-digit month gets the decade digit `2` prepended to
/// recover the 4-digit internal convention.
pub fn from_broker(broker: &str) -> String {
    let Some((exchange, code)) = broker.split_once('.') else {
        return broker.to_ascii_uppercase();
    };
    let code_upper = code.to_ascii_uppercase();
    if exchange.eq_ignore_ascii_case("CZCE") {
        if let Some((base, digits)) = split_base_digits(&code_upper) {
            if digits.len() == 3 {
                return format!("{base}2{digits}");
            }
        }
    }
    code_upper
}
