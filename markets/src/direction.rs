// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Direction/side tagged variants shared across the engine.
//!
//! The original Python implementation embeds these as strings (`"LONG"`,
//! `"BUY"`, ...) directly in dict-style records. Per the engine's redesign
//! notes, they are modeled here as proper tagged unions; string forms are a
//! serialization-layer concern only (`serde` derives below), never the
//! in-memory representation.

use serde::{Deserialize, Serialize};

/// Direction of a managed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

/// Order side sent to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Direction> for Side {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Long => Side::Buy,
            Direction::Short => Side::Sell,
        }
    }
}

/// Order offset: opening a new position, or closing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Offset {
    Open,
    Close,
    CloseToday,
}
