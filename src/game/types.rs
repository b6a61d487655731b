use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat identifier as the platform reports it (groups are often negative)
pub type ChatId = i64;

/// Player identifier as the platform reports it
pub type PlayerId = u64;

/// Monotonic round identifier, global across chats
pub type RoundId = u64;

/// Color side bet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Red,
    Black,
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorChoice::Red => write!(f, "rojo"),
            ColorChoice::Black => write!(f, "negro"),
        }
    }
}

/// Parity side bet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParityChoice {
    Even,
    Odd,
}

impl fmt::Display for ParityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParityChoice::Even => write!(f, "par"),
            ParityChoice::Odd => write!(f, "impar"),
        }
    }
}

/// Half-board side bet (1-18 / 19-36)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RangeChoice {
    Low,
    High,
}

impl fmt::Display for RangeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeChoice::Low => write!(f, "bajo"),
            RangeChoice::High => write!(f, "alto"),
        }
    }
}

/// A classified bet (discriminated union)
///
/// Produced once by the token classifier; placement validation and the
/// settlement engine both branch on this, never on the raw token text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum BetKind {
    Straight { number: u8 },
    Split { numbers: [u8; 2] },
    Street { numbers: [u8; 3] },
    Corner { numbers: [u8; 4] },
    Line { numbers: [u8; 6] },
    Color { choice: ColorChoice },
    Parity { choice: ParityChoice },
    Range { choice: RangeChoice },
    Dozen { index: u8 },
    Column { index: u8 },
}

impl BetKind {
    /// Gross payout multiplier (stake in, stake-times-N out, stake not returned
    /// separately)
    pub fn multiplier(&self) -> u64 {
        match self {
            BetKind::Straight { .. } => 36,
            BetKind::Split { .. } => 18,
            BetKind::Street { .. } => 12,
            BetKind::Corner { .. } => 9,
            BetKind::Line { .. } => 6,
            BetKind::Color { .. } => 2,
            BetKind::Parity { .. } => 2,
            BetKind::Range { .. } => 2,
            BetKind::Dozen { .. } => 3,
            BetKind::Column { .. } => 3,
        }
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, numbers: &[u8]) -> fmt::Result {
            for (i, n) in numbers.iter().enumerate() {
                if i > 0 {
                    write!(f, "-")?;
                }
                write!(f, "{}", n)?;
            }
            Ok(())
        }

        match self {
            BetKind::Straight { number } => write!(f, "{}", number),
            BetKind::Split { numbers } => join(f, numbers),
            BetKind::Street { numbers } => join(f, numbers),
            BetKind::Corner { numbers } => join(f, numbers),
            BetKind::Line { numbers } => join(f, numbers),
            BetKind::Color { choice } => write!(f, "{}", choice),
            BetKind::Parity { choice } => write!(f, "{}", choice),
            BetKind::Range { choice } => write!(f, "{}", choice),
            BetKind::Dozen { index } => write!(f, "docena{}", index),
            BetKind::Column { index } => write!(f, "columna{}", index),
        }
    }
}

/// A classified wager ready for the settlement engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wager {
    pub player: PlayerId,
    pub kind: BetKind,
    pub stake: u64,
}
