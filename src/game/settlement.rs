//! Round settlement engine
//!
//! Pure functions from (wagers, drawn pocket) to payouts. No storage or
//! platform calls happen here, which keeps every paytable rule unit-testable.

use crate::game::types::{BetKind, ColorChoice, ParityChoice, PlayerId, RangeChoice, Wager};
use crate::game::wheel;
use serde::{Deserialize, Serialize};

/// Chips paid to one winning wager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payout {
    pub player: PlayerId,
    pub amount: u64,
}

/// Outcome of settling one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSettlement {
    /// Pocket the wheel landed on
    pub result: u8,
    /// One entry per winning wager, in placement order
    pub payouts: Vec<Payout>,
    /// Sum of every payout
    pub total_paid: u64,
    /// Largest single payout; earliest wager keeps a tie
    pub top: Option<Payout>,
}

impl RoundSettlement {
    pub fn has_winners(&self) -> bool {
        !self.payouts.is_empty()
    }
}

/// Does `kind` win when the wheel lands on `result`?
///
/// Zero only pays a straight bet on 0: every outside bet treats the zero
/// pocket as a loss.
pub fn wins(kind: &BetKind, result: u8) -> bool {
    match kind {
        BetKind::Straight { number } => *number == result,
        BetKind::Split { numbers } => numbers.contains(&result),
        BetKind::Street { numbers } => numbers.contains(&result),
        BetKind::Corner { numbers } => numbers.contains(&result),
        BetKind::Line { numbers } => numbers.contains(&result),
        BetKind::Color { choice } => match choice {
            ColorChoice::Red => wheel::is_red(result),
            ColorChoice::Black => result != 0 && !wheel::is_red(result),
        },
        BetKind::Parity { choice } => match choice {
            ParityChoice::Even => result != 0 && result % 2 == 0,
            ParityChoice::Odd => result % 2 == 1,
        },
        BetKind::Range { choice } => match choice {
            RangeChoice::Low => (1..=18).contains(&result),
            RangeChoice::High => (19..=36).contains(&result),
        },
        BetKind::Dozen { index } => match index {
            1 => (1..=12).contains(&result),
            2 => (13..=24).contains(&result),
            3 => (25..=36).contains(&result),
            _ => false,
        },
        // Board columns repeat mod 3: column 1 holds 1,4,..,34 and column 3
        // holds the multiples of 3.
        BetKind::Column { index } => result != 0 && result % 3 == index % 3,
    }
}

/// Gross chips returned to the player if this wager wins
pub fn payout_amount(wager: &Wager) -> u64 {
    wager.stake.saturating_mul(wager.kind.multiplier())
}

/// Settle a full round against the drawn pocket
pub fn settle(wagers: &[Wager], result: u8) -> RoundSettlement {
    let mut payouts = Vec::new();
    let mut total_paid: u64 = 0;
    let mut top: Option<Payout> = None;

    for wager in wagers {
        if !wins(&wager.kind, result) {
            continue;
        }

        let payout = Payout {
            player: wager.player,
            amount: payout_amount(wager),
        };

        if top.as_ref().map_or(true, |t| payout.amount > t.amount) {
            top = Some(payout.clone());
        }
        total_paid = total_paid.saturating_add(payout.amount);
        payouts.push(payout);
    }

    RoundSettlement {
        result,
        payouts,
        total_paid,
        top,
    }
}
