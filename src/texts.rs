//! Every chat-visible message in one place
//!
//! The command layer and the spin cycle only assemble data; wording lives
//! here. Bet tokens and color names stay in the Spanish table vocabulary
//! (`rojo`, `docena2`, Verde) because that is the language of the board.

use crate::errors::{RuletaError, StateConflictError, ValidationError};
use crate::game::settlement::RoundSettlement;
use crate::game::types::RoundId;
use crate::game::wheel;
use crate::platform::ChatMember;
use crate::store::PlayerRecord;

pub fn welcome(name: &str, balance: u64) -> String {
    format!("🎰 Welcome, {}! You hold {} chips.", name, balance)
}

pub fn balance_report(name: &str, balance: u64) -> String {
    format!("💰 {}, you hold {} chips.", name, balance)
}

pub fn rules() -> String {
    "🎰 Roulette rules\n\
     \n\
     Bet with /bet <stake> <token>. Each round one pocket from 0 to 36 is drawn.\n\
     \n\
     Inside bets:\n\
     • 17 — straight, one number, pays x36\n\
     • 8-9 — split, two numbers, pays x18\n\
     • 1-2-3 — street, three numbers, pays x12\n\
     • 1-2-4-5 — corner, four numbers, pays x9\n\
     • 4-5-6-7-8-9 — line, six numbers, pays x6\n\
     \n\
     Outside bets (the zero pocket loses them all):\n\
     • rojo / negro — color, pays x2\n\
     • par / impar — even / odd, pays x2\n\
     • bajo / alto — 1-18 / 19-36, pays x2\n\
     • docena1, docena2, docena3 — dozens, pays x3\n\
     • columna1, columna2, columna3 — columns, pays x3\n\
     \n\
     The payout replaces the stake: a winning straight returns 36 times what you put in."
        .to_string()
}

pub fn bet_accepted(name: &str, stake: u64, token: &str, round: RoundId) -> String {
    format!("✅ {} bet {} on {} (round #{}).", name, stake, token, round)
}

pub fn roulette_activated(interval_secs: u64) -> String {
    format!("🎰 Roulette armed! The wheel spins every {}s.", interval_secs)
}

pub fn roulette_deactivated() -> String {
    "🛑 Roulette stopped.".to_string()
}

pub fn chips_granted(amount: u64, recipient: &str) -> String {
    format!("✅ Granted {} chips to {}.", amount, recipient)
}

pub fn chips_gifted(giver: &str, amount: u64, recipient: &str) -> String {
    format!("🎁 {} gifted {} chips to {}.", giver, amount, recipient)
}

pub fn admin_list(admins: &[ChatMember]) -> String {
    if admins.is_empty() {
        return "👮 No admins reported for this chat.".to_string();
    }
    let mut text = String::from("👮 Chat admins:");
    for admin in admins {
        text.push_str(&format!(
            "\n• {} · {} ({})",
            admin.id, admin.display_name, admin.role
        ));
    }
    text
}

pub fn ranking(rows: &[PlayerRecord]) -> String {
    if rows.is_empty() {
        return "🏆 Nobody holds chips yet.".to_string();
    }
    let mut text = String::from("🏆 Chip ranking:");
    for (position, player) in rows.iter().enumerate() {
        let medal = match position {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "🎖️",
        };
        let name = if player.display_name.is_empty() {
            format!("Jugador-{}", player.id)
        } else {
            player.display_name.clone()
        };
        text.push_str(&format!("\n{} {} — {} chips", medal, name, player.balance));
    }
    text
}

/// Result banner posted after every spin
pub fn round_announcement(
    result: u8,
    settlement: &RoundSettlement,
    top_name: Option<&str>,
) -> String {
    let color = wheel::color_of(result);
    let result_line = format!("🎡 Result: {} {} {}", result, color.symbol(), color.label());

    match settlement.top.as_ref() {
        Some(top) => {
            let name = top_name.unwrap_or("Jugador");
            let mut text = format!(
                "🎉🎊 WINNER! 🎊🎉\n🏆 {}\n👉 {} chips\n\n{}",
                name, top.amount, result_line
            );
            let others = settlement.payouts.len().saturating_sub(1);
            if others > 0 {
                let rest = settlement.total_paid.saturating_sub(top.amount);
                text.push_str(&format!(
                    "\n📢 {} more winning bet(s) paid {} chips in total.",
                    others, rest
                ));
            }
            text
        }
        None => format!("{}\n\n😢 No winners this round.", result_line),
    }
}

/// Chat reply for a player-facing failure
pub fn error_reply(err: &RuletaError) -> String {
    match err {
        RuletaError::Validation(v) => match v {
            ValidationError::InvalidToken { token, reason } => format!(
                "❌ '{}' is not a bet I know ({}). See /rules for the tokens.",
                token, reason
            ),
            ValidationError::InvalidStake(raw) => {
                format!("❌ '{}' is not a valid stake. Use a positive whole number.", raw)
            }
            ValidationError::InvalidAmount(raw) => {
                format!("❌ '{}' is not a valid amount. Use a positive whole number.", raw)
            }
            ValidationError::InsufficientBalance { balance, .. } => {
                format!("❌ Not enough chips: you hold {}.", balance)
            }
            ValidationError::BadUsage(usage) => format!("Usage: {}", usage),
            ValidationError::MissingTarget => {
                "❌ Reply to the player you mean, or pass their id.".to_string()
            }
            ValidationError::BotRecipient => "🤖 Bots can't hold chips.".to_string(),
        },
        RuletaError::Unauthorized => "⛔ Admins only.".to_string(),
        RuletaError::StateConflict(StateConflictError::AlreadyArmed) => {
            "⚠️ The roulette is already running.".to_string()
        }
        RuletaError::StateConflict(StateConflictError::NotArmed) => {
            "ℹ️ The roulette isn't running.".to_string()
        }
        RuletaError::Platform(e) => format!("⚠️ The chat platform didn't answer: {}.", e),
        RuletaError::Storage(_) => "⚠️ Something went wrong on our side. Try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::classify;
    use crate::game::settlement::settle;
    use crate::game::types::Wager;
    use crate::platform::ChatRole;

    fn wager(player: u64, token: &str, stake: u64) -> Wager {
        Wager {
            player,
            kind: classify(token).unwrap(),
            stake,
        }
    }

    #[test]
    fn test_winner_banner() {
        let settlement = settle(&[wager(1, "17", 10), wager(2, "impar", 5)], 17);
        let text = round_announcement(17, &settlement, Some("Ana"));

        assert!(text.contains("WINNER"));
        assert!(text.contains("🏆 Ana"));
        assert!(text.contains("👉 360 chips"));
        assert!(text.contains("Result: 17 ♠️ Negro"));
        assert!(text.contains("1 more winning bet(s) paid 10 chips"));
    }

    #[test]
    fn test_no_winner_banner() {
        let settlement = settle(&[wager(1, "rojo", 10)], 0);
        let text = round_announcement(0, &settlement, None);

        assert!(text.contains("Result: 0 🟢 Verde"));
        assert!(text.contains("No winners"));
        assert!(!text.contains("WINNER!"));
    }

    #[test]
    fn test_lone_winner_has_no_others_line() {
        let settlement = settle(&[wager(1, "bajo", 10)], 4);
        let text = round_announcement(4, &settlement, Some("Ana"));
        assert!(!text.contains("more winning"));
    }

    #[test]
    fn test_ranking_medals() {
        let rows = vec![
            PlayerRecord {
                id: 1,
                display_name: "Ana".to_string(),
                balance: 5_000,
            },
            PlayerRecord {
                id: 2,
                display_name: "Luis".to_string(),
                balance: 1_200,
            },
            PlayerRecord {
                id: 3,
                display_name: String::new(),
                balance: 900,
            },
            PlayerRecord {
                id: 4,
                display_name: "Leo".to_string(),
                balance: 100,
            },
        ];
        let text = ranking(&rows);

        assert!(text.contains("🥇 Ana — 5000 chips"));
        assert!(text.contains("🥈 Luis — 1200 chips"));
        assert!(text.contains("🥉 Jugador-3 — 900 chips"));
        assert!(text.contains("🎖️ Leo — 100 chips"));
    }

    #[test]
    fn test_admin_list() {
        let admins = vec![ChatMember {
            id: 9,
            display_name: "Eva".to_string(),
            role: ChatRole::Creator,
        }];
        assert!(admin_list(&admins).contains("Eva (creator)"));
        assert!(admin_list(&[]).contains("No admins"));
    }

    #[test]
    fn test_error_replies() {
        let err: RuletaError = ValidationError::InsufficientBalance {
            balance: 7,
            needed: 100,
        }
        .into();
        assert!(error_reply(&err).contains("you hold 7"));

        assert_eq!(error_reply(&RuletaError::Unauthorized), "⛔ Admins only.");

        let err: RuletaError = StateConflictError::AlreadyArmed.into();
        assert!(error_reply(&err).contains("already running"));
    }
}
