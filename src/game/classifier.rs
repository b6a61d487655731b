//! Bet token grammar
//!
//! One classifier turns the raw chat token into a [`BetKind`]. Placement
//! validation and settlement both consume the classified value, so the grammar
//! lives in exactly one place.
//!
//! Vocabulary: a bare number (`17`) is a straight bet, hyphen-joined numbers
//! (`8-9`, `1-2-3`, ...) are group bets sized 2/3/4/6, and the named tokens
//! `rojo`, `negro`, `par`, `impar`, `bajo`, `alto`, `docena1..3` and
//! `columna1..3` are the outside bets.

use crate::game::types::{BetKind, ColorChoice, ParityChoice, RangeChoice};

/// Why a token failed to classify
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("not a number, group, or named bet")]
    Unrecognized,

    #[error("a group bet covers 2, 3, 4 or 6 numbers, not {0}")]
    GroupSize(usize),

    #[error("number {0} is outside 0-36")]
    OutOfRange(u32),

    #[error("number {0} appears more than once")]
    Duplicate(u8),
}

/// Classify a raw bet token
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn classify(token: &str) -> Result<BetKind, TokenError> {
    let token = token.trim().to_lowercase();

    let kind = match token.as_str() {
        "rojo" => BetKind::Color {
            choice: ColorChoice::Red,
        },
        "negro" => BetKind::Color {
            choice: ColorChoice::Black,
        },
        "par" => BetKind::Parity {
            choice: ParityChoice::Even,
        },
        "impar" => BetKind::Parity {
            choice: ParityChoice::Odd,
        },
        "bajo" => BetKind::Range {
            choice: RangeChoice::Low,
        },
        "alto" => BetKind::Range {
            choice: RangeChoice::High,
        },
        "docena1" => BetKind::Dozen { index: 1 },
        "docena2" => BetKind::Dozen { index: 2 },
        "docena3" => BetKind::Dozen { index: 3 },
        "columna1" => BetKind::Column { index: 1 },
        "columna2" => BetKind::Column { index: 2 },
        "columna3" => BetKind::Column { index: 3 },
        numeric => classify_numeric(numeric)?,
    };

    Ok(kind)
}

/// Parse `N` or `N-N-...` into a straight or group bet
fn classify_numeric(token: &str) -> Result<BetKind, TokenError> {
    let mut numbers: Vec<u8> = Vec::new();

    for part in token.split('-') {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(TokenError::Unrecognized);
        }
        let value: u32 = part.parse().map_err(|_| TokenError::Unrecognized)?;
        if value > 36 {
            return Err(TokenError::OutOfRange(value));
        }
        let value = value as u8;
        if numbers.contains(&value) {
            return Err(TokenError::Duplicate(value));
        }
        numbers.push(value);
    }

    match numbers.len() {
        1 => Ok(BetKind::Straight { number: numbers[0] }),
        2 => Ok(BetKind::Split {
            numbers: [numbers[0], numbers[1]],
        }),
        3 => Ok(BetKind::Street {
            numbers: [numbers[0], numbers[1], numbers[2]],
        }),
        4 => Ok(BetKind::Corner {
            numbers: [numbers[0], numbers[1], numbers[2], numbers[3]],
        }),
        6 => {
            let mut group = [0u8; 6];
            group.copy_from_slice(&numbers);
            Ok(BetKind::Line { numbers: group })
        }
        n => Err(TokenError::GroupSize(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_numbers() {
        assert_eq!(classify("0"), Ok(BetKind::Straight { number: 0 }));
        assert_eq!(classify("17"), Ok(BetKind::Straight { number: 17 }));
        assert_eq!(classify("36"), Ok(BetKind::Straight { number: 36 }));
    }

    #[test]
    fn test_every_straight_classifies_the_same_twice() {
        for n in 0..=36u8 {
            let token = n.to_string();
            assert_eq!(classify(&token), Ok(BetKind::Straight { number: n }));
            assert_eq!(classify(&token), Ok(BetKind::Straight { number: n }));
        }
    }

    #[test]
    fn test_group_shapes_by_size() {
        assert_eq!(classify("8-9"), Ok(BetKind::Split { numbers: [8, 9] }));
        assert_eq!(
            classify("1-2-3"),
            Ok(BetKind::Street {
                numbers: [1, 2, 3]
            })
        );
        assert_eq!(
            classify("1-2-4-5"),
            Ok(BetKind::Corner {
                numbers: [1, 2, 4, 5]
            })
        );
        assert_eq!(
            classify("4-5-6-7-8-9"),
            Ok(BetKind::Line {
                numbers: [4, 5, 6, 7, 8, 9]
            })
        );
    }

    #[test]
    fn test_named_outside_bets() {
        assert_eq!(
            classify("rojo"),
            Ok(BetKind::Color {
                choice: ColorChoice::Red
            })
        );
        assert_eq!(
            classify("negro"),
            Ok(BetKind::Color {
                choice: ColorChoice::Black
            })
        );
        assert_eq!(
            classify("par"),
            Ok(BetKind::Parity {
                choice: ParityChoice::Even
            })
        );
        assert_eq!(
            classify("impar"),
            Ok(BetKind::Parity {
                choice: ParityChoice::Odd
            })
        );
        assert_eq!(
            classify("bajo"),
            Ok(BetKind::Range {
                choice: RangeChoice::Low
            })
        );
        assert_eq!(
            classify("alto"),
            Ok(BetKind::Range {
                choice: RangeChoice::High
            })
        );
        assert_eq!(classify("docena2"), Ok(BetKind::Dozen { index: 2 }));
        assert_eq!(classify("columna3"), Ok(BetKind::Column { index: 3 }));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(
            classify("  ROJO "),
            Ok(BetKind::Color {
                choice: ColorChoice::Red
            })
        );
        assert_eq!(classify("Docena1"), Ok(BetKind::Dozen { index: 1 }));
        assert_eq!(classify(" 17 "), Ok(BetKind::Straight { number: 17 }));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(classify("37"), Err(TokenError::OutOfRange(37)));
        assert_eq!(classify("1-99"), Err(TokenError::OutOfRange(99)));
        assert_eq!(classify("4294967296"), Err(TokenError::Unrecognized));
    }

    #[test]
    fn test_rejects_bad_group_sizes() {
        assert_eq!(classify("1-2-3-4-5"), Err(TokenError::GroupSize(5)));
        assert_eq!(classify("1-2-3-4-5-6-7"), Err(TokenError::GroupSize(7)));
    }

    #[test]
    fn test_rejects_duplicates() {
        assert_eq!(classify("7-7"), Err(TokenError::Duplicate(7)));
        assert_eq!(classify("1-2-3-1"), Err(TokenError::Duplicate(1)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(classify(""), Err(TokenError::Unrecognized));
        assert_eq!(classify("verde"), Err(TokenError::Unrecognized));
        assert_eq!(classify("docena4"), Err(TokenError::Unrecognized));
        assert_eq!(classify("1-x"), Err(TokenError::Unrecognized));
        assert_eq!(classify("-5"), Err(TokenError::Unrecognized));
        assert_eq!(classify("5-"), Err(TokenError::Unrecognized));
        assert_eq!(classify("1--2"), Err(TokenError::Unrecognized));
    }

    #[test]
    fn test_leading_zeros_accepted() {
        assert_eq!(classify("07"), Ok(BetKind::Straight { number: 7 }));
    }
}
