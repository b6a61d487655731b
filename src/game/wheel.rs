//! European wheel model: pocket layout, colors, and the draw itself

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Highest pocket number on a European wheel
pub const MAX_POCKET: u8 = 36;

/// Red pockets on a European layout
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Draw a pocket uniformly from 0..=36
pub fn spin() -> u8 {
    rand::thread_rng().gen_range(0..=MAX_POCKET)
}

pub fn is_red(n: u8) -> bool {
    RED_NUMBERS.contains(&n)
}

/// Black is everything that is neither the zero pocket nor red
pub fn is_black(n: u8) -> bool {
    n != 0 && !is_red(n)
}

/// Pocket color for announcements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PocketColor {
    Green,
    Red,
    Black,
}

pub fn color_of(n: u8) -> PocketColor {
    if n == 0 {
        PocketColor::Green
    } else if is_red(n) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

impl PocketColor {
    pub fn symbol(&self) -> &'static str {
        match self {
            PocketColor::Green => "🟢",
            PocketColor::Red => "♦️",
            PocketColor::Black => "♠️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PocketColor::Green => "Verde",
            PocketColor::Red => "Rojo",
            PocketColor::Black => "Negro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eighteen_red_eighteen_black() {
        let reds = (1..=MAX_POCKET).filter(|n| is_red(*n)).count();
        let blacks = (1..=MAX_POCKET).filter(|n| is_black(*n)).count();
        assert_eq!(reds, 18);
        assert_eq!(blacks, 18);
    }

    #[test]
    fn test_zero_is_neither_red_nor_black() {
        assert!(!is_red(0));
        assert!(!is_black(0));
        assert_eq!(color_of(0), PocketColor::Green);
    }

    #[test]
    fn test_known_pockets() {
        assert_eq!(color_of(1), PocketColor::Red);
        assert_eq!(color_of(2), PocketColor::Black);
        assert_eq!(color_of(19), PocketColor::Red);
        assert_eq!(color_of(28), PocketColor::Black);
        assert_eq!(color_of(36), PocketColor::Red);
    }

    #[test]
    fn test_spin_stays_on_the_wheel() {
        for _ in 0..1_000 {
            assert!(spin() <= MAX_POCKET);
        }
    }

    #[test]
    fn test_announcement_labels() {
        assert_eq!(color_of(0).symbol(), "🟢");
        assert_eq!(color_of(0).label(), "Verde");
        assert_eq!(color_of(3).label(), "Rojo");
        assert_eq!(color_of(4).label(), "Negro");
    }
}
