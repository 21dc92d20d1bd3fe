//! Difficulty dial for the AI opponent.

use serde::{Deserialize, Serialize};

/// Skill at or above which the engine switches from heuristics to full search.
pub const MINIMAX_THRESHOLD: f64 = 0.7;

/// Opponent strength in `[0, 100]`.
///
/// The value is a probability, not a cutoff: at 80 the engine still
/// plays a human-like random move roughly one time in five.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(from = "f64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Strongest setting.
    pub const MAX: Difficulty = Difficulty(100);

    /// Creates a difficulty, clamping to 100.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Raw value in `[0, 100]`.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Probability of playing deliberately, in `[0, 1]`.
    pub fn skill(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(60)
    }
}

impl From<f64> for Difficulty {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps() {
        assert_eq!(Difficulty::new(250).value(), 100);
        assert_eq!(Difficulty::from(-5.0).value(), 0);
        assert_eq!(Difficulty::from(142.7).value(), 100);
        assert_eq!(Difficulty::from(69.6).value(), 70);
    }

    #[test]
    fn test_skill() {
        assert_eq!(Difficulty::MAX.skill(), 1.0);
        assert_eq!(Difficulty::new(0).skill(), 0.0);
        assert!(Difficulty::new(69).skill() < MINIMAX_THRESHOLD);
        assert!(Difficulty::new(70).skill() >= MINIMAX_THRESHOLD);
    }

    #[test]
    fn test_deserializes_from_any_json_number() {
        let d: Difficulty = serde_json::from_str("85").unwrap();
        assert_eq!(d.value(), 85);
        let d: Difficulty = serde_json::from_str("33.3").unwrap();
        assert_eq!(d.value(), 33);
        assert_eq!(serde_json::to_string(&d).unwrap(), "33");
    }
}
