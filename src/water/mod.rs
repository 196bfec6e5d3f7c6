//! Water meter.
//!
//! The level only rises during a game. How many flood cards are drawn each
//! turn is read from a fixed table, not computed. Whether the top level ends
//! the game is decided by the evaluator in `rules::outcome`.

use serde::{Deserialize, Serialize};

/// Highest level on the meter (the skull and crossbones).
pub const MAX_WATER_LEVEL: u8 = 10;

/// Flood cards drawn per turn, indexed by `level - 1`.
pub const FLOOD_DRAWS: [u8; MAX_WATER_LEVEL as usize] = [2, 2, 3, 3, 3, 4, 4, 5, 5, 5];

/// Monotone water level in `[1, MAX_WATER_LEVEL]`.
///
/// ```
/// use sinking_isle::water::WaterMeter;
///
/// let mut meter = WaterMeter::new(2);
/// assert_eq!(meter.flood_draw_count(), 2);
/// meter.raise();
/// assert_eq!(meter.level(), 3);
/// assert_eq!(meter.flood_draw_count(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterMeter {
    level: u8,
}

impl WaterMeter {
    /// Create a meter at `level`, clamped into range.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self {
            level: level.clamp(1, MAX_WATER_LEVEL),
        }
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Raise by one, staying at the top once reached. Returns the new level.
    pub fn raise(&mut self) -> u8 {
        self.level = (self.level + 1).min(MAX_WATER_LEVEL);
        log::info!("waters rise to level {}", self.level);
        self.level
    }

    #[must_use]
    pub fn is_at_max(&self) -> bool {
        self.level >= MAX_WATER_LEVEL
    }

    /// Flood cards to draw at the current level.
    #[must_use]
    pub fn flood_draw_count(&self) -> u8 {
        flood_draws_at(self.level)
    }
}

/// Table lookup, clamping out-of-range levels.
#[must_use]
pub fn flood_draws_at(level: u8) -> u8 {
    let index = usize::from(level.clamp(1, MAX_WATER_LEVEL) - 1);
    FLOOD_DRAWS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_non_decreasing() {
        for window in FLOOD_DRAWS.windows(2) {
            assert!(window[0] <= window[1]);
        }
        for level in 1..MAX_WATER_LEVEL {
            assert!(flood_draws_at(level) <= flood_draws_at(level + 1));
        }
    }

    #[test]
    fn test_raise_clamps_at_max() {
        let mut meter = WaterMeter::new(9);
        assert!(!meter.is_at_max());
        assert_eq!(meter.raise(), 10);
        assert!(meter.is_at_max());
        assert_eq!(meter.raise(), 10);
        assert_eq!(meter.level(), MAX_WATER_LEVEL);
    }

    #[test]
    fn test_new_clamps_level() {
        assert_eq!(WaterMeter::new(0).level(), 1);
        assert_eq!(WaterMeter::new(200).level(), MAX_WATER_LEVEL);
    }

    #[test]
    fn test_step_boundaries() {
        assert_eq!(flood_draws_at(2), 2);
        assert_eq!(flood_draws_at(3), 3);
        assert_eq!(flood_draws_at(5), 3);
        assert_eq!(flood_draws_at(6), 4);
        assert_eq!(flood_draws_at(8), 5);
    }
}
