//! Linear angle-to-score curves.

use serde::{Deserialize, Serialize};

/// Maps an angle onto a 0-100 score by linear interpolation.
///
/// `best` scores 100 and `worst` scores 0; angles beyond either end are
/// clamped, never extrapolated. Works in either direction (`best` may be
/// smaller or larger than `worst`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCurve {
    pub best: f64,
    pub worst: f64,
}

impl ScoreCurve {
    pub fn new(best: f64, worst: f64) -> Self {
        Self { best, worst }
    }

    pub fn score(&self, angle: f64) -> u8 {
        let span = self.worst - self.best;
        if span == 0.0 || !angle.is_finite() {
            return 0;
        }
        let ratio = ((self.worst - angle) / span).clamp(0.0, 1.0);
        (ratio * 100.0).round() as u8
    }
}
