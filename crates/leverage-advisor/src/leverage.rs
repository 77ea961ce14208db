//! Leverage Ladder
//!
//! Recommendations only ever carry leverages from a fixed discrete set.
//! Continuous targets from the scorers are snapped to the nearest rung.

use serde::{Deserialize, Serialize};

use crate::entropy::Entropy;
use crate::error::{AdvisorError, Result};

/// Leverages offered by the default ladder
pub const DEFAULT_LEVERAGES: [u32; 10] = [1, 2, 3, 5, 10, 20, 25, 50, 75, 100];

/// Ascending, de-duplicated, non-empty set of allowed leverages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct LeverageLadder {
    steps: Vec<u32>,
}

impl Default for LeverageLadder {
    fn default() -> Self {
        Self {
            steps: DEFAULT_LEVERAGES.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for LeverageLadder {
    type Error = AdvisorError;

    fn try_from(steps: Vec<u32>) -> Result<Self> {
        Self::new(steps)
    }
}

impl From<LeverageLadder> for Vec<u32> {
    fn from(ladder: LeverageLadder) -> Self {
        ladder.steps
    }
}

impl LeverageLadder {
    pub fn new(mut steps: Vec<u32>) -> Result<Self> {
        if steps.is_empty() {
            return Err(AdvisorError::EmptyLadder);
        }
        steps.sort_unstable();
        steps.dedup();
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    pub fn contains(&self, leverage: u32) -> bool {
        self.steps.binary_search(&leverage).is_ok()
    }

    pub fn min(&self) -> u32 {
        self.steps[0]
    }

    pub fn max(&self) -> u32 {
        self.steps[self.steps.len() - 1]
    }

    /// Nearest rung to `target`; ties go to the lower rung.
    ///
    /// NaN snaps to the lowest rung, infinities to the matching end.
    pub fn quantize(&self, target: f64) -> u32 {
        if target.is_nan() {
            return self.min();
        }
        if target.is_infinite() {
            return if target > 0.0 { self.max() } else { self.min() };
        }
        nearest(&self.steps, target)
    }

    /// Uniformly random rung
    pub fn pick<E: Entropy + ?Sized>(&self, entropy: &mut E) -> u32 {
        self.steps[entropy.index(self.steps.len())]
    }
}

/// Quantize against a raw ladder slice, which must be ascending
pub fn quantize(target: f64, ladder: &[u32]) -> Result<u32> {
    if ladder.is_empty() {
        return Err(AdvisorError::EmptyLadder);
    }
    Ok(nearest(ladder, target))
}

// Stable ascending scan; strict `<` keeps the first minimum.
fn nearest(steps: &[u32], target: f64) -> u32 {
    let mut best = steps[0];
    let mut best_distance = (f64::from(best) - target).abs();
    for &step in &steps[1..] {
        let distance = (f64::from(step) - target).abs();
        if distance < best_distance {
            best = step;
            best_distance = distance;
        }
    }
    best
}
