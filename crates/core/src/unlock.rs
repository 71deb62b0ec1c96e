use std::collections::{BTreeMap, BTreeSet};

use crate::error::PreconditionError;
use crate::model::{Level, LevelNumber};

/// Set of tiered-quiz levels a learner may start.
///
/// Starts as `{1}` and only grows. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockTracker {
    thresholds: BTreeMap<LevelNumber, u8>,
    unlocked: BTreeSet<LevelNumber>,
}

impl UnlockTracker {
    #[must_use]
    pub fn new(levels: &[Level]) -> Self {
        Self {
            thresholds: levels
                .iter()
                .map(|level| (level.number(), level.min_score_to_unlock()))
                .collect(),
            unlocked: BTreeSet::from([LevelNumber::FIRST]),
        }
    }

    #[must_use]
    pub fn unlocked(&self) -> &BTreeSet<LevelNumber> {
        &self.unlocked
    }

    #[must_use]
    pub fn is_unlocked(&self, level: LevelNumber) -> bool {
        self.unlocked.contains(&level)
    }

    #[must_use]
    pub fn final_level(&self) -> Option<LevelNumber> {
        self.thresholds.keys().next_back().copied()
    }

    fn threshold(&self, level: LevelNumber) -> Result<u8, PreconditionError> {
        self.thresholds
            .get(&level)
            .copied()
            .ok_or(PreconditionError::UnknownLevel { level })
    }

    /// Whether `score_percent` meets the level's threshold.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` for a level that does not exist.
    pub fn passed(&self, level: LevelNumber, score_percent: u8) -> Result<bool, PreconditionError> {
        Ok(score_percent >= self.threshold(level)?)
    }

    /// Record a finished attempt; unlocks the next level when the threshold is met.
    ///
    /// Returns the level that became selectable because of this call, if any.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel`, `LevelLocked` for a level that was never
    /// unlocked, or `PercentOutOfRange` above 100.
    pub fn record_completion(
        &mut self,
        level: LevelNumber,
        score_percent: u8,
    ) -> Result<Option<LevelNumber>, PreconditionError> {
        let threshold = self.threshold(level)?;
        if !self.is_unlocked(level) {
            return Err(PreconditionError::LevelLocked { level });
        }
        if score_percent > 100 {
            return Err(PreconditionError::PercentOutOfRange {
                percent: score_percent,
            });
        }

        let next = level.next();
        if score_percent < threshold || !self.thresholds.contains_key(&next) {
            return Ok(None);
        }
        Ok(self.unlocked.insert(next).then_some(next))
    }
}
