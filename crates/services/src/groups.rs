use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rng};

use crate::error::GroupError;

/// How to split the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSizing {
    /// Groups of at most this many members.
    BySize(usize),
    /// Exactly this many groups, or one per member if the roster is smaller.
    ByCount(usize),
}

/// Random classroom groups whose sizes differ by at most one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupGenerator;

impl GroupGenerator {
    /// Shuffle with the thread-local generator.
    ///
    /// # Errors
    ///
    /// Returns `GroupError` for an empty roster or a zero size/count.
    pub fn generate(
        roster: &[String],
        sizing: GroupSizing,
    ) -> Result<Vec<Vec<String>>, GroupError> {
        Self::generate_with(roster, sizing, &mut rng())
    }

    /// Same split every time for a given seed.
    ///
    /// # Errors
    ///
    /// Returns `GroupError` for an empty roster or a zero size/count.
    pub fn generate_seeded(
        roster: &[String],
        sizing: GroupSizing,
        seed: u64,
    ) -> Result<Vec<Vec<String>>, GroupError> {
        Self::generate_with(roster, sizing, &mut StdRng::seed_from_u64(seed))
    }

    /// Blank names are dropped before splitting.
    ///
    /// # Errors
    ///
    /// Returns `GroupError` for an empty roster or a zero size/count.
    pub fn generate_with<R: Rng + ?Sized>(
        roster: &[String],
        sizing: GroupSizing,
        rng: &mut R,
    ) -> Result<Vec<Vec<String>>, GroupError> {
        let mut names: Vec<String> = roster
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return Err(GroupError::EmptyRoster);
        }

        let count = match sizing {
            GroupSizing::BySize(0) => return Err(GroupError::ZeroSize),
            GroupSizing::ByCount(0) => return Err(GroupError::ZeroCount),
            GroupSizing::BySize(size) => names.len().div_ceil(size),
            GroupSizing::ByCount(count) => count.min(names.len()),
        };

        names.shuffle(rng);
        let mut groups = vec![Vec::new(); count];
        for (i, name) in names.into_iter().enumerate() {
            groups[i % count].push(name);
        }
        tracing::debug!(groups = count, "groups generated");
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Student {i}")).collect()
    }

    fn assert_balanced(groups: &[Vec<String>], n: usize) {
        let mut everyone: Vec<&String> = groups.iter().flatten().collect();
        everyone.sort();
        everyone.dedup();
        assert_eq!(everyone.len(), n);
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), n);

        let max = groups.iter().map(Vec::len).max().unwrap();
        let min = groups.iter().map(Vec::len).min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn by_size_never_exceeds_size() {
        let groups = GroupGenerator::generate_seeded(&roster(10), GroupSizing::BySize(4), 7).unwrap();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() <= 4));
        assert_balanced(&groups, 10);
    }

    #[test]
    fn by_count_caps_at_roster_size() {
        let groups = GroupGenerator::generate_seeded(&roster(3), GroupSizing::ByCount(5), 1).unwrap();
        assert_eq!(groups.len(), 3);
        assert_balanced(&groups, 3);

        let groups = GroupGenerator::generate(&roster(23), GroupSizing::ByCount(4)).unwrap();
        assert_eq!(groups.len(), 4);
        assert_balanced(&groups, 23);
    }

    #[test]
    fn same_seed_same_groups() {
        let a = GroupGenerator::generate_seeded(&roster(12), GroupSizing::BySize(3), 42).unwrap();
        let b = GroupGenerator::generate_seeded(&roster(12), GroupSizing::BySize(3), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_degenerate_input() {
        let blanks = vec!["  ".to_string(), String::new()];
        assert_eq!(
            GroupGenerator::generate(&blanks, GroupSizing::BySize(2)).unwrap_err(),
            GroupError::EmptyRoster
        );
        assert_eq!(
            GroupGenerator::generate(&roster(4), GroupSizing::BySize(0)).unwrap_err(),
            GroupError::ZeroSize
        );
        assert_eq!(
            GroupGenerator::generate(&roster(4), GroupSizing::ByCount(0)).unwrap_err(),
            GroupError::ZeroCount
        );
    }
}
