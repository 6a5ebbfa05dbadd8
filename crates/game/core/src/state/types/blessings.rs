use crate::config::GameConfig;

/// Blessing counts indexed 1..=8. Index 1 is Twist of Fate, which only
/// protects against PvP deaths and does not reduce the loss percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blessings {
    counts: [u8; GameConfig::MAX_BLESSINGS + 1],
}

impl Blessings {
    pub const TWIST_OF_FATE: u8 = 1;

    pub fn has(&self, index: u8) -> bool {
        self.count(index) > 0
    }

    pub fn count(&self, index: u8) -> u8 {
        self.counts.get(index as usize).copied().unwrap_or(0)
    }

    pub fn add(&mut self, index: u8, amount: u8) {
        if let Some(count) = self.counts.get_mut(index as usize)
            && index > 0
        {
            *count = count.saturating_add(amount);
        }
    }

    pub fn remove(&mut self, index: u8, amount: u8) {
        if let Some(count) = self.counts.get_mut(index as usize) {
            *count = count.saturating_sub(amount);
        }
    }

    /// Number of distinct regular blessings (2..=max) held.
    pub fn regular_count(&self, max_blessing: u8) -> u32 {
        (2..=max_blessing).filter(|&i| self.has(i)).count() as u32
    }

    /// Removes one charge of every blessing in `from..=to`.
    pub fn strip(&mut self, from: u8, to: u8) {
        for index in from..=to {
            self.remove(index, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_count_ignores_twist_of_fate() {
        let mut blessings = Blessings::default();
        blessings.add(Blessings::TWIST_OF_FATE, 1);
        blessings.add(2, 1);
        blessings.add(5, 2);
        assert_eq!(blessings.regular_count(8), 2);
        assert_eq!(blessings.regular_count(4), 1);
    }

    #[test]
    fn strip_removes_one_charge_each() {
        let mut blessings = Blessings::default();
        blessings.add(2, 1);
        blessings.add(3, 2);
        blessings.strip(2, 8);
        assert!(!blessings.has(2));
        assert_eq!(blessings.count(3), 1);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut blessings = Blessings::default();
        blessings.add(0, 1);
        blessings.add(12, 1);
        assert!(!blessings.has(0));
        assert!(!blessings.has(12));
    }
}
