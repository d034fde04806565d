//! Per-run counters printed as the final summary table.

use serde::{Deserialize, Serialize};

use crate::enums::ItemAction;

/// Counts accumulated for one content kind during one run.
///
/// Never persisted. `simulated` marks counts produced by a dry run, where
/// `created`/`updated` describe intended writes rather than performed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
    pub simulated: bool,
}

impl SyncResult {
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            simulated: true,
            ..Self::default()
        }
    }

    /// Count one successfully handled item.
    pub const fn record(&mut self, action: ItemAction) {
        match action {
            ItemAction::Create => self.created += 1,
            ItemAction::Update => self.updated += 1,
            ItemAction::Skip => self.skipped += 1,
        }
    }

    pub const fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Fold another result into this one. The merged result is simulated if
    /// either side was.
    pub const fn merge(&mut self, other: &Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.simulated |= other.simulated;
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.created + self.updated + self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_action() {
        let mut result = SyncResult::default();
        result.record(ItemAction::Create);
        result.record(ItemAction::Create);
        result.record(ItemAction::Skip);
        result.record_failure();
        assert_eq!(result.created, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.total(), 4);
        assert!(result.has_failures());
    }

    #[test]
    fn merge_keeps_simulated_flag() {
        let mut total = SyncResult::default();
        let mut dry = SyncResult::simulated();
        dry.record(ItemAction::Update);
        total.merge(&dry);
        assert!(total.simulated);
        assert_eq!(total.updated, 1);
    }
}
