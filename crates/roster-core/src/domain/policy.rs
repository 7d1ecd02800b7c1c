//! Policies: slot capacity, removal and copy-week behavior.
//!
//! All three are plain values, chosen once when the engine and store are
//! built. `EngineConfig` bundles them so they can be loaded from a JSON file.

use serde::{Deserialize, Serialize};

/// How many active assignments a (machine, date, shift) slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCapacity {
    /// One worker per slot.
    #[default]
    Single,
    /// Up to `n` workers per slot (`n >= 1`; 0 is treated as 1).
    Limited(u32),
    /// No slot limit. Only the employee/shift/week rule applies.
    Unlimited,
}

impl SlotCapacity {
    /// `None` means unbounded.
    pub fn limit(self) -> Option<usize> {
        match self {
            SlotCapacity::Single => Some(1),
            SlotCapacity::Limited(n) => Some(n.max(1) as usize),
            SlotCapacity::Unlimited => None,
        }
    }

    /// Is a slot already holding `occupants` active assignments full?
    pub fn is_full(self, occupants: usize) -> bool {
        self.limit().is_some_and(|limit| occupants >= limit)
    }
}

/// What `unassign` does to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Keep the record with status `cancelled`.
    #[default]
    SoftCancel,
    /// Drop the record entirely.
    HardDelete,
}

/// How `copy_week` treats conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyPolicy {
    /// Any conflict aborts the copy and nothing is written.
    #[default]
    AllOrNothing,
    /// Conflicting items are skipped and reported; the rest persist.
    BestEffort,
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub slot_capacity: SlotCapacity,
    pub removal: RemovalPolicy,
    pub copy_policy: CopyPolicy,
}

impl EngineConfig {
    pub fn with_slot_capacity(mut self, slot_capacity: SlotCapacity) -> Self {
        self.slot_capacity = slot_capacity;
        self
    }

    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    pub fn with_copy_policy(mut self, copy_policy: CopyPolicy) -> Self {
        self.copy_policy = copy_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_single_soft_transactional() {
        let config = EngineConfig::default();
        assert_eq!(config.slot_capacity, SlotCapacity::Single);
        assert_eq!(config.removal, RemovalPolicy::SoftCancel);
        assert_eq!(config.copy_policy, CopyPolicy::AllOrNothing);
    }

    #[rstest]
    #[case::single_empty(SlotCapacity::Single, 0, false)]
    #[case::single_taken(SlotCapacity::Single, 1, true)]
    #[case::limited_room(SlotCapacity::Limited(3), 2, false)]
    #[case::limited_full(SlotCapacity::Limited(3), 3, true)]
    #[case::limited_zero_acts_as_one(SlotCapacity::Limited(0), 1, true)]
    #[case::unlimited(SlotCapacity::Unlimited, 100, false)]
    fn capacity_is_full(#[case] capacity: SlotCapacity, #[case] occupants: usize, #[case] full: bool) {
        assert_eq!(capacity.is_full(occupants), full);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "slot_capacity": { "limited": 2 }, "copy_policy": "best_effort" }"#,
        )
        .unwrap();
        assert_eq!(config.slot_capacity, SlotCapacity::Limited(2));
        assert_eq!(config.removal, RemovalPolicy::SoftCancel);
        assert_eq!(config.copy_policy, CopyPolicy::BestEffort);
    }
}
