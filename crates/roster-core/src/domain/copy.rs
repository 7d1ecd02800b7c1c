//! Copy-week result model.

use serde::{Deserialize, Serialize};

use super::assignment::{NewAssignment, RosterAssignment};
use super::errors::Conflict;
use super::ids::AssignmentId;
use super::index::AssignmentIndex;
use super::policy::{CopyPolicy, SlotCapacity};
use super::validator::ConflictValidator;
use super::week::WeekWindow;

/// What happened to one source assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CopyOutcome {
    /// Written to the target week.
    Created { assignment: RosterAssignment },
    /// Blocked by a uniqueness rule; nothing written for this item.
    Conflict { conflict: Conflict },
    /// Would have been fine, but the all-or-nothing copy was aborted.
    RolledBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyItem {
    pub source_id: AssignmentId,
    #[serde(flatten)]
    pub outcome: CopyOutcome,
}

/// Per-item report of a copy-week run.
///
/// `items` has one entry per active source assignment, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub policy: CopyPolicy,
    pub source: WeekWindow,
    pub target: WeekWindow,
    pub items: Vec<CopyItem>,
}

impl CopyResult {
    pub fn new(policy: CopyPolicy, source: WeekWindow, target: WeekWindow) -> Self {
        Self {
            policy,
            source,
            target,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, source_id: AssignmentId, outcome: CopyOutcome) {
        self.items.push(CopyItem { source_id, outcome });
    }

    pub fn created(&self) -> impl Iterator<Item = &RosterAssignment> {
        self.items.iter().filter_map(|item| match &item.outcome {
            CopyOutcome::Created { assignment } => Some(assignment),
            _ => None,
        })
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (AssignmentId, &Conflict)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            CopyOutcome::Conflict { conflict } => Some((item.source_id, conflict)),
            _ => None,
        })
    }

    pub fn created_count(&self) -> usize {
        self.created().count()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts().count()
    }

    /// Did anything reach the store?
    pub fn wrote_anything(&self) -> bool {
        self.created_count() > 0
    }

    /// Mark every reported conflict as coming from the store.
    pub fn mark_authoritative(&mut self) {
        for item in &mut self.items {
            if let CopyOutcome::Conflict { conflict } = &mut item.outcome {
                conflict.authoritative = true;
            }
        }
    }

    /// Turn every pending success into `RolledBack` (all-or-nothing abort).
    pub fn roll_back(&mut self) {
        for item in &mut self.items {
            if matches!(item.outcome, CopyOutcome::Created { .. }) {
                item.outcome = CopyOutcome::RolledBack;
            }
        }
    }
}

/// Plan a copy of `source`'s active assignments into `target`, weekday for weekday.
///
/// Each item is checked against `staged` (the target week as known so far) and,
/// when it passes, minted and inserted so later items see it. Under
/// all-or-nothing any conflict rolls every success back; `staged` is then
/// left holding the would-be records and must be discarded by the caller.
pub fn plan_copy<'a>(
    source: WeekWindow,
    target: WeekWindow,
    sources: impl IntoIterator<Item = &'a RosterAssignment>,
    staged: &mut AssignmentIndex,
    capacity: SlotCapacity,
    policy: CopyPolicy,
    mut mint: impl FnMut(NewAssignment) -> RosterAssignment,
) -> CopyResult {
    let mut result = CopyResult::new(policy, source, target);
    for original in sources.into_iter().filter(|r| r.is_active()) {
        let Some(date) = source.same_day_in(target, original.date) else {
            continue;
        };
        let request = original.to_request().moved_to(date);
        let checked = ConflictValidator::new(staged, capacity).check(&request);
        let outcome = match checked {
            Ok(()) => {
                let record = mint(request);
                staged.insert(record.clone());
                CopyOutcome::Created { assignment: record }
            }
            Err(conflict) => CopyOutcome::Conflict { conflict },
        };
        result.push(original.id, outcome);
    }
    if policy == CopyPolicy::AllOrNothing && result.conflict_count() > 0 {
        result.roll_back();
    }
    result
}
