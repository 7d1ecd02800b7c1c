//! Assignment index for O(1) conflict lookups.
//!
//! Design:
//! - `records`: every known assignment, any status
//! - `by_employee_week`: (employee, shift, week_start) -> active assignment ids
//! - `by_slot`: (machine, date, shift) -> active assignment ids
//! - Invariant: an id is in the two key maps iff its record is active

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;

use super::assignment::{EmployeeWeekKey, RosterAssignment, SlotKey};
use super::ids::AssignmentId;

#[derive(Debug, Clone, Default)]
pub struct AssignmentIndex {
    records: HashMap<AssignmentId, RosterAssignment>,
    by_employee_week: HashMap<EmployeeWeekKey, HashSet<AssignmentId>>,
    by_slot: HashMap<SlotKey, HashSet<AssignmentId>>,
}

impl AssignmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = RosterAssignment>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Insert or replace a record, keeping the key maps in sync.
    pub fn insert(&mut self, record: RosterAssignment) {
        let _ = self.remove(record.id);
        if record.is_active() {
            self.by_employee_week
                .entry(record.employee_week())
                .or_default()
                .insert(record.id);
            self.by_slot.entry(record.slot()).or_default().insert(record.id);
        }
        self.records.insert(record.id, record);
    }

    /// Remove a record entirely, returning it.
    pub fn remove(&mut self, id: AssignmentId) -> Option<RosterAssignment> {
        let record = self.records.remove(&id)?;
        if record.is_active() {
            detach(&mut self.by_employee_week, record.employee_week(), id);
            detach(&mut self.by_slot, record.slot(), id);
        }
        Some(record)
    }

    pub fn get(&self, id: AssignmentId) -> Option<&RosterAssignment> {
        self.records.get(&id)
    }

    /// The active assignment already holding this employee/shift/week, if any.
    pub fn employee_week_holder(&self, key: &EmployeeWeekKey) -> Option<&RosterAssignment> {
        self.active_under(&self.by_employee_week, key).into_iter().next()
    }

    /// Active assignments occupying a slot, oldest first.
    pub fn slot_occupants(&self, key: &SlotKey) -> Vec<&RosterAssignment> {
        self.active_under(&self.by_slot, key)
    }

    /// Records of any status dated within `[start, end]`, ordered by date then id.
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&RosterAssignment> {
        let mut found: Vec<&RosterAssignment> = self
            .records
            .values()
            .filter(|record| start <= record.date && record.date <= end)
            .collect();
        found.sort_by_key(|record| (record.date, record.id));
        found
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.by_slot.values().map(HashSet::len).sum()
    }

    fn active_under<K: Eq + Hash>(
        &self,
        map: &HashMap<K, HashSet<AssignmentId>>,
        key: &K,
    ) -> Vec<&RosterAssignment> {
        let mut found: Vec<&RosterAssignment> = map
            .get(key)
            .map(|ids| ids.iter().filter_map(|id| self.records.get(id)).collect())
            .unwrap_or_default();
        // ULID の順序 = 発行順
        found.sort_by_key(|record| record.id);
        found
    }
}

fn detach<K: Eq + Hash>(map: &mut HashMap<K, HashSet<AssignmentId>>, key: K, id: AssignmentId) {
    if let Entry::Occupied(mut e) = map.entry(key) {
        e.get_mut().remove(&id);
        if e.get().is_empty() {
            e.remove_entry();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeId, MachineId, NewAssignment, ShiftId};
    use chrono::{TimeZone, Utc};

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(employee: EmployeeId, machine: MachineId, shift: ShiftId, day: u32) -> RosterAssignment {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RosterAssignment::new(
            AssignmentId::random(),
            NewAssignment::new(employee, machine, shift, ymd(day)),
            now,
        )
    }

    #[test]
    fn active_record_is_found_by_both_keys() {
        let (e, m, s) = (EmployeeId::random(), MachineId::random(), ShiftId::random());
        let r = record(e, m, s, 1);
        let mut index = AssignmentIndex::new();
        index.insert(r.clone());

        // 同じ週の別の日でも employee/shift/week キーで見つかる
        let later = NewAssignment::new(e, MachineId::random(), s, ymd(3));
        assert_eq!(index.employee_week_holder(&later.employee_week()).map(|x| x.id), Some(r.id));
        assert_eq!(index.slot_occupants(&r.slot()).len(), 1);
        assert_eq!(index.active_count(), 1);
    }

    #[test]
    fn cancelled_record_leaves_the_key_maps() {
        let mut r = record(EmployeeId::random(), MachineId::random(), ShiftId::random(), 2);
        let mut index = AssignmentIndex::new();
        index.insert(r.clone());

        r.mark_cancelled(r.updated_at);
        index.insert(r.clone());

        assert!(index.employee_week_holder(&r.employee_week()).is_none());
        assert!(index.slot_occupants(&r.slot()).is_empty());
        assert_eq!(index.len(), 1);
        assert_eq!(index.active_count(), 0);
    }

    #[test]
    fn remove_cleans_up_empty_buckets() {
        let r = record(EmployeeId::random(), MachineId::random(), ShiftId::random(), 2);
        let mut index = AssignmentIndex::from_records([r.clone()]);

        assert_eq!(index.remove(r.id).map(|x| x.id), Some(r.id));
        assert!(index.remove(r.id).is_none());
        assert!(index.is_empty());
        assert!(index.by_slot.is_empty());
        assert!(index.by_employee_week.is_empty());
    }

    #[test]
    fn range_query_is_inclusive_and_ordered() {
        let s = ShiftId::random();
        let records: Vec<_> = [5, 1, 8, 7]
            .into_iter()
            .map(|d| record(EmployeeId::random(), MachineId::random(), s, d))
            .collect();
        let index = AssignmentIndex::from_records(records);

        let dates: Vec<_> = index.in_range(ymd(1), ymd(7)).iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(1), ymd(5), ymd(7)]);
    }
}
