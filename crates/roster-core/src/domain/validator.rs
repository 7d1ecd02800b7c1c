//! Conflict detection against a known assignment set.
//!
//! The same checks run in two places: on the local week cache as an advisory
//! pre-check, and inside the store as the authoritative one. Neither call
//! mutates anything.

use chrono::NaiveDate;

use super::assignment::{EmployeeWeekKey, NewAssignment, RosterAssignment, SlotKey};
use super::errors::{Conflict, ConflictContext, ConflictKind};
use super::ids::{EmployeeId, MachineId, ShiftId};
use super::index::AssignmentIndex;
use super::policy::SlotCapacity;
use super::week::WeekWindow;

/// Read-only view over an index plus the slot capacity policy.
#[derive(Debug, Clone, Copy)]
pub struct ConflictValidator<'a> {
    index: &'a AssignmentIndex,
    capacity: SlotCapacity,
}

impl<'a> ConflictValidator<'a> {
    pub fn new(index: &'a AssignmentIndex, capacity: SlotCapacity) -> Self {
        Self { index, capacity }
    }

    /// The active assignment that already puts `employee_id` on `shift_id` in `week`.
    pub fn is_employee_assigned_in_week(
        &self,
        employee_id: EmployeeId,
        shift_id: ShiftId,
        week: WeekWindow,
    ) -> Option<&'a RosterAssignment> {
        self.index.employee_week_holder(&EmployeeWeekKey {
            employee_id,
            shift_id,
            week_start: week.start(),
        })
    }

    /// The oldest occupant of the slot, if the slot is at capacity.
    ///
    /// Under `SlotCapacity::Unlimited` this is always `None`.
    pub fn is_slot_occupied(
        &self,
        machine_id: MachineId,
        date: NaiveDate,
        shift_id: ShiftId,
    ) -> Option<&'a RosterAssignment> {
        let occupants = self.index.slot_occupants(&SlotKey {
            machine_id,
            date,
            shift_id,
        });
        if self.capacity.is_full(occupants.len()) {
            occupants.into_iter().next()
        } else {
            None
        }
    }

    /// Both rules, employee rule first. Conflicts come back non-authoritative;
    /// the store flips the flag on its own copy.
    pub fn check(&self, request: &NewAssignment) -> Result<(), Conflict> {
        if let Some(holder) = self.index.employee_week_holder(&request.employee_week()) {
            return Err(Conflict::local(
                ConflictKind::EmployeeAlreadyAssigned,
                ConflictContext::of(holder),
            ));
        }
        if let Some(occupant) =
            self.is_slot_occupied(request.machine_id, request.date, request.shift_id)
        {
            return Err(Conflict::local(
                ConflictKind::SlotOccupied,
                ConflictContext::of(occupant),
            ));
        }
        Ok(())
    }
}
