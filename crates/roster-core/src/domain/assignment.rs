//! Roster assignment record and its lifecycle.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::ids::{AssignmentId, EmployeeId, MachineId, ShiftId};
use super::week::{WeekWindow, week_start_of};

/// Longest accepted `notes` text, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// Assignment status.
///
/// State transitions:
/// - Active -> Cancelled (unassign, soft delete)
/// - Active -> Completed
///
/// Cancelled and Completed are terminal. Only Active records take part in the
/// uniqueness invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn is_active(self) -> bool {
        matches!(self, AssignmentStatus::Active)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// The (machine, date, shift) tuple an assignment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub machine_id: MachineId,
    pub date: NaiveDate,
    pub shift_id: ShiftId,
}

/// The (employee, shift, week) tuple that may hold at most one active assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeWeekKey {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
    pub week_start: NaiveDate,
}

/// A request to put an employee on a machine for one shift on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub employee_id: EmployeeId,
    pub machine_id: MachineId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl NewAssignment {
    pub fn new(
        employee_id: EmployeeId,
        machine_id: MachineId,
        shift_id: ShiftId,
        date: NaiveDate,
    ) -> Self {
        Self {
            employee_id,
            machine_id,
            shift_id,
            date,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Shape checks that need no reference data.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if WeekWindow::containing(self.date).is_none() {
            return Err(ValidationError::DateOutOfRange(self.date));
        }
        let len = self.notes.chars().count();
        if len > MAX_NOTES_LEN {
            return Err(ValidationError::NotesTooLong {
                len,
                max: MAX_NOTES_LEN,
            });
        }
        Ok(())
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey {
            machine_id: self.machine_id,
            date: self.date,
            shift_id: self.shift_id,
        }
    }

    pub fn employee_week(&self) -> EmployeeWeekKey {
        EmployeeWeekKey {
            employee_id: self.employee_id,
            shift_id: self.shift_id,
            week_start: week_start_of(self.date),
        }
    }

    /// The same request moved `days` later, if that date exists.
    pub fn shifted_by_days(&self, days: u64) -> Option<Self> {
        Some(self.clone().moved_to(self.date.checked_add_days(Days::new(days))?))
    }

    pub fn moved_to(self, date: NaiveDate) -> Self {
        Self { date, ..self }
    }
}

/// Roster assignment as held by the store.
///
/// State transitions go through methods so `updated_at` stays honest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    pub id: AssignmentId,
    pub employee_id: EmployeeId,
    pub machine_id: MachineId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub notes: String,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RosterAssignment {
    pub fn new(id: AssignmentId, request: NewAssignment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_id: request.employee_id,
            machine_id: request.machine_id,
            shift_id: request.shift_id,
            date: request.date,
            notes: request.notes,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// `None` for dates in the partial weeks at the calendar ends.
    pub fn week(&self) -> Option<WeekWindow> {
        WeekWindow::containing(self.date)
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey {
            machine_id: self.machine_id,
            date: self.date,
            shift_id: self.shift_id,
        }
    }

    pub fn employee_week(&self) -> EmployeeWeekKey {
        EmployeeWeekKey {
            employee_id: self.employee_id,
            shift_id: self.shift_id,
            week_start: week_start_of(self.date),
        }
    }

    /// The request that would recreate this assignment.
    pub fn to_request(&self) -> NewAssignment {
        NewAssignment {
            employee_id: self.employee_id,
            machine_id: self.machine_id,
            shift_id: self.shift_id,
            date: self.date,
            notes: self.notes.clone(),
        }
    }

    pub fn mark_cancelled(&mut self, now: DateTime<Utc>) {
        self.status = AssignmentStatus::Cancelled;
        self.updated_at = now;
    }

    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.status = AssignmentStatus::Completed;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(date: NaiveDate) -> NewAssignment {
        NewAssignment::new(
            EmployeeId::random(),
            MachineId::random(),
            ShiftId::random(),
            date,
        )
    }

    #[test]
    fn new_record_starts_active() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let record = RosterAssignment::new(AssignmentId::random(), request(ymd(2024, 1, 2)), now);
        assert_eq!(record.status, AssignmentStatus::Active);
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.week().unwrap().start(), ymd(2024, 1, 1));
    }

    #[test]
    fn cancel_is_terminal_and_touches_updated_at() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut record = RosterAssignment::new(AssignmentId::random(), request(ymd(2024, 1, 2)), t0);

        record.mark_cancelled(t1);

        assert!(!record.is_active());
        assert!(record.status.is_terminal());
        assert_eq!(record.updated_at, t1);
        assert_eq!(record.created_at, t0);
    }

    #[test]
    fn employee_week_key_uses_monday() {
        let req = request(ymd(2024, 1, 7));
        assert_eq!(req.employee_week().week_start, ymd(2024, 1, 1));
        assert_eq!(
            req.shifted_by_days(7).unwrap().employee_week().week_start,
            ymd(2024, 1, 8)
        );
        assert_eq!(request(NaiveDate::MAX).shifted_by_days(1), None);
    }

    #[test]
    fn notes_length_is_checked_in_characters() {
        let ok = request(ymd(2024, 1, 1)).with_notes("あ".repeat(MAX_NOTES_LEN));
        assert!(ok.validate().is_ok());

        let too_long = request(ymd(2024, 1, 1)).with_notes("x".repeat(MAX_NOTES_LEN + 1));
        assert!(matches!(
            too_long.validate(),
            Err(ValidationError::NotesTooLong { len: 501, max: 500 })
        ));
    }

    #[rstest]
    #[case::first_date(NaiveDate::MIN)]
    #[case::last_date(NaiveDate::MAX)]
    fn dates_without_a_full_week_are_rejected(#[case] date: NaiveDate) {
        assert_eq!(
            request(date).validate(),
            Err(ValidationError::DateOutOfRange(date))
        );
        // キーは計算できる（パニックしない）
        assert!(request(date).employee_week().week_start <= date);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&AssignmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
