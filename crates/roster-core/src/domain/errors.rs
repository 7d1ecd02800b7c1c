//! Errors - エラー型と分類
//!
//! # 分類
//! - Validation: 事前検証エラー（store に送る前に弾く）
//! - Conflict: 一意性制約違反（EmployeeAlreadyAssigned / SlotOccupied）
//! - NotFound: 存在しない・すでに取り消された assignment
//! - Transient: store 側の一時的な障害（再同期してから呼び出し側が再実行する）
//!
//! エンジンは自動リトライしません。

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assignment::RosterAssignment;
use super::ids::{AssignmentId, EmployeeId, MachineId, ShiftId};

/// Pre-flight failure, raised before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown employee {0}")]
    UnknownEmployee(EmployeeId),

    #[error("unknown machine {0}")]
    UnknownMachine(MachineId),

    #[error("unknown shift {0}")]
    UnknownShift(ShiftId),

    #[error("employee {0} is not active")]
    InactiveEmployee(EmployeeId),

    #[error("machine {machine} is not in service ({status})")]
    MachineUnavailable { machine: String, status: String },

    #[error("no full week around {0} fits in the calendar")]
    DateOutOfRange(NaiveDate),

    #[error("notes too long: {len} characters (max {max})")]
    NotesTooLong { len: usize, max: usize },
}

/// Which uniqueness rule a conflict violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The employee already holds an active assignment for this shift in this week.
    EmployeeAlreadyAssigned,
    /// The (machine, date, shift) slot is at capacity.
    SlotOccupied,
}

/// Who/what/when of the assignment that is in the way.
///
/// Ids are always present; names are filled in from the directory when it
/// knows them, so explanations degrade to ids rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictContext {
    pub assignment_id: AssignmentId,
    pub employee_id: EmployeeId,
    pub machine_id: MachineId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_name: Option<String>,
}

impl ConflictContext {
    /// Context pointing at `record`, without display names.
    pub fn of(record: &RosterAssignment) -> Self {
        Self {
            assignment_id: record.id,
            employee_id: record.employee_id,
            machine_id: record.machine_id,
            shift_id: record.shift_id,
            date: record.date,
            employee_name: None,
            machine_name: None,
            shift_name: None,
        }
    }

    fn employee_label(&self) -> String {
        self.employee_name
            .clone()
            .unwrap_or_else(|| self.employee_id.to_string())
    }

    fn machine_label(&self) -> String {
        self.machine_name
            .clone()
            .unwrap_or_else(|| self.machine_id.to_string())
    }

    fn shift_label(&self) -> String {
        self.shift_name
            .clone()
            .unwrap_or_else(|| self.shift_id.to_string())
    }
}

/// A uniqueness violation.
///
/// `authoritative` is true when the store reported it; a local pre-check
/// conflict is advisory and may come from a stale cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub authoritative: bool,
    pub context: ConflictContext,
}

impl Conflict {
    pub fn local(kind: ConflictKind, context: ConflictContext) -> Self {
        Self {
            kind,
            authoritative: false,
            context,
        }
    }

    pub fn authoritative(kind: ConflictKind, context: ConflictContext) -> Self {
        Self {
            kind,
            authoritative: true,
            context,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = &self.context;
        match self.kind {
            ConflictKind::EmployeeAlreadyAssigned => write!(
                f,
                "{} is already on shift {} this week ({} on {})",
                ctx.employee_label(),
                ctx.shift_label(),
                ctx.machine_label(),
                ctx.date
            ),
            ConflictKind::SlotOccupied => write!(
                f,
                "{} is already taken for shift {} on {} (by {})",
                ctx.machine_label(),
                ctx.shift_label(),
                ctx.date,
                ctx.employee_label()
            ),
        }
    }
}

/// RosterError はエンジンが呼び出し側に返すエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("conflict: {0}")]
    Conflict(Conflict),

    #[error("assignment {0} not found")]
    NotFound(AssignmentId),

    #[error("store unavailable: {0}")]
    Transient(String),
}

impl RosterError {
    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        match self {
            RosterError::Conflict(conflict) => Some(conflict.kind),
            _ => None,
        }
    }

    /// Should the caller re-sync before trying again?
    pub fn is_transient(&self) -> bool {
        matches!(self, RosterError::Transient(_))
    }
}

impl From<Conflict> for RosterError {
    fn from(conflict: Conflict) -> Self {
        RosterError::Conflict(conflict)
    }
}
