//! AssignmentStore port - roster assignment の正本（source of truth）
//!
//! # 設計原則
//! - 一意性制約（employee/shift/week、slot capacity）の権威はここにある
//! - チェックと書き込みは同一のアトミックな操作で行う（copy_week も1件ずつではなく1回で）
//! - クライアント側の事前チェックは参考情報に過ぎない。ここが返す Conflict が常に優先される

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    AssignmentId, Conflict, CopyPolicy, CopyResult, NewAssignment, RosterAssignment, RosterError,
    SlotCapacity, ValidationError, WeekWindow,
};

/// StoreError は store が返すエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(Conflict),

    #[error("assignment {0} not found")]
    NotFound(AssignmentId),

    /// The week after `source` does not fit in the calendar.
    #[error("week of {0} has no following week")]
    WeekOutOfRange(NaiveDate),

    #[error("{0}")]
    Unavailable(String),
}

impl From<StoreError> for RosterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(conflict) => RosterError::Conflict(conflict),
            StoreError::NotFound(id) => RosterError::NotFound(id),
            StoreError::WeekOutOfRange(date) => {
                RosterError::Validation(ValidationError::DateOutOfRange(date))
            }
            StoreError::Unavailable(message) => RosterError::Transient(message),
        }
    }
}

/// AssignmentStore は assignment の永続化と制約チェックを担う
///
/// REST で言えば:
/// - `list_range`  = `GET assignments?start=&end=`
/// - `assign`      = `POST assign`
/// - `remove`      = `DELETE assignment/{id}`
/// - `copy_week`   = `POST copyWeek`
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// How many active assignments one (machine, date, shift) slot may hold.
    ///
    /// Clients run their advisory pre-check with this so they never turn away
    /// a write the store would accept.
    fn slot_capacity(&self) -> SlotCapacity;

    /// Assignments of any status dated within `[start, end]`.
    async fn list_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RosterAssignment>, StoreError>;

    /// Validate and create. The returned record carries the store-issued id.
    async fn assign(&self, request: NewAssignment) -> Result<RosterAssignment, StoreError>;

    /// Cancel or delete (per store policy) an active assignment.
    ///
    /// Unknown, cancelled and completed ids are all `NotFound`.
    async fn remove(&self, id: AssignmentId) -> Result<RosterAssignment, StoreError>;

    /// Move an active assignment to completed.
    async fn complete(&self, id: AssignmentId) -> Result<RosterAssignment, StoreError>;

    /// Duplicate every active assignment of `source` seven days later.
    ///
    /// `WeekOutOfRange` when `source` is the last full week of the calendar.
    async fn copy_week(
        &self,
        source: WeekWindow,
        policy: CopyPolicy,
    ) -> Result<CopyResult, StoreError>;
}
