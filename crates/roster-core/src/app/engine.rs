//! RosterEngine - 呼び出し側（UI など）に見せる唯一の表面
//!
//! ドラッグ&ドロップなどの UI 操作は、ここの `assign` / `unassign` 呼び出しに落とします。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{
    AssignmentId, CopyResult, EngineConfig, NewAssignment, RosterAssignment, RosterError,
};
use crate::ports::Directory;

use super::mutator::{AssignmentMutator, week_containing};
use super::sync::{SyncController, WeekView};

/// Command/query surface over one store.
///
/// `Send + Sync`; share it behind an `Arc` between concurrent callers.
pub struct RosterEngine {
    mutator: AssignmentMutator,
    sync: Arc<SyncController>,
    directory: Arc<dyn Directory>,
}

impl RosterEngine {
    pub(crate) fn new(
        mutator: AssignmentMutator,
        sync: Arc<SyncController>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            mutator,
            sync,
            directory,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.mutator.config()
    }

    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// The week containing `reference_date`, from cache if it is trusted.
    ///
    /// `DateOutOfRange` for the partial weeks at either end of the calendar.
    pub async fn list_week(&self, reference_date: NaiveDate) -> Result<WeekView, RosterError> {
        let week = week_containing(reference_date)?;
        Ok(self.sync.load_week(week).await?.view())
    }

    /// Throw the cached week away and read it again. Use after a transient error.
    pub async fn resync(&self, reference_date: NaiveDate) -> Result<WeekView, RosterError> {
        let week = week_containing(reference_date)?;
        Ok(self.sync.refresh(week).await?.view())
    }

    pub async fn assign(&self, request: NewAssignment) -> Result<RosterAssignment, RosterError> {
        self.mutator.create(request).await
    }

    pub async fn unassign(&self, id: AssignmentId) -> Result<RosterAssignment, RosterError> {
        self.mutator.remove(id).await
    }

    pub async fn complete(&self, id: AssignmentId) -> Result<RosterAssignment, RosterError> {
        self.mutator.complete(id).await
    }

    /// Copy the week containing `week_start` into the following week.
    pub async fn copy_week(&self, week_start: NaiveDate) -> Result<CopyResult, RosterError> {
        self.mutator.copy_week(week_start).await
    }
}
