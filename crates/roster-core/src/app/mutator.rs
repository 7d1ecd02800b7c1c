//! AssignmentMutator - 書き込み系コマンド
//!
//! # フロー（create の場合）
//! 1. 形式チェック（notes の長さ）とマスタ参照による事前検証 → ValidationError
//! 2. キャッシュ上で ConflictValidator → ローカルの Conflict（store には送らない）
//! 3. store.assign() → store 側で再検証（ここの Conflict が正）
//! 4. 成功: その週を読み直す / 失敗: その週のキャッシュを捨てる
//!
//! リトライはしません。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{
    AssignmentId, AssignmentIndex, Conflict, ConflictValidator, CopyOutcome, CopyPolicy,
    CopyResult, EngineConfig, NewAssignment, RosterAssignment, RosterError, ValidationError,
    WeekWindow, plan_copy,
};
use crate::ports::{AssignmentStore, Clock, Directory, IdGenerator};

use super::sync::SyncController;

/// The week containing `date`, or `DateOutOfRange` at the calendar ends.
pub(crate) fn week_containing(date: NaiveDate) -> Result<WeekWindow, RosterError> {
    WeekWindow::containing(date)
        .ok_or(RosterError::Validation(ValidationError::DateOutOfRange(date)))
}

pub struct AssignmentMutator {
    store: Arc<dyn AssignmentStore>,
    directory: Arc<dyn Directory>,
    sync: Arc<SyncController>,
    clock: Arc<dyn Clock>,
    // 下書き（dry run）用。store が発行する ID とは別物
    draft_ids: Arc<dyn IdGenerator>,
    config: EngineConfig,
}

impl AssignmentMutator {
    pub fn new(
        store: Arc<dyn AssignmentStore>,
        directory: Arc<dyn Directory>,
        sync: Arc<SyncController>,
        clock: Arc<dyn Clock>,
        draft_ids: Arc<dyn IdGenerator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            directory,
            sync,
            clock,
            draft_ids,
            config,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub async fn create(&self, request: NewAssignment) -> Result<RosterAssignment, RosterError> {
        request.validate()?;
        self.preflight(&request).await?;

        let week = week_containing(request.date)?;
        let cache = self.sync.load_week(week).await?;
        let local = ConflictValidator::new(cache.index(), self.store.slot_capacity()).check(&request);
        if let Err(conflict) = local {
            let conflict = self.describe(conflict).await;
            tracing::warn!(kind = ?conflict.kind, %conflict, "assignment rejected by local pre-check");
            // キャッシュが古くて誤検知した可能性もあるので、次の読み込みで取り直させる
            self.sync.invalidate(week).await;
            return Err(RosterError::Conflict(conflict));
        }

        match self.store.assign(request).await {
            Ok(record) => {
                tracing::info!(
                    assignment_id = %record.id,
                    employee_id = %record.employee_id,
                    machine_id = %record.machine_id,
                    shift_id = %record.shift_id,
                    date = %record.date,
                    "assignment created"
                );
                self.resync(week).await;
                Ok(record)
            }
            Err(err) => {
                self.sync.invalidate(week).await;
                Err(self.surface(err.into()).await)
            }
        }
    }

    pub async fn remove(&self, id: AssignmentId) -> Result<RosterAssignment, RosterError> {
        match self.store.remove(id).await {
            Ok(record) => {
                tracing::info!(assignment_id = %id, status = ?record.status, "assignment removed");
                self.resync_record(&record).await;
                Ok(record)
            }
            Err(err) => {
                self.sync.invalidate_holding(id).await;
                Err(self.surface(err.into()).await)
            }
        }
    }

    pub async fn complete(&self, id: AssignmentId) -> Result<RosterAssignment, RosterError> {
        match self.store.complete(id).await {
            Ok(record) => {
                tracing::info!(assignment_id = %id, "assignment completed");
                self.resync_record(&record).await;
                Ok(record)
            }
            Err(err) => {
                self.sync.invalidate_holding(id).await;
                Err(self.surface(err.into()).await)
            }
        }
    }

    /// Copy the active assignments of the week containing `source_week_start`
    /// into the following week.
    pub async fn copy_week(&self, source_week_start: NaiveDate) -> Result<CopyResult, RosterError> {
        let source = week_containing(source_week_start)?;
        let target = source
            .next()
            .ok_or(ValidationError::DateOutOfRange(source_week_start))?;
        let policy = self.config.copy_policy;

        if policy == CopyPolicy::AllOrNothing {
            let local = self.plan_locally(source, target).await?;
            if local.conflict_count() > 0 {
                tracing::warn!(
                    source_week = %source.start(),
                    conflicts = local.conflict_count(),
                    "copy-week aborted by local pre-check"
                );
                self.sync.invalidate(target).await;
                return Ok(self.describe_all(local).await);
            }
        }

        let result = match self.store.copy_week(source, policy).await {
            Ok(result) => result,
            Err(err) => {
                self.sync.invalidate(target).await;
                return Err(self.surface(err.into()).await);
            }
        };

        tracing::info!(
            source_week = %source.start(),
            policy = ?policy,
            created = result.created_count(),
            conflicts = result.conflict_count(),
            "copy-week finished"
        );
        if result.wrote_anything() {
            self.resync(target).await;
        } else {
            self.sync.invalidate(target).await;
        }
        Ok(self.describe_all(result).await)
    }

    /// Dry run of a copy against the cached source and target weeks.
    async fn plan_locally(
        &self,
        source: WeekWindow,
        target: WeekWindow,
    ) -> Result<CopyResult, RosterError> {
        let source_cache = self.sync.load_week(source).await?;
        let target_cache = self.sync.load_week(target).await?;
        let mut staged: AssignmentIndex = target_cache.index().clone();
        let now = self.clock.now();

        let mut plan = plan_copy(
            source,
            target,
            source_cache.index().in_range(source.start(), source.end()),
            &mut staged,
            self.store.slot_capacity(),
            CopyPolicy::AllOrNothing,
            |request| RosterAssignment::new(self.draft_ids.generate_assignment_id(), request, now),
        );
        // 下書きのレコードは呼び出し側に見せない
        plan.roll_back();
        Ok(plan)
    }

    /// Reference-data checks. The store does not repeat these.
    async fn preflight(&self, request: &NewAssignment) -> Result<(), ValidationError> {
        let employee = self
            .directory
            .employee(request.employee_id)
            .await
            .ok_or(ValidationError::UnknownEmployee(request.employee_id))?;
        if !employee.active {
            return Err(ValidationError::InactiveEmployee(employee.id));
        }

        let machine = self
            .directory
            .machine(request.machine_id)
            .await
            .ok_or(ValidationError::UnknownMachine(request.machine_id))?;
        if !machine.status.is_assignable() {
            return Err(ValidationError::MachineUnavailable {
                machine: machine.code,
                status: machine.status.as_str().to_string(),
            });
        }

        if self.directory.shift(request.shift_id).await.is_none() {
            return Err(ValidationError::UnknownShift(request.shift_id));
        }
        Ok(())
    }

    /// Reload after a successful write. A failed reload leaves the week
    /// uncached; the write itself still stands.
    async fn resync(&self, week: WeekWindow) {
        if let Err(err) = self.sync.refresh(week).await {
            tracing::warn!(week_start = %week.start(), error = %err, "cache reload failed");
        }
    }

    async fn resync_record(&self, record: &RosterAssignment) {
        match record.week() {
            Some(week) => self.resync(week).await,
            None => self.sync.invalidate_holding(record.id).await,
        }
    }

    async fn surface(&self, err: RosterError) -> RosterError {
        match err {
            RosterError::Conflict(conflict) => {
                let conflict = self.describe(conflict).await;
                tracing::warn!(kind = ?conflict.kind, %conflict, "store rejected write");
                RosterError::Conflict(conflict)
            }
            other => {
                if let RosterError::Transient(message) = &other {
                    tracing::warn!(error = %message, "store unavailable");
                }
                other
            }
        }
    }

    /// Fill in display names from the directory.
    async fn describe(&self, mut conflict: Conflict) -> Conflict {
        let ctx = &mut conflict.context;
        if let Some(employee) = self.directory.employee(ctx.employee_id).await {
            ctx.employee_name = Some(employee.display_name);
        }
        if let Some(machine) = self.directory.machine(ctx.machine_id).await {
            ctx.machine_name = Some(machine.name);
        }
        if let Some(shift) = self.directory.shift(ctx.shift_id).await {
            ctx.shift_name = Some(shift.name);
        }
        conflict
    }

    async fn describe_all(&self, mut result: CopyResult) -> CopyResult {
        for item in &mut result.items {
            if let CopyOutcome::Conflict { conflict } = &mut item.outcome {
                *conflict = self.describe(conflict.clone()).await;
            }
        }
        result
    }
}
