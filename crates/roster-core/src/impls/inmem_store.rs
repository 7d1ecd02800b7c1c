//! InMemoryAssignmentStore - 開発・テスト用の正本
//!
//! # 実装詳細
//! - 全状態（レコード + インデックス）を1つの `tokio::sync::Mutex` で保護
//! - assign / remove / copy_week はロックを握ったまま「チェック → 書き込み」を行うので、
//!   同時に書き込む呼び出し側のうち負けた方には必ず Conflict が返る
//! - copy_week はインデックスのコピーに対して計画し、何か書けたときだけ差し替える

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::{
    AssignmentId, AssignmentIndex, AssignmentStatus, Conflict, ConflictValidator, CopyPolicy,
    CopyResult, EngineConfig, NewAssignment, RemovalPolicy, RosterAssignment, SlotCapacity,
    WeekWindow, plan_copy,
};
use crate::ports::{AssignmentStore, Clock, IdGenerator, StoreError, SystemClock, UlidGenerator};

/// Number of stored records per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
}

struct InMemoryStoreState {
    /// Single source of truth for every record.
    index: AssignmentIndex,
    slot_capacity: SlotCapacity,
    removal: RemovalPolicy,
}

impl InMemoryStoreState {
    /// Authoritative check: the validator's verdict with the flag flipped.
    fn check(&self, index: &AssignmentIndex, request: &NewAssignment) -> Result<(), Conflict> {
        ConflictValidator::new(index, self.slot_capacity)
            .check(request)
            .map_err(|conflict| Conflict::authoritative(conflict.kind, conflict.context))
    }

    fn active_record(&self, id: AssignmentId) -> Result<RosterAssignment, StoreError> {
        match self.index.get(id) {
            Some(record) if record.is_active() => Ok(record.clone()),
            _ => Err(StoreError::NotFound(id)),
        }
    }

    fn counts_by_status(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in self.index.in_range(NaiveDate::MIN, NaiveDate::MAX) {
            match record.status {
                AssignmentStatus::Active => counts.active += 1,
                AssignmentStatus::Completed => counts.completed += 1,
                AssignmentStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}

/// In-memory AssignmentStore.
pub struct InMemoryAssignmentStore {
    state: Arc<Mutex<InMemoryStoreState>>,
    slot_capacity: SlotCapacity,
    clock: Arc<dyn Clock>,
    id_gen: Box<dyn IdGenerator>,
}

impl InMemoryAssignmentStore {
    /// Store using the capacity and removal policies of `config`, on the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryStoreState {
                index: AssignmentIndex::new(),
                slot_capacity: config.slot_capacity,
                removal: config.removal,
            })),
            slot_capacity: config.slot_capacity,
            id_gen: Box::new(UlidGenerator::new(Arc::clone(&clock))),
            clock,
        }
    }

    /// Observability hook.
    pub async fn counts_by_status(&self) -> StatusCounts {
        let state = self.state.lock().await;
        state.counts_by_status()
    }

    /// Total records held, any status.
    pub async fn len(&self) -> usize {
        self.state.lock().await.index.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    fn slot_capacity(&self) -> SlotCapacity {
        self.slot_capacity
    }

    async fn list_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RosterAssignment>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.index.in_range(start, end).into_iter().cloned().collect())
    }

    async fn assign(&self, request: NewAssignment) -> Result<RosterAssignment, StoreError> {
        let mut state = self.state.lock().await;
        state
            .check(&state.index, &request)
            .map_err(StoreError::Conflict)?;

        let record = RosterAssignment::new(
            self.id_gen.generate_assignment_id(),
            request,
            self.clock.now(),
        );
        state.index.insert(record.clone());
        Ok(record)
    }

    async fn remove(&self, id: AssignmentId) -> Result<RosterAssignment, StoreError> {
        let mut state = self.state.lock().await;
        let mut record = state.active_record(id)?;

        record.mark_cancelled(self.clock.now());
        match state.removal {
            RemovalPolicy::SoftCancel => state.index.insert(record.clone()),
            RemovalPolicy::HardDelete => {
                state.index.remove(id);
            }
        }
        Ok(record)
    }

    async fn complete(&self, id: AssignmentId) -> Result<RosterAssignment, StoreError> {
        let mut state = self.state.lock().await;
        let mut record = state.active_record(id)?;

        record.mark_completed(self.clock.now());
        state.index.insert(record.clone());
        Ok(record)
    }

    async fn copy_week(
        &self,
        source: WeekWindow,
        policy: CopyPolicy,
    ) -> Result<CopyResult, StoreError> {
        let target = source
            .next()
            .ok_or(StoreError::WeekOutOfRange(source.start()))?;
        let mut state = self.state.lock().await;
        let mut staged = state.index.clone();
        let now = self.clock.now();

        let mut result = plan_copy(
            source,
            target,
            state.index.in_range(source.start(), source.end()),
            &mut staged,
            state.slot_capacity,
            policy,
            |request| RosterAssignment::new(self.id_gen.generate_assignment_id(), request, now),
        );
        result.mark_authoritative();

        if result.wrote_anything() {
            state.index = staged;
        }
        Ok(result)
    }
}
