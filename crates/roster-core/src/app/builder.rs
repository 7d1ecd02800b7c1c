//! RosterEngineBuilder - エンジンの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - store と directory は必須。足りなければ build() が BuildError を返す
//! - config は省略可（デフォルト: Single / SoftCancel / AllOrNothing）
//! - clock は省略可（デフォルト: SystemClock）
//! - slot capacity は常に store の値を使う（config 側の値は上書きされる）

use std::sync::Arc;

use crate::domain::EngineConfig;
use crate::ports::{AssignmentStore, Clock, Directory, IdGenerator, SystemClock, UlidGenerator};

use super::engine::RosterEngine;
use super::mutator::AssignmentMutator;
use super::sync::SyncController;

/// # 使用例
/// ```ignore
/// let engine = RosterEngineBuilder::new()
///     .store(Arc::new(InMemoryAssignmentStore::new(config)))
///     .directory(Arc::new(directory))
///     .config(config)
///     .build()?;
/// ```
///
/// store 側の slot capacity / removal は store 自身の設定が正です。
/// ここで渡す config は copy_week の方針に使います。
#[derive(Default)]
pub struct RosterEngineBuilder {
    store: Option<Arc<dyn AssignmentStore>>,
    directory: Option<Arc<dyn Directory>>,
    clock: Option<Arc<dyn Clock>>,
    draft_ids: Option<Arc<dyn IdGenerator>>,
    config: EngineConfig,
}

/// BuildError はエンジン構築時のエラー
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("no assignment store was configured")]
    MissingStore,

    #[error("no directory was configured")]
    MissingDirectory,
}

impl RosterEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn AssignmentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Ids for copy-week dry runs. Defaults to ULIDs on the engine clock.
    pub fn draft_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.draft_ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<RosterEngine, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let directory = self.directory.ok_or(BuildError::MissingDirectory)?;
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let draft_ids: Arc<dyn IdGenerator> = match self.draft_ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(Arc::clone(&clock))),
        };

        let slot_capacity = store.slot_capacity();
        if slot_capacity != self.config.slot_capacity {
            tracing::warn!(
                configured = ?self.config.slot_capacity,
                store = ?slot_capacity,
                "slot capacity taken from the store"
            );
        }
        let config = self.config.with_slot_capacity(slot_capacity);

        let sync = Arc::new(SyncController::new(Arc::clone(&store)));
        let mutator = AssignmentMutator::new(
            store,
            Arc::clone(&directory),
            Arc::clone(&sync),
            clock,
            draft_ids,
            config,
        );
        Ok(RosterEngine::new(mutator, sync, directory))
    }
}
