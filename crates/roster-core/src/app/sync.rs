//! SyncController - 週単位のローカルキャッシュ
//!
//! # 方針
//! - キャッシュは週（月曜日）ごとに丸ごと持つ
//! - 書き込みが成功したら、その週を捨てて store から全件読み直す（差分パッチはしない）
//! - 書き込みが失敗したら、その週を捨てるだけ（次の読み込みで取り直す）
//!
//! 読み直しと他の書き込みの間には競合の窓があります。そこは store の一意性チェックが守ります。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::domain::{AssignmentId, AssignmentIndex, RosterAssignment, RosterError, WeekWindow};
use crate::ports::AssignmentStore;

/// One week's assignments as last read from the store.
#[derive(Debug, Clone)]
pub struct WeekCache {
    week: WeekWindow,
    index: AssignmentIndex,
}

impl WeekCache {
    pub fn new(week: WeekWindow, records: Vec<RosterAssignment>) -> Self {
        Self {
            week,
            index: AssignmentIndex::from_records(records),
        }
    }

    pub fn week(&self) -> WeekWindow {
        self.week
    }

    pub fn index(&self) -> &AssignmentIndex {
        &self.index
    }

    pub fn holds(&self, id: AssignmentId) -> bool {
        self.index.get(id).is_some()
    }

    /// Records of any status, by date then id.
    pub fn assignments(&self) -> Vec<RosterAssignment> {
        self.index
            .in_range(self.week.start(), self.week.end())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn view(&self) -> WeekView {
        WeekView {
            week_dates: self.week.dates(),
            assignments: self.assignments(),
        }
    }
}

/// What `list_week` hands back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub week_dates: [NaiveDate; 7],
    pub assignments: Vec<RosterAssignment>,
}

impl WeekView {
    pub fn active(&self) -> impl Iterator<Item = &RosterAssignment> {
        self.assignments.iter().filter(|a| a.is_active())
    }

    /// Assignments dated `date`, any status.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &RosterAssignment> {
        self.assignments.iter().filter(move |a| a.date == date)
    }
}

pub struct SyncController {
    store: Arc<dyn AssignmentStore>,
    caches: RwLock<HashMap<NaiveDate, Arc<WeekCache>>>,
}

impl SyncController {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            store,
            caches: RwLock::new(HashMap::new()),
        }
    }

    /// Cached week if present, otherwise fetched from the store.
    pub async fn load_week(&self, week: WeekWindow) -> Result<Arc<WeekCache>, RosterError> {
        if let Some(cache) = self.cached(week).await {
            return Ok(cache);
        }
        self.refresh(week).await
    }

    /// Drop whatever is cached for `week` and read it again in full.
    pub async fn refresh(&self, week: WeekWindow) -> Result<Arc<WeekCache>, RosterError> {
        self.invalidate(week).await;

        let records = self.store.list_range(week.start(), week.end()).await?;
        tracing::debug!(week_start = %week.start(), records = records.len(), "week reloaded");

        let cache = Arc::new(WeekCache::new(week, records));
        self.caches
            .write()
            .await
            .insert(week.start(), Arc::clone(&cache));
        Ok(cache)
    }

    /// Forget a week. The next read goes to the store.
    pub async fn invalidate(&self, week: WeekWindow) {
        self.caches.write().await.remove(&week.start());
    }

    /// Forget every cached week that knows about `id`.
    pub async fn invalidate_holding(&self, id: AssignmentId) {
        self.caches.write().await.retain(|_, cache| !cache.holds(id));
    }

    pub async fn cached(&self, week: WeekWindow) -> Option<Arc<WeekCache>> {
        self.caches.read().await.get(&week.start()).cloned()
    }

    pub async fn cached_weeks(&self) -> Vec<WeekWindow> {
        let mut weeks: Vec<WeekWindow> =
            self.caches.read().await.values().map(|c| c.week()).collect();
        weeks.sort();
        weeks
    }
}
