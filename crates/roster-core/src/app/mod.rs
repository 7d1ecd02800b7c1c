//! App - アプリケーション層
//!
//! ports を組み合わせてエンジンを組み立てます。
//!
//! # 主要コンポーネント
//! - **RosterEngineBuilder**: 構築とワイヤリング
//! - **RosterEngine**: 呼び出し側に見せるコマンド/クエリ
//! - **AssignmentMutator**: create / remove / complete / copy_week
//! - **SyncController**: 週単位キャッシュの読み直し

pub mod builder;
pub mod engine;
pub mod mutator;
pub mod sync;

pub use self::builder::{BuildError, RosterEngineBuilder};
pub use self::engine::RosterEngine;
pub use self::mutator::AssignmentMutator;
pub use self::sync::{SyncController, WeekCache, WeekView};
