//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（assignment の永続化、マスタ参照、時刻、ID 発行）への
//! インターフェースです。実装は `impls` に置きます。
//!
//! # 設計原則
//! - AssignmentStore が source of truth（正本）
//! - ローカルキャッシュは書き込みのたびに store から丸ごと読み直す

pub mod assignment_store;
pub mod clock;
pub mod directory;
pub mod id_generator;

pub use self::assignment_store::{AssignmentStore, StoreError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::directory::Directory;
pub use self::id_generator::{IdGenerator, UlidGenerator};
