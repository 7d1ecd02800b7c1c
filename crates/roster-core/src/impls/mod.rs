//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryAssignmentStore**: 開発用の正本
//! - **InMemoryDirectory**: 開発用のマスタ参照
//!
//! 本番用の実装（REST クライアントや DB）は別クレートに置く想定です。

pub mod inmem_directory;
pub mod inmem_store;

pub use self::inmem_directory::InMemoryDirectory;
pub use self::inmem_store::{InMemoryAssignmentStore, StatusCounts};
