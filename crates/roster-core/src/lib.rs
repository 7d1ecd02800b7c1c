//! roster-core
//!
//! Weekly roster assignment engine: puts employees on machines within shifts
//! for a calendar week, enforces the uniqueness rules, explains conflicts, and
//! keeps a per-week cache in step with the authoritative store.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, week, assignment, policy, errors, index, validator, copy）
//! - **ports**: 抽象化レイヤー（AssignmentStore, Directory, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（builder, engine, mutator, sync）
//! - **impls**: 実装（InMemoryAssignmentStore, InMemoryDirectory）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, RosterEngine, RosterEngineBuilder, WeekView};
pub use domain::{
    AssignmentId, CopyPolicy, CopyResult, EmployeeId, EngineConfig, MachineId, NewAssignment,
    RemovalPolicy, RosterAssignment, RosterError, ShiftId, SlotCapacity, WeekWindow, week_of,
};
