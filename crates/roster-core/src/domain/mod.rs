//! Domain model (ids, week math, assignments, policies, errors, index).
//!
//! I/O を持たない純粋なモデルだけを置きます。

pub mod assignment;
pub mod copy;
pub mod errors;
pub mod ids;
pub mod index;
pub mod policy;
pub mod reference;
pub mod validator;
pub mod week;

pub use assignment::{
    AssignmentStatus, EmployeeWeekKey, MAX_NOTES_LEN, NewAssignment, RosterAssignment, SlotKey,
};
pub use copy::{CopyItem, CopyOutcome, CopyResult, plan_copy};
pub use errors::{Conflict, ConflictContext, ConflictKind, RosterError, ValidationError};
pub use ids::{AssignmentId, EmployeeId, IdParseError, MachineId, ShiftId};
pub use index::AssignmentIndex;
pub use policy::{CopyPolicy, EngineConfig, RemovalPolicy, SlotCapacity};
pub use reference::{Employee, Machine, MachineStatus, Shift};
pub use validator::ConflictValidator;
pub use week::{WeekWindow, week_of, week_start_of};
