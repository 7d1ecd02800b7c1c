//! Reference data: employees, machines and shifts.
//!
//! The engine never mutates these. They come from the directory collaborators
//! and are only used for pre-flight validation and for naming things in
//! conflict explanations.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::ids::{EmployeeId, MachineId, ShiftId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub display_name: String,
    pub employee_number: String,
    pub department: String,
    pub position: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Operational state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Active,
    Maintenance,
    Retired,
}

impl MachineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MachineStatus::Active => "active",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::Retired => "retired",
        }
    }

    /// Can people be rostered onto it?
    pub fn is_assignable(self) -> bool {
        matches!(self, MachineStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub code: String,
    pub name: String,
    pub machine_type: String,
    pub department: String,
    pub status: MachineStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Shift {
    /// Night shifts end on the following calendar day.
    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn night_shift_crosses_midnight() {
        let day = Shift {
            id: ShiftId::random(),
            name: "Day".into(),
            start_time: hm(8, 0),
            end_time: hm(16, 0),
        };
        let night = Shift {
            name: "Night".into(),
            start_time: hm(22, 0),
            end_time: hm(6, 0),
            ..day.clone()
        };
        assert!(!day.crosses_midnight());
        assert!(night.crosses_midnight());
    }

    #[test]
    fn only_active_machines_are_assignable() {
        assert!(MachineStatus::Active.is_assignable());
        assert!(!MachineStatus::Maintenance.is_assignable());
        assert!(!MachineStatus::Retired.is_assignable());
    }

    #[test]
    fn employee_active_defaults_to_true() {
        let json = serde_json::json!({
            "id": EmployeeId::random(),
            "display_name": "Aiko",
            "employee_number": "E-001",
            "department": "Press",
            "position": "Operator",
        });
        let employee: Employee = serde_json::from_value(json).unwrap();
        assert!(employee.active);
    }
}
