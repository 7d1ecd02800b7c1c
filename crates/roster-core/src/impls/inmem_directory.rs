//! InMemoryDirectory - 開発用のマスタ参照
//!
//! 起動時に組み立てて、その後は読み取り専用で使います（ロック不要）。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeId, Machine, MachineId, Shift, ShiftId};
use crate::ports::Directory;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    employees: HashMap<EmployeeId, Employee>,
    machines: HashMap<MachineId, Machine>,
    shifts: HashMap<ShiftId, Shift>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.insert(employee.id, employee);
        self
    }

    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machines.insert(machine.id, machine);
        self
    }

    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.insert(shift.id, shift);
        self
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn employee(&self, id: EmployeeId) -> Option<Employee> {
        self.employees.get(&id).cloned()
    }

    async fn machine(&self, id: MachineId) -> Option<Machine> {
        self.machines.get(&id).cloned()
    }

    async fn shift(&self, id: ShiftId) -> Option<Shift> {
        self.shifts.get(&id).cloned()
    }

    async fn active_employees(&self) -> Vec<Employee> {
        let mut found: Vec<Employee> =
            self.employees.values().filter(|e| e.active).cloned().collect();
        found.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
        found
    }

    async fn active_machines(&self) -> Vec<Machine> {
        let mut found: Vec<Machine> = self
            .machines
            .values()
            .filter(|m| m.status.is_assignable())
            .cloned()
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        found
    }

    async fn shifts(&self) -> Vec<Shift> {
        let mut found: Vec<Shift> = self.shifts.values().cloned().collect();
        found.sort_by_key(|s| s.start_time);
        found
    }
}
