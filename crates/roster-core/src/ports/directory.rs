//! Directory port - 社員・設備・シフトのマスタ参照
//!
//! 読み取り専用です。エンジンは事前検証と、Conflict の説明文に名前を入れるためにだけ使います。

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeId, Machine, MachineId, Shift, ShiftId};

#[async_trait]
pub trait Directory: Send + Sync {
    async fn employee(&self, id: EmployeeId) -> Option<Employee>;

    async fn machine(&self, id: MachineId) -> Option<Machine>;

    async fn shift(&self, id: ShiftId) -> Option<Shift>;

    async fn active_employees(&self) -> Vec<Employee>;

    async fn active_machines(&self) -> Vec<Machine>;

    async fn shifts(&self) -> Vec<Shift>;
}
