use super::entities::Department;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 部门列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct DepartmentListResponse {
    pub items: Vec<Department>,
    pub pagination: PaginationInfo,
}
