//! Employee record model.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of `tblempinformation`.
///
/// The table has no mapped key: rows are read as detached values and are never
/// tracked or written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct EmployeeRecord {
    pub emp_id: i32,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: NaiveDateTime,
    #[schema(value_type = f64)]
    pub salary: Decimal,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    /// Free-form status text such as "Active" or "Inactive".
    pub status: Option<String>,
}

impl EmployeeRecord {
    /// Table the record is read from.
    pub const TABLE: &'static str = "tblempinformation";
}
