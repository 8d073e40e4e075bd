//! Entity query layer.
//!
//! Reads the full extent of a mapped table through a [`DatabaseContext`]. Rows come
//! back as plain detached values: there is no identity map and no change tracking.

use common::errors::{AppError, AppResult};
use common::models::{EmployeeRecord, ProviderKind};
use oracle::sql_type::FromSql;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

use crate::context_factory::{ContextHandle, DatabaseContext, OracleTarget};

/// A record type mapped to one table and readable from every supported provider.
pub trait Entity:
    for<'r> FromRow<'r, MySqlRow> + for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static
{
    /// Table holding the records.
    const TABLE: &'static str;

    /// Maps one Oracle row; columns are matched by name, ignoring case.
    fn from_oracle_row(row: &oracle::Row) -> AppResult<Self>;
}

impl Entity for EmployeeRecord {
    const TABLE: &'static str = EmployeeRecord::TABLE;

    fn from_oracle_row(row: &oracle::Row) -> AppResult<Self> {
        // NUMBER is read as text to keep full decimal precision.
        let salary: String = oracle_column(row, "Salary")?;
        Ok(Self {
            emp_id: oracle_column(row, "EmpId")?,
            employee_name: oracle_column(row, "EmployeeName")?,
            department: oracle_column(row, "Department")?,
            position: oracle_column(row, "Position")?,
            hire_date: oracle_column(row, "HireDate")?,
            salary: salary
                .trim()
                .parse()
                .map_err(|e| AppError::QueryExecution(format!("Salary '{}': {}", salary, e)))?,
            email: oracle_column(row, "Email")?,
            phone_number: oracle_column(row, "PhoneNumber")?,
            address: oracle_column(row, "Address")?,
            status: oracle_column(row, "Status")?,
        })
    }
}

fn oracle_column<T: FromSql>(row: &oracle::Row, name: &str) -> AppResult<T> {
    let index = row
        .column_info()
        .iter()
        .position(|column| column.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::QueryExecution(format!("column '{}' not found", name)))?;
    row.get(index).map_err(oracle_error)
}

fn oracle_error(err: oracle::Error) -> AppError {
    AppError::QueryExecution(err.to_string())
}

/// Statement that selects every row of `T`'s table.
pub fn select_all_sql<T: Entity>(provider: ProviderKind) -> String {
    format!("SELECT * FROM {}", provider.quote_ident(T::TABLE))
}

/// Returns every row of `T`'s table, fully materialized.
///
/// Driver failures (connectivity, syntax, permissions) come back as
/// [`AppError::QueryExecution`](common::errors::AppError::QueryExecution).
pub async fn list_all<T: Entity>(ctx: &DatabaseContext) -> AppResult<Vec<T>> {
    let sql = select_all_sql::<T>(ctx.provider());

    let rows = match ctx.handle() {
        ContextHandle::MySql(pool) => sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?,
        ContextHandle::Postgres(pool) => sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?,
        ContextHandle::Oracle(target) => {
            let target = target.clone();
            let sql = sql.clone();
            tokio::task::spawn_blocking(move || fetch_oracle::<T>(&target, &sql))
                .await
                .map_err(|e| AppError::QueryExecution(e.to_string()))??
        }
    };

    tracing::debug!(profile = %ctx.profile(), table = T::TABLE, rows = rows.len(), "Entity list loaded");
    Ok(rows)
}

/// Runs `sql` on a fresh Oracle connection and closes it before returning.
fn fetch_oracle<T: Entity>(target: &OracleTarget, sql: &str) -> AppResult<Vec<T>> {
    let conn = target.connect().map_err(oracle_error)?;
    let rows = conn
        .query(sql, &[])
        .map_err(oracle_error)
        .and_then(|rows| {
            rows.map(|row| row.map_err(oracle_error).and_then(|row| T::from_oracle_row(&row)))
                .collect::<AppResult<Vec<T>>>()
        });

    if let Err(e) = conn.close() {
        tracing::warn!(connect_string = %target.connect_string, error = %e, "Failed to close Oracle connection");
    }
    rows
}
