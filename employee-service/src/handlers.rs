//! Handler模块

use std::time::Instant;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use common::middleware::RequestId;
use common::models::EmployeeRecord;
use common::response::ApiResponse;
use crate::service::EMPLOYEE_PROFILE;
use crate::state::AppState;

const LOG_CATEGORY: &str = "employee_service::handlers";

/// 成功时返回的提示信息
pub const EMPLOYEE_LIST_MESSAGE: &str = "Operation Succesfull";

/// 获取全部员工信息
///
/// 传输层始终返回 200，实际结果由响应体中的 `statusCode` 表示。
#[utoipa::path(
    get,
    path = "/api/Asel/GetEmployeeList",
    tag = "employees",
    responses(
        (status = 200, description = "员工列表（失败时 success 为 false）", body = ApiResponse<Vec<EmployeeRecord>>)
    )
)]
pub async fn get_employee_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<EmployeeRecord>>> {
    let logger = state.logger(LOG_CATEGORY);
    let _scope = logger.begin_scope_with([
        ("RequestId", request_id.as_str()),
        ("Profile", EMPLOYEE_PROFILE),
    ]);

    let started = Instant::now();
    let response = match state.employees.list().await {
        Ok(employees) => {
            logger.log_data_access("ListAll", "EmployeeRecord", "*", true);
            ApiResponse::success(employees, EMPLOYEE_LIST_MESSAGE, 200)
        }
        Err(e) => {
            logger.log_data_access("ListAll", "EmployeeRecord", "*", false);
            logger.error_with(&e, "Failed to retrieve employee list from {Profile}", &[json!(EMPLOYEE_PROFILE)]);
            ApiResponse::error(
                format!("An error occurred while retrieving employee list: {}", e),
                e.status_code(),
            )
        }
    };
    logger.log_performance("GetEmployeeList", started.elapsed(), None);

    Json(response)
}

/// 健康检查响应
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// 已配置的连接数量
    pub profiles: usize,
}

/// 健康检查
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务健康", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        profiles: state.profiles.len(),
    })
}
