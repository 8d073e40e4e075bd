//! 员工信息服务
//!
//! 提供员工信息查询功能，包括：
//! - 按名称选择数据库连接配置并动态创建数据库上下文
//! - 员工列表查询，统一响应封装
//! - 结构化日志

mod connection_string;
mod context_factory;
mod handlers;
mod query;
mod routes;
mod service;
mod state;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use common::config::{AppConfig, AppSettings};
use common::middleware::request_id::request_id_middleware;
use serde_json::json;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "employee-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "员工服务 API",
        version = "0.1.0",
        description = "员工信息查询微服务"
    ),
    paths(
        handlers::get_employee_list,
        handlers::health_check,
    ),
    components(schemas(
        common::models::EmployeeRecord,
        handlers::HealthResponse,
    )),
    tags(
        (name = "employees", description = "员工信息端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 文件可选
    dotenvy::dotenv().ok();

    init_tracing();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);
    let settings = AppSettings::load(&config.settings_path)
        .with_context(|| format!("加载配置文件失败: {}", config.settings_path))?;

    // 创建应用状态
    let state = AppState::new(config.clone(), &settings).context("初始化应用状态失败")?;
    state.logger(SERVICE_NAME).log_system_event(
        "Startup",
        SERVICE_NAME,
        Some(json!({ "profiles": state.profiles.names() })),
    );

    // 创建路由
    let app = create_router(state);

    // 启动服务
    let addr = format!("{}:{}", config.host, config.port);
    info!(service = SERVICE_NAME, address = %addr, "启动服务");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    axum::serve(listener, app).await.context("服务运行失败")?;

    Ok(())
}

/// `LOG_FORMAT=json` 时输出 JSON 日志
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_employee_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/Asel/GetEmployeeList"));
        assert!(doc.paths.paths.contains_key("/api/health"));
    }
}
