//! 员工信息服务模块

use std::sync::Arc;

use async_trait::async_trait;

use common::errors::AppResult;
use common::models::EmployeeRecord;
use crate::context_factory::DbContextFactory;
use crate::query;

/// 员工信息所在的连接配置名称
pub const EMPLOYEE_PROFILE: &str = "TPCInformationDB";

/// 员工服务 Trait
#[async_trait]
pub trait EmployeeServiceTrait: Send + Sync {
    /// 列出所有员工
    async fn list(&self) -> AppResult<Vec<EmployeeRecord>>;
}

/// 员工信息服务
pub struct EmployeeService {
    factory: Arc<DbContextFactory>,
    profile: String,
}

impl EmployeeService {
    /// 创建新的员工服务实例
    pub fn new(factory: Arc<DbContextFactory>) -> Self {
        Self::with_profile(factory, EMPLOYEE_PROFILE)
    }

    /// 使用指定的连接配置创建服务实例
    pub fn with_profile(factory: Arc<DbContextFactory>, profile: impl Into<String>) -> Self {
        Self {
            factory,
            profile: profile.into(),
        }
    }
}

#[async_trait]
impl EmployeeServiceTrait for EmployeeService {
    async fn list(&self) -> AppResult<Vec<EmployeeRecord>> {
        let ctx = self.factory.create_context(&self.profile)?;

        // 先取结果再关闭上下文，成功与失败都会释放连接
        let result = query::list_all::<EmployeeRecord>(&ctx).await;
        ctx.close().await;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use common::config::ConnectionProfileStore;
    use common::errors::AppError;
    use common::models::ConnectionProfile;
    use crate::context_factory::ContextSettings;

    fn factory_with(provider: &str) -> Arc<DbContextFactory> {
        factory_for(provider, "Server=db.invalid;Database=tpc")
    }

    fn factory_for(provider: &str, connection_string: &str) -> Arc<DbContextFactory> {
        let store = ConnectionProfileStore::from_profiles([ConnectionProfile {
            name: EMPLOYEE_PROFILE.into(),
            provider: provider.into(),
            connection_string: connection_string.into(),
        }]);
        let settings = ContextSettings {
            acquire_timeout: Duration::from_millis(500),
        };
        Arc::new(DbContextFactory::new(Arc::new(store), settings))
    }

    #[tokio::test]
    async fn test_unsupported_provider_surfaces_before_any_query() {
        let service = EmployeeService::new(factory_with("sqlserver"));
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedProvider(_)));
    }

    #[tokio::test]
    async fn test_missing_profile_is_reported() {
        let service = EmployeeService::with_profile(factory_with("MySQL"), "Payroll");
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationAbsent(name) if name == "Payroll"));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_query_execution() {
        let service = EmployeeService::new(factory_for(
            "MySQL",
            "Server=127.0.0.1;Port=1;Database=tpc;Uid=app;Pwd=pw",
        ));
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::QueryExecution(_)));
        assert_eq!(err.status_code(), 500);
    }
}
