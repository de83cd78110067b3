// ==========================================
// 教学设计单校验引擎 - API 层
// ==========================================
// 职责: 提供校验与看板 API,供界面/流程控制器调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod ports;
pub mod validation_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use ports::{
    AllowAllPermissions, CompetencyProvider, ExamDataSource, PermissionChecker,
    StaticCompetencyProvider,
};
pub use validation_api::ValidationApi;
