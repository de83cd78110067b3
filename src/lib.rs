// ==========================================
// 教学设计单校验引擎 - 核心库
// ==========================================
// 职责: 教学设计单 (fiche pédagogique) 结构/教学法校验、规则评分、
//       审核流程、语料统计与报表
// 系统定位: 决策支持 (最终结论由人工确认)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 阈值配置
pub mod config;

// 数据库基础设施（配置存储连接初始化）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, CompetenceType, EvaluationType, TrendDirection, ValidationStatus,
    WorkflowStatus,
};

// 领域实体
pub use domain::{
    AdministrativeReport, Fiche, FicheStats, PedagogicalDistribution, ProgressTrend,
    ReportOptions, ReportProgress, ReportStatus, ValidationResult, ValidationWorkflow,
};

// 引擎
pub use engine::{
    CorpusAggregator, ExamsIntegrationService, FicheValidationService, PedagogicalAnalyzer,
    ReportService, RuleEngine, StructuralAnalyzer, WorkflowEngine,
};

// 配置
pub use config::{ConfigManager, EngineConfigReader, EngineThresholds};

// API
pub use api::{ApiError, ApiResult, DashboardApi, ValidationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "fiche-engine";
