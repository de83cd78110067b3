// ==========================================
// 教学设计单校验引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod analysis;
pub mod assessment;
pub mod fiche;
pub mod report;
pub mod stats;
pub mod types;
pub mod workflow;

// 重导出核心类型
pub use analysis::{
    ActivityAnalysis, CompetenceAnalysis, PedagogicalAnalysis, RuleOutcome, ValidationResult,
};
pub use assessment::{
    Assessment, AssessmentAnalysis, AssessmentCriterion, Competency, CompetencyCoverage,
    CriterionCorrelation, Grade, SyncAlert, SyncStatus,
};
pub use fiche::{Activity, Competence, Evaluation, Fiche, Material, Objective};
pub use report::{ReportFormat, ReportKind, ReportOptions, ReportProgress, ReportStatus};
pub use stats::{AdministrativeReport, FicheStats, PedagogicalDistribution, ProgressTrend};
pub use types::{
    AlertSeverity, CompetenceType, EvaluationType, TrendDirection, ValidationStatus,
    WorkflowStatus,
};
pub use workflow::{ValidationWorkflow, WorkflowHistoryEntry, WorkflowNotification};
