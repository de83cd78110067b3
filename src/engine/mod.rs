// ==========================================
// 教学设计单校验引擎 - 引擎层
// ==========================================
// 职责: 结构分析 / 教学法分析 / 规则 / 审核流程 / 语料聚合 / 考试集成 / 报表
// 红线: 单份校验为纯函数,不读写共享可变状态
// 红线: 所有失败都给出可读原因
// ==========================================

pub mod analytics;
pub mod exams;
pub mod pedagogy;
pub mod report;
pub mod rules;
pub mod structure;
pub mod validation;
pub mod workflow;

// 重导出核心引擎
pub use analytics::{calculate_trends_with_window, CorpusAggregator};
pub use exams::{ExamsError, ExamsIntegrationService, ExamsResult};
pub use pedagogy::PedagogicalAnalyzer;
pub use report::{ReportData, ReportRenderer, ReportService, StandardReportRenderer};
pub use rules::{RuleDescriptor, RuleEngine, RuleError, RuleInfo, RuleReport};
pub use structure::StructuralAnalyzer;
pub use validation::FicheValidationService;
pub use workflow::{next_status, WorkflowEngine, WorkflowError};

/// panic 负载转为可读文本（规则/渲染器崩溃时记录原因）
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
