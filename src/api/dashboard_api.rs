// ==========================================
// 教学设计单校验引擎 - 看板 API
// ==========================================
// 职责: 语料统计 / 趋势 / 报表生成 / 考试集成状态与告警
// 架构: API 层 → CorpusAggregator / ReportService / ExamsIntegrationService
// 说明: 统计对象字段名即看板契约
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::ports::ExamDataSource;
use crate::config::EngineThresholds;
use crate::domain::analysis::ValidationResult;
use crate::domain::assessment::{AssessmentAnalysis, SyncAlert, SyncStatus};
use crate::domain::fiche::Fiche;
use crate::domain::report::{ReportOptions, ReportProgress};
use crate::domain::stats::{
    AdministrativeReport, FicheStats, PedagogicalDistribution, ProgressTrend,
};
use crate::engine::analytics::CorpusAggregator;
use crate::engine::exams::ExamsIntegrationService;
use crate::engine::report::ReportService;
use std::sync::Arc;
use tokio::task::JoinHandle;

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    aggregator: CorpusAggregator,
    reports: ReportService,
    exams: Arc<ExamsIntegrationService>,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    ///
    /// # 参数
    /// - thresholds: 引擎阈值
    /// - exams: 考试集成服务（与其他调用方共享）
    pub fn new(thresholds: EngineThresholds, exams: Arc<ExamsIntegrationService>) -> Self {
        Self {
            aggregator: CorpusAggregator::new(thresholds.clone()),
            reports: ReportService::new(thresholds),
            exams,
        }
    }

    /// 使用自定义报表服务（如替换渲染器）
    pub fn with_report_service(mut self, reports: ReportService) -> Self {
        self.reports = reports;
        self
    }

    // ==========================================
    // 语料统计
    // ==========================================

    pub fn fiche_stats(&self, fiches: &[Fiche], validations: &[ValidationResult]) -> FicheStats {
        self.aggregator.fiche_stats(fiches, validations)
    }

    pub fn pedagogical_distribution(&self, fiches: &[Fiche]) -> PedagogicalDistribution {
        self.aggregator.pedagogical_distribution(fiches)
    }

    pub fn administrative_report(
        &self,
        fiches: &[Fiche],
        validations: &[ValidationResult],
    ) -> AdministrativeReport {
        self.aggregator.administrative_report(fiches, validations)
    }

    /// 校验得分趋势（按校验时间）
    pub fn score_trends(&self, validations: &[ValidationResult]) -> Vec<ProgressTrend> {
        self.aggregator.score_trends(validations)
    }

    /// 任意得分序列的趋势
    pub fn calculate_trends(&self, scores: &[f64]) -> Vec<ProgressTrend> {
        self.aggregator.calculate_trends(scores)
    }

    // ==========================================
    // 报表
    // ==========================================

    /// 后台生成报表,返回 report_id 供轮询
    pub async fn generate_report(
        &self,
        options: ReportOptions,
        fiches: Vec<Fiche>,
        validations: Vec<ValidationResult>,
    ) -> (String, JoinHandle<ReportProgress>) {
        self.reports
            .generate_report(options, fiches, validations)
            .await
    }

    /// 查询报表进度
    ///
    /// # 返回
    /// - Err(NotFound): report_id 不存在
    pub async fn get_report_progress(&self, report_id: &str) -> ApiResult<ReportProgress> {
        if report_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("报表ID不能为空".to_string()));
        }
        self.reports
            .get_progress(report_id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Report(id={})不存在", report_id)))
    }

    pub async fn list_reports(&self) -> Vec<ReportProgress> {
        self.reports.list_reports().await
    }

    /// 删除报表记录（取走结果后释放）
    ///
    /// # 返回
    /// - Err(NotFound): report_id 不存在
    pub async fn remove_report(&self, report_id: &str) -> ApiResult<ReportProgress> {
        self.reports
            .remove_report(report_id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Report(id={})不存在", report_id)))
    }

    // ==========================================
    // 考试集成
    // ==========================================

    /// 与考试系统同步; 失败时告警已记录,同时返回 ExternalSync
    pub async fn sync_exams(&self, source: &dyn ExamDataSource) -> ApiResult<SyncStatus> {
        Ok(self.exams.sync_from(source).await?)
    }

    pub fn get_status(&self) -> ApiResult<SyncStatus> {
        Ok(self.exams.get_status()?)
    }

    pub fn get_alerts(&self) -> ApiResult<Vec<SyncAlert>> {
        Ok(self.exams.get_alerts()?)
    }

    pub fn analyze_assessment(&self, assessment_id: &str) -> ApiResult<AssessmentAnalysis> {
        Ok(self.exams.analyze_assessment(assessment_id)?)
    }

    pub fn student_progress(&self, student_id: &str) -> ApiResult<Vec<ProgressTrend>> {
        Ok(self.exams.student_progress(student_id)?)
    }
}
