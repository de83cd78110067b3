// ==========================================
// 教学设计单校验引擎 - 报表生成服务
// ==========================================
// 生命周期: 创建记录(PENDING) → 任务开始(GENERATING) → 聚合 → 渲染 → READY | ERROR
// 进度表: report_id → ReportProgress,按 id 原子更新; 超出上限时淘汰最早的已结束记录
// ==========================================
// 红线: 生成失败（含渲染器 panic）只体现为 ERROR 记录,不向调用方抛错
// 红线: 每次请求生成新 id,并发请求互不覆盖
// ==========================================


use crate::config::EngineThresholds;
use crate::domain::analysis::ValidationResult;
use crate::domain::fiche::Fiche;
use crate::domain::report::{ReportFormat, ReportKind, ReportOptions, ReportProgress, ReportStatus};
use crate::domain::stats::{AdministrativeReport, FicheStats, PedagogicalDistribution};
use crate::engine::analytics::{flatten_counts, CorpusAggregator};
use crate::engine::panic_message;
use crate::i18n::{t, t_with_args};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// 聚合阶段完成时的进度
const PROGRESS_COLLECTED: u8 = 50;

/// 进度表默认保留的记录数
pub const DEFAULT_MAX_REPORTS: usize = 256;

// ==========================================
// 报表数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiche_stats: Option<FicheStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedagogical_distribution: Option<PedagogicalDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative: Option<AdministrativeReport>,
}

// ==========================================
// ReportRenderer - 渲染器
// ==========================================
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, options: &ReportOptions, data: &ReportData) -> anyhow::Result<String>;
}

/// 默认渲染器: JSON（serde_json）/ CSV（section,key,value 三列）
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReportRenderer;

#[async_trait]
impl ReportRenderer for StandardReportRenderer {
    async fn render(&self, options: &ReportOptions, data: &ReportData) -> anyhow::Result<String> {
        match options.format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(data)?),
            ReportFormat::Csv => render_csv(data),
        }
    }
}

fn render_csv(data: &ReportData) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["section", "key", "value"])?;
    writer.write_record(["report", "title", data.title.as_str()])?;
    writer.write_record(["report", "generated_at", data.generated_at.to_rfc3339().as_str()])?;

    if let Some(stats) = &data.fiche_stats {
        let mut rows = vec![
            ("total".to_string(), stats.total.to_string()),
            (
                "average_validation_time".to_string(),
                format!("{:.0}", stats.average_validation_time),
            ),
            ("average_score".to_string(), format!("{:.2}", stats.average_score)),
        ];
        rows.extend(flatten_counts("by_teacher", &stats.by_teacher));
        rows.extend(flatten_counts("by_subject", &stats.by_subject));
        rows.extend(flatten_counts("by_level", &stats.by_level));
        rows.extend(flatten_counts("by_status", &stats.by_status));
        for (key, value) in rows {
            writer.write_record(["fiche_stats", key.as_str(), value.as_str()])?;
        }
    }

    if let Some(distribution) = &data.pedagogical_distribution {
        let mut rows = vec![(
            "progression_quality".to_string(),
            format!("{:.3}", distribution.progression_quality),
        )];
        rows.extend(flatten_counts("competence_types", &distribution.competence_types));
        rows.extend(flatten_counts(
            "teaching_strategies",
            &distribution.teaching_strategies,
        ));
        rows.extend(flatten_counts(
            "evaluation_methods",
            &distribution.evaluation_methods,
        ));
        rows.extend(distribution.gaps.iter().map(|g| ("gap".to_string(), g.clone())));
        for (key, value) in rows {
            writer.write_record(["pedagogical_distribution", key.as_str(), value.as_str()])?;
        }
    }

    if let Some(admin) = &data.administrative {
        let mut rows = vec![
            (
                "preparation_rate".to_string(),
                format!("{:.1}", admin.preparation_rate),
            ),
            (
                "program_compliance".to_string(),
                format!("{:.1}", admin.program_compliance),
            ),
            (
                "average_pedagogical_quality".to_string(),
                format!("{:.2}", admin.average_pedagogical_quality),
            ),
        ];
        rows.extend(admin.training_needs.iter().map(|m| ("training_need".to_string(), m.clone())));
        rows.extend(admin.strengths.iter().map(|m| ("strength".to_string(), m.clone())));
        rows.extend(
            admin
                .areas_for_improvement
                .iter()
                .map(|m| ("area_for_improvement".to_string(), m.clone())),
        );
        for (key, value) in rows {
            writer.write_record(["administrative", key.as_str(), value.as_str()])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV 写入失败: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

// ==========================================
// ReportService - 报表生成服务
// ==========================================
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<RwLock<HashMap<String, ReportProgress>>>,
    renderer: Arc<dyn ReportRenderer>,
    aggregator: CorpusAggregator,
    max_reports: usize,
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new(EngineThresholds::default())
    }
}

impl ReportService {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self::with_renderer(thresholds, Arc::new(StandardReportRenderer))
    }

    pub fn with_renderer(thresholds: EngineThresholds, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
            renderer,
            aggregator: CorpusAggregator::new(thresholds),
            max_reports: DEFAULT_MAX_REPORTS,
        }
    }

    /// 设置进度表保留上限（至少 1）
    pub fn with_max_reports(mut self, max_reports: usize) -> Self {
        self.max_reports = max_reports.max(1);
        self
    }

    /// 后台生成报表
    ///
    /// # 返回
    /// - report_id: 立即可用于轮询
    /// - JoinHandle: 可 await 最终记录; abort 即取消
    pub async fn generate_report(
        &self,
        options: ReportOptions,
        fiches: Vec<Fiche>,
        validations: Vec<ValidationResult>,
    ) -> (String, JoinHandle<ReportProgress>) {
        let record = self.create_record(&options).await;
        let report_id = record.report_id.clone();

        let service = self.clone();
        let handle = tokio::spawn(async move {
            service
                .execute(record, &options, &fiches, &validations)
                .await
        });

        (report_id, handle)
    }

    /// 在当前任务内生成报表并返回最终记录
    pub async fn run_report(
        &self,
        options: ReportOptions,
        fiches: &[Fiche],
        validations: &[ValidationResult],
    ) -> ReportProgress {
        let record = self.create_record(&options).await;
        self.execute(record, &options, fiches, validations).await
    }

    pub async fn get_progress(&self, report_id: &str) -> Option<ReportProgress> {
        self.reports.read().await.get(report_id).cloned()
    }

    /// 全部记录（按创建时间）
    pub async fn list_reports(&self) -> Vec<ReportProgress> {
        let mut reports: Vec<ReportProgress> = self.reports.read().await.values().cloned().collect();
        reports.sort_by_key(|r| r.created_at);
        reports
    }

    /// 删除一条记录（调用方取走结果后释放）
    pub async fn remove_report(&self, report_id: &str) -> Option<ReportProgress> {
        let removed = self.reports.write().await.remove(report_id);
        if removed.is_some() {
            tracing::debug!(report_id, "报表记录已删除");
        }
        removed
    }

    // ==========================================
    // 内部流程
    // ==========================================

    async fn create_record(&self, options: &ReportOptions) -> ReportProgress {
        let now = Utc::now();
        let record = ReportProgress {
            report_id: Uuid::new_v4().to_string(),
            status: ReportStatus::Pending,
            progress: 0,
            message: None,
            content: None,
            options: options.clone(),
            created_at: now,
            updated_at: now,
        };
        {
            let mut reports = self.reports.write().await;
            evict_finished(&mut reports, self.max_reports.saturating_sub(1));
            reports.insert(record.report_id.clone(), record.clone());
        }
        tracing::info!(report_id = %record.report_id, kind = ?options.kind, "报表已登记");
        record
    }

    async fn store(&self, record: &ReportProgress) {
        self.reports
            .write()
            .await
            .insert(record.report_id.clone(), record.clone());
    }

    async fn execute(
        &self,
        mut record: ReportProgress,
        options: &ReportOptions,
        fiches: &[Fiche],
        validations: &[ValidationResult],
    ) -> ReportProgress {
        record.status = ReportStatus::Generating;
        record.updated_at = Utc::now();
        self.store(&record).await;
        tracing::info!(report_id = %record.report_id, "报表生成开始");

        let data = self.collect(options, fiches, validations);
        record.progress = PROGRESS_COLLECTED;
        record.updated_at = Utc::now();
        self.store(&record).await;
        tracing::debug!(report_id = %record.report_id, progress = record.progress, "报表数据聚合完成");

        let rendered = AssertUnwindSafe(self.renderer.render(options, &data))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!(
                    "renderer panicked: {}",
                    panic_message(payload.as_ref())
                ))
            });

        match rendered {
            Ok(content) => {
                record.status = ReportStatus::Ready;
                record.progress = 100;
                record.message = Some(t("report.ready"));
                record.content = Some(content);
                tracing::info!(report_id = %record.report_id, "报表生成完成");
            }
            Err(e) => {
                let error = format!("{:#}", e);
                record.status = ReportStatus::Error;
                record.message = Some(t_with_args("report.failed", &[("error", &error)]));
                tracing::error!(report_id = %record.report_id, error = %error, "报表生成失败");
            }
        }

        record.updated_at = Utc::now();
        self.store(&record).await;
        record
    }

    fn collect(
        &self,
        options: &ReportOptions,
        fiches: &[Fiche],
        validations: &[ValidationResult],
    ) -> ReportData {
        let with_stats = matches!(options.kind, ReportKind::FicheStats | ReportKind::Full);
        let with_distribution = matches!(
            options.kind,
            ReportKind::PedagogicalDistribution | ReportKind::Full
        );
        let with_admin = matches!(options.kind, ReportKind::Administrative | ReportKind::Full);

        ReportData {
            title: options
                .title
                .clone()
                .unwrap_or_else(|| format!("{:?}", options.kind)),
            generated_at: Utc::now(),
            fiche_stats: with_stats.then(|| self.aggregator.fiche_stats(fiches, validations)),
            pedagogical_distribution: with_distribution
                .then(|| self.aggregator.pedagogical_distribution(fiches)),
            administrative: with_admin
                .then(|| self.aggregator.administrative_report(fiches, validations)),
        }
    }
}

/// 淘汰最早的已结束记录,直到记录数不超过 keep; 未结束的记录不淘汰
fn evict_finished(reports: &mut HashMap<String, ReportProgress>, keep: usize) {
    while reports.len() > keep {
        let oldest = reports
            .values()
            .filter(|r| r.status.is_finished())
            .min_by_key(|r| r.updated_at)
            .map(|r| r.report_id.clone());
        match oldest {
            Some(id) => {
                reports.remove(&id);
                tracing::debug!(report_id = %id, "淘汰已结束的报表记录");
            }
            None => break,
        }
    }
}
