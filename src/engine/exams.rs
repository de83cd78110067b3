// ==========================================
// 教学设计单校验引擎 - 考试集成服务
// ==========================================
// 职责: 持有考试/成绩/告警存储,提供同步与分析
// 存储: 服务实例自有,RwLock 保护（仅追加/读取）
// ==========================================
// 红线: 同步失败既记录告警,也返回错误给调用方
// 红线: 持锁期间不跨 await
// ==========================================

mod statistics;


pub use statistics::{median, pearson};

use crate::api::ports::ExamDataSource;
use crate::config::EngineThresholds;
use crate::domain::assessment::{
    Assessment, AssessmentAnalysis, Competency, CompetencyCoverage, CriterionCorrelation, Grade,
    SyncAlert, SyncStatus,
};
use crate::domain::stats::ProgressTrend;
use crate::domain::types::AlertSeverity;
use crate::engine::analytics::calculate_trends_with_window;
use crate::i18n::{t, t_with_args};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use uuid::Uuid;

/// 考试集成错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExamsError {
    #[error("存储锁获取失败: {0}")]
    LockError(String),

    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("考试系统同步失败: {0}")]
    SyncFailed(String),
}

pub type ExamsResult<T> = Result<T, ExamsError>;

/// 服务自有存储
#[derive(Debug, Default)]
struct ExamStore {
    assessments: Vec<Assessment>,
    grades: Vec<Grade>,
    alerts: Vec<SyncAlert>,
    last_sync_at: Option<DateTime<Utc>>,
    last_sync_ok: Option<bool>,
}

impl ExamStore {
    fn upsert_assessment(&mut self, assessment: Assessment) {
        match self.assessments.iter_mut().find(|a| a.id == assessment.id) {
            Some(existing) => *existing = assessment,
            None => self.assessments.push(assessment),
        }
    }

    /// 写入成绩; 返回 (写入数, 孤立成绩数)
    fn merge_grades(&mut self, grades: Vec<Grade>) -> (usize, usize) {
        let mut accepted = 0;
        let mut orphans = 0;
        for grade in grades {
            if !self.assessments.iter().any(|a| a.id == grade.assessment_id) {
                orphans += 1;
                continue;
            }
            match self.grades.iter_mut().find(|g| g.id == grade.id) {
                Some(existing) => *existing = grade,
                None => self.grades.push(grade),
            }
            accepted += 1;
        }
        (accepted, orphans)
    }

    fn push_alert(&mut self, severity: AlertSeverity, message: String, details: Option<String>) {
        self.alerts.push(SyncAlert {
            id: Uuid::new_v4().to_string(),
            severity,
            message,
            details,
            timestamp: Utc::now(),
        });
    }

    fn status(&self) -> SyncStatus {
        SyncStatus {
            assessment_count: self.assessments.len(),
            grade_count: self.grades.len(),
            alert_count: self.alerts.len(),
            last_sync_at: self.last_sync_at,
            last_sync_ok: self.last_sync_ok,
        }
    }
}

// ==========================================
// ExamsIntegrationService - 考试集成服务
// ==========================================
#[derive(Debug, Default)]
pub struct ExamsIntegrationService {
    store: RwLock<ExamStore>,
    thresholds: EngineThresholds,
}

impl ExamsIntegrationService {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self {
            store: RwLock::new(ExamStore::default()),
            thresholds,
        }
    }

    fn read_store(&self) -> ExamsResult<RwLockReadGuard<'_, ExamStore>> {
        self.store
            .read()
            .map_err(|e| ExamsError::LockError(e.to_string()))
    }

    fn write_store(&self) -> ExamsResult<RwLockWriteGuard<'_, ExamStore>> {
        self.store
            .write()
            .map_err(|e| ExamsError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 登记考试（同 id 覆盖）
    pub fn add_assessment(&self, assessment: Assessment) -> ExamsResult<()> {
        self.write_store()?.upsert_assessment(assessment);
        Ok(())
    }

    /// 登记成绩
    ///
    /// # 返回
    /// 实际写入的成绩数; 找不到所属考试的成绩被忽略并记一条 warning 告警
    pub fn add_grades(&self, grades: Vec<Grade>) -> ExamsResult<usize> {
        let mut store = self.write_store()?;
        let (accepted, orphans) = store.merge_grades(grades);
        if orphans > 0 {
            tracing::warn!(orphans, "存在无所属考试的成绩,已忽略");
            store.push_alert(
                AlertSeverity::Warning,
                t_with_args("exams.orphan_grades", &[("count", &orphans.to_string())]),
                None,
            );
        }
        Ok(accepted)
    }

    /// 从考试系统同步
    ///
    /// 失败时: 记录 error 告警 + 标记最近一次同步失败 + 返回 SyncFailed
    pub async fn sync_from(&self, source: &dyn ExamDataSource) -> ExamsResult<SyncStatus> {
        let fetched = async {
            let assessments = source.fetch_assessments().await?;
            let grades = source.fetch_grades().await?;
            Ok::<_, anyhow::Error>((assessments, grades))
        }
        .await;

        let mut store = self.write_store()?;
        store.last_sync_at = Some(Utc::now());

        match fetched {
            Ok((assessments, grades)) => {
                let assessment_count = assessments.len();
                for assessment in assessments {
                    store.upsert_assessment(assessment);
                }
                let (accepted, orphans) = store.merge_grades(grades);
                if orphans > 0 {
                    store.push_alert(
                        AlertSeverity::Warning,
                        t_with_args("exams.orphan_grades", &[("count", &orphans.to_string())]),
                        None,
                    );
                }
                store.last_sync_ok = Some(true);
                tracing::info!(
                    assessments = assessment_count,
                    grades = accepted,
                    orphans,
                    "考试系统同步完成"
                );
                Ok(store.status())
            }
            Err(e) => {
                let details = format!("{:#}", e);
                tracing::error!(error = %details, "考试系统同步失败");
                store.push_alert(AlertSeverity::Error, t("exams.sync_failed"), Some(details.clone()));
                store.last_sync_ok = Some(false);
                Err(ExamsError::SyncFailed(details))
            }
        }
    }

    // ==========================================
    // 读取
    // ==========================================

    pub fn get_status(&self) -> ExamsResult<SyncStatus> {
        Ok(self.read_store()?.status())
    }

    /// 告警快照（按追加顺序）
    pub fn get_alerts(&self) -> ExamsResult<Vec<SyncAlert>> {
        Ok(self.read_store()?.alerts.clone())
    }

    pub fn get_assessment(&self, assessment_id: &str) -> ExamsResult<Assessment> {
        self.read_store()?
            .assessments
            .iter()
            .find(|a| a.id == assessment_id)
            .cloned()
            .ok_or_else(|| ExamsError::NotFound {
                entity: "Assessment".to_string(),
                id: assessment_id.to_string(),
            })
    }

    // ==========================================
    // 分析
    // ==========================================

    /// 单次考试分析: 集中趋势 + 五段分布 + 评分项两两相关
    pub fn analyze_assessment(&self, assessment_id: &str) -> ExamsResult<AssessmentAnalysis> {
        let assessment = self.get_assessment(assessment_id)?;
        let store = self.read_store()?;
        let grades: Vec<&Grade> = store
            .grades
            .iter()
            .filter(|g| g.assessment_id == assessment_id)
            .collect();

        let mut scores: Vec<f64> = grades.iter().map(|g| g.score).collect();
        scores.sort_by(|a, b| a.total_cmp(b));

        let percents: Vec<f64> = scores
            .iter()
            .map(|s| percent_of(*s, assessment.max_score))
            .collect();
        let mut distribution = [0usize; 5];
        for pct in &percents {
            let band = ((pct / 20.0).floor().max(0.0) as usize).min(4);
            distribution[band] += 1;
        }
        let passed = percents.iter().filter(|&&p| p >= 50.0).count();
        let success_rate = if percents.is_empty() {
            0.0
        } else {
            100.0 * passed as f64 / percents.len() as f64
        };

        let mut criterion_correlations = Vec::new();
        for (i, a) in assessment.criteria.iter().enumerate() {
            for b in assessment.criteria.iter().skip(i + 1) {
                let (xs, ys): (Vec<f64>, Vec<f64>) = grades
                    .iter()
                    .filter_map(|g| {
                        Some((*g.criterion_scores.get(&a.id)?, *g.criterion_scores.get(&b.id)?))
                    })
                    .unzip();
                criterion_correlations.push(CriterionCorrelation {
                    criterion_a: a.id.clone(),
                    criterion_b: b.id.clone(),
                    coefficient: pearson(&xs, &ys),
                    sample_size: xs.len(),
                });
            }
        }

        Ok(AssessmentAnalysis {
            assessment_id: assessment.id.clone(),
            grade_count: scores.len(),
            average: if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            },
            median: median(&scores),
            min: scores.first().copied().unwrap_or(0.0),
            max: scores.last().copied().unwrap_or(0.0),
            success_rate,
            distribution,
            criterion_correlations,
        })
    }

    /// 学生进步趋势: 按评分时间排序的得分率序列,按趋势窗口计算
    pub fn student_progress(&self, student_id: &str) -> ExamsResult<Vec<ProgressTrend>> {
        let store = self.read_store()?;
        let mut graded: Vec<(DateTime<Utc>, f64)> = store
            .grades
            .iter()
            .filter(|g| g.student_id == student_id)
            .filter_map(|g| {
                let assessment = store.assessments.iter().find(|a| a.id == g.assessment_id)?;
                Some((g.graded_at, percent_of(g.score, assessment.max_score)))
            })
            .collect();
        graded.sort_by_key(|(at, _)| *at);

        let series: Vec<f64> = graded.into_iter().map(|(_, pct)| pct).collect();
        Ok(calculate_trends_with_window(
            &series,
            self.thresholds.trend_window,
        ))
    }

    /// 能力覆盖: 期望能力中被评分项引用的比例
    pub fn competency_coverage(
        &self,
        assessment_id: &str,
        expected: &[Competency],
    ) -> ExamsResult<CompetencyCoverage> {
        let assessment = self.get_assessment(assessment_id)?;
        let referenced: BTreeSet<&str> = assessment
            .criteria
            .iter()
            .filter_map(|c| c.competency_id.as_deref())
            .collect();

        let (covered, uncovered): (Vec<&Competency>, Vec<&Competency>) = expected
            .iter()
            .partition(|c| referenced.contains(c.id.as_str()));

        let coverage_rate = if expected.is_empty() {
            0.0
        } else {
            100.0 * covered.len() as f64 / expected.len() as f64
        };

        Ok(CompetencyCoverage {
            assessment_id: assessment.id,
            covered: covered.into_iter().map(|c| c.id.clone()).collect(),
            uncovered: uncovered.into_iter().map(|c| c.id.clone()).collect(),
            coverage_rate,
        })
    }
}

/// 得分率（百分比）; 满分非正时为 0
fn percent_of(score: f64, max_score: f64) -> f64 {
    if max_score > 0.0 {
        100.0 * score / max_score
    } else {
        0.0
    }
}
