// ==========================================
// 教学设计单校验引擎 - 语料聚合器
// ==========================================
// 职责: 语料级统计 / 分布 / 行政报告 / 趋势
// 输入: Fiche[] + ValidationResult[] 快照
// 输出: FicheStats / PedagogicalDistribution / AdministrativeReport / ProgressTrend[]
// ==========================================
// 红线: 纯折叠,不修改输入快照
// 红线: 除零以显式零值保护,不报错
// ==========================================

mod trends;


pub use trends::calculate_trends_with_window;

use crate::config::EngineThresholds;
use crate::domain::analysis::ValidationResult;
use crate::domain::fiche::Fiche;
use crate::domain::stats::{
    AdministrativeReport, FicheStats, PedagogicalDistribution, ProgressTrend,
};
use crate::engine::pedagogy::PedagogicalAnalyzer;
use crate::i18n::{t, t_with_args};
use std::collections::{BTreeMap, HashMap};

/// 业务状态: 已备课
pub const STATUS_PREPARED: &str = "prepared";

/// 无作者时的分组键
const UNASSIGNED: &str = "unassigned";

// ==========================================
// CorpusAggregator - 语料聚合器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CorpusAggregator {
    thresholds: EngineThresholds,
    pedagogy: PedagogicalAnalyzer,
}

impl CorpusAggregator {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self {
            pedagogy: PedagogicalAnalyzer::new(thresholds.clone()),
            thresholds,
        }
    }

    // ==========================================
    // 总体统计
    // ==========================================

    /// 教学设计单统计
    ///
    /// 平均校验耗时/平均得分仅统计有校验结果的教学设计单（取最新结果）
    pub fn fiche_stats(&self, fiches: &[Fiche], validations: &[ValidationResult]) -> FicheStats {
        let latest = latest_validations(validations);

        let mut stats = FicheStats {
            total: fiches.len(),
            ..FicheStats::default()
        };

        let mut durations_ms = Vec::new();
        let mut scores = Vec::new();

        for fiche in fiches {
            let teacher = fiche.teacher_id.as_deref().unwrap_or(UNASSIGNED);
            *stats.by_teacher.entry(teacher.to_string()).or_insert(0) += 1;
            *stats.by_subject.entry(fiche.subject.clone()).or_insert(0) += 1;
            *stats.by_level.entry(fiche.level.clone()).or_insert(0) += 1;
            *stats.by_status.entry(fiche.status.clone()).or_insert(0) += 1;

            if let Some(validation) = latest.get(fiche.id.as_str()) {
                let elapsed = validation.created_at - fiche.created_at;
                durations_ms.push(elapsed.num_milliseconds().abs() as f64);
                scores.push(validation.score as f64);
            }
        }

        stats.average_validation_time = mean(&durations_ms);
        stats.average_score = mean(&scores);
        stats
    }

    // ==========================================
    // 教学法分布
    // ==========================================

    /// 能力类型 / 教学策略 / 评价方式 统计 + 阶段质量 + 缺口
    pub fn pedagogical_distribution(&self, fiches: &[Fiche]) -> PedagogicalDistribution {
        let mut distribution = PedagogicalDistribution::default();
        let mut activity_total = 0usize;
        let mut evaluation_total = 0usize;
        let mut competence_total = 0usize;
        let mut progression = Vec::with_capacity(fiches.len());

        for fiche in fiches {
            for competence in &fiche.competences {
                competence_total += 1;
                *distribution
                    .competence_types
                    .entry(competence.competence_type.as_str().to_string())
                    .or_insert(0) += 1;
            }

            for activity in &fiche.activities {
                activity_total += 1;
                for strategy in &activity.strategies {
                    *distribution
                        .teaching_strategies
                        .entry(strategy.clone())
                        .or_insert(0) += 1;
                }
            }

            for evaluation in &fiche.evaluations {
                evaluation_total += 1;
                for method in &evaluation.methods {
                    *distribution
                        .evaluation_methods
                        .entry(method.clone())
                        .or_insert(0) += 1;
                }
            }

            // 每份: 最早有效阶段 / 3; 无有效阶段记 0
            let earliest_phase = fiche
                .activities
                .iter()
                .map(|a| a.phase)
                .filter(|p| (1..=3).contains(p))
                .min();
            progression.push(earliest_phase.map(|p| p as f64 / 3.0).unwrap_or(0.0));
        }

        distribution.progression_quality = mean(&progression);

        if competence_total == 0 {
            distribution.gaps.push(t("analytics.gap_competences"));
        }
        if activity_total == 0 {
            distribution.gaps.push(t("analytics.gap_activities"));
        }
        if evaluation_total == 0 {
            distribution.gaps.push(t("analytics.gap_evaluations"));
        }

        distribution
    }

    // ==========================================
    // 行政报告
    // ==========================================

    /// 行政报告
    ///
    /// 质量 = 规则得分 / 100 ∈ [0,1]; 无校验结果时不给出优势/待改进结论
    pub fn administrative_report(
        &self,
        fiches: &[Fiche],
        validations: &[ValidationResult],
    ) -> AdministrativeReport {
        let total = fiches.len();
        let latest = latest_validations(validations);

        let prepared = fiches
            .iter()
            .filter(|f| f.status == STATUS_PREPARED)
            .count();
        let compliant = fiches
            .iter()
            .filter(|f| self.pedagogy.check_program_compliance(f))
            .count();

        let qualities: Vec<f64> = fiches
            .iter()
            .filter_map(|f| latest.get(f.id.as_str()))
            .map(|v| v.score as f64 / 100.0)
            .collect();

        let mut report = AdministrativeReport {
            preparation_rate: percentage(prepared, total),
            program_compliance: percentage(compliant, total),
            average_pedagogical_quality: mean(&qualities),
            ..AdministrativeReport::default()
        };

        let below = qualities
            .iter()
            .filter(|&&q| q < self.thresholds.training_need_threshold)
            .count();
        if below > 0 {
            report.training_needs.push(t_with_args(
                "analytics.training_needs",
                &[("count", &below.to_string())],
            ));
        }

        if !qualities.is_empty() {
            let quality = format!("{:.2}", report.average_pedagogical_quality);
            if report.average_pedagogical_quality > self.thresholds.strength_threshold {
                report.strengths.push(t_with_args(
                    "analytics.strength_quality",
                    &[("quality", &quality)],
                ));
            }
            if report.average_pedagogical_quality < self.thresholds.weakness_threshold {
                report.areas_for_improvement.push(t_with_args(
                    "analytics.weakness_quality",
                    &[("quality", &quality)],
                ));
            }
        }

        report
    }

    // ==========================================
    // 趋势
    // ==========================================

    /// 按配置窗口（默认 4）计算趋势
    pub fn calculate_trends(&self, scores: &[f64]) -> Vec<ProgressTrend> {
        calculate_trends_with_window(scores, self.thresholds.trend_window)
    }

    /// 校验得分趋势（按校验时间排序）
    pub fn score_trends(&self, validations: &[ValidationResult]) -> Vec<ProgressTrend> {
        let mut ordered: Vec<&ValidationResult> = validations.iter().collect();
        ordered.sort_by_key(|v| v.created_at);
        let scores: Vec<f64> = ordered.iter().map(|v| v.score as f64).collect();
        self.calculate_trends(&scores)
    }
}

/// 每份教学设计单的最新校验结果
fn latest_validations(validations: &[ValidationResult]) -> HashMap<&str, &ValidationResult> {
    let mut latest: HashMap<&str, &ValidationResult> = HashMap::new();
    for validation in validations {
        latest
            .entry(validation.fiche_id.as_str())
            .and_modify(|current| {
                if validation.created_at > current.created_at {
                    *current = validation;
                }
            })
            .or_insert(validation);
    }
    latest
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        100.0 * count as f64 / total as f64
    } else {
        0.0
    }
}

/// 按键计数（供报表导出）
pub(crate) fn flatten_counts(label: &str, counts: &BTreeMap<String, usize>) -> Vec<(String, String)> {
    counts
        .iter()
        .map(|(k, v)| (format!("{}.{}", label, k), v.to_string()))
        .collect()
}
