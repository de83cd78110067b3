// ==========================================
// 教学设计单校验引擎 - 教学法分析器
// ==========================================
// 职责: 一致性 / 阶段覆盖 / Bloom 层级 / 评价多样性 / 大纲合规
// 输入: Fiche
// 输出: PedagogicalAnalysis
// 红线: 纯函数,无副作用
// ==========================================
// 注: 一致性为子串包含启发式,不是语义相似度
// ==========================================

pub mod taxonomy;

#[cfg(test)]
mod tests;

use crate::config::EngineThresholds;
use crate::domain::analysis::PedagogicalAnalysis;
use crate::domain::fiche::Fiche;
use crate::i18n::{t, t_with_args};
use taxonomy::{contains_ignore_case, detect_level};

// ==========================================
// PedagogicalAnalyzer - 教学法分析器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PedagogicalAnalyzer {
    thresholds: EngineThresholds,
}

impl PedagogicalAnalyzer {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self { thresholds }
    }

    /// 文档级分析
    pub fn analyze(&self, fiche: &Fiche) -> PedagogicalAnalysis {
        let coherence_score = self.coherence_score(fiche);
        let progression_score = self.progression_score(fiche);
        let taxonomic_level = self.taxonomic_level(fiche);
        let evaluation_score = self.evaluation_score(fiche);
        let program_compliance = self.check_program_compliance(fiche);

        let mut recommendations = Vec::new();

        if coherence_score < self.thresholds.coherence_warning {
            recommendations.push(t_with_args(
                "pedagogy.low_coherence",
                &[("score", &format!("{:.2}", coherence_score))],
            ));
        }
        if progression_score == 0.0 {
            recommendations.push(t("pedagogy.no_progression"));
        }
        if distinct_evaluation_buckets(fiche) < 2 {
            recommendations.push(t("pedagogy.low_evaluation_diversity"));
        }
        if taxonomic_level <= 2.0 {
            recommendations.push(t_with_args(
                "pedagogy.low_taxonomy",
                &[("level", &format!("{:.1}", taxonomic_level))],
            ));
        }
        if !program_compliance {
            recommendations.push(t("pedagogy.non_compliant"));
        }

        PedagogicalAnalysis {
            coherence_score,
            progression_score,
            taxonomic_level,
            evaluation_score,
            program_compliance,
            recommendations,
        }
    }

    /// 一致性得分
    ///
    /// 对每个 (目标, 活动) 对: 活动描述包含目标描述即命中
    /// score = 命中对数 / (目标数 × 活动数); 任一为空时为 0
    pub fn coherence_score(&self, fiche: &Fiche) -> f64 {
        let total_pairs = fiche.objectives.len() * fiche.activities.len();
        if total_pairs == 0 {
            return 0.0;
        }

        let matching_pairs = fiche
            .objectives
            .iter()
            .map(|objective| {
                fiche
                    .activities
                    .iter()
                    .filter(|activity| {
                        contains_ignore_case(&activity.description, &objective.description)
                    })
                    .count()
            })
            .sum::<usize>();

        matching_pairs as f64 / total_pairs as f64
    }

    /// 阶段覆盖得分
    ///
    /// 按 phase 1..3 分桶, achieved = 各桶计数之和, totalSlots = 活动数 × 3
    /// 奖励阶段覆盖面,不检查顺序
    pub fn progression_score(&self, fiche: &Fiche) -> f64 {
        if fiche.activities.is_empty() {
            return 0.0;
        }

        let mut buckets = [0usize; 3];
        for activity in &fiche.activities {
            if (1..=3).contains(&activity.phase) {
                buckets[(activity.phase - 1) as usize] += 1;
            }
        }

        let total_slots = fiche.activities.len() * 3;
        let achieved: usize = buckets.iter().sum();
        achieved as f64 / total_slots as f64
    }

    /// Bloom 层级
    ///
    /// 命中的目标取平均; 无目标命中时取默认值 (3)
    pub fn taxonomic_level(&self, fiche: &Fiche) -> f64 {
        let levels: Vec<u8> = fiche
            .objectives
            .iter()
            .filter_map(|objective| {
                let text = if objective.verbs.is_empty() {
                    objective.description.clone()
                } else {
                    format!("{} {}", objective.description, objective.verbs.join(" "))
                };
                detect_level(&text)
            })
            .collect();

        if levels.is_empty() {
            return self.thresholds.default_taxonomic_level;
        }

        levels.iter().map(|&l| l as f64).sum::<f64>() / levels.len() as f64
    }

    /// 评价得分
    ///
    /// diversity = 非零桶数 / 3; coverage = 评价数 / 3 (不封顶)
    /// score = (diversity + coverage) / 2
    pub fn evaluation_score(&self, fiche: &Fiche) -> f64 {
        let diversity_score = distinct_evaluation_buckets(fiche) as f64 / 3.0;
        let coverage_score = fiche.evaluations.len() as f64 / 3.0;
        (diversity_score + coverage_score) / 2.0
    }

    /// 大纲合规
    ///
    /// 仅检查 programId 已填写且至少一项能力,不查询大纲内容
    pub fn check_program_compliance(&self, fiche: &Fiche) -> bool {
        fiche.has_program() && !fiche.competences.is_empty()
    }

    /// 加权教学法得分
    ///
    /// 0.4×一致性 + 0.3×阶段覆盖 + 0.2×评价 + 0.1×合规
    pub fn weighted_score(&self, analysis: &PedagogicalAnalysis) -> f64 {
        let compliance_bit = if analysis.program_compliance { 1.0 } else { 0.0 };
        self.thresholds.coherence_weight * analysis.coherence_score
            + self.thresholds.progression_weight * analysis.progression_score
            + self.thresholds.evaluation_weight * analysis.evaluation_score
            + self.thresholds.compliance_weight * compliance_bit
    }
}

/// formative / summative / diagnostic 三桶中非零桶数
fn distinct_evaluation_buckets(fiche: &Fiche) -> usize {
    let mut tally = [0usize; 3];
    for evaluation in &fiche.evaluations {
        if let Some(bucket) = evaluation.evaluation_type.diversity_bucket() {
            tally[bucket] += 1;
        }
    }
    tally.iter().filter(|&&count| count > 0).count()
}
