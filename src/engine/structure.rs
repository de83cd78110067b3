// ==========================================
// 教学设计单校验引擎 - 结构分析器
// ==========================================
// 职责: 逐项能力/活动的结构检查
// 输入: Fiche
// 输出: CompetenceAnalysis[] + ActivityAnalysis[]
// 红线: 纯函数,无副作用
// ==========================================

use crate::domain::analysis::{ActivityAnalysis, CompetenceAnalysis};
use crate::domain::fiche::{Activity, Fiche};
use crate::i18n::t_with_args;

/// 有效教学阶段
pub const VALID_PHASES: [i32; 3] = [1, 2, 3];

// ==========================================
// StructuralAnalyzer - 结构分析器
// ==========================================
#[derive(Debug, Default, Clone)]
pub struct StructuralAnalyzer {}

impl StructuralAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    /// 能力分析
    ///
    /// 列出即视为存在: present=true, score=1
    ///
    /// # 返回
    /// 每项能力一条分析
    pub fn analyze_competences(&self, fiche: &Fiche) -> Vec<CompetenceAnalysis> {
        fiche
            .competences
            .iter()
            .map(|competence| {
                let mut recommendations = Vec::new();
                if competence.description.trim().is_empty() {
                    recommendations.push(t_with_args(
                        "competence.empty_description",
                        &[("id", &competence.id)],
                    ));
                }

                CompetenceAnalysis {
                    competence_type: competence.competence_type,
                    present: true,
                    score: 1.0,
                    recommendations,
                }
            })
            .collect()
    }

    /// 活动分析
    ///
    /// 检查项:
    /// - duration ≥ 0
    /// - 所有材料可用
    /// - phase ∈ {1,2,3}
    pub fn analyze_activities(&self, fiche: &Fiche) -> Vec<ActivityAnalysis> {
        fiche
            .activities
            .iter()
            .map(|activity| self.analyze_activity(activity))
            .collect()
    }

    fn analyze_activity(&self, activity: &Activity) -> ActivityAnalysis {
        let duration_valid = activity.duration >= 0;
        let material_valid = activity.materials.iter().all(|m| m.available);
        let phase_valid = VALID_PHASES.contains(&activity.phase);

        let mut recommendations = Vec::new();

        if !duration_valid {
            recommendations.push(t_with_args(
                "activity.negative_duration",
                &[
                    ("id", &activity.id),
                    ("duration", &activity.duration.to_string()),
                ],
            ));
        }

        if !material_valid {
            let missing: Vec<&str> = activity
                .materials
                .iter()
                .filter(|m| !m.available)
                .map(|m| m.name.as_str())
                .collect();
            recommendations.push(t_with_args(
                "activity.material_unavailable",
                &[("id", &activity.id), ("materials", &missing.join(", "))],
            ));
        }

        if !phase_valid {
            recommendations.push(t_with_args(
                "activity.invalid_phase",
                &[("id", &activity.id), ("phase", &activity.phase.to_string())],
            ));
        }

        ActivityAnalysis {
            id: activity.id.clone(),
            duration_valid,
            material_valid,
            phase_valid,
            recommendations,
        }
    }
}
