// ==========================================
// 教学设计单校验引擎 - 校验编排服务
// ==========================================
// 数据流:
//   Fiche → 结构分析 + 教学法分析 → 规则引擎 → 流程状态机 → ValidationResult
// ==========================================
// 红线: 校验永远返回结果对象,不抛错
// 红线: 不修改输入教学设计单
// ==========================================

use crate::config::EngineThresholds;
use crate::domain::analysis::{PedagogicalAnalysis, ValidationResult};
use crate::domain::fiche::Fiche;
use crate::domain::types::ValidationStatus;
use crate::engine::pedagogy::PedagogicalAnalyzer;
use crate::engine::rules::RuleEngine;
use crate::engine::structure::StructuralAnalyzer;
use crate::engine::workflow::WorkflowEngine;
use chrono::Utc;
use crate::i18n::t;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// FicheValidationService - 校验编排服务
// ==========================================
#[derive(Debug, Clone)]
pub struct FicheValidationService {
    structure: StructuralAnalyzer,
    pedagogy: PedagogicalAnalyzer,
    rules: RuleEngine,
    workflow: WorkflowEngine,
}

impl Default for FicheValidationService {
    fn default() -> Self {
        Self::new(EngineThresholds::default())
    }
}

impl FicheValidationService {
    /// 使用内置规则集构造
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self::with_rule_engine(thresholds, RuleEngine::standard())
    }

    /// 使用自定义规则集构造
    pub fn with_rule_engine(thresholds: EngineThresholds, rules: RuleEngine) -> Self {
        Self {
            structure: StructuralAnalyzer::new(),
            pedagogy: PedagogicalAnalyzer::new(thresholds.clone()),
            rules,
            workflow: WorkflowEngine::new(thresholds),
        }
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn workflow_engine(&self) -> &WorkflowEngine {
        &self.workflow
    }

    /// 校验单份教学设计单
    ///
    /// # 返回
    /// 新的 ValidationResult（每次调用生成新 id 与时间戳）
    pub fn validate_fiche(&self, fiche: &Fiche) -> ValidationResult {
        // 1. 结构分析
        let competences = self.structure.analyze_competences(fiche);
        let activities = self.structure.analyze_activities(fiche);

        // 2. 教学法分析
        let pedagogical_analysis = self.pedagogy.analyze(fiche);
        let pedagogy_score = self.pedagogy.weighted_score(&pedagogical_analysis);

        // 3. 规则引擎
        let report = self.rules.validate_fiche(fiche);

        // 4. 粗粒度结论 + 流程快照
        let overall_status =
            self.workflow
                .determine_status(&competences, &activities, pedagogy_score);
        let now = Utc::now();
        let workflow = self
            .workflow
            .workflow_for(fiche, overall_status, report.score, now);

        // 5. 汇总建议（保序去重）
        let mut recommendations: Vec<String> = Vec::new();
        let sources = competences
            .iter()
            .flat_map(|c| c.recommendations.iter())
            .chain(activities.iter().flat_map(|a| a.recommendations.iter()))
            .chain(pedagogical_analysis.recommendations.iter())
            .chain(report.results.values().flat_map(|o| o.suggestions.iter()));
        for message in sources {
            if !recommendations.contains(message) {
                recommendations.push(message.clone());
            }
        }

        tracing::info!(
            fiche_id = %fiche.id,
            score = report.score,
            is_valid = report.is_valid,
            pedagogy_score,
            verdict = %overall_status,
            "教学设计单校验完成"
        );

        ValidationResult {
            id: Uuid::new_v4().to_string(),
            fiche_id: fiche.id.clone(),
            competences,
            activities,
            pedagogical_analysis,
            workflow,
            score: report.score,
            is_valid: report.is_valid,
            rules: report.results,
            pedagogy_score,
            overall_status,
            recommendations,
            created_at: now,
            updated_at: now,
        }
    }

    /// 校验过程崩溃时的占位结果: NEEDS_REVISION,得分 0,附通用错误建议
    pub fn failed_result(&self, fiche: &Fiche) -> ValidationResult {
        let now = Utc::now();
        let message = t("common.validation_error");
        let overall_status = ValidationStatus::NeedsRevision;

        ValidationResult {
            id: Uuid::new_v4().to_string(),
            fiche_id: fiche.id.clone(),
            competences: Vec::new(),
            activities: Vec::new(),
            pedagogical_analysis: PedagogicalAnalysis {
                coherence_score: 0.0,
                progression_score: 0.0,
                taxonomic_level: self.pedagogy.taxonomic_level(fiche),
                evaluation_score: 0.0,
                program_compliance: false,
                recommendations: Vec::new(),
            },
            workflow: self.workflow.workflow_for(fiche, overall_status, 0, now),
            score: 0,
            is_valid: false,
            rules: BTreeMap::new(),
            pedagogy_score: 0.0,
            overall_status,
            recommendations: vec![message],
            created_at: now,
            updated_at: now,
        }
    }

    /// 批量并行校验（结果与输入一一对应、顺序一致）
    ///
    /// 每份教学设计单在阻塞线程池上独立校验,互不共享可变状态
    pub async fn validate_batch(self: Arc<Self>, fiches: Vec<Fiche>) -> Vec<ValidationResult> {
        let fiches: Vec<Arc<Fiche>> = fiches.into_iter().map(Arc::new).collect();
        let handles = fiches.iter().map(|fiche| {
            let service = Arc::clone(&self);
            let fiche = Arc::clone(fiche);
            tokio::task::spawn_blocking(move || service.validate_fiche(&fiche))
        });

        let joined = join_all(handles).await;
        let results: Vec<ValidationResult> = joined
            .into_iter()
            .zip(fiches.iter())
            .map(|(outcome, fiche)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    // 阻塞任务 panic: 不重跑,给出失败结果
                    tracing::error!(fiche_id = %fiche.id, error = %e, "批量校验任务崩溃");
                    self.failed_result(fiche)
                }
            })
            .collect();

        tracing::info!(total = results.len(), "批量校验完成");
        results
    }
}
