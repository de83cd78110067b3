// ==========================================
// 教学设计单校验引擎 - 分析结果实体
// ==========================================
// 职责: 单份教学设计单的派生分析结果
// 说明: 结果一经生成即不可变,重新评估生成新结果
// ==========================================

use crate::domain::types::{CompetenceType, ValidationStatus};
use crate::domain::workflow::ValidationWorkflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 单项能力分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceAnalysis {
    #[serde(rename = "type")]
    pub competence_type: CompetenceType,
    pub present: bool,
    pub score: f64,
    pub recommendations: Vec<String>,
}

/// 单项活动分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAnalysis {
    pub id: String,
    pub duration_valid: bool,
    pub material_valid: bool,
    pub phase_valid: bool,
    pub recommendations: Vec<String>,
}

impl ActivityAnalysis {
    /// 三项结构检查全部通过
    pub fn is_valid(&self) -> bool {
        self.duration_valid && self.material_valid && self.phase_valid
    }
}

// ==========================================
// PedagogicalAnalysis - 文档级教学法分析
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedagogicalAnalysis {
    /// 目标-活动一致性 [0,1]
    pub coherence_score: f64,
    /// 阶段覆盖 [0,1]
    pub progression_score: f64,
    /// Bloom 层级 [1,6]
    pub taxonomic_level: f64,
    /// 评价多样性与覆盖（覆盖不封顶）
    pub evaluation_score: f64,
    pub program_compliance: bool,
    pub recommendations: Vec<String>,
}

/// 单条规则的校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub is_valid: bool,
    pub suggestions: Vec<String>,
}

// ==========================================
// ValidationResult - 校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub id: String,
    pub fiche_id: String,
    pub competences: Vec<CompetenceAnalysis>,
    pub activities: Vec<ActivityAnalysis>,
    pub pedagogical_analysis: PedagogicalAnalysis,
    pub workflow: ValidationWorkflow,
    /// 规则通过率 [0,100]
    pub score: u8,
    /// 全部规则通过
    pub is_valid: bool,
    /// 规则 id → 结果（有序,保证序列化稳定）
    pub rules: BTreeMap<String, RuleOutcome>,
    /// 加权教学法得分
    pub pedagogy_score: f64,
    pub overall_status: ValidationStatus,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ValidationResult {
    /// 人工确认/驳回: 生成新的结果对象,原结果保持不变
    pub fn with_manual_verdict(&self, verdict: ValidationStatus) -> ValidationResult {
        let mut next = self.clone();
        next.id = Uuid::new_v4().to_string();
        next.overall_status = verdict;
        next.updated_at = Utc::now();
        next
    }
}
