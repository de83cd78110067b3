// ==========================================
// 教学设计单校验引擎 - 考试/成绩实体
// ==========================================
// 来源: 外部考试系统（只读输入）
// 职责: 趋势与覆盖率计算的输入 + 同步告警记录
// ==========================================

use crate::domain::types::AlertSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 考试/测评
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    /// 满分
    pub max_score: f64,
    #[serde(default)]
    pub criteria: Vec<AssessmentCriterion>,
    /// 关联的教学设计单
    #[serde(default)]
    pub fiche_id: Option<String>,
}

/// 评分项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCriterion {
    pub id: String,
    pub name: String,
    pub max_points: f64,
    /// 对应的能力 id
    #[serde(default)]
    pub competency_id: Option<String>,
}

/// 学生成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub assessment_id: String,
    pub student_id: String,
    pub score: f64,
    /// 评分项 id → 得分
    #[serde(default)]
    pub criterion_scores: BTreeMap<String, f64>,
    pub graded_at: DateTime<Utc>,
}

/// 能力定义（来自能力/模板服务）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub competence_type: crate::domain::types::CompetenceType,
}

// ==========================================
// 同步告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAlert {
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 考试集成当前状态快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub assessment_count: usize,
    pub grade_count: usize,
    pub alert_count: usize,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_sync_ok: Option<bool>,
}

// ==========================================
// 单次考试分析
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAnalysis {
    pub assessment_id: String,
    pub grade_count: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// 得分率 ≥ 50% 的比例（百分比）
    pub success_rate: f64,
    /// 五段分布: [0,20) [20,40) [40,60) [60,80) [80,100]（按得分率）
    pub distribution: [usize; 5],
    pub criterion_correlations: Vec<CriterionCorrelation>,
}

/// 两个评分项得分序列的 Pearson 相关系数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionCorrelation {
    pub criterion_a: String,
    pub criterion_b: String,
    /// None: 样本不足或方差为 0
    pub coefficient: Option<f64>,
    pub sample_size: usize,
}

/// 单次考试的能力覆盖情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyCoverage {
    pub assessment_id: String,
    /// 被至少一个评分项覆盖的能力 id
    pub covered: Vec<String>,
    pub uncovered: Vec<String>,
    /// 覆盖比例（百分比）; 无期望能力时为 0
    pub coverage_rate: f64,
}
