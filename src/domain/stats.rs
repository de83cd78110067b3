// ==========================================
// 教学设计单校验引擎 - 语料统计投影
// ==========================================
// 职责: 看板直接消费的统计对象（字段名即契约）
// 说明: 无独立生命周期,每次按需重算
// ==========================================

use crate::domain::types::TrendDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 教学设计单总体统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FicheStats {
    pub total: usize,
    pub by_teacher: BTreeMap<String, usize>,
    pub by_subject: BTreeMap<String, usize>,
    pub by_level: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    /// 创建到校验的平均间隔（毫秒）
    pub average_validation_time: f64,
    /// 平均规则得分 [0,100]
    pub average_score: f64,
}

/// 语料级教学法分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PedagogicalDistribution {
    pub competence_types: BTreeMap<String, usize>,
    pub teaching_strategies: BTreeMap<String, usize>,
    pub evaluation_methods: BTreeMap<String, usize>,
    pub progression_quality: f64,
    pub gaps: Vec<String>,
}

/// 行政报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeReport {
    /// 已备课比例（百分比）
    pub preparation_rate: f64,
    /// 大纲合规比例（百分比）
    pub program_compliance: f64,
    /// 平均教学质量 [0,1]
    pub average_pedagogical_quality: f64,
    pub training_needs: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

/// 趋势窗口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTrend {
    /// 窗口序号（从 1 开始）
    pub period: usize,
    pub value: f64,
    pub direction: TrendDirection,
    pub comment: String,
}
