use serde::{Deserialize, Serialize};

/// 引擎阈值与权重（值对象）
///
/// 存储位置：config_kv（scope_id='global'，每个字段一个 key，见 `config_keys`）
/// 缺省值即引擎内置口径。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineThresholds {
    /// 加权教学法得分的通过线
    pub approval_threshold: f64,

    /// 加权权重：一致性 / 阶段覆盖 / 评价 / 合规
    pub coherence_weight: f64,
    pub progression_weight: f64,
    pub evaluation_weight: f64,
    pub compliance_weight: f64,

    /// 低于该一致性得分时给出对齐建议
    pub coherence_warning: f64,

    /// 无动词命中时的 Bloom 层级
    pub default_taxonomic_level: f64,

    /// 趋势窗口大小
    pub trend_window: usize,

    /// 行政报告: 培训需求 / 优势 / 待改进 阈值（质量 ∈ [0,1]）
    pub training_need_threshold: f64,
    pub strength_threshold: f64,
    pub weakness_threshold: f64,
}

impl Default for EngineThresholds {
    fn default() -> Self {
        Self {
            approval_threshold: 0.6,
            coherence_weight: 0.4,
            progression_weight: 0.3,
            evaluation_weight: 0.2,
            compliance_weight: 0.1,
            coherence_warning: 0.5,
            default_taxonomic_level: 3.0,
            trend_window: 4,
            training_need_threshold: 0.7,
            strength_threshold: 0.8,
            weakness_threshold: 0.6,
        }
    }
}
