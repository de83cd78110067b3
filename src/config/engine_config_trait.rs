// ==========================================
// 教学设计单校验引擎 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::thresholds::EngineThresholds;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 获取加权教学法得分通过线
    ///
    /// # 默认值
    /// - 0.6
    async fn get_approval_threshold(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取四项加权权重 (coherence, progression, evaluation, compliance)
    ///
    /// # 默认值
    /// - (0.4, 0.3, 0.2, 0.1)
    async fn get_pedagogy_weights(&self) -> Result<(f64, f64, f64, f64), Box<dyn Error>>;

    /// 获取趋势窗口大小
    ///
    /// # 默认值
    /// - 4（非正数回退为默认值）
    async fn get_trend_window(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取行政报告阈值 (training_need, strength, weakness)
    ///
    /// # 默认值
    /// - (0.7, 0.8, 0.6)
    async fn get_report_thresholds(&self) -> Result<(f64, f64, f64), Box<dyn Error>>;

    /// 获取一致性告警线
    async fn get_coherence_warning(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取消息语言
    ///
    /// # 默认值
    /// - "fr"
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;

    /// 汇总为完整阈值对象
    async fn load_thresholds(&self) -> Result<EngineThresholds, Box<dyn Error>> {
        let defaults = EngineThresholds::default();
        let approval_threshold = self.get_approval_threshold().await?;
        let (coherence_weight, progression_weight, evaluation_weight, compliance_weight) =
            self.get_pedagogy_weights().await?;
        let trend_window = self.get_trend_window().await?;
        let (training_need_threshold, strength_threshold, weakness_threshold) =
            self.get_report_thresholds().await?;
        let coherence_warning = self.get_coherence_warning().await?;

        Ok(EngineThresholds {
            approval_threshold,
            coherence_weight,
            progression_weight,
            evaluation_weight,
            compliance_weight,
            coherence_warning,
            default_taxonomic_level: defaults.default_taxonomic_level,
            trend_window,
            training_need_threshold,
            strength_threshold,
            weakness_threshold,
        })
    }
}
