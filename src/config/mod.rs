// ==========================================
// 教学设计单校验引擎 - 配置层
// ==========================================
// 职责: 阈值/权重配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config_trait;
pub mod thresholds;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config_trait::EngineConfigReader;
pub use thresholds::EngineThresholds;
