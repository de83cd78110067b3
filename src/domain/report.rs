// ==========================================
// 教学设计单校验引擎 - 报表生成记录
// ==========================================
// 生命周期: PENDING → GENERATING → READY | ERROR
// 调用方按 report_id 轮询
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 报表状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Generating,
    Ready,
    Error,
}

impl ReportStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, ReportStatus::Ready | ReportStatus::Error)
    }
}

/// 报表内容类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    FicheStats,
    PedagogicalDistribution,
    Administrative,
    Full,
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Json,
    Csv,
}

/// 报表请求参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    pub kind: ReportKind,
    pub format: ReportFormat,
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            kind: ReportKind::Full,
            format: ReportFormat::Json,
            title: None,
        }
    }
}

/// 报表生成进度记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProgress {
    pub report_id: String,
    pub status: ReportStatus,
    /// 0..=100
    pub progress: u8,
    pub message: Option<String>,
    /// 渲染结果（READY 时有值）
    pub content: Option<String>,
    pub options: ReportOptions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
