// ==========================================
// 教学设计单校验引擎 - 领域类型定义
// ==========================================
// 能力类型 / 评价类型 / 审核流程状态 / 粗粒度结论
// 序列化格式: snake_case (与前端看板一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 能力类型 (Competence Type)
// ==========================================
// 四类必备能力: cognitive / procedural / social / attitudinal
// attitudinal 同时接受 "affective" 写法
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetenceType {
    Cognitive,  // 认知
    Procedural, // 程序性
    Social,     // 社会性
    #[serde(alias = "affective")]
    Attitudinal, // 态度/情感
    #[serde(other)]
    Other, // 其他（保留,不计入必备类型）
}

impl CompetenceType {
    /// 教学设计单必须覆盖的四类能力
    pub const REQUIRED: [CompetenceType; 4] = [
        CompetenceType::Cognitive,
        CompetenceType::Procedural,
        CompetenceType::Social,
        CompetenceType::Attitudinal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetenceType::Cognitive => "cognitive",
            CompetenceType::Procedural => "procedural",
            CompetenceType::Social => "social",
            CompetenceType::Attitudinal => "attitudinal",
            CompetenceType::Other => "other",
        }
    }
}

impl fmt::Display for CompetenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 评价类型 (Evaluation Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    Formative,  // 形成性
    Summative,  // 总结性
    Diagnostic, // 诊断性
    #[serde(rename = "self")]
    SelfAssessment, // 自评
    Peer,       // 互评
}

impl EvaluationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::Formative => "formative",
            EvaluationType::Summative => "summative",
            EvaluationType::Diagnostic => "diagnostic",
            EvaluationType::SelfAssessment => "self",
            EvaluationType::Peer => "peer",
        }
    }

    /// 多样性统计使用的三个桶 (formative / summative / diagnostic)
    ///
    /// 自评/互评不计入桶
    pub fn diversity_bucket(&self) -> Option<usize> {
        match self {
            EvaluationType::Formative => Some(0),
            EvaluationType::Summative => Some(1),
            EvaluationType::Diagnostic => Some(2),
            EvaluationType::SelfAssessment | EvaluationType::Peer => None,
        }
    }
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审核流程状态 (Workflow Status)
// ==========================================
// 顺序: draft → teacher_review → collegial_review
//       → hierarchical_review → pedagogical_review → validated
// rejected 不在前进序列中,仅由显式驳回产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Draft,
    TeacherReview,
    CollegialReview,
    HierarchicalReview,
    PedagogicalReview,
    Validated,
    Rejected,
}

impl WorkflowStatus {
    /// 固定前进序列
    pub const SEQUENCE: [WorkflowStatus; 6] = [
        WorkflowStatus::Draft,
        WorkflowStatus::TeacherReview,
        WorkflowStatus::CollegialReview,
        WorkflowStatus::HierarchicalReview,
        WorkflowStatus::PedagogicalReview,
        WorkflowStatus::Validated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::TeacherReview => "teacher_review",
            WorkflowStatus::CollegialReview => "collegial_review",
            WorkflowStatus::HierarchicalReview => "hierarchical_review",
            WorkflowStatus::PedagogicalReview => "pedagogical_review",
            WorkflowStatus::Validated => "validated",
            WorkflowStatus::Rejected => "rejected",
        }
    }

    /// 从字符串解析状态（未知状态返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(WorkflowStatus::Draft),
            "teacher_review" => Some(WorkflowStatus::TeacherReview),
            "collegial_review" => Some(WorkflowStatus::CollegialReview),
            "hierarchical_review" => Some(WorkflowStatus::HierarchicalReview),
            "pedagogical_review" => Some(WorkflowStatus::PedagogicalReview),
            "validated" => Some(WorkflowStatus::Validated),
            "rejected" => Some(WorkflowStatus::Rejected),
            _ => None,
        }
    }

    /// 在前进序列中的位置（rejected 无位置）
    pub fn step_index(&self) -> Option<usize> {
        Self::SEQUENCE.iter().position(|s| s == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Validated)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 粗粒度结论 (Coarse Verdict)
// ==========================================
// 与六阶段流程不是同一维度
// Approved/NeedsRevision 由评估推导; Rejected 仅人工设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pending,
    Approved,
    NeedsRevision,
    Rejected,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pending => write!(f, "PENDING"),
            ValidationStatus::Approved => write!(f, "APPROVED"),
            ValidationStatus::NeedsRevision => write!(f, "NEEDS_REVISION"),
            ValidationStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

// ==========================================
// 趋势方向 (Trend Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

// ==========================================
// 告警级别 (Alert Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Error,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Error => write!(f, "error"),
        }
    }
}
