// ==========================================
// 教学设计单校验引擎 - 教学设计单实体
// ==========================================
// 职责: Fiche 聚合及其子实体（目标/能力/活动/评价）
// 红线: 纯数据契约,不含业务逻辑
// ==========================================

use crate::domain::types::{CompetenceType, EvaluationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Fiche - 教学设计单
// ==========================================
// 由外部文档库创建,引擎只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fiche {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub level: String,

    /// 作者教师（统计分组用）
    #[serde(default)]
    pub teacher_id: Option<String>,

    /// 有序教学目标
    #[serde(default)]
    pub objectives: Vec<Objective>,

    #[serde(default)]
    pub competences: Vec<Competence>,

    /// 活动按教学顺序排列
    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub evaluations: Vec<Evaluation>,

    /// 渲染后的正文（Markdown,可内嵌 HTML 标题）
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub program_id: Option<String>,

    /// 当前状态（自由文本: 流程状态或 "prepared" 等业务状态）
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 教学目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub description: String,
    /// 动词标签（Bloom 识别时与描述一并扫描）
    #[serde(default)]
    pub verbs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competence {
    pub id: String,
    #[serde(rename = "type")]
    pub competence_type: CompetenceType,
    #[serde(default)]
    pub description: String,
}

// ==========================================
// Activity - 教学活动
// ==========================================
// 有效性: phase ∈ {1,2,3}, duration ≥ 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub description: String,
    /// 时长（分钟）,负数视为无效
    pub duration: i32,
    /// 教学阶段 1=导入 2=展开 3=收束
    pub phase: i32,
    #[serde(default)]
    pub materials: Vec<Material>,
    /// 教学策略标签
    #[serde(default)]
    pub strategies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default)]
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: String,
    #[serde(rename = "type")]
    pub evaluation_type: EvaluationType,
    /// 评价方式标签（问卷/观察/作品等）
    #[serde(default)]
    pub methods: Vec<String>,
}

impl Fiche {
    /// 创建空白教学设计单（状态为 draft）
    pub fn new(id: &str, title: &str, subject: &str, level: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subject: subject.to_string(),
            level: level.to_string(),
            teacher_id: None,
            objectives: Vec::new(),
            competences: Vec::new(),
            activities: Vec::new(),
            evaluations: Vec::new(),
            content: String::new(),
            program_id: None,
            status: "draft".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 课程大纲编号是否已填写（空白视为未填）
    pub fn has_program(&self) -> bool {
        self.program_id
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}
