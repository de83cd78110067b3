// ==========================================
// 教学设计单校验引擎 - 外部协作方接口
// ==========================================
// 能力/模板服务: 按学科+学段提供能力定义
// 权限服务: 读/写/审核/归档 能力判断（前置条件）
// 考试系统: 提供考试与成绩
// ==========================================

use crate::domain::assessment::{Assessment, Competency, Grade};
use crate::domain::fiche::Fiche;
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// CompetencyProvider - 能力/模板服务
// ==========================================
#[async_trait]
pub trait CompetencyProvider: Send + Sync {
    /// 按学科+学段查询能力定义
    async fn get_competencies(&self, subject: &str, level: &str) -> anyhow::Result<Vec<Competency>>;
}

/// 内存能力表（学科+学段 → 能力列表）
#[derive(Debug, Clone, Default)]
pub struct StaticCompetencyProvider {
    entries: HashMap<(String, String), Vec<Competency>>,
}

impl StaticCompetencyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_competencies(
        mut self,
        subject: &str,
        level: &str,
        competencies: Vec<Competency>,
    ) -> Self {
        self.entries
            .insert((subject.to_string(), level.to_string()), competencies);
        self
    }
}

#[async_trait]
impl CompetencyProvider for StaticCompetencyProvider {
    async fn get_competencies(&self, subject: &str, level: &str) -> anyhow::Result<Vec<Competency>> {
        Ok(self
            .entries
            .get(&(subject.to_string(), level.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

// ==========================================
// PermissionChecker - 权限服务
// ==========================================
pub trait PermissionChecker: Send + Sync {
    fn can_read(&self, user_id: &str, fiche: &Fiche) -> bool;
    fn can_write(&self, user_id: &str, fiche: &Fiche) -> bool;
    fn can_validate(&self, user_id: &str, fiche: &Fiche) -> bool;
    fn can_archive(&self, user_id: &str, fiche: &Fiche) -> bool;
}

/// 全部放行（单机/测试场景）
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPermissions;

impl PermissionChecker for AllowAllPermissions {
    fn can_read(&self, _user_id: &str, _fiche: &Fiche) -> bool {
        true
    }

    fn can_write(&self, _user_id: &str, _fiche: &Fiche) -> bool {
        true
    }

    fn can_validate(&self, _user_id: &str, _fiche: &Fiche) -> bool {
        true
    }

    fn can_archive(&self, _user_id: &str, _fiche: &Fiche) -> bool {
        true
    }
}

// ==========================================
// ExamDataSource - 考试系统
// ==========================================
#[async_trait]
pub trait ExamDataSource: Send + Sync {
    async fn fetch_assessments(&self) -> anyhow::Result<Vec<Assessment>>;
    async fn fetch_grades(&self) -> anyhow::Result<Vec<Grade>>;
}
