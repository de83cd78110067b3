// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时配置库 + 教学设计单构建器
// ==========================================
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use fiche_engine::domain::{
    Activity, Competence, CompetenceType, Evaluation, EvaluationType, Fiche, Material, Objective,
};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

// ==========================================
// 临时配置库
// ==========================================

/// 创建临时测试数据库并初始化 config_kv
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = Connection::open(&db_path)?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    Ok((temp_file, db_path))
}

/// 写入全局配置
pub fn insert_test_config(db_path: &str, entries: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
    }
    Ok(())
}

// ==========================================
// Fiche 构建器
// ==========================================

pub struct FicheBuilder {
    fiche: Fiche,
}

impl FicheBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            fiche: Fiche::new(id, "Les fractions", "math", "CM1"),
        }
    }

    pub fn teacher(mut self, teacher_id: &str) -> Self {
        self.fiche.teacher_id = Some(teacher_id.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.fiche.subject = subject.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.fiche.status = status.to_string();
        self
    }

    pub fn program(mut self, program_id: &str) -> Self {
        self.fiche.program_id = Some(program_id.to_string());
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.fiche.content = content.to_string();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.fiche.created_at = at;
        self.fiche.updated_at = at;
        self
    }

    pub fn created_minutes_ago(self, minutes: i64) -> Self {
        self.created_at(Utc::now() - Duration::minutes(minutes))
    }

    pub fn objective(mut self, description: &str) -> Self {
        let id = format!("O{}", self.fiche.objectives.len() + 1);
        self.fiche.objectives.push(Objective {
            id,
            description: description.to_string(),
            verbs: Vec::new(),
        });
        self
    }

    pub fn competence(mut self, competence_type: CompetenceType) -> Self {
        let id = format!("C{}", self.fiche.competences.len() + 1);
        self.fiche.competences.push(Competence {
            id,
            competence_type,
            description: format!("compétence {}", competence_type),
        });
        self
    }

    pub fn all_competence_types(self) -> Self {
        CompetenceType::REQUIRED
            .iter()
            .fold(self, |builder, t| builder.competence(*t))
    }

    pub fn activity(mut self, description: &str, phase: i32, duration: i32) -> Self {
        let id = format!("A{}", self.fiche.activities.len() + 1);
        self.fiche.activities.push(Activity {
            id,
            description: description.to_string(),
            duration,
            phase,
            materials: Vec::new(),
            strategies: Vec::new(),
        });
        self
    }

    /// 为最后一个活动追加教学策略标签
    pub fn strategy(mut self, strategy: &str) -> Self {
        if let Some(activity) = self.fiche.activities.last_mut() {
            activity.strategies.push(strategy.to_string());
        }
        self
    }

    /// 为最后一个活动追加材料
    pub fn material(mut self, name: &str, available: bool) -> Self {
        if let Some(activity) = self.fiche.activities.last_mut() {
            activity.materials.push(Material {
                name: name.to_string(),
                available,
            });
        }
        self
    }

    pub fn evaluation(mut self, evaluation_type: EvaluationType, methods: &[&str]) -> Self {
        let id = format!("E{}", self.fiche.evaluations.len() + 1);
        self.fiche.evaluations.push(Evaluation {
            id,
            evaluation_type,
            methods: methods.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> Fiche {
        self.fiche
    }
}

/// 四个教学环节标题齐全的正文
pub const PHASED_CONTENT: &str =
    "# Introduction\n\nRappel.\n\n# Présentation\n\nNotion.\n\n# Activités\n\nExercices.\n\n# Synthèse\n\nBilan.\n";

/// 五条规则全部通过、结论为 APPROVED 的教学设计单
pub fn complete_fiche(id: &str) -> Fiche {
    FicheBuilder::new(id)
        .teacher("T1")
        .program("PRG-MATH-CM1")
        .status("teacher_review")
        .content(PHASED_CONTENT)
        .objective("fractions")
        .objective("division")
        .all_competence_types()
        .activity("Students understand fractions and division with cards", 1, 15)
        .strategy("manipulation")
        .activity("Pairs apply division to share fractions of pizzas", 2, 20)
        .strategy("group_work")
        .activity("Pupils create their own fractions and division problem", 3, 10)
        .strategy("individual")
        .evaluation(EvaluationType::Diagnostic, &["oral"])
        .evaluation(EvaluationType::Formative, &["observation"])
        .evaluation(EvaluationType::Summative, &["quiz"])
        .build()
}
