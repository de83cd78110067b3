// ==========================================
// 内置规则
// ==========================================
// 1. competence_types       四类能力齐全
// 2. objective_alignment    每个活动引用至少一个目标
// 3. phase_structure        正文包含四个教学环节标题
// 4. taxonomic_progression  活动 Bloom 层级不下降
// 5. workflow_status        状态为已知流程状态
// ==========================================

use super::headings::extract_headings;
use super::{RuleDescriptor, RuleError};
use crate::domain::analysis::RuleOutcome;
use crate::domain::fiche::Fiche;
use crate::domain::types::{CompetenceType, WorkflowStatus};
use crate::engine::pedagogy::taxonomy::{contains_ignore_case, detect_level};
use crate::engine::workflow::next_status;
use crate::i18n::{t, t_with_args};

pub const COMPETENCE_TYPES: &str = "competence_types";
pub const OBJECTIVE_ALIGNMENT: &str = "objective_alignment";
pub const PHASE_STRUCTURE: &str = "phase_structure";
pub const TAXONOMIC_PROGRESSION: &str = "taxonomic_progression";
pub const WORKFLOW_STATUS: &str = "workflow_status";

/// 四个教学环节: (i18n key, 可接受的标题写法)
const MANDATED_PHASES: [(&str, &[&str]); 4] = [
    ("phase.introduction", &["introduction"]),
    ("phase.presentation", &["présentation", "presentation"]),
    ("phase.activities", &["activités", "activites", "activities"]),
    ("phase.synthesis", &["synthèse", "synthese", "synthesis"]),
];

pub fn standard_rules() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor {
            id: COMPETENCE_TYPES,
            name_key: "rule.competence_types.name",
            description_key: "rule.competence_types.description",
            evaluate: check_competence_types,
        },
        RuleDescriptor {
            id: OBJECTIVE_ALIGNMENT,
            name_key: "rule.objective_alignment.name",
            description_key: "rule.objective_alignment.description",
            evaluate: check_objective_alignment,
        },
        RuleDescriptor {
            id: PHASE_STRUCTURE,
            name_key: "rule.phase_structure.name",
            description_key: "rule.phase_structure.description",
            evaluate: check_phase_structure,
        },
        RuleDescriptor {
            id: TAXONOMIC_PROGRESSION,
            name_key: "rule.taxonomic_progression.name",
            description_key: "rule.taxonomic_progression.description",
            evaluate: check_taxonomic_progression,
        },
        RuleDescriptor {
            id: WORKFLOW_STATUS,
            name_key: "rule.workflow_status.name",
            description_key: "rule.workflow_status.description",
            evaluate: check_workflow_status,
        },
    ]
}

fn outcome(suggestions: Vec<String>) -> RuleOutcome {
    RuleOutcome {
        is_valid: suggestions.is_empty(),
        suggestions,
    }
}

/// 四类能力齐全; 失败时逐一列出缺失类型
pub fn check_competence_types(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    let suggestions = CompetenceType::REQUIRED
        .iter()
        .filter(|required| {
            !fiche
                .competences
                .iter()
                .any(|c| c.competence_type == **required)
        })
        .map(|missing| {
            t_with_args(
                "rule.competence_types.suggestion",
                &[("type", missing.as_str())],
            )
        })
        .collect();

    Ok(outcome(suggestions))
}

/// 每个活动描述至少包含一个目标描述（与一致性得分同一口径）
pub fn check_objective_alignment(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    let aligned = fiche.activities.iter().all(|activity| {
        fiche
            .objectives
            .iter()
            .any(|objective| contains_ignore_case(&activity.description, &objective.description))
    });

    if aligned {
        Ok(outcome(Vec::new()))
    } else {
        Ok(outcome(vec![t("rule.objective_alignment.suggestion")]))
    }
}

/// 正文标题覆盖四个教学环节; 失败时列出缺失环节
pub fn check_phase_structure(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    let headings: Vec<String> = extract_headings(&fiche.content)
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let suggestions = MANDATED_PHASES
        .iter()
        .filter(|(_, aliases)| {
            !headings
                .iter()
                .any(|heading| aliases.iter().any(|alias| heading.contains(alias)))
        })
        .map(|(key, _)| {
            t_with_args("rule.phase_structure.suggestion", &[("phase", &t(key))])
        })
        .collect();

    Ok(outcome(suggestions))
}

/// 按活动顺序识别 Bloom 层级,要求不下降; 无法识别的活动跳过
pub fn check_taxonomic_progression(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    let levels: Vec<u8> = fiche
        .activities
        .iter()
        .filter_map(|activity| detect_level(&activity.description))
        .collect();

    if levels.windows(2).all(|pair| pair[0] <= pair[1]) {
        Ok(outcome(Vec::new()))
    } else {
        Ok(outcome(vec![t("rule.taxonomic_progression.suggestion")]))
    }
}

/// 状态必须是已知流程状态; 失败时建议下一状态
pub fn check_workflow_status(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    if WorkflowStatus::parse(&fiche.status).is_some() {
        return Ok(outcome(Vec::new()));
    }

    let next = next_status(&fiche.status);
    Ok(outcome(vec![t_with_args(
        "rule.workflow_status.suggestion",
        &[("status", &fiche.status), ("next", next.as_str())],
    )]))
}
