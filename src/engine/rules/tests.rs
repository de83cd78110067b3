use super::builtin::*;
use super::*;
use crate::domain::fiche::{Activity, Competence, Objective};
use crate::domain::types::CompetenceType;

// ==========================================
// 测试辅助函数
// ==========================================

fn competence(id: &str, competence_type: CompetenceType) -> Competence {
    Competence {
        id: id.to_string(),
        competence_type,
        description: "d".to_string(),
    }
}

fn activity(id: &str, description: &str, phase: i32) -> Activity {
    Activity {
        id: id.to_string(),
        description: description.to_string(),
        duration: 15,
        phase,
        materials: Vec::new(),
        strategies: Vec::new(),
    }
}

fn objective(id: &str, description: &str) -> Objective {
    Objective {
        id: id.to_string(),
        description: description.to_string(),
        verbs: Vec::new(),
    }
}

/// 五条规则全部通过的教学设计单
fn complete_fiche() -> Fiche {
    let mut fiche = Fiche::new("F1", "Les fractions", "math", "CM1");
    fiche.competences = vec![
        competence("C1", CompetenceType::Cognitive),
        competence("C2", CompetenceType::Procedural),
        competence("C3", CompetenceType::Social),
        competence("C4", CompetenceType::Attitudinal),
    ];
    fiche.objectives = vec![
        objective("O1", "understand fractions"),
        objective("O2", "apply division"),
    ];
    fiche.activities = vec![
        activity("A1", "Students understand fractions with cards", 1),
        activity("A2", "Pairs apply division to share pizzas", 2),
    ];
    fiche.content =
        "## Introduction\n\n## Présentation\n\n## Activités\n\n## Synthèse\n".to_string();
    fiche.status = "teacher_review".to_string();
    fiche
}

fn failing_rule(_fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    Err(RuleError::Evaluation("boom".to_string()))
}

fn panicking_rule(fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    let sixth = &fiche.activities[5];
    Ok(RuleOutcome {
        is_valid: sixth.duration > 0,
        suggestions: Vec::new(),
    })
}

fn passing_rule(_fiche: &Fiche) -> Result<RuleOutcome, RuleError> {
    Ok(RuleOutcome {
        is_valid: true,
        suggestions: Vec::new(),
    })
}

fn descriptor(id: &'static str, evaluate: RuleFn) -> RuleDescriptor {
    RuleDescriptor {
        id,
        name_key: "rule.competence_types.name",
        description_key: "rule.competence_types.description",
        evaluate,
    }
}

// ==========================================
// 引擎汇总
// ==========================================

#[test]
fn test_complete_fiche_passes_every_rule() {
    let report = RuleEngine::standard().validate_fiche(&complete_fiche());

    assert_eq!(report.results.len(), 5);
    assert!(report.is_valid);
    assert_eq!(report.score, 100);
    assert!(report.results.values().all(|o| o.suggestions.is_empty()));
}

#[test]
fn test_score_is_rounded_pass_rate() {
    let mut fiche = complete_fiche();
    fiche.content = String::new();
    fiche.status = "prepared".to_string();

    let report = RuleEngine::standard().validate_fiche(&fiche);
    assert!(!report.is_valid);
    // 3 / 5
    assert_eq!(report.score, 60);
}

#[test]
fn test_rule_error_is_recorded_as_failure() {
    let engine = RuleEngine::with_rules(vec![
        descriptor("boom", failing_rule),
        descriptor("ok_a", passing_rule),
        descriptor("ok_b", passing_rule),
    ]);

    let report = engine.validate_fiche(&complete_fiche());
    let failed = &report.results["boom"];
    assert!(!failed.is_valid);
    assert_eq!(failed.suggestions.len(), 1);
    assert!(report.results["ok_a"].is_valid);
    // round(100 × 2/3) = 67
    assert_eq!(report.score, 67);
    assert!(!report.is_valid);
}

#[test]
fn test_panicking_rule_is_recorded_as_failure() {
    let engine = RuleEngine::with_rules(vec![
        descriptor("ok", passing_rule),
        descriptor("index_out_of_bounds", panicking_rule),
    ]);

    let report = engine.validate_fiche(&complete_fiche());
    let failed = &report.results["index_out_of_bounds"];
    assert!(!failed.is_valid);
    assert_eq!(failed.suggestions, vec![t("common.validation_error")]);
    assert!(report.results["ok"].is_valid);
    assert_eq!(report.score, 50);
    assert!(!report.is_valid);
}

#[test]
fn test_panic_message_is_readable() {
    let payload = std::panic::catch_unwind(|| panic!("règle cassée")).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "règle cassée");

    let payload = std::panic::catch_unwind(|| panic!("{} activités", 5)).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "5 activités");
}

#[test]
fn test_duplicate_rule_ids_keep_last() {
    let engine = RuleEngine::with_rules(vec![
        descriptor("same", failing_rule),
        descriptor("same", passing_rule),
    ]);

    assert_eq!(engine.rules().len(), 1);
    assert!(engine.validate_fiche(&complete_fiche()).is_valid);
}

#[test]
fn test_empty_rule_set_scores_zero() {
    let report = RuleEngine::with_rules(Vec::new()).validate_fiche(&complete_fiche());
    assert_eq!(report.score, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_validation_is_idempotent() {
    let engine = RuleEngine::standard();
    let mut fiche = complete_fiche();
    fiche.competences.pop();
    fiche.activities.reverse();

    let first = serde_json::to_string(&engine.validate_fiche(&fiche)).unwrap();
    let second = serde_json::to_string(&engine.validate_fiche(&fiche)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_describe_lists_standard_rules() {
    let ids: Vec<String> = RuleEngine::standard()
        .describe()
        .into_iter()
        .map(|info| info.id)
        .collect();
    assert_eq!(
        ids,
        vec![
            COMPETENCE_TYPES,
            OBJECTIVE_ALIGNMENT,
            PHASE_STRUCTURE,
            TAXONOMIC_PROGRESSION,
            WORKFLOW_STATUS
        ]
    );
}

// ==========================================
// 单条规则
// ==========================================

#[test]
fn test_missing_competence_types_are_listed() {
    let mut fiche = complete_fiche();
    fiche.competences = vec![competence("C1", CompetenceType::Cognitive)];

    let outcome = check_competence_types(&fiche).unwrap();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.suggestions.len(), 3);
    assert!(outcome.suggestions[0].contains("procedural"));
    assert!(outcome.suggestions[1].contains("social"));
    assert!(outcome.suggestions[2].contains("attitudinal"));
}

#[test]
fn test_other_competence_type_does_not_count() {
    let mut fiche = complete_fiche();
    fiche.competences[3] = competence("C4", CompetenceType::Other);

    let outcome = check_competence_types(&fiche).unwrap();
    assert_eq!(outcome.suggestions.len(), 1);
    assert!(outcome.suggestions[0].contains("attitudinal"));
}

#[test]
fn test_unaligned_activity_fails_alignment() {
    let mut fiche = complete_fiche();
    fiche.activities.push(activity("A3", "Récréation", 3));

    let outcome = check_objective_alignment(&fiche).unwrap();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.suggestions.len(), 1);
}

#[test]
fn test_alignment_without_objectives_fails() {
    let mut fiche = complete_fiche();
    fiche.objectives.clear();
    assert!(!check_objective_alignment(&fiche).unwrap().is_valid);

    fiche.activities.clear();
    assert!(check_objective_alignment(&fiche).unwrap().is_valid);
}

#[test]
fn test_missing_phase_headings_are_listed() {
    let mut fiche = complete_fiche();
    fiche.content = "# Introduction\n\nIci la synthèse du cours.\n\n## Activities\n".to_string();

    let outcome = check_phase_structure(&fiche).unwrap();
    assert!(!outcome.is_valid);
    // 正文中的 "synthèse" 不是标题,不计入
    assert_eq!(outcome.suggestions.len(), 2);
}

#[test]
fn test_html_phase_headings_are_accepted() {
    let mut fiche = complete_fiche();
    fiche.content = "<h2>Introduction</h2>\n\n<h2>Presentation</h2>\n\n<h2>Activités</h2>\n\n<h2>Synthesis</h2>\n".to_string();

    assert!(check_phase_structure(&fiche).unwrap().is_valid);
}

#[test]
fn test_multiline_and_inline_html_phase_headings_are_accepted() {
    let mut fiche = complete_fiche();
    fiche.content = "<h2 class=\"phase\">\n  Introduction\n</h2>\n<h2>\n  Présentation\n</h2>\n\n\
                     Déroulé : <h2>Activités</h2> puis <h2><em>Synthèse</em></h2>.\n"
        .to_string();

    let outcome = check_phase_structure(&fiche).unwrap();
    assert!(outcome.is_valid, "{:?}", outcome.suggestions);
    assert_eq!(RuleEngine::standard().validate_fiche(&fiche).score, 100);
}

#[test]
fn test_decreasing_bloom_levels_fail_progression() {
    let mut fiche = complete_fiche();
    fiche.activities = vec![
        activity("A1", "Create a poster", 1),
        activity("A2", "Silent reading", 2),
        activity("A3", "Remember the rule", 3),
    ];

    let outcome = check_taxonomic_progression(&fiche).unwrap();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.suggestions.len(), 1);
}

#[test]
fn test_equal_and_rising_bloom_levels_pass() {
    let mut fiche = complete_fiche();
    fiche.activities = vec![
        activity("A1", "Comprendre la consigne", 1),
        activity("A2", "Expliquer à son voisin", 2),
        activity("A3", "Concevoir un problème", 3),
    ];

    assert!(check_taxonomic_progression(&fiche).unwrap().is_valid);
}

#[test]
fn test_unknown_status_suggests_next() {
    let mut fiche = complete_fiche();
    fiche.status = "prepared".to_string();

    let outcome = check_workflow_status(&fiche).unwrap();
    assert!(!outcome.is_valid);
    assert!(outcome.suggestions[0].contains("prepared"));
    assert!(outcome.suggestions[0].contains("validated"));

    fiche.status = "rejected".to_string();
    assert!(check_workflow_status(&fiche).unwrap().is_valid);
}
