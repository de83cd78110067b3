use super::*;
use crate::domain::fiche::{Activity, Competence, Evaluation, Objective};
use crate::domain::types::{CompetenceType, EvaluationType};

// ==========================================
// 测试辅助函数
// ==========================================

fn objective(id: &str, description: &str) -> Objective {
    Objective {
        id: id.to_string(),
        description: description.to_string(),
        verbs: Vec::new(),
    }
}

fn activity(id: &str, description: &str, phase: i32) -> Activity {
    Activity {
        id: id.to_string(),
        description: description.to_string(),
        duration: 10,
        phase,
        materials: Vec::new(),
        strategies: Vec::new(),
    }
}

fn evaluation(id: &str, evaluation_type: EvaluationType) -> Evaluation {
    Evaluation {
        id: id.to_string(),
        evaluation_type,
        methods: Vec::new(),
    }
}

fn base_fiche() -> Fiche {
    Fiche::new("F1", "Les fractions", "math", "CM1")
}

// ==========================================
// 一致性
// ==========================================

#[test]
fn test_coherence_one_of_two_pairs() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![
        objective("O1", "understand fractions"),
        objective("O2", "apply division"),
    ];
    fiche.activities = vec![activity("A1", "students understand fractions", 1)];

    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.coherence_score(&fiche), 0.5);
}

#[test]
fn test_coherence_zero_when_either_list_empty() {
    let analyzer = PedagogicalAnalyzer::default();

    let mut fiche = base_fiche();
    fiche.objectives = vec![objective("O1", "understand fractions")];
    assert_eq!(analyzer.coherence_score(&fiche), 0.0);

    let mut fiche = base_fiche();
    fiche.activities = vec![activity("A1", "understand fractions", 1)];
    assert_eq!(analyzer.coherence_score(&fiche), 0.0);
}

#[test]
fn test_coherence_is_case_insensitive() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![objective("O1", "Comprendre les Fractions")];
    fiche.activities = vec![
        activity("A1", "Jeu : comprendre les fractions avec des cartes", 1),
        activity("A2", "Dictée", 2),
    ];

    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.coherence_score(&fiche), 0.5);
}

// ==========================================
// 阶段覆盖
// ==========================================

#[test]
fn test_coherence_empty_objective_matches_every_activity() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![objective("O1", ""), objective("O2", "apply division")];
    fiche.activities = vec![
        activity("A1", "lecture silencieuse", 1),
        activity("A2", "Pairs apply division", 2),
    ];

    // 空描述命中 2 对 + "apply division" 命中 1 对 = 3 / 4
    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.coherence_score(&fiche), 0.75);
}

#[test]
fn test_progression_counts_valid_phases_over_slots() {
    let mut fiche = base_fiche();
    fiche.activities = vec![
        activity("A1", "a", 1),
        activity("A2", "b", 2),
        activity("A3", "c", 3),
        activity("A4", "d", 7),
    ];

    let analyzer = PedagogicalAnalyzer::default();
    // 3 个有效阶段 / (4 × 3)
    assert_eq!(analyzer.progression_score(&fiche), 3.0 / 12.0);
}

#[test]
fn test_progression_zero_without_activities() {
    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.progression_score(&base_fiche()), 0.0);
}

// ==========================================
// Bloom 层级
// ==========================================

#[test]
fn test_taxonomic_level_averages_matching_objectives() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![
        objective("O1", "understand fractions"),
        objective("O2", "apply division"),
        objective("O3", "lecture à voix haute"),
    ];

    let analyzer = PedagogicalAnalyzer::default();
    // (2 + 3) / 2, O3 无命中不计入
    assert_eq!(analyzer.taxonomic_level(&fiche), 2.5);
}

#[test]
fn test_taxonomic_level_defaults_to_three() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![objective("O1", "lecture")];

    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.taxonomic_level(&fiche), 3.0);
    assert_eq!(analyzer.taxonomic_level(&base_fiche()), 3.0);
}

#[test]
fn test_taxonomic_level_reads_verb_tags() {
    let mut fiche = base_fiche();
    fiche.objectives = vec![Objective {
        id: "O1".to_string(),
        description: "poème".to_string(),
        verbs: vec!["créer".to_string()],
    }];

    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.taxonomic_level(&fiche), 6.0);
}

// ==========================================
// 评价得分
// ==========================================

#[test]
fn test_evaluation_score_zero_without_evaluations() {
    let analyzer = PedagogicalAnalyzer::default();
    assert_eq!(analyzer.evaluation_score(&base_fiche()), 0.0);
}

#[test]
fn test_evaluation_score_diversity_and_coverage() {
    let mut fiche = base_fiche();
    fiche.evaluations = vec![
        evaluation("E1", EvaluationType::Formative),
        evaluation("E2", EvaluationType::Formative),
        evaluation("E3", EvaluationType::Summative),
        evaluation("E4", EvaluationType::Peer),
    ];

    let analyzer = PedagogicalAnalyzer::default();
    // diversity = 2/3, coverage = 4/3 (不封顶)
    let expected = (2.0 / 3.0 + 4.0 / 3.0) / 2.0;
    assert!((analyzer.evaluation_score(&fiche) - expected).abs() < 1e-12);
}

// ==========================================
// 合规与加权
// ==========================================

#[test]
fn test_program_compliance_requires_program_and_competence() {
    let analyzer = PedagogicalAnalyzer::default();

    let mut fiche = base_fiche();
    fiche.program_id = Some("P-CM1".to_string());
    assert!(!analyzer.check_program_compliance(&fiche));

    fiche.competences = vec![Competence {
        id: "C1".to_string(),
        competence_type: CompetenceType::Cognitive,
        description: "raisonner".to_string(),
    }];
    assert!(analyzer.check_program_compliance(&fiche));
}

#[test]
fn test_weighted_score_uses_configured_weights() {
    let analyzer = PedagogicalAnalyzer::default();
    let analysis = PedagogicalAnalysis {
        coherence_score: 1.0,
        progression_score: 0.5,
        taxonomic_level: 3.0,
        evaluation_score: 0.5,
        program_compliance: true,
        recommendations: Vec::new(),
    };

    let score = analyzer.weighted_score(&analysis);
    assert!((score - (0.4 + 0.15 + 0.1 + 0.1)).abs() < 1e-12);
}

#[test]
fn test_analyze_collects_recommendations() {
    let analysis = PedagogicalAnalyzer::default().analyze(&base_fiche());

    assert_eq!(analysis.coherence_score, 0.0);
    assert_eq!(analysis.progression_score, 0.0);
    assert_eq!(analysis.taxonomic_level, 3.0);
    assert!(!analysis.program_compliance);
    // 低一致性 / 无阶段覆盖 / 评价单一 / 不合规
    assert_eq!(analysis.recommendations.len(), 4);
}
