// ==========================================
// 语料聚合集成测试
// ==========================================
// 测试范围:
// 1. 场景 B: 已备课比例
// 2. 场景 C: 趋势窗口
// 3. 场景 D: 无评价的评价得分
// 4. 校验结果 + 统计投影联动
// ==========================================

mod test_helpers;

use fiche_engine::domain::{EvaluationType, TrendDirection};
use fiche_engine::engine::calculate_trends_with_window;
use fiche_engine::{CorpusAggregator, FicheValidationService, PedagogicalAnalyzer};
use test_helpers::{complete_fiche, FicheBuilder};

#[test]
fn test_scenario_b_preparation_rate() {
    let fiches: Vec<_> = (0..10)
        .map(|i| {
            let status = if i < 3 { "prepared" } else { "draft" };
            FicheBuilder::new(&format!("F{}", i)).status(status).build()
        })
        .collect();

    let report = CorpusAggregator::default().administrative_report(&fiches, &[]);

    assert_eq!(report.preparation_rate, 30.0);
}

#[test]
fn test_scenario_c_second_window_declines() {
    let trends = CorpusAggregator::default()
        .calculate_trends(&[10.0, 12.0, 14.0, 16.0, 9.0, 11.0, 13.0, 15.0]);

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].value, 13.0);
    assert_eq!(trends[0].direction, TrendDirection::Up);
    assert_eq!(trends[1].value, 12.0);
    assert_eq!(trends[1].direction, TrendDirection::Down);
}

#[test]
fn test_first_window_of_zeroes_is_stable() {
    let trends = calculate_trends_with_window(&[0.0, 0.0, 0.0, 0.0], 4);
    assert_eq!(trends[0].direction, TrendDirection::Stable);
}

#[test]
fn test_scenario_d_no_evaluation_scores_zero() {
    let fiche = FicheBuilder::new("FD")
        .objective("fractions")
        .activity("fractions au tableau", 1, 10)
        .build();

    assert_eq!(PedagogicalAnalyzer::default().evaluation_score(&fiche), 0.0);

    let with_one = FicheBuilder::new("FD2")
        .evaluation(EvaluationType::Formative, &[])
        .build();
    // (1/3 + 1/3) / 2
    let score = PedagogicalAnalyzer::default().evaluation_score(&with_one);
    assert!((score - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_corpus_projection_from_validations() {
    let service = FicheValidationService::default();
    let fiches = vec![
        complete_fiche("F1"),
        FicheBuilder::new("F2")
            .teacher("T2")
            .subject("french")
            .status("prepared")
            .created_minutes_ago(5)
            .build(),
    ];
    let validations: Vec<_> = fiches.iter().map(|f| service.validate_fiche(f)).collect();
    let aggregator = CorpusAggregator::default();

    let stats = aggregator.fiche_stats(&fiches, &validations);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_teacher["T1"], 1);
    assert_eq!(stats.by_subject["french"], 1);
    assert_eq!(
        stats.average_score,
        (validations[0].score as f64 + validations[1].score as f64) / 2.0
    );
    assert!(stats.average_validation_time >= 0.0);

    let distribution = aggregator.pedagogical_distribution(&fiches);
    assert_eq!(distribution.competence_types["cognitive"], 1);
    assert_eq!(distribution.teaching_strategies["group_work"], 1);
    assert_eq!(distribution.evaluation_methods["quiz"], 1);
    // F1: min phase 1 → 1/3; F2: 无活动 → 0
    assert!((distribution.progression_quality - 1.0 / 6.0).abs() < 1e-9);
    assert!(distribution.gaps.is_empty());

    let report = aggregator.administrative_report(&fiches, &validations);
    assert_eq!(report.preparation_rate, 50.0);
    assert_eq!(report.program_compliance, 50.0);
    assert!(report.average_pedagogical_quality >= 0.0 && report.average_pedagogical_quality <= 1.0);
}

#[test]
fn test_aggregation_does_not_mutate_snapshot() {
    let fiches = vec![complete_fiche("F1"), complete_fiche("F2")];
    let snapshot = fiches.clone();
    let aggregator = CorpusAggregator::default();

    let _ = aggregator.fiche_stats(&fiches, &[]);
    let _ = aggregator.pedagogical_distribution(&fiches);
    let _ = aggregator.administrative_report(&fiches, &[]);

    assert_eq!(fiches, snapshot);
}
