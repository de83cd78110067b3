// ==========================================
// 教学设计单校验引擎 - 审核流程状态机
// ==========================================
// 职责:
// - 六阶段线性审核流程推进（只前进,驳回除外）
// - 由结构/教学法分析推导粗粒度结论
// ==========================================
// 红线: 结论 APPROVED/NEEDS_REVISION 由引擎推导,REJECTED 仅人工设置
// ==========================================

use crate::config::EngineThresholds;
use crate::domain::analysis::{ActivityAnalysis, CompetenceAnalysis};
use crate::domain::fiche::Fiche;
use crate::domain::types::{ValidationStatus, WorkflowStatus};
use crate::domain::workflow::ValidationWorkflow;
use crate::i18n::t_with_args;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("流程已结束: status={status}")]
    AlreadyTerminal { status: WorkflowStatus },

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidTransition {
        from: WorkflowStatus,
        to: WorkflowStatus,
    },
}

/// 当前状态的下一步
///
/// - 序列内: 紧随其后的状态
/// - validated 或未知状态: validated
/// - rejected: 回到 draft 重新提交
pub fn next_status(current: &str) -> WorkflowStatus {
    match WorkflowStatus::parse(current) {
        Some(WorkflowStatus::Rejected) => WorkflowStatus::Draft,
        Some(status) => status
            .step_index()
            .and_then(|i| WorkflowStatus::SEQUENCE.get(i + 1).copied())
            .unwrap_or(WorkflowStatus::Validated),
        None => WorkflowStatus::Validated,
    }
}

// ==========================================
// WorkflowEngine - 审核流程状态机
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    thresholds: EngineThresholds,
}

impl WorkflowEngine {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self { thresholds }
    }

    /// 教学设计单的下一审核阶段
    pub fn get_next_step(&self, fiche: &Fiche) -> WorkflowStatus {
        next_status(&fiche.status)
    }

    /// 推导粗粒度结论
    ///
    /// NEEDS_REVISION 条件（任一）:
    /// - 任一能力 present=false
    /// - 任一活动三项检查有失败
    /// - 加权教学法得分 < 通过线 (默认 0.6)
    pub fn determine_status(
        &self,
        competences: &[CompetenceAnalysis],
        activities: &[ActivityAnalysis],
        pedagogy_score: f64,
    ) -> ValidationStatus {
        if competences.iter().any(|c| !c.present) {
            return ValidationStatus::NeedsRevision;
        }

        if activities.iter().any(|a| !a.is_valid()) {
            return ValidationStatus::NeedsRevision;
        }

        if pedagogy_score < self.thresholds.approval_threshold {
            return ValidationStatus::NeedsRevision;
        }

        ValidationStatus::Approved
    }

    /// 为一次评估生成流程快照（不修改教学设计单）
    ///
    /// 未知状态按 draft 起步
    pub fn workflow_for(
        &self,
        fiche: &Fiche,
        verdict: ValidationStatus,
        score: u8,
        at: DateTime<Utc>,
    ) -> ValidationWorkflow {
        let current = WorkflowStatus::parse(&fiche.status).unwrap_or(WorkflowStatus::Draft);
        let next = self.get_next_step(fiche);
        let mut workflow = ValidationWorkflow::start(current);

        workflow.record(
            current,
            &t_with_args(
                "workflow.auto_evaluation",
                &[("verdict", &verdict.to_string()), ("score", &score.to_string())],
            ),
            at,
        );

        let key = match verdict {
            ValidationStatus::Approved => "workflow.ready_for_next",
            _ => "workflow.needs_revision",
        };
        workflow.notify(next, t_with_args(key, &[("next", next.as_str())]), at);

        workflow
    }

    /// 推进一个阶段
    ///
    /// # 返回
    /// 推进后的状态
    ///
    /// # 错误
    /// - AlreadyTerminal: 已是 validated
    pub fn advance(
        &self,
        workflow: &mut ValidationWorkflow,
        comments: &str,
        at: DateTime<Utc>,
    ) -> Result<WorkflowStatus, WorkflowError> {
        let next = match workflow.status {
            WorkflowStatus::Validated => {
                return Err(WorkflowError::AlreadyTerminal {
                    status: workflow.status,
                })
            }
            WorkflowStatus::Rejected => WorkflowStatus::Draft,
            current => next_status(current.as_str()),
        };

        workflow.status = next;
        workflow.current_step = next.step_index().unwrap_or(workflow.current_step);
        workflow.record(next, comments, at);
        workflow.notify(
            next,
            t_with_args("workflow.advanced", &[("step", next.as_str())]),
            at,
        );

        tracing::info!(status = %next, step = workflow.current_step, "审核流程推进");
        Ok(next)
    }

    /// 显式驳回
    ///
    /// validated 与 rejected 状态不可驳回
    pub fn reject(
        &self,
        workflow: &mut ValidationWorkflow,
        comments: &str,
        at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if matches!(
            workflow.status,
            WorkflowStatus::Validated | WorkflowStatus::Rejected
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: workflow.status,
                to: WorkflowStatus::Rejected,
            });
        }

        workflow.status = WorkflowStatus::Rejected;
        workflow.record(WorkflowStatus::Rejected, comments, at);
        workflow.notify(
            WorkflowStatus::Rejected,
            t_with_args("workflow.rejected", &[("comments", comments)]),
            at,
        );

        tracing::info!(step = workflow.current_step, "审核流程驳回");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competence(present: bool) -> CompetenceAnalysis {
        CompetenceAnalysis {
            competence_type: crate::domain::types::CompetenceType::Cognitive,
            present,
            score: if present { 1.0 } else { 0.0 },
            recommendations: Vec::new(),
        }
    }

    fn activity(duration_valid: bool) -> ActivityAnalysis {
        ActivityAnalysis {
            id: "A1".to_string(),
            duration_valid,
            material_valid: true,
            phase_valid: true,
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_next_status_sequence() {
        assert_eq!(next_status("draft"), WorkflowStatus::TeacherReview);
        assert_eq!(next_status("teacher_review"), WorkflowStatus::CollegialReview);
        assert_eq!(next_status("collegial_review"), WorkflowStatus::HierarchicalReview);
        assert_eq!(next_status("hierarchical_review"), WorkflowStatus::PedagogicalReview);
        assert_eq!(next_status("pedagogical_review"), WorkflowStatus::Validated);
        assert_eq!(next_status("validated"), WorkflowStatus::Validated);
        assert_eq!(next_status("prepared"), WorkflowStatus::Validated);
        assert_eq!(next_status("rejected"), WorkflowStatus::Draft);
    }

    #[test]
    fn test_determine_status() {
        let engine = WorkflowEngine::default();

        assert_eq!(
            engine.determine_status(&[competence(true)], &[activity(true)], 0.6),
            ValidationStatus::Approved
        );
        assert_eq!(
            engine.determine_status(&[competence(false)], &[activity(true)], 0.9),
            ValidationStatus::NeedsRevision
        );
        assert_eq!(
            engine.determine_status(&[competence(true)], &[activity(false)], 0.9),
            ValidationStatus::NeedsRevision
        );
        assert_eq!(
            engine.determine_status(&[], &[], 0.59),
            ValidationStatus::NeedsRevision
        );
    }

    #[test]
    fn test_advance_through_all_stages() {
        let engine = WorkflowEngine::default();
        let mut workflow = ValidationWorkflow::start(WorkflowStatus::Draft);
        let now = Utc::now();

        for expected in &WorkflowStatus::SEQUENCE[1..] {
            let status = engine.advance(&mut workflow, "ok", now).unwrap();
            assert_eq!(status, *expected);
            assert_eq!(workflow.current_step, expected.step_index().unwrap());
        }

        assert_eq!(workflow.history.len(), 5);
        assert_eq!(workflow.notifications.len(), 5);
        assert_eq!(
            engine.advance(&mut workflow, "again", now),
            Err(WorkflowError::AlreadyTerminal {
                status: WorkflowStatus::Validated
            })
        );
        // 失败的推进不写历史
        assert_eq!(workflow.history.len(), 5);
    }

    #[test]
    fn test_reject_then_resubmit() {
        let engine = WorkflowEngine::default();
        let mut workflow = ValidationWorkflow::start(WorkflowStatus::CollegialReview);
        let now = Utc::now();

        engine.reject(&mut workflow, "objectifs flous", now).unwrap();
        assert_eq!(workflow.status, WorkflowStatus::Rejected);
        assert_eq!(workflow.current_step, 2);
        assert!(engine.reject(&mut workflow, "twice", now).is_err());

        let status = engine.advance(&mut workflow, "corrigée", now).unwrap();
        assert_eq!(status, WorkflowStatus::Draft);
        assert_eq!(workflow.current_step, 0);
        assert_eq!(workflow.history.len(), 2);
    }

    #[test]
    fn test_cannot_reject_validated() {
        let engine = WorkflowEngine::default();
        let mut workflow = ValidationWorkflow::start(WorkflowStatus::Validated);
        assert_eq!(
            engine.reject(&mut workflow, "trop tard", Utc::now()),
            Err(WorkflowError::InvalidTransition {
                from: WorkflowStatus::Validated,
                to: WorkflowStatus::Rejected,
            })
        );
    }

    #[test]
    fn test_workflow_snapshot_for_unknown_status() {
        let engine = WorkflowEngine::default();
        let mut fiche = Fiche::new("F1", "t", "s", "l");
        fiche.status = "prepared".to_string();

        let workflow = engine.workflow_for(&fiche, ValidationStatus::NeedsRevision, 40, Utc::now());
        assert_eq!(workflow.status, WorkflowStatus::Draft);
        assert_eq!(workflow.history.len(), 1);
        assert_eq!(workflow.notifications[0].step, WorkflowStatus::Validated);
        // 教学设计单本身不被修改
        assert_eq!(fiche.status, "prepared");
    }
}
