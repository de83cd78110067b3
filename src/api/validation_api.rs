// ==========================================
// 教学设计单校验引擎 - 校验 API
// ==========================================
// 职责: 单份/批量校验 + 审核流程推进/驳回 + 能力缺口查询
// 前置: 修改教学设计单状态前必须通过权限服务
// 架构: API 层 → FicheValidationService / WorkflowEngine
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::ports::{AllowAllPermissions, CompetencyProvider, PermissionChecker, StaticCompetencyProvider};
use crate::config::EngineThresholds;
use crate::domain::analysis::ValidationResult;
use crate::domain::assessment::Competency;
use crate::domain::fiche::Fiche;
use crate::domain::types::{ValidationStatus, WorkflowStatus};
use crate::domain::workflow::ValidationWorkflow;
use crate::engine::validation::FicheValidationService;
use chrono::Utc;
use std::sync::Arc;

// ==========================================
// ValidationApi - 校验 API
// ==========================================
pub struct ValidationApi {
    service: Arc<FicheValidationService>,
    permissions: Arc<dyn PermissionChecker>,
    competencies: Arc<dyn CompetencyProvider>,
}

impl ValidationApi {
    /// 创建新的 ValidationApi 实例
    ///
    /// # 参数
    /// - service: 校验编排服务
    /// - permissions: 权限服务
    /// - competencies: 能力/模板服务
    pub fn new(
        service: Arc<FicheValidationService>,
        permissions: Arc<dyn PermissionChecker>,
        competencies: Arc<dyn CompetencyProvider>,
    ) -> Self {
        Self {
            service,
            permissions,
            competencies,
        }
    }

    /// 单机模式: 全部放行 + 空能力表
    pub fn standalone(thresholds: EngineThresholds) -> Self {
        Self::new(
            Arc::new(FicheValidationService::new(thresholds)),
            Arc::new(AllowAllPermissions),
            Arc::new(StaticCompetencyProvider::new()),
        )
    }

    pub fn service(&self) -> &FicheValidationService {
        &self.service
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验单份教学设计单（不做权限检查,永不失败）
    pub fn validate_fiche(&self, fiche: &Fiche) -> ValidationResult {
        self.service.validate_fiche(fiche)
    }

    /// 以指定用户身份校验（需要读权限）
    pub fn validate_for(&self, user_id: &str, fiche: &Fiche) -> ApiResult<ValidationResult> {
        self.ensure(self.permissions.can_read(user_id, fiche), "read", user_id)?;
        Ok(self.service.validate_fiche(fiche))
    }

    /// 批量校验（结果顺序与输入一致）
    pub async fn validate_batch(&self, fiches: Vec<Fiche>) -> Vec<ValidationResult> {
        Arc::clone(&self.service).validate_batch(fiches).await
    }

    /// 人工确认/驳回校验结论（需要审核权限）
    ///
    /// # 返回
    /// 新的校验结果,原结果不变
    pub fn apply_manual_verdict(
        &self,
        user_id: &str,
        fiche: &Fiche,
        result: &ValidationResult,
        verdict: ValidationStatus,
    ) -> ApiResult<ValidationResult> {
        if result.fiche_id != fiche.id {
            return Err(ApiError::InvalidInput(format!(
                "校验结果不属于该教学设计单: result.fiche_id={}, fiche.id={}",
                result.fiche_id, fiche.id
            )));
        }
        self.ensure(self.permissions.can_validate(user_id, fiche), "validate", user_id)?;

        tracing::info!(fiche_id = %fiche.id, user_id, verdict = %verdict, "人工确认校验结论");
        Ok(result.with_manual_verdict(verdict))
    }

    // ==========================================
    // 审核流程
    // ==========================================

    /// 推进审核流程一个阶段
    ///
    /// # 权限
    /// - draft → teacher_review: 写权限（作者提交）
    /// - 其余阶段: 审核权限
    ///
    /// # 返回
    /// 推进后的状态（同时写回 fiche.status）
    pub fn advance_workflow(
        &self,
        fiche: &mut Fiche,
        workflow: &mut ValidationWorkflow,
        user_id: &str,
        comments: &str,
    ) -> ApiResult<WorkflowStatus> {
        self.ensure_consistent(fiche, workflow)?;

        let allowed = match workflow.status {
            WorkflowStatus::Draft => self.permissions.can_write(user_id, fiche),
            _ => self.permissions.can_validate(user_id, fiche),
        };
        self.ensure(allowed, "advance", user_id)?;

        let now = Utc::now();
        let next = self
            .service
            .workflow_engine()
            .advance(workflow, comments, now)?;

        fiche.status = next.as_str().to_string();
        fiche.updated_at = now;

        tracing::info!(fiche_id = %fiche.id, user_id, status = %next, "教学设计单流程推进");
        Ok(next)
    }

    /// 驳回教学设计单（需要审核权限,必须填写意见）
    pub fn reject_fiche(
        &self,
        fiche: &mut Fiche,
        workflow: &mut ValidationWorkflow,
        user_id: &str,
        comments: &str,
    ) -> ApiResult<()> {
        if comments.trim().is_empty() {
            return Err(ApiError::InvalidInput("驳回意见不能为空".to_string()));
        }
        self.ensure_consistent(fiche, workflow)?;
        self.ensure(self.permissions.can_validate(user_id, fiche), "reject", user_id)?;

        let now = Utc::now();
        self.service
            .workflow_engine()
            .reject(workflow, comments, now)?;

        fiche.status = WorkflowStatus::Rejected.as_str().to_string();
        fiche.updated_at = now;

        tracing::info!(fiche_id = %fiche.id, user_id, "教学设计单被驳回");
        Ok(())
    }

    // ==========================================
    // 能力缺口
    // ==========================================

    /// 能力服务为该学科+学段定义、但教学设计单未覆盖其类型的能力
    pub async fn missing_competencies(&self, fiche: &Fiche) -> ApiResult<Vec<Competency>> {
        let expected = self
            .competencies
            .get_competencies(&fiche.subject, &fiche.level)
            .await
            .map_err(|e| ApiError::ExternalSync(format!("{:#}", e)))?;

        Ok(expected
            .into_iter()
            .filter(|c| {
                !fiche
                    .competences
                    .iter()
                    .any(|own| own.competence_type == c.competence_type)
            })
            .collect())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn ensure(&self, allowed: bool, action: &str, user_id: &str) -> ApiResult<()> {
        if allowed {
            Ok(())
        } else {
            tracing::warn!(user_id, action, "权限不足");
            Err(ApiError::PermissionDenied {
                action: action.to_string(),
                user: user_id.to_string(),
            })
        }
    }

    /// 已知状态的教学设计单必须与流程状态一致
    fn ensure_consistent(&self, fiche: &Fiche, workflow: &ValidationWorkflow) -> ApiResult<()> {
        match WorkflowStatus::parse(&fiche.status) {
            Some(status) if status != workflow.status => Err(ApiError::InvalidStateTransition {
                from: fiche.status.clone(),
                to: workflow.status.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
