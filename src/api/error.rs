// ==========================================
// 教学设计单校验引擎 - API 层错误类型
// ==========================================
// 职责: 定义 API 层错误类型,把引擎错误转换为可读消息
// 说明: 校验本身不报错,只有权限/流程/同步等带外操作会失败
// ==========================================

use crate::engine::exams::ExamsError;
use crate::engine::workflow::WorkflowError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 权限与流程错误
    // ==========================================
    #[error("权限不足: user={user}, action={action}")]
    PermissionDenied { action: String, user: String },

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 外部协作方错误
    // ==========================================
    #[error("外部系统同步失败: {0}")]
    ExternalSync(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 WorkflowError 转换
// ==========================================
impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::AlreadyTerminal { status } => ApiError::InvalidStateTransition {
                from: status.to_string(),
                to: status.to_string(),
            },
            WorkflowError::InvalidTransition { from, to } => ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
        }
    }
}

// ==========================================
// 从 ExamsError 转换
// ==========================================
impl From<ExamsError> for ApiError {
    fn from(err: ExamsError) -> Self {
        match err {
            ExamsError::SyncFailed(msg) => ApiError::ExternalSync(msg),
            ExamsError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            ExamsError::LockError(msg) => ApiError::Internal(format!("存储锁获取失败: {}", msg)),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::WorkflowStatus;

    #[test]
    fn test_workflow_error_maps_to_state_transition() {
        let err: ApiError = WorkflowError::InvalidTransition {
            from: WorkflowStatus::Validated,
            to: WorkflowStatus::Rejected,
        }
        .into();

        match err {
            ApiError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "validated");
                assert_eq!(to, "rejected");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sync_failure_maps_to_external_sync() {
        let err: ApiError = ExamsError::SyncFailed("timeout".to_string()).into();
        assert!(matches!(err, ApiError::ExternalSync(ref msg) if msg == "timeout"));
        assert!(err.to_string().contains("timeout"));
    }
}
