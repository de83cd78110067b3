// ==========================================
// 教学设计单校验引擎 - 审核流程实体
// ==========================================
// 红线: history 只追加,不修改
// ==========================================

use crate::domain::types::WorkflowStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 审核流程历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowHistoryEntry {
    pub step: WorkflowStatus,
    pub timestamp: DateTime<Utc>,
    pub comments: String,
}

/// 流程通知（发给下一阶段审核人或作者）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNotification {
    pub step: WorkflowStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// ValidationWorkflow - 审核流程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWorkflow {
    pub status: WorkflowStatus,
    /// 在前进序列中的位置（驳回后保留驳回前位置）
    pub current_step: usize,
    pub history: Vec<WorkflowHistoryEntry>,
    pub notifications: Vec<WorkflowNotification>,
}

impl ValidationWorkflow {
    /// 以指定状态开启流程（无历史）
    pub fn start(status: WorkflowStatus) -> Self {
        Self {
            status,
            current_step: status.step_index().unwrap_or(0),
            history: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: WorkflowStatus, comments: &str, at: DateTime<Utc>) {
        self.history.push(WorkflowHistoryEntry {
            step,
            timestamp: at,
            comments: comments.to_string(),
        });
    }

    pub(crate) fn notify(&mut self, step: WorkflowStatus, message: String, at: DateTime<Utc>) {
        self.notifications.push(WorkflowNotification {
            step,
            message,
            created_at: at,
        });
    }
}

impl Default for ValidationWorkflow {
    fn default() -> Self {
        Self::start(WorkflowStatus::Draft)
    }
}
