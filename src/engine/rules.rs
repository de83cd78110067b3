// ==========================================
// 教学设计单校验引擎 - 规则引擎
// ==========================================
// 职责: 逐条执行已登记规则,汇总通过率与有效性
// 输入: Fiche
// 输出: 规则 id → {isValid, suggestions} + score + isValid
// ==========================================
// 红线: 规则之间相互独立,不读取彼此结果
// 红线: 单条规则出错记为失败,不中断整批
// ==========================================

pub mod builtin;
pub mod headings;

#[cfg(test)]
mod tests;

use crate::domain::analysis::RuleOutcome;
use crate::domain::fiche::Fiche;
use crate::engine::panic_message;
use crate::i18n::t;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// 规则执行错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("规则执行失败: {0}")]
    Evaluation(String),

    #[error("规则执行崩溃: {0}")]
    Panicked(String),
}

/// 规则判定函数: 纯函数
pub type RuleFn = fn(&Fiche) -> Result<RuleOutcome, RuleError>;

// ==========================================
// RuleDescriptor - 规则描述
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub id: &'static str,
    /// 名称/说明的 i18n key
    pub name_key: &'static str,
    pub description_key: &'static str,
    pub evaluate: RuleFn,
}

impl RuleDescriptor {
    pub fn name(&self) -> String {
        t(self.name_key)
    }

    pub fn description(&self) -> String {
        t(self.description_key)
    }
}

/// 规则说明（供文档/看板枚举）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// 一次规则批量执行的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleReport {
    pub results: BTreeMap<String, RuleOutcome>,
    /// round(100 × 通过数 / 总数)
    pub score: u8,
    pub is_valid: bool,
}

// ==========================================
// RuleEngine - 规则引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<RuleDescriptor>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleEngine {
    /// 内置五条规则
    pub fn standard() -> Self {
        Self::with_rules(builtin::standard_rules())
    }

    /// 自定义规则集（id 重复时后者覆盖前者）
    pub fn with_rules(rules: Vec<RuleDescriptor>) -> Self {
        let mut deduped: Vec<RuleDescriptor> = Vec::with_capacity(rules.len());
        for rule in rules {
            match deduped.iter_mut().find(|r| r.id == rule.id) {
                Some(existing) => *existing = rule,
                None => deduped.push(rule),
            }
        }
        Self { rules: deduped }
    }

    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    /// 枚举规则说明
    pub fn describe(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|rule| RuleInfo {
                id: rule.id.to_string(),
                name: rule.name(),
                description: rule.description(),
            })
            .collect()
    }

    /// 执行单条规则; 出错或崩溃时记为失败并给出通用建议
    pub fn evaluate_rule(&self, rule: &RuleDescriptor, fiche: &Fiche) -> RuleOutcome {
        let evaluated = panic::catch_unwind(AssertUnwindSafe(|| (rule.evaluate)(fiche)))
            .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))));

        match evaluated {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(rule_id = rule.id, fiche_id = %fiche.id, error = %e, "规则执行出错,记为失败");
                RuleOutcome {
                    is_valid: false,
                    suggestions: vec![t("common.validation_error")],
                }
            }
        }
    }

    /// 执行全部规则
    pub fn validate_fiche(&self, fiche: &Fiche) -> RuleReport {
        let results: BTreeMap<String, RuleOutcome> = self
            .rules
            .iter()
            .map(|rule| (rule.id.to_string(), self.evaluate_rule(rule, fiche)))
            .collect();

        let total = results.len();
        let passed = results.values().filter(|o| o.is_valid).count();
        let score = if total > 0 {
            (100.0 * passed as f64 / total as f64).round() as u8
        } else {
            0
        };

        tracing::debug!(fiche_id = %fiche.id, passed, total, score, "规则执行完成");

        RuleReport {
            results,
            score,
            is_valid: passed == total,
        }
    }
}
