// ==========================================
// 教学设计单校验引擎 - 配置管理器
// ==========================================
// 职责: 阈值/权重/语言配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表不存在时自动创建）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_config_table(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取浮点配置; 格式错误时告警并回退
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随报表导出记录生成时的阈值口径
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

/// 确保 config_kv 表存在
fn ensure_config_table(conn: &Connection) -> rusqlite::Result<()> {
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
    )
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_approval_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(config_keys::APPROVAL_THRESHOLD, 0.6)
    }

    async fn get_pedagogy_weights(&self) -> Result<(f64, f64, f64, f64), Box<dyn Error>> {
        Ok((
            self.get_f64_or_default(config_keys::COHERENCE_WEIGHT, 0.4)?,
            self.get_f64_or_default(config_keys::PROGRESSION_WEIGHT, 0.3)?,
            self.get_f64_or_default(config_keys::EVALUATION_WEIGHT, 0.2)?,
            self.get_f64_or_default(config_keys::COMPLIANCE_WEIGHT, 0.1)?,
        ))
    }

    async fn get_trend_window(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::TREND_WINDOW, "4")?;
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Ok(4),
        }
    }

    async fn get_report_thresholds(&self) -> Result<(f64, f64, f64), Box<dyn Error>> {
        Ok((
            self.get_f64_or_default(config_keys::TRAINING_NEED_THRESHOLD, 0.7)?,
            self.get_f64_or_default(config_keys::STRENGTH_THRESHOLD, 0.8)?,
            self.get_f64_or_default(config_keys::WEAKNESS_THRESHOLD, 0.6)?,
        ))
    }

    async fn get_coherence_warning(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(config_keys::COHERENCE_WARNING, 0.5)
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, "fr")?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok("fr".to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 审核结论
    pub const APPROVAL_THRESHOLD: &str = "approval_threshold";
    pub const COHERENCE_WEIGHT: &str = "coherence_weight";
    pub const PROGRESSION_WEIGHT: &str = "progression_weight";
    pub const EVALUATION_WEIGHT: &str = "evaluation_weight";
    pub const COMPLIANCE_WEIGHT: &str = "compliance_weight";
    pub const COHERENCE_WARNING: &str = "coherence_warning";

    // 趋势
    pub const TREND_WINDOW: &str = "trend_window";

    // 行政报告
    pub const TRAINING_NEED_THRESHOLD: &str = "training_need_threshold";
    pub const STRENGTH_THRESHOLD: &str = "strength_threshold";
    pub const WEAKNESS_THRESHOLD: &str = "weakness_threshold";

    // 消息语言
    pub const LOCALE: &str = "locale";
}
