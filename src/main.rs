// ==========================================
// 教学设计单校验引擎 - 命令行入口
// ==========================================
// 用法:
//   fiche-engine validate <fiche.json>
//   fiche-engine stats <corpus.json>
//   fiche-engine trends <n1,n2,...>
//   fiche-engine rules
// ==========================================
// 配置: 阈值/语言读取自 config_kv（FICHE_ENGINE_DB_PATH 可覆盖路径）
// 输出: JSON（stdout）; 日志写 stderr（FICHE_ENGINE_LOG_FORMAT=json 输出 JSON 行）
// ==========================================

use anyhow::{anyhow, bail, Context};
use fiche_engine::config::{ConfigManager, EngineConfigReader, EngineThresholds};
use fiche_engine::db::get_default_db_path;
use fiche_engine::domain::Fiche;
use fiche_engine::{i18n, logging, CorpusAggregator, FicheValidationService};
use serde_json::json;
use std::sync::Arc;

const USAGE: &str = "用法: fiche-engine <validate <fiche.json> | stats <corpus.json> | trends <n1,n2,...> | rules>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("教学设计单校验引擎 v{}", fiche_engine::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;

    let thresholds = load_thresholds().await;

    let output = match command.as_str() {
        "validate" => {
            let path = args.next().ok_or_else(|| anyhow!(USAGE))?;
            let fiche: Fiche = read_json(&path)?;
            let service = FicheValidationService::new(thresholds);
            serde_json::to_value(service.validate_fiche(&fiche))?
        }
        "stats" => {
            let path = args.next().ok_or_else(|| anyhow!(USAGE))?;
            let fiches: Vec<Fiche> = read_json(&path)?;
            let service = Arc::new(FicheValidationService::new(thresholds.clone()));
            let validations = service.validate_batch(fiches.clone()).await;
            let aggregator = CorpusAggregator::new(thresholds);
            json!({
                "ficheStats": aggregator.fiche_stats(&fiches, &validations),
                "pedagogicalDistribution": aggregator.pedagogical_distribution(&fiches),
                "administrativeReport": aggregator.administrative_report(&fiches, &validations),
                "scoreTrends": aggregator.score_trends(&validations),
            })
        }
        "trends" => {
            let raw = args.next().ok_or_else(|| anyhow!(USAGE))?;
            let scores = parse_scores(&raw)?;
            serde_json::to_value(CorpusAggregator::new(thresholds).calculate_trends(&scores))?
        }
        "rules" => serde_json::to_value(FicheValidationService::new(thresholds).rule_engine().describe())?,
        other => bail!("未知命令: {}\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 读取配置库中的阈值与语言; 配置库不可用时使用默认值
async fn load_thresholds() -> EngineThresholds {
    let db_path = get_default_db_path();
    tracing::info!("使用配置库: {}", db_path);

    let manager = match ConfigManager::new(&db_path) {
        Ok(manager) => manager,
        Err(e) => {
            tracing::warn!(error = %e, "配置库打开失败,使用默认阈值");
            return EngineThresholds::default();
        }
    };

    match manager.get_locale().await {
        Ok(locale) => i18n::set_locale(&locale),
        Err(e) => tracing::warn!(error = %e, "语言配置读取失败"),
    }

    match manager.load_thresholds().await {
        Ok(thresholds) => thresholds,
        Err(e) => {
            tracing::warn!(error = %e, "阈值配置读取失败,使用默认阈值");
            EngineThresholds::default()
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("无法读取文件: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("JSON 解析失败: {}", path))
}

fn parse_scores(raw: &str) -> anyhow::Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("无效得分: {}", s))
        })
        .collect()
}
