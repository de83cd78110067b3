// ==========================================
// 趋势计算
// ==========================================
// 按固定窗口求均值,与上一窗口比较
// 首个窗口与 0 比较; 末尾不足一个窗口的数据丢弃
// ==========================================

use crate::domain::stats::ProgressTrend;
use crate::domain::types::TrendDirection;
use crate::i18n::t_with_args;

use super::mean;

/// 按窗口计算趋势
///
/// # 参数
/// - scores: 按时间排序的得分序列
/// - window: 窗口大小（0 时返回空）
pub fn calculate_trends_with_window(scores: &[f64], window: usize) -> Vec<ProgressTrend> {
    if window == 0 {
        return Vec::new();
    }

    let mut previous = 0.0;
    scores
        .chunks_exact(window)
        .enumerate()
        .map(|(index, chunk)| {
            let value = mean(chunk);
            let direction = if value > previous {
                TrendDirection::Up
            } else if value < previous {
                TrendDirection::Down
            } else {
                TrendDirection::Stable
            };
            previous = value;

            let period = index + 1;
            let key = match direction {
                TrendDirection::Up => "trend.up",
                TrendDirection::Down => "trend.down",
                TrendDirection::Stable => "trend.stable",
            };
            let comment = t_with_args(
                key,
                &[
                    ("period", &period.to_string()),
                    ("value", &format!("{:.1}", value)),
                ],
            );

            ProgressTrend {
                period,
                value,
                direction,
                comment,
            }
        })
        .collect()
}
