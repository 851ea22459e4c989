//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

use crate::config::Config;
use crate::workflow::{QuestionOutcome, QuestionResult};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 限时测验");
    info!(
        "⏱️ 计时: {} 秒 ({:?}), 节拍间隔 {} 毫秒",
        config.timer_duration_secs, config.timer_scope, config.tick_interval_ms
    );
    info!("📁 题库存储: {} (键: {})", config.store_dir, config.catalog_key);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `participant_name`: 参与者名字
/// - `results`: 每道题的结果
pub fn print_final_stats(participant_name: &str, results: &[QuestionResult]) {
    let correct = count(results, |o| matches!(o, QuestionOutcome::Correct));
    let wrong = count(results, |o| matches!(o, QuestionOutcome::Wrong { .. }));
    let timed_out = count(results, |o| matches!(o, QuestionOutcome::TimedOut));

    info!("\n{}", "=".repeat(60));
    info!("📊 {} 的测验统计", participant_name);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 答对: {}/{}", correct, results.len());
    info!("❌ 答错: {}", wrong);
    info!("⏰ 超时: {}", timed_out);
    info!("{}", "=".repeat(60));
}

fn count(results: &[QuestionResult], pred: impl Fn(QuestionOutcome) -> bool) -> usize {
    results.iter().filter(|r| pred(r.outcome)).count()
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars_not_bytes() {
        assert_eq!(truncate_text("你好世界", 2), "你好...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
