//! # 终端输出工具
//!
//! 统一的带标签输出：`[*]` 信息、`[OK]` 成功、`[WARN]` 警告、
//! `[ERR]` 错误、`[FAIL]` 计算失败信号、`[DONE]` 完成。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `main.rs` 使用
//! - 使用 `colored` crate

use crate::interpreter::FailureSignal;
use colored::Colorize;

const RULE_WIDTH: usize = 64;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印计算失败信号（退出码 + 标签 + 固定说明）
pub fn print_failure(signal: FailureSignal) {
    eprintln!(
        "{} {} {}: {}",
        "[FAIL]".red().bold(),
        format!("[{}]", signal.exit_code()).red(),
        signal.label().bold(),
        signal
    );
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印键值对
pub fn print_field(key: &str, value: &str) {
    println!("    {:<16} {}", key.dimmed(), value);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印文件转换/拷贝消息
pub fn print_conversion(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(RULE_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}
