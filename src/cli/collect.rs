//! # collect 子命令 CLI 定义
//!
//! 批量解析作业目录并汇总能量与状态
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Root directory containing job directories
    pub root: PathBuf,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Write the summary as CSV
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
