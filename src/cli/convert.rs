//! # convert 子命令 CLI 定义
//!
//! 批量转换 ChemShell punch 文件 (.pun -> 扩展 .xyz)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::Args;
use std::path::PathBuf;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input punch file or directory
    pub input: PathBuf,

    /// Output directory for converted files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Glob pattern(s) for input files, comma separated
    #[arg(short, long, default_value = "*.pun")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
