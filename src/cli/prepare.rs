//! # prepare 子命令 CLI 定义
//!
//! 作业配置 (JSON) -> ChemShell 脚本 + 作业清单
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prepare.rs`

use clap::Args;
use std::path::PathBuf;

/// prepare 子命令参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the job configuration file (JSON)
    pub config: PathBuf,

    /// Working directory for the generated job
    #[arg(short, long, required_unless_present = "dry_run")]
    pub workdir: Option<PathBuf>,

    /// Copy the structure and force field files into the working directory
    #[arg(long, default_value_t = false)]
    pub copy_inputs: bool,

    /// Print the rendered script without writing any files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
