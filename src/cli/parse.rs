//! # parse 子命令 CLI 定义
//!
//! 解析单个完成的作业目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use clap::Args;
use std::path::PathBuf;

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Job directory containing chemsh_job.json
    pub job_dir: PathBuf,

    /// Directory holding the retrieved files (defaults to the job directory)
    #[arg(long)]
    pub retrieved: Option<PathBuf>,

    /// Save the parsed result as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the optimised structure as extended XYZ
    #[arg(long)]
    pub structure_xyz: Option<PathBuf>,
}
