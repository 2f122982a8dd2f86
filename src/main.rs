//! # chemsh-kit - ChemShell 作业输入生成与结果解析
//!
//! 把 ChemShell 作业的两端统一成单一可执行文件：
//! 提交前校验配置并生成驱动脚本，作业完成后解析结果文件。
//!
//! ## 子命令
//! - `prepare` - 校验作业配置，生成脚本与作业清单
//! - `parse`   - 解析一个完成的作业
//! - `collect` - 批量汇总作业结果
//! - `convert` - punch 文件转扩展 XYZ
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/         (命令行参数定义)
//!   ├── commands/    (命令执行逻辑)
//!   │     ├── composer/    (配置校验与脚本生成)
//!   │     ├── interpreter/ (结果解析与失败信号)
//!   │     ├── parsers/     (punch / xyz)
//!   │     ├── batch/       (批量与并行处理)
//!   │     └── models/      (数据模型)
//!   ├── utils/       (输出与进度条)
//!   └── error.rs     (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod composer;
mod error;
mod interpreter;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;
use error::ChemshError;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    match commands::run(cli.command) {
        Ok(()) => {}
        Err(ChemshError::Calculation(signal)) => {
            utils::output::print_failure(signal);
            std::process::exit(1);
        }
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            std::process::exit(1);
        }
    }
}
