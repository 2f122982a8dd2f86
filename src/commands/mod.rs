//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `composer/`, `interpreter/`, `parsers/`, `utils/`
//! - 子模块: prepare, parse, collect, convert

pub mod collect;
pub mod convert;
pub mod parse;
pub mod prepare;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Prepare(args) => prepare::execute(args),
        Commands::Parse(args) => parse::execute(args),
        Commands::Collect(args) => collect::execute(args),
        Commands::Convert(args) => convert::execute(args),
    }
}
