//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `prepare`: 校验作业配置并生成 ChemShell 输入
//! - `parse`: 解析一个完成的作业
//! - `collect`: 批量汇总作业结果
//! - `convert`: punch 文件转扩展 XYZ
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: prepare, parse, collect, convert

pub mod collect;
pub mod convert;
pub mod parse;
pub mod prepare;

use clap::{Parser, Subcommand};

/// chemsh-kit - ChemShell 作业输入生成与结果解析工具
#[derive(Parser)]
#[command(name = "chemsh-kit")]
#[command(version)]
#[command(about = "Prepare ChemShell jobs and interpret their results", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a job configuration and write the ChemShell input script
    Prepare(prepare::PrepareArgs),

    /// Interpret the retrieved files of a finished job
    Parse(parse::ParseArgs),

    /// Summarise the results of many job directories
    Collect(collect::CollectArgs),

    /// Convert ChemShell punch files to extended XYZ
    Convert(convert::ConvertArgs),
}
