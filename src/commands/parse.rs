//! # parse 命令实现
//!
//! 解析单个完成的作业，输出注册的结果槽。
//!
//! ## 功能
//! - 从作业清单重建计算配置
//! - 按固定顺序检查取回文件并解析 `result.json`
//! - 打印能量 / 梯度 / Hessian / 优化结构
//! - 可选保存解析结果 (JSON) 和优化结构 (扩展 XYZ)
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `composer/`, `interpreter/`, `parsers/xyz.rs`
//! - 使用 `utils/output.rs`

use crate::cli::parse::ParseArgs;
use crate::composer::{self, manifest};
use crate::error::{ChemshError, Result};
use crate::interpreter::{self, RetrievedDir};
use crate::models::job::FILE_DLFIND;
use crate::models::OutputValue;
use crate::parsers::xyz::to_xyz_string;
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 结果槽表格行
#[derive(Debug, Clone, Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行 parse 命令
pub fn execute(args: ParseArgs) -> Result<()> {
    output::print_header("Parsing ChemShell Results");

    let manifest = manifest::load_manifest(&args.job_dir)?;
    let config = composer::validate(&manifest.config)?;
    let retrieved = RetrievedDir::open(args.retrieved.as_ref().unwrap_or(&args.job_dir))?;

    output::print_info(&format!(
        "{} (retrieved from '{}')",
        manifest.job.process_label,
        retrieved.root().display()
    ));

    let outcome = interpreter::interpret(&retrieved, &config);
    let status = interpreter::exit_status(&outcome);
    let result = match outcome {
        Ok(result) => result,
        Err(signal) => {
            output::print_warning(&format!("Exit status {}", status));
            return Err(signal.into());
        }
    };

    let rows: Vec<SlotRow> = result
        .slots()
        .into_iter()
        .map(|(slot, value)| SlotRow {
            slot: slot.to_string(),
            value: describe_value(&value),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Some(path) = &args.output {
        let content =
            serde_json::to_string_pretty(&result).map_err(|e| ChemshError::JsonError {
                path: path.display().to_string(),
                source: e,
            })?;
        fs::write(path, content).map_err(|e| ChemshError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        output::print_success(&format!("Parsed result saved to '{}'", path.display()));
    }

    if let Some(path) = &args.structure_xyz {
        match interpreter::optimised_structure(&result) {
            Some(structure) => {
                let structure = structure?;
                fs::write(path, to_xyz_string(&structure)).map_err(|e| {
                    ChemshError::FileWriteError {
                        path: path.display().to_string(),
                        source: e,
                    }
                })?;
                output::print_conversion(FILE_DLFIND, &path.display().to_string());
            }
            None => output::print_warning("No optimised structure in this job; skipping XYZ"),
        }
    }

    output::print_done(&format!("Exit status {}", status));
    Ok(())
}

fn describe_value(value: &OutputValue<'_>) -> String {
    match value {
        OutputValue::Energy(e) => format!("{:.10} Eh", e),
        OutputValue::Arrays(arrays) => arrays
            .iter()
            .map(|(name, m)| {
                let (rows, cols) = m.shape();
                format!("{} {}x{} (norm {:.6})", name, rows, cols, m.norm())
            })
            .collect::<Vec<_>>()
            .join(", "),
        OutputValue::File(file) => format!("{} ({} bytes)", file.filename, file.content.len()),
    }
}
