//! # 结果解析模块
//!
//! 根据取回的文件和作业配置得到 [`ParsedResult`]，或返回 [`FailureSignal`]。
//!
//! ## 检查顺序
//! 1. `output.log` 必须存在
//! 2. `result.json` 必须存在且可读
//! 3. `energy` 取数组第一个元素（也接受标量和数字字符串）
//! 4. 请求了梯度时读取 `gradients`
//! 5. 请求了 Hessian 时读取 `hessian`，与梯度放在同一个输出槽
//! 6. 几何优化必须有 `_dl_find.pun`
//!
//! ## 依赖关系
//! - 被 `commands/parse.rs`, `commands/collect.rs` 使用
//! - 使用 `models/`, `parsers/punch.rs`
//! - 子模块: retrieved, signal

pub mod retrieved;
pub mod signal;

pub use retrieved::{Retrieved, RetrievedDir};
pub use signal::FailureSignal;

use crate::error::Result as ChemshResult;
use crate::models::job::{FILE_DLFIND, FILE_RESULTS, FILE_STDOUT};
use crate::models::{CalculationConfig, FileArtifact, Matrix, ParsedResult, Structure};
use crate::parsers::punch;
use serde_json::Value;

/// 解析一次完成的作业
pub fn interpret(
    retrieved: &dyn Retrieved,
    config: &CalculationConfig,
) -> Result<ParsedResult, FailureSignal> {
    if !retrieved.contains(FILE_STDOUT) {
        return Err(FailureSignal::StdoutMissing);
    }
    if !retrieved.contains(FILE_RESULTS) {
        return Err(FailureSignal::ResultsFileMissing);
    }

    let content = retrieved
        .read_to_string(FILE_RESULTS)
        .map_err(|_| FailureSignal::ResultsFileMissing)?;
    let record: Value =
        serde_json::from_str(&content).map_err(|_| FailureSignal::MissingFinalEnergy)?;
    let record = record
        .as_object()
        .ok_or(FailureSignal::MissingFinalEnergy)?;

    let energy = record
        .get("energy")
        .and_then(extract_energy)
        .ok_or(FailureSignal::MissingFinalEnergy)?;
    let mut result = ParsedResult::new(energy);

    if config.properties.gradients {
        result.gradients = Some(
            record
                .get("gradients")
                .and_then(extract_matrix)
                .ok_or(FailureSignal::MissingGradients)?,
        );
    }
    if config.properties.hessian {
        result.hessian = Some(
            record
                .get("hessian")
                .and_then(extract_matrix)
                .ok_or(FailureSignal::MissingGradients)?,
        );
    }

    if config.is_optimisation() {
        if !retrieved.contains(FILE_DLFIND) {
            return Err(FailureSignal::MissingOptimisedStructureFile);
        }
        let content = retrieved
            .read_to_string(FILE_DLFIND)
            .map_err(|_| FailureSignal::MissingOptimisedStructureFile)?;
        result.optimised_structure = Some(FileArtifact {
            filename: FILE_DLFIND.to_string(),
            content,
        });
    }

    Ok(result)
}

/// 成功为 0，否则为失败信号的退出码
pub fn exit_status(outcome: &Result<ParsedResult, FailureSignal>) -> u32 {
    match outcome {
        Ok(_) => 0,
        Err(signal) => signal.exit_code(),
    }
}

/// 把优化后结构的 punch 文件解码为结构
pub fn optimised_structure(result: &ParsedResult) -> Option<ChemshResult<Structure>> {
    result
        .optimised_structure
        .as_ref()
        .map(|file| punch::parse_punch_content(&file.content, &file.filename))
}

fn extract_energy(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => items.first().and_then(scalar),
        other => scalar(other),
    }
}

/// 数字或数字字符串
fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 矩形二维数值数组
fn extract_matrix(value: &Value) -> Option<Matrix> {
    let rows = value.as_array()?;
    let rows: Option<Vec<Vec<f64>>> = rows
        .iter()
        .map(|row| row.as_array()?.iter().map(|v| v.as_f64()).collect())
        .collect();
    Matrix::from_rows(rows?)
}
