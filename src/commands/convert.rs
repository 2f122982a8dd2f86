//! # convert 命令实现
//!
//! 批量把 ChemShell punch 文件转换为扩展 XYZ。
//!
//! ## 功能
//! - 单文件或目录输入，glob 模式过滤
//! - 支持并行处理
//! - 已存在的输出默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/`, `parsers/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::ConvertArgs;
use crate::error::{ChemshError, Result};
use crate::parsers;
use crate::parsers::xyz::to_xyz_string;
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header("Converting punch files to XYZ");

    // 验证输入
    if !args.input.exists() {
        return Err(ChemshError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    // 创建输出目录
    fs::create_dir_all(&args.output).map_err(|e| ChemshError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    // 收集输入文件
    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} files to convert", files.len()));

    let result = BatchRunner::new(args.jobs).run(&files, |input_path| {
        let name = input_path.display().to_string();
        match convert_file(input_path, &args.output, args.overwrite) {
            Ok(true) => ProcessResult::Success(name),
            Ok(false) => ProcessResult::Skipped(name),
            Err(e) => ProcessResult::Failed(name, e.to_string()),
        }
    });

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "Converted {} of {} file(s) into '{}' ({} skipped, {} failed)",
        result.success,
        result.total(),
        args.output.display(),
        result.skipped,
        result.failed
    ));

    Ok(())
}

/// 转换单个文件，返回 false 表示已存在而跳过
fn convert_file(input_path: &Path, output_dir: &Path, overwrite: bool) -> Result<bool> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");
    let output_path = output_dir.join(format!("{}.xyz", stem));

    // 检查是否需要跳过
    if output_path.exists() && !overwrite {
        return Ok(false);
    }

    let structure = parsers::parse_structure_file(input_path)?;

    fs::write(&output_path, to_xyz_string(&structure)).map_err(|e| {
        ChemshError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        }
    })?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUNCH: &str = "block = coordinates records = 2\nH 0.0 0.0 0.0\nH1 0.0 0.0 1.4\n";

    #[test]
    fn test_convert_file_and_skip_existing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("h2.pun");
        fs::write(&input, PUNCH).unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        assert!(convert_file(&input, &out, false).unwrap());
        let xyz = fs::read_to_string(out.join("h2.xyz")).unwrap();
        assert!(xyz.starts_with("2\nLattice="));
        assert!(xyz.ends_with("0.7408480953"));

        assert!(!convert_file(&input, &out, false).unwrap());
        assert!(convert_file(&input, &out, true).unwrap());
    }

    #[test]
    fn test_convert_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("water.txt");
        fs::write(&input, PUNCH).unwrap();
        let err = convert_file(&input, dir.path(), false);
        assert!(matches!(err, Err(ChemshError::UnsupportedFormat(_))));
    }
}
