//! # 解析器模块
//!
//! ChemShell 结构文件的读取与写出。
//!
//! ## 依赖关系
//! - 被 `commands/`, `interpreter/`, `composer/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: punch, xyz

pub mod punch;
pub mod xyz;

use crate::error::{ChemshError, Result};
use crate::models::Structure;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Structure> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pun" => punch::parse_punch_file(path),
        _ => Err(ChemshError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))),
    }
}
