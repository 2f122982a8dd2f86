//! # 作业配置文件
//!
//! 从 JSON 读取原始作业配置。原始配置只做反序列化，不做语义校验；
//! 校验与规范化在 `composer/validate.rs` 中完成。
//!
//! ## 配置格式
//! ```text
//! {
//!   "structure": "water.xyz",            // 或嵌入结构 {"atoms": [...], "pbc": [...]}
//!   "qm_parameters": {"theory": "NWChem", "method": "HF"},
//!   "mm_parameters": {"theory": "DL_POLY"},
//!   "force_field_file": "water.ff",
//!   "qmmm_parameters": {"qm_region": [0, 1, 2]},
//!   "calculation_parameters": {"gradients": true},
//!   "optimisation_parameters": {"maxcycle": 100}
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `composer/validate.rs`, `commands/` 使用
//! - 使用 `models/`

use crate::error::{ChemshError, Result};
use crate::models::{OptionMap, Structure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 原始结构输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureInput {
    File(PathBuf),
    Embedded(Structure),
}

/// 原始作业配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub structure: StructureInput,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_parameters: Option<OptionMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimisation_parameters: Option<OptionMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qm_parameters: Option<OptionMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm_parameters: Option<OptionMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_field_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmmm_parameters: Option<OptionMap>,
}

impl JobConfig {
    /// 以文件形式引用结构
    #[cfg(test)]
    pub fn with_structure_file(path: impl Into<PathBuf>) -> Self {
        JobConfig {
            structure: StructureInput::File(path.into()),
            calculation_parameters: None,
            optimisation_parameters: None,
            qm_parameters: None,
            mm_parameters: None,
            force_field_file: None,
            qmmm_parameters: None,
        }
    }

    /// 相对路径按 `base` 目录解析
    pub fn resolve_paths(&mut self, base: &Path) {
        if let StructureInput::File(path) = &mut self.structure {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(ff) = &mut self.force_field_file {
            if ff.is_relative() {
                *ff = base.join(&*ff);
            }
        }
    }
}

/// 从 JSON 字符串解析作业配置
pub fn parse_job_config(content: &str, origin: &str) -> Result<JobConfig> {
    serde_json::from_str(content).map_err(|e| ChemshError::JsonError {
        path: origin.to_string(),
        source: e,
    })
}

/// 读取作业配置文件，相对路径按配置文件所在目录解析
pub fn load_job_config(path: &Path) -> Result<JobConfig> {
    if !path.exists() {
        return Err(ChemshError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ChemshError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut config = parse_job_config(&content, &path.display().to_string())?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}
