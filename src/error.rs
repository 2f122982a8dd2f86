//! # 统一错误处理模块
//!
//! 定义 chemsh-kit 的错误类型，使用 `thiserror` 派生。
//!
//! - [`ChemshError`]: 应用层错误（I/O、解析、序列化等）
//! - [`ConfigError`]: 作业配置校验错误，在生成任何输入文件之前抛出
//!
//! 计算失败信号 ([`FailureSignal`]) 定义在 `interpreter/` 中，这里只负责包装。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 使用 `interpreter/signal.rs`

use crate::interpreter::FailureSignal;
use thiserror::Error;

/// 作业配置校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error(
        "Structure file '{filename}' must be either an '.xyz', '.pun' or '.cjson' formatted structure file"
    )]
    InvalidStructureFormat { filename: String },

    #[error(
        "The following {section} keys are invalid: {}. Valid keys are: {}",
        keys.join(", "),
        allowed.join(", ")
    )]
    InvalidOptionKey {
        section: String,
        keys: Vec<String>,
        allowed: Vec<String>,
    },

    #[error("The {section} parameter '{key}' must be of type {expected}")]
    InvalidOptionType {
        section: String,
        key: String,
        expected: String,
    },

    #[error(
        "The {section} parameter '{key}' has invalid value '{value}'. Allowed values are: {}",
        allowed.join(", ")
    )]
    InvalidOptionValue {
        section: String,
        key: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("QM/MM coupling requires qmmm_parameters with a 'qm_region' atom index list")]
    MissingQmmmRegion,

    #[error("At least one QM or MM theory interface must be configured")]
    MissingTheory,

    #[error("The MM theory '{theory}' requires a force field file")]
    MissingForceField { theory: String },

    #[error("A force field file was given without any MM theory parameters")]
    UnusedForceField,
}

/// chemsh-kit 统一错误类型
#[derive(Error, Debug)]
pub enum ChemshError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 作业配置与计算结果
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid job configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.describe())]
    Calculation(#[from] FailureSignal),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ChemshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_message_lists_keys() {
        let err = ConfigError::InvalidOptionKey {
            section: "qm_parameters".to_string(),
            keys: vec!["bogus_key".to_string()],
            allowed: vec!["theory".to_string(), "method".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("bogus_key"));
        assert!(msg.contains("theory, method"));
    }

    #[test]
    fn test_failure_signal_wraps_with_code() {
        let err: ChemshError = FailureSignal::MissingFinalEnergy.into();
        assert!(err.to_string().contains("301"));
    }
}
