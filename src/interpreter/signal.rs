//! # 计算失败信号
//!
//! 作业完成后解析结果时可能出现的失败，每种失败带有固定的退出码和说明。
//!
//! | 退出码 | 标签 |
//! |--------|------|
//! | 300 | `ERROR_STDOUT_NOT_FOUND` |
//! | 301 | `ERROR_MISSING_FINAL_ENERGY` |
//! | 302 | `ERROR_MISSING_OPTIMISED_STRUCTURE_FILE` |
//! | 303 | `ERROR_RESULTS_FILE_NOT_FOUND` |
//! | 304 | `ERROR_MISSING_GRADIENTS` |
//!
//! ## 依赖关系
//! - 被 `interpreter/mod.rs`, `error.rs`, `commands/` 使用

use thiserror::Error;

/// 结果解析失败信号
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureSignal {
    #[error("Error accessing the `output.log` ChemShell output file.")]
    StdoutMissing,

    #[error("ChemShell calculation failed to compute a final energy for the given task.")]
    MissingFinalEnergy,

    #[error("ChemShell failed to produced the expected optimised structure file.")]
    MissingOptimisedStructureFile,

    #[error("ChemShell calculation failed to produce the expected results file.")]
    ResultsFileMissing,

    #[error(
        "ChemShell calculation failed to compute the requested gradients or hessian for the given task."
    )]
    MissingGradients,
}

impl FailureSignal {
    pub fn exit_code(self) -> u32 {
        match self {
            FailureSignal::StdoutMissing => 300,
            FailureSignal::MissingFinalEnergy => 301,
            FailureSignal::MissingOptimisedStructureFile => 302,
            FailureSignal::ResultsFileMissing => 303,
            FailureSignal::MissingGradients => 304,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FailureSignal::StdoutMissing => "ERROR_STDOUT_NOT_FOUND",
            FailureSignal::MissingFinalEnergy => "ERROR_MISSING_FINAL_ENERGY",
            FailureSignal::MissingOptimisedStructureFile => {
                "ERROR_MISSING_OPTIMISED_STRUCTURE_FILE"
            }
            FailureSignal::ResultsFileMissing => "ERROR_RESULTS_FILE_NOT_FOUND",
            FailureSignal::MissingGradients => "ERROR_MISSING_GRADIENTS",
        }
    }

    /// `[304] ERROR_MISSING_GRADIENTS: ...`
    pub fn describe(self) -> String {
        format!("[{}] {}: {}", self.exit_code(), self.label(), self)
    }
}
