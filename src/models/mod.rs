//! # 数据模型模块
//!
//! 定义作业配置、理论接口、结构以及作业产物的数据模型。
//!
//! ## 依赖关系
//! - 被 `composer/`, `interpreter/`, `parsers/` 和 `commands/` 使用
//! - 子模块: options, structure, theory, calculation, job

pub mod calculation;
pub mod job;
pub mod options;
pub mod structure;
pub mod theory;

pub use calculation::{CalculationConfig, GeometrySource, PropertyRequest, QmmmOptions, Task};
pub use job::{FileArtifact, Matrix, OutputValue, ParsedResult, RenderedJob, StagedFile};
pub use options::{OptionMap, OptionValue};
pub use structure::{Atom, Structure};
pub use theory::{MmInterface, MmTheory, QmInterface, QmTheory, TheorySpec};
