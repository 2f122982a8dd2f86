//! # 计算配置数据模型
//!
//! 经过校验、规范化后的作业配置。由 `composer::validate` 从原始 JSON
//! 配置构造，之后不可变；脚本生成与结果解析都只读取它。
//!
//! ## 依赖关系
//! - 使用 `models/structure.rs`, `models/theory.rs`, `models/options.rs`
//! - 被 `composer/`, `interpreter/` 使用

use super::options::OptionMap;
use super::structure::Structure;
use super::theory::{MmTheory, QmTheory};
use std::path::PathBuf;

/// 结构来源
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// 嵌入结构，提交前写入临时 xyz 文件
    Embedded(Structure),
    /// 外部结构文件 (.xyz / .pun / .cjson)
    File(PathBuf),
}

/// 单点计算请求的导数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyRequest {
    pub gradients: bool,
    pub hessian: bool,
}

/// 计算任务
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    SinglePoint,
    /// 几何优化，只转发用户给出的参数
    GeometryOptimisation(OptionMap),
}

/// QM/MM 耦合参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QmmmOptions {
    /// QM 区原子索引（从 0 开始）
    pub qm_region: Vec<u64>,
}

/// 一次作业的完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationConfig {
    pub structure: GeometrySource,
    pub task: Task,
    pub properties: PropertyRequest,
    pub qm: Option<QmTheory>,
    pub mm: Option<MmTheory>,
    pub qmmm: Option<QmmmOptions>,
}

impl CalculationConfig {
    /// QM 与 MM 理论都存在且都不是 NONE 时启用 QM/MM 耦合
    pub fn is_coupled(&self) -> bool {
        self.active_qm().is_some() && self.active_mm().is_some()
    }

    pub fn active_qm(&self) -> Option<&QmTheory> {
        self.qm.as_ref().filter(|t| t.is_active())
    }

    pub fn active_mm(&self) -> Option<&MmTheory> {
        self.mm.as_ref().filter(|t| t.is_active())
    }

    pub fn is_optimisation(&self) -> bool {
        matches!(self.task, Task::GeometryOptimisation(_))
    }

    /// 任务语句中引用的理论对象变量名
    pub fn theory_variable(&self) -> &'static str {
        if self.is_coupled() {
            "qmmm"
        } else if self.active_mm().is_some() {
            "mmtheory"
        } else {
            "qmtheory"
        }
    }

    /// 理论组合标签，按提供了哪些参数决定
    pub fn theory_tag(&self) -> &'static str {
        match (self.qm.is_some(), self.mm.is_some()) {
            (true, true) => "QM/MM",
            (true, false) => "QM",
            _ => "MM",
        }
    }

    /// 作业进程标签
    pub fn process_label(&self) -> String {
        let task = match self.task {
            Task::SinglePoint => "ChemShell_Single_Point_Calculation",
            Task::GeometryOptimisation(_) => "ChemShell_Geometry_Optimisation",
        };
        format!("{}_({})", task, self.theory_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theory::{MmInterface, QmInterface, TheorySpec};

    fn qm(interface: QmInterface) -> QmTheory {
        TheorySpec {
            interface,
            options: OptionMap::new(),
        }
    }

    fn mm(interface: MmInterface) -> MmTheory {
        MmTheory {
            spec: TheorySpec {
                interface,
                options: OptionMap::new(),
            },
            force_field: Some(PathBuf::from("water.ff")),
        }
    }

    fn config(qm_t: Option<QmTheory>, mm_t: Option<MmTheory>, task: Task) -> CalculationConfig {
        CalculationConfig {
            structure: GeometrySource::File(PathBuf::from("water.xyz")),
            task,
            properties: PropertyRequest::default(),
            qm: qm_t,
            mm: mm_t,
            qmmm: None,
        }
    }

    #[test]
    fn test_process_labels() {
        let c = config(Some(qm(QmInterface::NwChem)), None, Task::SinglePoint);
        assert_eq!(c.process_label(), "ChemShell_Single_Point_Calculation_(QM)");

        let c = config(
            Some(qm(QmInterface::NwChem)),
            Some(mm(MmInterface::DlPoly)),
            Task::GeometryOptimisation(OptionMap::new()),
        );
        assert_eq!(c.process_label(), "ChemShell_Geometry_Optimisation_(QM/MM)");

        let c = config(None, Some(mm(MmInterface::Gulp)), Task::SinglePoint);
        assert_eq!(c.process_label(), "ChemShell_Single_Point_Calculation_(MM)");
    }

    #[test]
    fn test_none_interface_disables_coupling() {
        let c = config(
            Some(qm(QmInterface::None)),
            Some(mm(MmInterface::DlPoly)),
            Task::SinglePoint,
        );
        assert!(!c.is_coupled());
        assert_eq!(c.theory_variable(), "mmtheory");
    }

    #[test]
    fn test_coupled_theory_variable() {
        let c = config(
            Some(qm(QmInterface::Orca)),
            Some(mm(MmInterface::Namd)),
            Task::SinglePoint,
        );
        assert!(c.is_coupled());
        assert_eq!(c.theory_variable(), "qmmm");
    }
}
