//! # 参数模式表
//!
//! 各参数字典允许的键及其类型：
//! - 单点计算参数 (`calculation_parameters`)
//! - 几何优化参数 (`optimisation_parameters`)
//! - QM 理论参数（所有 QM 接口共用）
//! - MM 理论参数（按接口区分: DL_POLY / GULP / NAMD）
//! - QM/MM 参数 (`qmmm_parameters`)
//!
//! ## 依赖关系
//! - 被 `composer/validate.rs` 使用
//! - 使用 `models/options.rs`, `models/theory.rs`

use crate::models::{MmInterface, OptionValue};
use std::fmt;

/// 参数允许的值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Int,
    Float,
    /// int 或 float
    Number,
    Bool,
    List,
    Dict,
    StrOrList,
    StrOrDict,
    /// 非负整数列表（原子索引）
    IndexList,
}

impl OptionKind {
    pub fn matches(self, value: &OptionValue) -> bool {
        match (self, value) {
            (OptionKind::Str, OptionValue::Str(_)) => true,
            (OptionKind::Int, OptionValue::Int(_)) => true,
            (OptionKind::Float, OptionValue::Float(_)) => true,
            (OptionKind::Number, OptionValue::Int(_) | OptionValue::Float(_)) => true,
            (OptionKind::Bool, OptionValue::Bool(_)) => true,
            (OptionKind::List, OptionValue::List(_)) => true,
            (OptionKind::Dict, OptionValue::Dict(_)) => true,
            (OptionKind::StrOrList, OptionValue::Str(_) | OptionValue::List(_)) => true,
            (OptionKind::StrOrDict, OptionValue::Str(_) | OptionValue::Dict(_)) => true,
            (OptionKind::IndexList, OptionValue::List(items)) => items
                .iter()
                .all(|v| matches!(v, OptionValue::Int(i) if *i >= 0)),
            _ => false,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Str => "str",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Number => "float | int",
            OptionKind::Bool => "bool",
            OptionKind::List => "list",
            OptionKind::Dict => "dict",
            OptionKind::StrOrList => "str | list",
            OptionKind::StrOrDict => "str | dict",
            OptionKind::IndexList => "list[int >= 0]",
        };
        write!(f, "{}", name)
    }
}

/// 键 → 类型表，顺序即错误信息中列出的顺序
pub type Schema = &'static [(&'static str, OptionKind)];

use OptionKind::*;

pub const SINGLE_POINT: Schema = &[("gradients", Bool), ("hessian", Bool)];

pub const OPTIMISATION: Schema = &[
    ("maxcycle", Int),
    ("maxene", Int),
    ("coordinates", Str),
    ("algorithm", Str),
    ("trust_radius", Str),
    ("maxstep", Number),
    ("tolerance", Number),
    ("neb", Bool),
    ("nimages", Int),
    ("nebk", Number),
    ("dimer", Bool),
    ("delta", Number),
    ("tsrelative", Bool),
];

pub const QM_THEORY: Schema = &[
    ("theory", Str),
    ("method", Str),
    ("basis", Str),
    ("charge", Number),
    ("functional", Str),
    ("mult", Number),
    ("scftype", Str),
    ("damping", Bool),
    ("diis", Bool),
    ("direct", Bool),
    ("guess", Str),
    ("maxiter", Int),
    ("path", Str),
    ("pseudopotential", StrOrDict),
    ("restart", Bool),
    ("scf", Float),
];

const MM_GENERIC: Schema = &[("theory", Str), ("input", Str), ("output", Str)];

const MM_DL_POLY: Schema = &[
    ("theory", Str),
    ("input", StrOrList),
    ("output", Str),
    ("berendsen", Float),
    ("delr", Float),
    ("densvar", Int),
    ("dl_field_charges", Bool),
    ("dl_field_types", Bool),
    ("equilibration", Int),
    ("ewald", Float),
    ("potential", Bool),
    ("print", Int),
    ("rcut", Float),
    ("rpad", Float),
    ("rvdw", Float),
    ("scale", Int),
    ("steps", Int),
    ("stack", Int),
    ("restart", Str),
    ("timestep", Float),
];

const MM_GULP: Schema = &[
    ("theory", Str),
    ("input", Str),
    ("output", Str),
    ("molecule", Bool),
    ("conjugate", Bool),
];

const MM_NAMD: Schema = &[
    ("theory", Str),
    ("input", Str),
    ("output", Str),
    ("binary", Bool),
    ("coor", Str),
    ("margin", Float),
    ("par", StrOrList),
    ("pdb", Str),
    ("prefix", Str),
    ("prefix_restart", Str),
    ("psf", Str),
    ("psfgen_options", Dict),
    ("vel", Str),
    ("xsc", Str),
    ("xst", Str),
    ("cutoff", Float),
    ("exclude", Str),
    ("ff_dir", Str),
    ("freq_nonbonded", Int),
    ("freq_full_elect", Int),
    ("merge_cross", Bool),
    ("pairlist_dist", Float),
    ("scaling14", Float),
    ("switching", Bool),
    ("switch_dist", Float),
    ("nsteps_per_cycle", Int),
    ("seed", Int),
    ("constraints", Str),
    ("constraints_ref", Str),
    ("fixed_atoms", Str),
    ("fixed_atoms_forces", Bool),
    ("constant_area", Bool),
    ("flexible_cell", Bool),
    ("group_pressure", Bool),
    ("pme", Bool),
    ("pme_grid_sizes", List),
    ("wrap_all", Bool),
    ("wrap_water", Bool),
];

pub const QMMM: Schema = &[("qm_region", IndexList)];

/// MM 接口对应的模式表
pub fn mm_theory(interface: MmInterface) -> Schema {
    match interface {
        MmInterface::DlPoly => MM_DL_POLY,
        MmInterface::Gulp => MM_GULP,
        MmInterface::Namd => MM_NAMD,
        MmInterface::None => MM_GENERIC,
    }
}

/// QM 参数中取值受限的键（大写比较）
pub fn qm_allowed_values(key: &str) -> Option<&'static [&'static str]> {
    match key {
        "method" => Some(&["HF", "DFT"]),
        "scftype" => Some(&["RHF", "UHF", "ROHF", "RKS", "UKS", "ROKS"]),
        _ => None,
    }
}

pub fn lookup(schema: Schema, key: &str) -> Option<OptionKind> {
    schema.iter().find(|(k, _)| *k == key).map(|(_, kind)| *kind)
}

pub fn key_names(schema: Schema) -> Vec<String> {
    schema.iter().map(|(k, _)| k.to_string()).collect()
}
