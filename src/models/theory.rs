//! # 理论接口数据模型
//!
//! ChemShell 支持的 QM / MM 理论接口枚举，以及校验后的理论配置。
//! 接口名在配置边界按大写形式匹配一次，内部逻辑只使用枚举。
//!
//! ## 依赖关系
//! - 被 `models/calculation.rs` 使用
//! - 被 `composer/schema.rs`, `composer/script.rs` 使用

use super::options::OptionMap;
use std::fmt;
use std::path::PathBuf;

/// QM 理论接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QmInterface {
    None,
    Castep,
    Cp2k,
    Dftbp,
    FhiAims,
    GamessUk,
    Gaussian,
    Lsdalton,
    Mndo,
    Molpro,
    NwChem,
    Orca,
    Pyscf,
    Turbomole,
}

impl QmInterface {
    pub const ALL: [QmInterface; 14] = [
        QmInterface::None,
        QmInterface::Castep,
        QmInterface::Cp2k,
        QmInterface::Dftbp,
        QmInterface::FhiAims,
        QmInterface::GamessUk,
        QmInterface::Gaussian,
        QmInterface::Lsdalton,
        QmInterface::Mndo,
        QmInterface::Molpro,
        QmInterface::NwChem,
        QmInterface::Orca,
        QmInterface::Pyscf,
        QmInterface::Turbomole,
    ];

    /// 枚举成员名（配置中的 `theory` 值按大写与之比较）
    pub fn member_name(self) -> &'static str {
        match self {
            QmInterface::None => "NONE",
            QmInterface::Castep => "CASTEP",
            QmInterface::Cp2k => "CP2K",
            QmInterface::Dftbp => "DFTBP",
            QmInterface::FhiAims => "FHI_AIMS",
            QmInterface::GamessUk => "GAMESS_UK",
            QmInterface::Gaussian => "GAUSSIAN",
            QmInterface::Lsdalton => "LSDALTON",
            QmInterface::Mndo => "MNDO",
            QmInterface::Molpro => "MOLPRO",
            QmInterface::NwChem => "NWCHEM",
            QmInterface::Orca => "ORCA",
            QmInterface::Pyscf => "PYSCF",
            QmInterface::Turbomole => "TURBOMOLE",
        }
    }

    /// ChemShell 中对应的类名，`None` 没有对应类
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            QmInterface::None => None,
            QmInterface::Castep => Some("CASTEP"),
            QmInterface::Cp2k => Some("CP2K"),
            QmInterface::Dftbp => Some("DFTBplus"),
            QmInterface::FhiAims => Some("FHIaims"),
            QmInterface::GamessUk => Some("GAMESS_UK"),
            QmInterface::Gaussian => Some("Gaussian"),
            QmInterface::Lsdalton => Some("LSDalton"),
            QmInterface::Mndo => Some("MNDO"),
            QmInterface::Molpro => Some("Molpro"),
            QmInterface::NwChem => Some("NWChem"),
            QmInterface::Orca => Some("ORCA"),
            QmInterface::Pyscf => Some("PySCF"),
            QmInterface::Turbomole => Some("TURBOMOLE"),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_uppercase();
        Self::ALL.into_iter().find(|t| t.member_name() == upper)
    }
}

/// MM 理论接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmInterface {
    None,
    DlPoly,
    Gulp,
    Namd,
}

impl MmInterface {
    pub const ALL: [MmInterface; 4] = [
        MmInterface::None,
        MmInterface::DlPoly,
        MmInterface::Gulp,
        MmInterface::Namd,
    ];

    pub fn member_name(self) -> &'static str {
        match self {
            MmInterface::None => "NONE",
            MmInterface::DlPoly => "DL_POLY",
            MmInterface::Gulp => "GULP",
            MmInterface::Namd => "NAMD",
        }
    }

    pub fn class_name(self) -> Option<&'static str> {
        match self {
            MmInterface::None => None,
            MmInterface::DlPoly => Some("DL_POLY"),
            MmInterface::Gulp => Some("GULP"),
            MmInterface::Namd => Some("NAMD"),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_uppercase();
        Self::ALL.into_iter().find(|t| t.member_name() == upper)
    }
}

impl fmt::Display for QmInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name().unwrap_or("NONE"))
    }
}

impl fmt::Display for MmInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name().unwrap_or("NONE"))
    }
}

/// 校验后的理论配置
///
/// `options` 不含 `theory` 键，接口已单独解析到 `interface`。
#[derive(Debug, Clone, PartialEq)]
pub struct TheorySpec<I> {
    pub interface: I,
    pub options: OptionMap,
}

/// QM 理论配置
pub type QmTheory = TheorySpec<QmInterface>;

/// MM 理论配置（附带力场文件）
#[derive(Debug, Clone, PartialEq)]
pub struct MmTheory {
    pub spec: TheorySpec<MmInterface>,
    pub force_field: Option<PathBuf>,
}

impl QmTheory {
    /// 是否会在脚本中生成理论对象
    pub fn is_active(&self) -> bool {
        self.interface != QmInterface::None
    }
}

impl MmTheory {
    pub fn is_active(&self) -> bool {
        self.spec.interface != MmInterface::None
    }

    /// 力场文件名（脚本中以相对路径引用）
    pub fn force_field_name(&self) -> Option<String> {
        self.force_field
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}
