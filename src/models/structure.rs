//! # 分子结构数据模型
//!
//! 嵌入在作业配置中的结构（元素 + 笛卡尔坐标 + 周期性标记），
//! 以及从 ChemShell punch 文件解析得到的结构。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `composer/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 分子/周期结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 晶胞矩阵，非周期体系全为零
    #[serde(default)]
    pub cell: [[f64; 3]; 3],

    /// 三个方向上的周期性
    #[serde(default)]
    pub pbc: [bool; 3],
}

impl Structure {
    /// 创建非周期结构
    pub fn molecule(atoms: Vec<Atom>) -> Self {
        Structure {
            atoms,
            cell: [[0.0; 3]; 3],
            pbc: [false; 3],
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
