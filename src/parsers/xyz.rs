//! # 扩展 XYZ 格式写出
//!
//! 嵌入结构在提交前写成扩展 XYZ，供 ChemShell `Fragment` 读取。
//!
//! ## 格式说明
//! ```text
//! 3
//! Lattice="0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0" pbc="False False False"
//! O          0.0000000000       0.0000000000       0.1173700000
//! H          0.0000000000       0.7572100000      -0.4694800000
//! H          0.0000000000      -0.7572100000      -0.4694800000
//! ```
//! 最后一行之后没有换行符。
//!
//! ## 依赖关系
//! - 被 `composer/mod.rs`, `commands/` 使用
//! - 使用 `models/structure.rs`, `composer/script.rs`（浮点字面量）

use crate::composer::script::py_float;
use crate::models::Structure;

/// 将结构转换为扩展 XYZ 字符串
pub fn to_xyz_string(structure: &Structure) -> String {
    let mut lines = Vec::with_capacity(structure.atoms.len() + 2);
    lines.push(structure.atoms.len().to_string());

    let lattice: Vec<String> = structure
        .cell
        .iter()
        .flat_map(|row| row.iter().map(|v| py_float(*v)))
        .collect();
    let pbc: Vec<&str> = structure
        .pbc
        .iter()
        .map(|p| if *p { "True" } else { "False" })
        .collect();
    lines.push(format!(
        "Lattice=\"{}\" pbc=\"{}\"",
        lattice.join(" "),
        pbc.join(" ")
    ));

    for atom in &structure.atoms {
        lines.push(format!(
            "{:<6} {:18.10} {:18.10} {:18.10}",
            atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    #[test]
    fn test_molecule_xyz() {
        let s = Structure::molecule(vec![
            Atom::new("O", [0.0, 0.0, 0.11737]),
            Atom::new("H", [0.0, 0.75721, -0.46948]),
        ]);
        let xyz = to_xyz_string(&s);
        let lines: Vec<&str> = xyz.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert_eq!(
            lines[1],
            "Lattice=\"0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0\" pbc=\"False False False\""
        );
        assert_eq!(
            lines[3],
            "H            0.0000000000       0.7572100000      -0.4694800000"
        );
        assert!(!xyz.ends_with('\n'));
    }

    #[test]
    fn test_periodic_cell() {
        let s = Structure {
            atoms: vec![Atom::new("Na", [0.0, 0.0, 0.0])],
            cell: [[5.64, 0.0, 0.0], [0.0, 5.64, 0.0], [0.0, 0.0, 5.64]],
            pbc: [true, true, false],
        };
        let xyz = to_xyz_string(&s);
        assert!(xyz.contains("Lattice=\"5.64 0.0 0.0 0.0 5.64 0.0 0.0 0.0 5.64\""));
        assert!(xyz.contains("pbc=\"True True False\""));
    }
}
