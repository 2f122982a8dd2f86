//! # ChemShell punch 文件解析器
//!
//! 读取 punch 文件中的坐标块，得到非周期结构。
//! DL-FIND 优化结束后写出的 `_dl_find.pun` 就是这种格式。
//!
//! ## punch 格式说明
//! ```text
//! block = fragment records = 0
//! block = title records = 1
//! water
//! block = coordinates records = 3
//! O   0.0000000000   0.0000000000   0.2217971585
//! H1  0.0000000000   1.4304226613  -0.8871886340
//! H2  0.0000000000  -1.4304226613  -0.8871886340
//! block = connectivity records = 2
//! ...
//! ```
//! 坐标单位为 bohr，转换为 Å；元素标签去掉末尾编号并规范大小写。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `interpreter/`, `commands/` 使用
//! - 使用 `models/structure.rs`

use crate::error::{ChemshError, Result};
use crate::models::{Atom, Structure};
use regex::Regex;
use std::fs;
use std::path::Path;

/// 1 bohr 对应的 Å
pub const BOHR_TO_ANGSTROM: f64 = 0.529177210903;

/// 解析 punch 文件
pub fn parse_punch_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| ChemshError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_punch_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 punch 格式（只读取第一个坐标块）
pub fn parse_punch_content(content: &str, origin: &str) -> Result<Structure> {
    let parse_error = |reason: String| ChemshError::ParseError {
        format: "punch".to_string(),
        path: origin.to_string(),
        reason,
    };

    let header = Regex::new(r"^\s*block\s*=\s*coordinates\s+records\s*=\s*(\d+)")
        .map_err(|e| parse_error(e.to_string()))?;

    let lines: Vec<&str> = content.lines().collect();
    let (start, count) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| {
            header
                .captures(line)
                .and_then(|c| c[1].parse::<usize>().ok())
                .map(|n| (i + 1, n))
        })
        .ok_or_else(|| parse_error("No coordinates block found".to_string()))?;

    let records = lines.get(start..start + count).ok_or_else(|| {
        parse_error(format!(
            "Coordinates block declares {} records but only {} lines follow",
            count,
            lines.len().saturating_sub(start)
        ))
    })?;

    let mut atoms = Vec::with_capacity(count);
    for (offset, line) in records.iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(parse_error(format!(
                "Invalid coordinate record at line {}",
                start + offset + 1
            )));
        }

        let mut position = [0.0; 3];
        for (k, value) in parts[1..4].iter().enumerate() {
            let bohr: f64 = value.parse().map_err(|_| {
                parse_error(format!(
                    "Invalid coordinate '{}' at line {}",
                    value,
                    start + offset + 1
                ))
            })?;
            position[k] = bohr * BOHR_TO_ANGSTROM;
        }

        atoms.push(Atom::new(normalize_symbol(parts[0]), position));
    }

    Ok(Structure::molecule(atoms))
}

/// 标签转元素符号: "H1" -> "H", "cl" -> "Cl"
fn normalize_symbol(label: &str) -> String {
    let letters: String = label
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let mut chars = letters.chars();
    match chars.next() {
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "block = fragment records = 0
block = title records = 1
water
block = coordinates records = 3
O   0.0000000000   0.0000000000   0.2217971585
H1  0.0000000000   1.4304226613  -0.8871886340
H2  0.0000000000  -1.4304226613  -0.8871886340
block = connectivity records = 2
1 2
1 3
";

    #[test]
    fn test_parse_water_punch() {
        let s = parse_punch_content(WATER, "test").unwrap();
        assert_eq!(s.atoms.len(), 3);
        assert_eq!(s.formula(), "H2O");
        assert_eq!(s.pbc, [false; 3]);
        assert_eq!(s.atoms[1].element, "H");
        assert!((s.atoms[1].position[1] - 1.4304226613 * BOHR_TO_ANGSTROM).abs() < 1e-12);
        assert!((s.atoms[2].position[2] + 0.469479).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("H1"), "H");
        assert_eq!(normalize_symbol("CL12"), "Cl");
        assert_eq!(normalize_symbol("fe"), "Fe");
    }

    #[test]
    fn test_missing_coordinates_block() {
        let err = parse_punch_content("block = title records = 1\nwater\n", "test");
        assert!(matches!(err, Err(ChemshError::ParseError { .. })));
    }

    #[test]
    fn test_truncated_block() {
        let content = "block = coordinates records = 3\nO 0.0 0.0 0.0\nH 0.0 1.0 0.0\n";
        let err = parse_punch_content(content, "test").unwrap_err();
        assert!(err.to_string().contains("declares 3 records"));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let content = "block = coordinates records = 1\nO 0.0 abc 0.0\n";
        assert!(parse_punch_content(content, "test").is_err());
    }
}
