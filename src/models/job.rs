//! # 作业产物数据模型
//!
//! 输入端：脚本生成的结果 [`RenderedJob`]（脚本、需拷入/取回的文件清单）。
//! 输出端：结果解析得到的 [`ParsedResult`]。
//!
//! ## 依赖关系
//! - 被 `composer/`, `interpreter/`, `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ChemShell 输入脚本文件名（驱动程序唯一的命令行参数）
pub const FILE_SCRIPT: &str = "chemshell_input.py";
/// 标准输出捕获文件
pub const FILE_STDOUT: &str = "output.log";
/// DL-FIND 优化器输出的 punch 文件
pub const FILE_DLFIND: &str = "_dl_find.pun";
/// 嵌入结构写出的临时文件
pub const FILE_TMP_STRUCTURE: &str = "input_structure.xyz";
/// 结构化结果文件
pub const FILE_RESULTS: &str = "result.json";
/// `prepare` 写出的作业清单
pub const FILE_MANIFEST: &str = "chemsh_job.json";

/// 需要拷入执行目录的文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedFile {
    /// 来源输入槽 (`structure` / `force_field_file`)
    pub source_id: String,
    /// 源文件路径
    pub source_path: PathBuf,
    /// 执行目录中的目标文件名
    pub dest_path: String,
}

/// 生成的作业描述，生成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedJob {
    pub process_label: String,
    pub script: String,
    /// 驱动程序命令行参数
    pub cmdline_params: Vec<String>,
    pub stdout_name: String,
    pub files_to_stage: Vec<StagedFile>,
    pub files_to_retrieve: Vec<String>,
    /// 嵌入结构的 xyz 文本（写入 [`FILE_TMP_STRUCTURE`]）
    #[serde(skip)]
    pub embedded_structure: Option<String>,
}

/// 二维数值数组（行优先）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<f64>>", try_from = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// 从行列表构造，要求各行长度一致
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Frobenius 范数
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(|c| c.to_vec()).collect()
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = String;

    fn try_from(rows: Vec<Vec<f64>>) -> std::result::Result<Self, Self::Error> {
        Matrix::from_rows(rows).ok_or_else(|| "rows have different lengths".to_string())
    }
}

/// 文件产物（内容对解析器不透明）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileArtifact {
    pub filename: String,
    pub content: String,
}

/// 解析结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResult {
    /// 总能量 (Hartree)
    pub energy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradients: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hessian: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimised_structure: Option<FileArtifact>,
}

/// 注册到输出槽的值
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue<'a> {
    Energy(f64),
    /// 梯度与 Hessian 合并在同一个数组集合中
    Arrays(Vec<(&'static str, &'a Matrix)>),
    File(&'a FileArtifact),
}

impl ParsedResult {
    pub fn new(energy: f64) -> Self {
        ParsedResult {
            energy,
            gradients: None,
            hessian: None,
            optimised_structure: None,
        }
    }

    /// `gradients` 槽中的命名数组，按 gradients, hessian 顺序
    pub fn gradient_arrays(&self) -> Vec<(&'static str, &Matrix)> {
        let mut arrays = Vec::new();
        if let Some(g) = &self.gradients {
            arrays.push(("gradients", g));
        }
        if let Some(h) = &self.hessian {
            arrays.push(("hessian", h));
        }
        arrays
    }

    /// 已填充的输出槽: energy, gradients, optimised_structure
    pub fn slots(&self) -> Vec<(&'static str, OutputValue<'_>)> {
        let mut slots = vec![("energy", OutputValue::Energy(self.energy))];
        let arrays = self.gradient_arrays();
        if !arrays.is_empty() {
            slots.push(("gradients", OutputValue::Arrays(arrays)));
        }
        if let Some(file) = &self.optimised_structure {
            slots.push(("optimised_structure", OutputValue::File(file)));
        }
        slots
    }
}
