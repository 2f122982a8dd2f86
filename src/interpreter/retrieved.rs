//! # 取回的作业文件
//!
//! 作业结束后从执行目录取回的文件集合。解析器只通过 [`Retrieved`]
//! 访问文件，磁盘目录和内存集合都可以作为输入。
//!
//! ## 依赖关系
//! - 被 `interpreter/mod.rs`, `commands/` 使用

use crate::error::{ChemshError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 只读的取回文件集合
pub trait Retrieved {
    /// 集合中的文件名
    fn list_names(&self) -> Vec<String>;

    fn read_to_string(&self, name: &str) -> Result<String>;

    fn contains(&self, name: &str) -> bool {
        self.list_names().iter().any(|n| n == name)
    }
}

/// 磁盘上的取回目录（只看顶层文件）
#[derive(Debug, Clone)]
pub struct RetrievedDir {
    root: PathBuf,
}

impl RetrievedDir {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ChemshError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(RetrievedDir { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Retrieved for RetrievedDir {
    fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file())
                    .filter_map(|e| e.file_name().to_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    fn read_to_string(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|e| ChemshError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// 内存中的文件集合
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBundle {
    files: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, content: &str) -> Self {
        self.files.insert(name.to_string(), content.to_string());
        self
    }
}

#[cfg(test)]
impl Retrieved for MemoryBundle {
    fn list_names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn read_to_string(&self, name: &str) -> Result<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| ChemshError::FileNotFound {
                path: name.to_string(),
            })
    }
}
