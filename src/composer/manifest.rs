//! # 作业清单
//!
//! `prepare` 在工作目录中写出 `chemsh_job.json`，记录生成的作业描述和
//! 原始作业配置。`parse` / `collect` 读取它来重建计算配置。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `composer/config.rs`, `models/job.rs`

use super::config::JobConfig;
use super::WorkDir;
use crate::error::{ChemshError, Result};
use crate::models::job::FILE_MANIFEST;
use crate::models::RenderedJob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 工作目录中的作业清单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobManifest {
    #[serde(flatten)]
    pub job: RenderedJob,
    pub config: JobConfig,
}

/// 写出作业清单（pretty JSON）
pub fn write_manifest(workdir: &WorkDir, manifest: &JobManifest) -> Result<PathBuf> {
    let path = workdir.path(FILE_MANIFEST);
    let content = serde_json::to_string_pretty(manifest).map_err(|e| ChemshError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;
    workdir.write(FILE_MANIFEST, content)
}

/// 读取作业目录中的清单
pub fn load_manifest(job_dir: &Path) -> Result<JobManifest> {
    let path = job_dir.join(FILE_MANIFEST);
    if !path.exists() {
        return Err(ChemshError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| ChemshError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ChemshError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}
