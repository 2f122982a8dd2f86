//! # 输入生成模块
//!
//! 把作业配置变成可提交的作业：
//! 1. `config`   读取原始 JSON 配置
//! 2. `validate` 校验并规范化为 [`CalculationConfig`]
//! 3. `script`   渲染 ChemShell 脚本
//! 4. [`render`] 汇总脚本、拷入/取回文件清单和进程标签
//! 5. [`prepare_submission`] 把脚本与临时结构写入工作目录
//! 6. `manifest` 记录作业清单，供结果解析时重建配置
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `parsers/xyz.rs`
//! - 子模块: config, manifest, schema, script, validate

pub mod config;
pub mod manifest;
pub mod schema;
pub mod script;
pub mod validate;

pub use config::load_job_config;
pub use script::render_script;
pub use validate::validate;

use crate::error::{ChemshError, Result};
use crate::models::job::{
    FILE_DLFIND, FILE_RESULTS, FILE_SCRIPT, FILE_STDOUT, FILE_TMP_STRUCTURE,
};
use crate::models::{CalculationConfig, GeometrySource, RenderedJob, StagedFile};
use crate::parsers::xyz::to_xyz_string;
use std::fs;
use std::path::{Path, PathBuf};

/// 生成作业描述（纯函数，不做任何 I/O）
pub fn render(config: &CalculationConfig) -> RenderedJob {
    let mut files_to_stage = Vec::new();
    let mut embedded_structure = None;

    match &config.structure {
        GeometrySource::File(path) => files_to_stage.push(StagedFile {
            source_id: "structure".to_string(),
            source_path: path.clone(),
            dest_path: file_name(path),
        }),
        GeometrySource::Embedded(structure) => {
            files_to_stage.push(StagedFile {
                source_id: "structure".to_string(),
                source_path: PathBuf::from(FILE_TMP_STRUCTURE),
                dest_path: FILE_TMP_STRUCTURE.to_string(),
            });
            embedded_structure = Some(to_xyz_string(structure));
        }
    }

    if let Some(ff) = config.mm.as_ref().and_then(|mm| mm.force_field.as_ref()) {
        files_to_stage.push(StagedFile {
            source_id: "force_field_file".to_string(),
            source_path: ff.clone(),
            dest_path: file_name(ff),
        });
    }

    let mut files_to_retrieve = vec![FILE_STDOUT.to_string(), FILE_RESULTS.to_string()];
    if config.is_optimisation() {
        files_to_retrieve.push(FILE_DLFIND.to_string());
    }

    RenderedJob {
        process_label: config.process_label(),
        script: render_script(config),
        cmdline_params: vec![FILE_SCRIPT.to_string()],
        stdout_name: FILE_STDOUT.to_string(),
        files_to_stage,
        files_to_retrieve,
        embedded_structure,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 作业工作目录
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    /// 打开（必要时创建）工作目录
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ChemshError::FileWriteError {
            path: root.display().to_string(),
            source: e,
        })?;
        Ok(WorkDir { root })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 写入文件，返回完整路径
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, contents).map_err(|e| ChemshError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }

    /// 把外部文件拷入工作目录
    pub fn copy_in(&self, source: &Path, name: &str) -> Result<PathBuf> {
        if !source.exists() {
            return Err(ChemshError::FileNotFound {
                path: source.display().to_string(),
            });
        }
        let dest = self.path(name);
        fs::copy(source, &dest).map_err(|e| ChemshError::FileWriteError {
            path: dest.display().to_string(),
            source: e,
        })?;
        Ok(dest)
    }
}

/// 需要从外部拷入的文件（嵌入结构由 [`prepare_submission`] 直接写出）
pub fn external_inputs(job: &RenderedJob) -> impl Iterator<Item = &StagedFile> {
    let embedded = job.embedded_structure.is_some();
    job.files_to_stage
        .iter()
        .filter(move |staged| !(embedded && staged.source_id == "structure"))
}

/// 所有外部输入文件都必须存在
pub fn check_external_inputs(job: &RenderedJob) -> Result<()> {
    match external_inputs(job).find(|staged| !staged.source_path.exists()) {
        Some(missing) => Err(ChemshError::FileNotFound {
            path: missing.source_path.display().to_string(),
        }),
        None => Ok(()),
    }
}

/// 渲染作业并写出脚本与临时结构文件
pub fn prepare_submission(config: &CalculationConfig, workdir: &WorkDir) -> Result<RenderedJob> {
    let job = render(config);

    workdir.write(FILE_SCRIPT, &job.script)?;
    if let Some(xyz) = &job.embedded_structure {
        workdir.write(FILE_TMP_STRUCTURE, xyz)?;
    }

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Structure};

    fn job_config(json: &str) -> CalculationConfig {
        let raw = config::parse_job_config(json, "inline").unwrap();
        validate(&raw).unwrap()
    }

    #[test]
    fn test_qm_single_point_manifest() {
        let c = job_config(r#"{"structure": "water.xyz", "qm_parameters": {"theory": "NWChem"}}"#);
        let job = render(&c);

        assert_eq!(job.process_label, "ChemShell_Single_Point_Calculation_(QM)");
        assert_eq!(job.cmdline_params, vec!["chemshell_input.py"]);
        assert_eq!(job.stdout_name, "output.log");
        assert_eq!(job.files_to_retrieve, vec!["output.log", "result.json"]);
        assert_eq!(job.files_to_stage.len(), 1);
        assert_eq!(job.files_to_stage[0].dest_path, "water.xyz");
        assert!(job.embedded_structure.is_none());
    }

    #[test]
    fn test_optimisation_retrieves_punch_file() {
        let c = job_config(
            r#"{"structure": "water.xyz", "qm_parameters": {"theory": "NWChem"},
                "optimisation_parameters": {"maxcycle": 100}}"#,
        );
        let job = render(&c);
        assert_eq!(job.process_label, "ChemShell_Geometry_Optimisation_(QM)");
        assert_eq!(
            job.files_to_retrieve,
            vec!["output.log", "result.json", "_dl_find.pun"]
        );
        assert!(job.script.contains("job = Opt(theory=qmtheory, maxcycle=100)\n"));
    }

    #[test]
    fn test_force_field_is_staged() {
        let c = job_config(
            r#"{"structure": "inputs/butanol.cjson", "mm_parameters": {"theory": "DL_POLY"},
                "force_field_file": "inputs/butanol.ff"}"#,
        );
        let job = render(&c);
        let ff = job
            .files_to_stage
            .iter()
            .find(|f| f.source_id == "force_field_file")
            .unwrap();
        assert_eq!(ff.dest_path, "butanol.ff");
        assert_eq!(ff.source_path, PathBuf::from("inputs/butanol.ff"));
        assert_eq!(job.process_label, "ChemShell_Single_Point_Calculation_(MM)");
    }

    #[test]
    fn test_render_is_byte_identical() {
        let c = job_config(
            r#"{"structure": "water.xyz",
                "qm_parameters": {"theory": "NWChem", "method": "HF", "basis": "3-21G"},
                "calculation_parameters": {"gradients": true}}"#,
        );
        assert_eq!(render(&c), render(&c));
    }

    #[test]
    fn test_prepare_writes_script_and_embedded_structure() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(dir.path().join("job")).unwrap();

        let c = CalculationConfig {
            structure: GeometrySource::Embedded(Structure::molecule(vec![
                Atom::new("O", [0.0, 0.0, 0.0]),
                Atom::new("H", [0.0, 0.0, 0.96]),
            ])),
            ..job_config(r#"{"structure": "x.xyz", "qm_parameters": {"theory": "PySCF"}}"#)
        };
        let job = prepare_submission(&c, &workdir).unwrap();

        let script = fs::read_to_string(workdir.path(FILE_SCRIPT)).unwrap();
        assert_eq!(script, job.script);
        assert!(script.contains("structure = Fragment(coords='input_structure.xyz')\n"));
        assert!(script.contains("qmtheory = PySCF(frag=structure)\n"));

        let xyz = fs::read_to_string(workdir.path(FILE_TMP_STRUCTURE)).unwrap();
        assert!(xyz.starts_with("2\nLattice="));
        assert_eq!(job.files_to_stage[0].dest_path, FILE_TMP_STRUCTURE);
    }

    #[test]
    fn test_external_inputs_skip_embedded_structure() {
        let c = CalculationConfig {
            structure: GeometrySource::Embedded(Structure::molecule(vec![Atom::new(
                "He",
                [0.0, 0.0, 0.0],
            )])),
            ..job_config(
                r#"{"structure": "x.xyz", "mm_parameters": {"theory": "DL_POLY"},
                    "force_field_file": "/nonexistent/he.ff"}"#,
            )
        };
        let job = render(&c);
        let ids: Vec<&str> = external_inputs(&job).map(|s| s.source_id.as_str()).collect();
        assert_eq!(ids, vec!["force_field_file"]);
        assert!(matches!(
            check_external_inputs(&job),
            Err(ChemshError::FileNotFound { path }) if path.ends_with("he.ff")
        ));
    }

    #[test]
    fn test_check_external_inputs_present() {
        let dir = tempfile::tempdir().unwrap();
        let xyz = dir.path().join("water.xyz");
        fs::write(&xyz, "1\n\nO 0 0 0").unwrap();

        let c = CalculationConfig {
            structure: GeometrySource::File(xyz),
            ..job_config(r#"{"structure": "water.xyz", "qm_parameters": {"theory": "NWChem"}}"#)
        };
        assert!(check_external_inputs(&render(&c)).is_ok());
    }

    #[test]
    fn test_copy_in_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(dir.path()).unwrap();
        let err = workdir.copy_in(Path::new("/nonexistent/water.ff"), "water.ff");
        assert!(matches!(err, Err(ChemshError::FileNotFound { .. })));
    }
}
