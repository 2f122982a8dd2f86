//! # collect 命令实现
//!
//! 批量解析作业目录并汇总结果。
//!
//! ## 功能
//! - 扫描含有 `chemsh_job.json` 的作业目录
//! - 并行解析每个作业
//! - 生成终端表格和 CSV 输出
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `batch/`, `composer/`, `interpreter/`
//! - 使用 `utils/output.rs`

use crate::batch::{find_job_dirs, BatchRunner};
use crate::cli::collect::CollectArgs;
use crate::composer::{self, manifest};
use crate::error::{ChemshError, Result};
use crate::interpreter::{self, RetrievedDir};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 单个作业的汇总
#[derive(Debug, Clone)]
struct JobSummary {
    job: String,
    process_label: String,
    /// 作业无法读取时为 None
    exit_status: Option<u32>,
    energy: Option<f64>,
    gradient_norm: Option<f64>,
    message: String,
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Process")]
    process: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Energy (Eh)")]
    energy: String,
    #[tabled(rename = "|Gradient|")]
    gradient: String,
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting ChemShell Results");

    if !args.root.is_dir() {
        return Err(ChemshError::DirectoryNotFound {
            path: args.root.display().to_string(),
        });
    }

    let job_dirs = find_job_dirs(&args.root, args.recursive);
    if job_dirs.is_empty() {
        output::print_warning(&format!(
            "No job directories found under '{}'",
            args.root.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} job directories", job_dirs.len()));

    let summaries =
        BatchRunner::new(args.jobs).map(&job_dirs, "Parsing", |dir| summarize_job(&args.root, dir));

    let succeeded = summaries
        .iter()
        .filter(|s| s.exit_status == Some(0))
        .count();

    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            job: s.job.clone(),
            process: s.process_label.clone(),
            status: match s.exit_status {
                Some(code) => code.to_string(),
                None => "ERR".to_string(),
            },
            energy: s.energy.map(|e| format!("{:.10}", e)).unwrap_or_default(),
            gradient: s
                .gradient_norm
                .map(|g| format!("{:.6}", g))
                .unwrap_or_default(),
        })
        .collect();
    println!("{}", Table::new(&rows));

    for s in summaries.iter().filter(|s| s.exit_status != Some(0)) {
        output::print_warning(&format!("{}: {}", s.job, s.message));
    }

    if let Some(path) = &args.output_csv {
        save_summary_csv(&summaries, path)?;
        output::print_success(&format!("Summary saved to '{}'", path.display()));
    }

    output::print_done(&format!(
        "{} of {} job(s) finished successfully",
        succeeded,
        summaries.len()
    ));

    Ok(())
}

/// 解析一个作业目录
fn summarize_job(root: &Path, dir: &Path) -> JobSummary {
    let job = dir
        .strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(dir)
        .display()
        .to_string();

    let mut summary = JobSummary {
        job,
        process_label: String::new(),
        exit_status: None,
        energy: None,
        gradient_norm: None,
        message: String::new(),
    };

    let loaded = manifest::load_manifest(dir).and_then(|m| {
        let config = composer::validate(&m.config)?;
        let retrieved = RetrievedDir::open(dir)?;
        Ok((m.job.process_label, config, retrieved))
    });

    let (label, config, retrieved) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            summary.message = e.to_string();
            return summary;
        }
    };
    summary.process_label = label;

    let outcome = interpreter::interpret(&retrieved, &config);
    summary.exit_status = Some(interpreter::exit_status(&outcome));
    match outcome {
        Ok(result) => {
            summary.energy = Some(result.energy);
            summary.gradient_norm = result.gradients.as_ref().map(|g| g.norm());
        }
        Err(signal) => summary.message = signal.describe(),
    }

    summary
}

/// 保存汇总到 CSV
fn save_summary_csv(summaries: &[JobSummary], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "job",
        "process_label",
        "exit_status",
        "energy_Eh",
        "gradient_norm",
        "message",
    ])?;

    for s in summaries {
        wtr.write_record([
            s.job.clone(),
            s.process_label.clone(),
            s.exit_status.map(|c| c.to_string()).unwrap_or_default(),
            s.energy.map(|e| format!("{:.10}", e)).unwrap_or_default(),
            s.gradient_norm
                .map(|g| format!("{:.10}", g))
                .unwrap_or_default(),
            s.message.clone(),
        ])?;
    }

    wtr.flush().map_err(|e| ChemshError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{FILE_MANIFEST, FILE_RESULTS, FILE_STDOUT};
    use std::fs;

    const MANIFEST: &str = r#"{
        "process_label": "ChemShell_Single_Point_Calculation_(QM)",
        "script": "",
        "cmdline_params": ["chemshell_input.py"],
        "stdout_name": "output.log",
        "files_to_stage": [],
        "files_to_retrieve": ["output.log", "result.json"],
        "config": {
            "structure": "water.xyz",
            "qm_parameters": {"theory": "NWChem"},
            "calculation_parameters": {"gradients": true}
        }
    }"#;

    fn write_job(dir: &Path, results: Option<&str>) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(FILE_MANIFEST), MANIFEST).unwrap();
        fs::write(dir.join(FILE_STDOUT), "").unwrap();
        if let Some(r) = results {
            fs::write(dir.join(FILE_RESULTS), r).unwrap();
        }
    }

    #[test]
    fn test_summarize_finished_and_failed_jobs() {
        let root = tempfile::tempdir().unwrap();
        write_job(
            &root.path().join("ok"),
            Some(r#"{"energy": [-76.0], "gradients": [[3.0, 4.0]]}"#),
        );
        write_job(&root.path().join("no_results"), None);

        let ok = summarize_job(root.path(), &root.path().join("ok"));
        assert_eq!(ok.job, "ok");
        assert_eq!(ok.exit_status, Some(0));
        assert_eq!(ok.energy, Some(-76.0));
        assert_eq!(ok.gradient_norm, Some(5.0));

        let failed = summarize_job(root.path(), &root.path().join("no_results"));
        assert_eq!(failed.exit_status, Some(303));
        assert!(failed.message.contains("ERROR_RESULTS_FILE_NOT_FOUND"));
    }

    #[test]
    fn test_unreadable_manifest() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_MANIFEST), "{").unwrap();

        let summary = summarize_job(root.path(), &dir);
        assert_eq!(summary.exit_status, None);
        assert!(summary.message.contains("Invalid JSON"));
    }

    #[test]
    fn test_save_summary_csv() {
        let root = tempfile::tempdir().unwrap();
        write_job(&root.path().join("a"), Some(r#"{"energy": [-1.5], "gradients": []}"#));
        let summaries = vec![summarize_job(root.path(), &root.path().join("a"))];

        let csv_path = root.path().join("summary.csv");
        save_summary_csv(&summaries, &csv_path).unwrap();

        let content = fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("job,process_label,exit_status,energy_Eh,gradient_norm,message")
        );
        assert!(lines
            .next()
            .unwrap()
            .starts_with("a,ChemShell_Single_Point_Calculation_(QM),0,-1.5000000000,"));
    }
}
