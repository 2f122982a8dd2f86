//! # prepare 命令实现
//!
//! 校验作业配置并生成可提交的 ChemShell 作业。
//!
//! ## 功能
//! - 读取并校验 JSON 作业配置（失败时不写任何文件）
//! - 写出 `chemshell_input.py` 和嵌入结构的临时 xyz
//! - 可选拷入结构文件与力场文件（先确认源文件全部存在）
//! - 写出作业清单 `chemsh_job.json`
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs` 定义的参数
//! - 使用 `composer/`
//! - 使用 `utils/output.rs`

use crate::cli::prepare::PrepareArgs;
use crate::composer::manifest::{write_manifest, JobManifest};
use crate::composer::{self, WorkDir};
use crate::error::{ChemshError, Result};
use crate::models::GeometrySource;
use crate::utils::output;

/// 执行 prepare 命令
pub fn execute(args: PrepareArgs) -> Result<()> {
    output::print_header("Preparing ChemShell Job");

    let raw = composer::load_job_config(&args.config)?;
    let config = composer::validate(&raw)?;

    output::print_info(&format!("Validated '{}'", args.config.display()));
    output::print_field("Process", &config.process_label());
    if let GeometrySource::Embedded(structure) = &config.structure {
        output::print_field(
            "Structure",
            &format!("{} ({} atoms, embedded)", structure.formula(), structure.atoms.len()),
        );
    }

    let job = composer::render(&config);
    if args.dry_run {
        output::print_separator();
        print!("{}", job.script);
        output::print_separator();
        return Ok(());
    }

    let root = args.workdir.as_deref().ok_or_else(|| {
        ChemshError::InvalidArgument("--workdir is required unless --dry-run is given".into())
    })?;
    if args.copy_inputs {
        composer::check_external_inputs(&job)?;
    }

    let workdir = WorkDir::create(root)?;
    let job = composer::prepare_submission(&config, &workdir)?;

    for staged in composer::external_inputs(&job) {
        if args.copy_inputs {
            workdir.copy_in(&staged.source_path, &staged.dest_path)?;
            output::print_conversion(&staged.source_path.display().to_string(), &staged.dest_path);
        } else {
            output::print_field(
                &staged.source_id,
                &format!("{} -> {}", staged.source_path.display(), staged.dest_path),
            );
        }
    }

    let manifest_path = write_manifest(
        &workdir,
        &JobManifest {
            job: job.clone(),
            config: raw,
        },
    )?;

    output::print_field("Retrieve", &job.files_to_retrieve.join(", "));
    output::print_success(&format!("Manifest written to '{}'", manifest_path.display()));
    output::print_done(&format!(
        "Job ready in '{}': run `chemsh {}`",
        workdir.root().display(),
        job.cmdline_params.join(" ")
    ));

    Ok(())
}
