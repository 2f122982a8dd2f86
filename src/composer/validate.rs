//! # 作业配置校验
//!
//! 将原始 [`JobConfig`] 校验并规范化为 [`CalculationConfig`]。
//! 遇到第一个错误即返回，检查顺序固定：
//! 结构文件格式 → 单点参数 → 优化参数 → QM 理论 → MM 理论 → 力场 → QM/MM 区域。
//!
//! 校验在任何文件写出之前完成，校验失败不会产生部分脚本。
//!
//! ## 依赖关系
//! - 被 `composer/mod.rs`, `commands/` 使用
//! - 使用 `composer/schema.rs`, `composer/config.rs`

use super::config::{JobConfig, StructureInput};
use super::schema::{self, Schema};
use crate::error::ConfigError;
use crate::models::{
    CalculationConfig, GeometrySource, MmInterface, MmTheory, OptionMap, OptionValue,
    PropertyRequest, QmInterface, QmTheory, QmmmOptions, Task, TheorySpec,
};
use std::path::Path;

/// 可接受的结构文件扩展名
pub const STRUCTURE_EXTENSIONS: [&str; 3] = [".xyz", ".pun", ".cjson"];

type Result<T> = std::result::Result<T, ConfigError>;

/// 校验并规范化作业配置
pub fn validate(config: &JobConfig) -> Result<CalculationConfig> {
    let structure = validate_structure(&config.structure)?;

    let properties = match &config.calculation_parameters {
        Some(params) => validate_calculation_parameters(params)?,
        None => PropertyRequest::default(),
    };

    let task = match &config.optimisation_parameters {
        Some(params) => {
            check_options("optimisation_parameters", params, schema::OPTIMISATION)?;
            Task::GeometryOptimisation(params.clone())
        }
        None => Task::SinglePoint,
    };

    let qm = config
        .qm_parameters
        .as_ref()
        .map(validate_qm_parameters)
        .transpose()?;

    let mm = match &config.mm_parameters {
        Some(params) => {
            let spec = validate_mm_parameters(params)?;
            if spec.interface != MmInterface::None && config.force_field_file.is_none() {
                return Err(ConfigError::MissingForceField {
                    theory: spec.interface.to_string(),
                });
            }
            Some(MmTheory {
                spec,
                force_field: config.force_field_file.clone(),
            })
        }
        None if config.force_field_file.is_some() => return Err(ConfigError::UnusedForceField),
        None => None,
    };

    let any_active = qm.as_ref().is_some_and(|t| t.is_active())
        || mm.as_ref().is_some_and(|t| t.is_active());
    if !any_active {
        return Err(ConfigError::MissingTheory);
    }

    let qmmm = match (&qm, &mm) {
        (Some(_), Some(_)) => {
            let params = config
                .qmmm_parameters
                .as_ref()
                .ok_or(ConfigError::MissingQmmmRegion)?;
            Some(validate_qmmm_parameters(params)?)
        }
        _ => match &config.qmmm_parameters {
            Some(params) => Some(validate_qmmm_parameters(params)?),
            None => None,
        },
    };

    Ok(CalculationConfig {
        structure,
        task,
        properties,
        qm,
        mm,
        qmmm,
    })
}

/// 结构文件必须是 .xyz / .pun / .cjson
fn validate_structure(input: &StructureInput) -> Result<GeometrySource> {
    match input {
        StructureInput::Embedded(structure) => Ok(GeometrySource::Embedded(structure.clone())),
        StructureInput::File(path) => {
            let filename = file_name(path);
            if STRUCTURE_EXTENSIONS
                .iter()
                .any(|ext| filename.len() > ext.len() && filename.ends_with(ext))
            {
                Ok(GeometrySource::File(path.clone()))
            } else {
                Err(ConfigError::InvalidStructureFormat { filename })
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn validate_calculation_parameters(params: &OptionMap) -> Result<PropertyRequest> {
    check_options("calculation_parameters", params, schema::SINGLE_POINT)?;
    let flag = |key: &str| params.get(key).and_then(OptionValue::as_bool).unwrap_or(false);
    Ok(PropertyRequest {
        gradients: flag("gradients"),
        hessian: flag("hessian"),
    })
}

fn validate_qm_parameters(params: &OptionMap) -> Result<QmTheory> {
    let name = theory_name("qm_parameters", params)?;
    let interface = QmInterface::from_name(name).ok_or_else(|| ConfigError::InvalidOptionValue {
        section: "qm_parameters".to_string(),
        key: "theory".to_string(),
        value: name.to_string(),
        allowed: QmInterface::ALL
            .iter()
            .map(|t| t.member_name().to_string())
            .collect(),
    })?;

    check_options("qm_parameters", params, schema::QM_THEORY)?;

    for (key, value) in params.iter() {
        let (Some(allowed), Some(text)) = (schema::qm_allowed_values(key), value.as_str()) else {
            continue;
        };
        let upper = text.to_uppercase();
        if !allowed.contains(&upper.as_str()) {
            return Err(ConfigError::InvalidOptionValue {
                section: "qm_parameters".to_string(),
                key: key.to_string(),
                value: text.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    Ok(TheorySpec {
        interface,
        options: params.without("theory"),
    })
}

fn validate_mm_parameters(params: &OptionMap) -> Result<TheorySpec<MmInterface>> {
    let name = theory_name("mm_parameters", params)?;
    let interface = MmInterface::from_name(name).ok_or_else(|| ConfigError::InvalidOptionValue {
        section: "mm_parameters".to_string(),
        key: "theory".to_string(),
        value: name.to_string(),
        allowed: MmInterface::ALL
            .iter()
            .map(|t| t.member_name().to_string())
            .collect(),
    })?;

    check_options("mm_parameters", params, schema::mm_theory(interface))?;

    Ok(TheorySpec {
        interface,
        options: params.without("theory"),
    })
}

fn validate_qmmm_parameters(params: &OptionMap) -> Result<QmmmOptions> {
    check_options("qmmm_parameters", params, schema::QMMM)?;
    let region = match params.get("qm_region") {
        Some(OptionValue::List(items)) => items
            .iter()
            .filter_map(|v| match v {
                OptionValue::Int(i) => u64::try_from(*i).ok(),
                _ => None,
            })
            .collect(),
        _ => return Err(ConfigError::MissingQmmmRegion),
    };
    Ok(QmmmOptions { qm_region: region })
}

/// 读取 `theory` 键，缺失时按空字符串处理（与未知接口同样报错）
fn theory_name<'a>(section: &str, params: &'a OptionMap) -> Result<&'a str> {
    match params.get("theory") {
        None => Ok(""),
        Some(OptionValue::Str(name)) => Ok(name.as_str()),
        Some(_) => Err(ConfigError::InvalidOptionType {
            section: section.to_string(),
            key: "theory".to_string(),
            expected: schema::OptionKind::Str.to_string(),
        }),
    }
}

/// 拒绝未知键，再逐个检查类型
fn check_options(section: &str, params: &OptionMap, schema: Schema) -> Result<()> {
    let invalid: Vec<String> = params
        .keys()
        .filter(|k| schema::lookup(schema, k).is_none())
        .map(|k| k.to_string())
        .collect();
    if !invalid.is_empty() {
        return Err(ConfigError::InvalidOptionKey {
            section: section.to_string(),
            keys: invalid,
            allowed: schema::key_names(schema),
        });
    }

    for (key, value) in params.iter() {
        if let Some(kind) = schema::lookup(schema, key) {
            if !kind.matches(value) {
                return Err(ConfigError::InvalidOptionType {
                    section: section.to_string(),
                    key: key.to_string(),
                    expected: kind.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Structure};
    use std::path::PathBuf;

    fn qm_job(qm: OptionMap) -> JobConfig {
        JobConfig {
            qm_parameters: Some(qm),
            ..JobConfig::with_structure_file("water.xyz")
        }
    }

    fn nwchem() -> OptionMap {
        OptionMap::new().with("theory", "NWChem")
    }

    #[test]
    fn test_structure_extensions() {
        for name in ["water.xyz", "water.pun", "water.cjson"] {
            let job = JobConfig {
                qm_parameters: Some(nwchem()),
                ..JobConfig::with_structure_file(name)
            };
            assert!(validate(&job).is_ok(), "{} should be accepted", name);
        }

        let job = JobConfig {
            qm_parameters: Some(nwchem()),
            ..JobConfig::with_structure_file("water.pdb")
        };
        assert_eq!(
            validate(&job),
            Err(ConfigError::InvalidStructureFormat {
                filename: "water.pdb".to_string()
            })
        );
    }

    #[test]
    fn test_embedded_structure_skips_extension_check() {
        let job = JobConfig {
            structure: StructureInput::Embedded(Structure::molecule(vec![Atom::new(
                "He",
                [0.0, 0.0, 0.0],
            )])),
            ..qm_job(nwchem())
        };
        let config = validate(&job).unwrap();
        assert!(matches!(config.structure, GeometrySource::Embedded(_)));
    }

    #[test]
    fn test_unknown_qm_key_is_rejected() {
        let err = validate(&qm_job(nwchem().with("bogus_key", 1_i64))).unwrap_err();
        match err {
            ConfigError::InvalidOptionKey { keys, allowed, .. } => {
                assert_eq!(keys, vec!["bogus_key".to_string()]);
                assert!(allowed.contains(&"basis".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_rejected_for_any_value_type() {
        for value in [
            OptionValue::Str("x".into()),
            OptionValue::Bool(true),
            OptionValue::Float(1.5),
            OptionValue::List(vec![]),
        ] {
            let err = validate(&qm_job(nwchem().with("bogus_key", value))).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidOptionKey { .. }));
        }
    }

    #[test]
    fn test_qm_option_type_mismatch() {
        let err = validate(&qm_job(nwchem().with("maxiter", 1.5))).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidOptionType {
                section: "qm_parameters".to_string(),
                key: "maxiter".to_string(),
                expected: "int".to_string(),
            }
        );
    }

    #[test]
    fn test_enumerated_values_are_case_insensitive() {
        assert!(validate(&qm_job(nwchem().with("scftype", "rhf"))).is_ok());
        assert!(validate(&qm_job(nwchem().with("scftype", "RHF"))).is_ok());
        assert!(validate(&qm_job(nwchem().with("method", "dft"))).is_ok());

        let err = validate(&qm_job(nwchem().with("method", "MP2"))).unwrap_err();
        match err {
            ConfigError::InvalidOptionValue { key, value, allowed, .. } => {
                assert_eq!(key, "method");
                assert_eq!(value, "MP2");
                assert_eq!(allowed, vec!["HF".to_string(), "DFT".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_theory_interface() {
        let err = validate(&qm_job(OptionMap::new().with("theory", "Psi4"))).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOptionValue { ref key, .. } if key == "theory"
        ));

        let err = validate(&qm_job(OptionMap::new().with("method", "HF"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_options_are_normalised_without_theory_key() {
        let config = validate(&qm_job(nwchem().with("method", "HF"))).unwrap();
        let qm = config.qm.unwrap();
        assert_eq!(qm.interface, QmInterface::NwChem);
        assert_eq!(qm.options.keys().collect::<Vec<_>>(), vec!["method"]);
    }

    #[test]
    fn test_single_point_flags_default_to_false() {
        let config = validate(&qm_job(nwchem())).unwrap();
        assert_eq!(config.properties, PropertyRequest::default());
        assert_eq!(config.task, Task::SinglePoint);

        let job = JobConfig {
            calculation_parameters: Some(OptionMap::new().with("hessian", true)),
            ..qm_job(nwchem())
        };
        let config = validate(&job).unwrap();
        assert!(config.properties.hessian);
        assert!(!config.properties.gradients);
    }

    #[test]
    fn test_single_point_flags_must_be_bool() {
        let job = JobConfig {
            calculation_parameters: Some(OptionMap::new().with("gradients", "yes")),
            ..qm_job(nwchem())
        };
        assert!(matches!(
            validate(&job),
            Err(ConfigError::InvalidOptionType { .. })
        ));
    }

    #[test]
    fn test_optimisation_parameters() {
        let job = JobConfig {
            optimisation_parameters: Some(OptionMap::new().with("maxcycle", 100_i64)),
            ..qm_job(nwchem())
        };
        let config = validate(&job).unwrap();
        assert!(config.is_optimisation());

        let job = JobConfig {
            optimisation_parameters: Some(OptionMap::new().with("residues", 1_i64)),
            ..qm_job(nwchem())
        };
        assert!(matches!(
            validate(&job),
            Err(ConfigError::InvalidOptionKey { .. })
        ));

        let job = JobConfig {
            optimisation_parameters: Some(OptionMap::new().with("maxcycle", "100")),
            ..qm_job(nwchem())
        };
        assert!(matches!(
            validate(&job),
            Err(ConfigError::InvalidOptionType { .. })
        ));
    }

    #[test]
    fn test_mm_schema_depends_on_interface() {
        let job = |mm: OptionMap| JobConfig {
            mm_parameters: Some(mm),
            force_field_file: Some(PathBuf::from("butanol.ff")),
            ..JobConfig::with_structure_file("butanol.xyz")
        };

        let dl_poly = OptionMap::new().with("theory", "DL_POLY").with("rcut", 10.0);
        assert!(validate(&job(dl_poly)).is_ok());

        let gulp = OptionMap::new().with("theory", "GULP").with("rcut", 10.0);
        assert!(matches!(
            validate(&job(gulp)),
            Err(ConfigError::InvalidOptionKey { .. })
        ));
    }

    #[test]
    fn test_force_field_consistency() {
        let job = JobConfig {
            mm_parameters: Some(OptionMap::new().with("theory", "DL_POLY")),
            ..JobConfig::with_structure_file("butanol.xyz")
        };
        assert_eq!(
            validate(&job),
            Err(ConfigError::MissingForceField {
                theory: "DL_POLY".to_string()
            })
        );

        let job = JobConfig {
            force_field_file: Some(PathBuf::from("butanol.ff")),
            ..qm_job(nwchem())
        };
        assert_eq!(validate(&job), Err(ConfigError::UnusedForceField));
    }

    #[test]
    fn test_qmmm_requires_region() {
        let job = JobConfig {
            mm_parameters: Some(OptionMap::new().with("theory", "DL_POLY")),
            force_field_file: Some(PathBuf::from("h2o_dimer.ff")),
            ..qm_job(nwchem())
        };
        assert_eq!(validate(&job), Err(ConfigError::MissingQmmmRegion));

        let region = OptionValue::List(vec![0_i64.into(), 1_i64.into(), 2_i64.into()]);
        let job = JobConfig {
            qmmm_parameters: Some(OptionMap::new().with("qm_region", region)),
            ..job
        };
        let config = validate(&job).unwrap();
        assert!(config.is_coupled());
        assert_eq!(config.qmmm.unwrap().qm_region, vec![0, 1, 2]);
    }

    #[test]
    fn test_qmmm_without_region_key() {
        let job = JobConfig {
            mm_parameters: Some(OptionMap::new().with("theory", "GULP")),
            force_field_file: Some(PathBuf::from("h2o_dimer_gulp.ff")),
            qmmm_parameters: Some(OptionMap::new()),
            ..qm_job(nwchem())
        };
        assert_eq!(validate(&job), Err(ConfigError::MissingQmmmRegion));
    }

    #[test]
    fn test_none_theories_only_is_rejected() {
        let job = qm_job(OptionMap::new().with("theory", "none"));
        assert_eq!(validate(&job), Err(ConfigError::MissingTheory));

        let job = JobConfig::with_structure_file("water.xyz");
        assert_eq!(validate(&job), Err(ConfigError::MissingTheory));
    }
}
