//! # ChemShell 输入脚本生成
//!
//! 把 [`CalculationConfig`] 渲染成 ChemShell (Python) 脚本。
//! 脚本由驱动程序的 Python 解析器直接执行，字面量格式必须严格一致：
//! - 字符串用单引号，`\` 与 `'` 转义
//! - 布尔值为 `True` / `False`
//! - 浮点数用最短往返表示，整数值补 `.0`，指数写成 `1e-05` / `1e+16`
//! - 列表 `[a, b]`，字典 `{'k': v}`
//!
//! 所有字面量都经过 [`literal`]，这是格式规则唯一的实现位置。
//!
//! ## 脚本结构
//! ```text
//! from chemsh import Fragment
//! structure = Fragment(coords='water.xyz')
//! from chemsh import NWChem
//! qmtheory = NWChem(frag=structure, method='HF')
//! from chemsh import SP
//! job = SP(theory=qmtheory, gradients=False, hessian=False)
//! job.run()
//! job.result.save()
//! ```
//!
//! ## 依赖关系
//! - 被 `composer/mod.rs` 使用
//! - 使用 `models/`

use crate::models::job::FILE_TMP_STRUCTURE;
use crate::models::{CalculationConfig, GeometrySource, OptionMap, OptionValue, Task};

/// 渲染完整脚本（纯函数，同一配置总是得到相同文本）
pub fn render_script(config: &CalculationConfig) -> String {
    let mut lines: Vec<String> = Vec::new();
    let coupled = config.is_coupled();

    // 结构
    lines.push("from chemsh import Fragment".to_string());
    let coords = match &config.structure {
        GeometrySource::File(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        GeometrySource::Embedded(_) => FILE_TMP_STRUCTURE.to_string(),
    };
    lines.push(format!("structure = Fragment(coords={})", quote(&coords)));

    // QM 理论对象，耦合时不直接绑定结构
    if let Some(qm) = config.active_qm() {
        if let Some(class) = qm.interface.class_name() {
            let mut args = Vec::new();
            if !coupled {
                args.push("frag=structure".to_string());
            }
            args.extend(keyword_args(&qm.options));
            lines.push(format!("from chemsh import {}", class));
            lines.push(format!("qmtheory = {}({})", class, args.join(", ")));
        }
    }

    // MM 理论对象，总是引用力场文件
    if let Some(mm) = config.active_mm() {
        if let Some(class) = mm.spec.interface.class_name() {
            let mut args = Vec::new();
            if !coupled {
                args.push("frag=structure".to_string());
            }
            if let Some(ff) = mm.force_field_name() {
                args.push(format!("ff={}", quote(&ff)));
            }
            args.extend(keyword_args(&mm.spec.options));
            lines.push(format!("from chemsh import {}", class));
            lines.push(format!("mmtheory = {}({})", class, args.join(", ")));
        }
    }

    // QM/MM 耦合对象
    if coupled {
        let region = config
            .qmmm
            .as_ref()
            .map(|q| {
                let items: Vec<String> = q.qm_region.iter().map(|i| i.to_string()).collect();
                format!("[{}]", items.join(", "))
            })
            .unwrap_or_else(|| "[]".to_string());
        lines.push("from chemsh import QMMM".to_string());
        lines.push(format!(
            "qmmm = QMMM(frag=structure, qm=qmtheory, mm=mmtheory, qm_region={})",
            region
        ));
    }

    // 任务
    let theory = config.theory_variable();
    match &config.task {
        Task::GeometryOptimisation(params) => {
            let mut args = vec![format!("theory={}", theory)];
            args.extend(keyword_args(params));
            lines.push("from chemsh import Opt".to_string());
            lines.push(format!("job = Opt({})", args.join(", ")));
        }
        Task::SinglePoint => {
            lines.push("from chemsh import SP".to_string());
            lines.push(format!(
                "job = SP(theory={}, gradients={}, hessian={})",
                theory,
                py_bool(config.properties.gradients),
                py_bool(config.properties.hessian)
            ));
        }
    }

    lines.push("job.run()".to_string());
    lines.push("job.result.save()".to_string());

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// `key=value` 形式的关键字参数，保持插入顺序，跳过 `theory`
fn keyword_args(options: &OptionMap) -> Vec<String> {
    options
        .iter()
        .filter(|(key, _)| *key != "theory")
        .map(|(key, value)| format!("{}={}", key, literal(value)))
        .collect()
}

/// 选项值的 Python 字面量
pub fn literal(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(b) => py_bool(*b).to_string(),
        OptionValue::Int(i) => i.to_string(),
        OptionValue::Float(f) => py_float(*f),
        OptionValue::Str(s) => quote(s),
        OptionValue::List(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        OptionValue::Dict(map) => {
            let items: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), literal(v)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// 单引号字符串字面量
fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// 与 Python `repr(float)` 一致的浮点数表示
pub fn py_float(v: f64) -> String {
    if v.is_nan() {
        return "float('nan')".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 {
            "float('inf')".to_string()
        } else {
            "float('-inf')".to_string()
        };
    }

    // Debug 输出是最短往返表示，且科学计数法的切换阈值与 Python 相同
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}
