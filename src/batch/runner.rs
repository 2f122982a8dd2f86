//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/collect.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如文件已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 在独立线程池中并行映射，保持输入顺序
    pub fn map<T, F>(&self, items: &[PathBuf], message: &str, processor: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&PathBuf) -> T + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, message);

        let work = || {
            items
                .par_iter()
                .map(|item| {
                    let result = processor(item);
                    pb.inc(1);
                    result
                })
                .collect::<Vec<T>>()
        };

        // 线程池创建失败时退回全局线程池
        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(_) => work(),
        };

        pb.finish_and_clear();
        results
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> BatchResult
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let results = self.map(files, "Processing", processor);

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_counts_outcomes() {
        let files: Vec<PathBuf> = ["a.pun", "b.pun", "c.pun", "d.pun"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let result = BatchRunner::new(2).run(&files, |f| {
            let name = f.display().to_string();
            match name.as_str() {
                "a.pun" | "b.pun" => ProcessResult::Success(name),
                "c.pun" => ProcessResult::Skipped(name),
                _ => ProcessResult::Failed(name, "bad block".to_string()),
            }
        });

        assert_eq!(result.success, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 4);
        assert_eq!(result.failures[0].0, "d.pun");
    }

    #[test]
    fn test_map_preserves_order() {
        let files: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("{}", i))).collect();
        let names = BatchRunner::new(0).map(&files, "Testing", |f| f.display().to_string());
        assert_eq!(names[0], "0");
        assert_eq!(names[19], "19");
    }
}
